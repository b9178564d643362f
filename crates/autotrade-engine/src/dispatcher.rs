//! Event dispatch.
//!
//! Events for the same proposal are handled strictly in arrival order; events
//! for different proposals are handled concurrently. Each proposal keeps the
//! handle of its most recent task, and the next task for that proposal waits
//! on it before starting.

use std::collections::HashMap;

use autotrade_models::TransportEvent;
use autotrade_store::{FileSnapshotStore, SnapshotWriter};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::decision::{DecisionEngine, Resolution};

/// The resolution reached for one handled event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub proposal_id: String,
    #[serde(flatten)]
    pub resolution: Resolution,
}

pub struct Dispatcher {
    engine: DecisionEngine,
    snapshots: SnapshotWriter,
    outcomes: Option<mpsc::UnboundedSender<Outcome>>,
    cancel: CancellationToken,
}

impl Dispatcher {
    /// Restore the persisted negotiation snapshot into the transport, then
    /// start persisting new snapshots to the same store.
    pub async fn start(engine: DecisionEngine, store: FileSnapshotStore) -> Self {
        match store.load_or_empty().await {
            Some(snapshot) => {
                info!(path = %store.path().display(), "Restoring negotiation snapshot");
                engine.context().transport.restore_snapshot(snapshot);
            }
            None => debug!(path = %store.path().display(), "No negotiation snapshot to restore"),
        }

        Self {
            engine,
            snapshots: SnapshotWriter::spawn(store),
            outcomes: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Report every resolution on `tx`.
    pub fn with_outcomes(mut self, tx: mpsc::UnboundedSender<Outcome>) -> Self {
        self.outcomes = Some(tx);
        self
    }

    /// Returns a CancellationToken that can be used to trigger shutdown.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Dispatch events until the channel closes or the dispatcher is
    /// cancelled. Waits for in-flight handling and the last snapshot write
    /// before returning.
    pub async fn run(self, mut events: mpsc::Receiver<TransportEvent>) {
        info!("Dispatcher starting");
        let mut lanes: HashMap<String, JoinHandle<()>> = HashMap::new();

        loop {
            let event = tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("Dispatcher cancelled");
                    break;
                }
                event = events.recv() => match event {
                    Some(event) => event,
                    None => {
                        debug!("Event channel closed");
                        break;
                    }
                },
            };

            match event {
                TransportEvent::Snapshot { snapshot } => self.snapshots.submit(snapshot),
                event => self.route(event, &mut lanes),
            }
        }

        for (proposal_id, handle) in lanes {
            if let Err(e) = handle.await {
                warn!(%proposal_id, error = %e, "Proposal task panicked");
            }
        }
        self.snapshots.shutdown().await;
        info!("Dispatcher stopped");
    }

    fn route(&self, event: TransportEvent, lanes: &mut HashMap<String, JoinHandle<()>>) {
        let Some(proposal_id) = event.proposal_id().map(str::to_owned) else {
            return;
        };
        lanes.retain(|_, handle| !handle.is_finished());

        let previous = lanes.remove(&proposal_id);
        let engine = self.engine.clone();
        let outcomes = self.outcomes.clone();
        let cancel = self.cancel.clone();
        let id = proposal_id.clone();

        let handle = tokio::spawn(async move {
            if let Some(previous) = previous {
                if let Err(e) = previous.await {
                    warn!(proposal_id = %id, error = %e, "Previous proposal task panicked");
                }
            }
            if cancel.is_cancelled() {
                debug!(proposal_id = %id, "Shutting down, dropping queued event");
                return;
            }
            let resolution = engine.handle_event(event).await;
            if let Some(tx) = outcomes {
                let _ = tx.send(Outcome {
                    proposal_id: id,
                    resolution,
                });
            }
        });
        lanes.insert(proposal_id, handle);
    }
}
