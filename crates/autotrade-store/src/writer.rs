use autotrade_models::event::NegotiationSnapshot;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::file::FileSnapshotStore;

/// Background snapshot persister.
///
/// Snapshots are handed over through a `watch` channel, so a burst of snapshot
/// events collapses into a write of the newest one. A failed write is logged
/// and the next submitted snapshot is written as usual.
pub struct SnapshotWriter {
    tx: watch::Sender<Option<NegotiationSnapshot>>,
    handle: JoinHandle<()>,
}

impl SnapshotWriter {
    pub fn spawn(store: FileSnapshotStore) -> Self {
        let (tx, rx) = watch::channel(None);
        let handle = tokio::spawn(write_loop(store, rx));
        Self { tx, handle }
    }

    /// Queue `snapshot` for persistence, replacing any snapshot not yet written.
    pub fn submit(&self, snapshot: NegotiationSnapshot) {
        self.tx.send_replace(Some(snapshot));
    }

    /// Flush the newest pending snapshot and stop the writer task.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Snapshot writer task panicked");
        }
    }
}

async fn write_loop(
    store: FileSnapshotStore,
    mut rx: watch::Receiver<Option<NegotiationSnapshot>>,
) {
    while rx.changed().await.is_ok() {
        let pending = rx.borrow_and_update().clone();
        let Some(snapshot) = pending else {
            continue;
        };
        match store.save(&snapshot).await {
            Ok(()) => debug!(path = %store.path().display(), "Saved negotiation snapshot"),
            Err(e) => warn!(
                path = %store.path().display(),
                error = %e,
                "Error writing negotiation snapshot"
            ),
        }
    }
    debug!("Snapshot writer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn last_submitted_snapshot_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("polldata.json"));
        let writer = SnapshotWriter::spawn(store.clone());

        for n in 0..20 {
            writer.submit(NegotiationSnapshot(serde_json::json!({ "seq": n })));
        }
        writer.shutdown().await;

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.0["seq"], serde_json::json!(19));
    }

    #[tokio::test]
    async fn write_failure_does_not_stop_the_writer() {
        let dir = tempfile::tempdir().unwrap();
        let bad = FileSnapshotStore::new(dir.path().join("missing").join("polldata.json"));
        let writer = SnapshotWriter::spawn(bad.clone());

        writer.submit(NegotiationSnapshot(serde_json::json!({ "seq": 1 })));
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        std::fs::create_dir(dir.path().join("missing")).unwrap();
        writer.submit(NegotiationSnapshot(serde_json::json!({ "seq": 2 })));
        writer.shutdown().await;

        let loaded = bad.load().await.unwrap().unwrap();
        assert_eq!(loaded.0["seq"], serde_json::json!(2));
    }

    #[tokio::test]
    async fn shutdown_without_snapshots_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("polldata.json"));
        let writer = SnapshotWriter::spawn(store.clone());

        writer.shutdown().await;
        assert!(store.load().await.unwrap().is_none());
    }
}
