use std::collections::BTreeSet;
use std::sync::Arc;

use autotrade_models::{EngineConfig, Proposal};
use tokio::sync::watch;
use uuid::Uuid;

use crate::collaborators::{MarketBackend, OfferTransport};
use crate::normalizer::CurrencyTotals;

/// Everything derived from one proposal for one evaluation pass.
///
/// Built fresh per event; the proposal itself is never modified.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    pub evaluation_id: Uuid,
    pub proposal: Proposal,
    pub from_owner: bool,
    pub games: BTreeSet<u32>,
    /// Totals of what the agent gives.
    pub ours: CurrencyTotals,
    /// Totals of what the counterpart gives.
    pub theirs: CurrencyTotals,
}

impl EvaluationContext {
    pub fn new(proposal: Proposal, config: &EngineConfig) -> Self {
        Self {
            evaluation_id: Uuid::new_v4(),
            from_owner: config.is_owner(&proposal.partner),
            games: proposal.games(),
            ours: CurrencyTotals::from_items(&proposal.items_to_give),
            theirs: CurrencyTotals::from_items(&proposal.items_to_receive),
            proposal,
        }
    }

    pub fn proposal_id(&self) -> &str {
        &self.proposal.id
    }
}

/// Collaborator handles and live configuration shared by every evaluation.
#[derive(Clone)]
pub struct EngineContext {
    pub transport: Arc<dyn OfferTransport>,
    pub backend: Arc<dyn MarketBackend>,
    config: watch::Receiver<Arc<EngineConfig>>,
}

impl EngineContext {
    pub fn new(
        transport: Arc<dyn OfferTransport>,
        backend: Arc<dyn MarketBackend>,
        config: watch::Receiver<Arc<EngineConfig>>,
    ) -> Self {
        Self {
            transport,
            backend,
            config,
        }
    }

    /// Context with a configuration that never changes.
    pub fn with_static_config(
        transport: Arc<dyn OfferTransport>,
        backend: Arc<dyn MarketBackend>,
        config: EngineConfig,
    ) -> Self {
        let (_tx, rx) = watch::channel(Arc::new(config));
        Self::new(transport, backend, rx)
    }

    /// The configuration as of now. Hold on to the returned value for the
    /// whole evaluation so a reload cannot change rates halfway through.
    pub fn config(&self) -> Arc<EngineConfig> {
        Arc::clone(&self.config.borrow())
    }
}
