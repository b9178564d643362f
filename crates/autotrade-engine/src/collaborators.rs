use async_trait::async_trait;
use autotrade_models::{NegotiationSnapshot, Proposal};

use crate::context::EvaluationContext;
use crate::error::EngineError;

/// What happened when the transport accepted an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    Accepted,
    /// Accepted, but the trade still needs a mobile confirmation.
    PendingConfirmation,
}

/// The remote offer service. Mockable for testing.
#[async_trait]
pub trait OfferTransport: Send + Sync {
    async fn accept(&self, proposal: &Proposal) -> Result<AcceptOutcome, EngineError>;

    async fn decline(&self, proposal: &Proposal) -> Result<(), EngineError>;

    /// Hand the transport its persisted resumption state at start-up.
    fn restore_snapshot(&self, snapshot: NegotiationSnapshot);
}

/// The pricing backend that owns buy/sell orders and trade bookkeeping.
#[async_trait]
pub trait MarketBackend: Send + Sync {
    /// Match the proposal against buy orders. `Some(false)` vetoes any further
    /// handling; `None` means the backend has no opinion.
    fn match_buy_orders(&self, ctx: &EvaluationContext) -> Option<bool>;

    /// Match the proposal against sell orders. `true` means the trade went
    /// through and should be finalized.
    async fn match_sell_orders(&self, ctx: &EvaluationContext) -> Result<bool, EngineError>;

    /// Record a completed trade.
    async fn finalize(&self, proposal: &Proposal) -> Result<(), EngineError>;
}
