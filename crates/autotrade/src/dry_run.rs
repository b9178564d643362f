//! Collaborators that only log. Used by `autotrade replay` to run recorded
//! events through the engine without touching a remote service.

use async_trait::async_trait;
use autotrade_engine::{
    AcceptOutcome, EngineError, EvaluationContext, MarketBackend, OfferTransport,
};
use autotrade_models::{NegotiationSnapshot, Proposal};

#[derive(Debug, Default)]
pub struct DryRunTransport;

#[async_trait]
impl OfferTransport for DryRunTransport {
    async fn accept(&self, proposal: &Proposal) -> Result<AcceptOutcome, EngineError> {
        tracing::info!(proposal_id = %proposal.id, "[dry run] would accept offer");
        Ok(AcceptOutcome::Accepted)
    }

    async fn decline(&self, proposal: &Proposal) -> Result<(), EngineError> {
        tracing::info!(proposal_id = %proposal.id, "[dry run] would decline offer");
        Ok(())
    }

    fn restore_snapshot(&self, _snapshot: NegotiationSnapshot) {
        tracing::debug!("[dry run] negotiation snapshot restored");
    }
}

/// A market backend with no orders: never vetoes, never matches.
#[derive(Debug, Default)]
pub struct DryRunBackend;

#[async_trait]
impl MarketBackend for DryRunBackend {
    fn match_buy_orders(&self, _ctx: &EvaluationContext) -> Option<bool> {
        None
    }

    async fn match_sell_orders(&self, ctx: &EvaluationContext) -> Result<bool, EngineError> {
        tracing::debug!(proposal_id = %ctx.proposal_id(), "[dry run] no sell orders to match");
        Ok(false)
    }

    async fn finalize(&self, proposal: &Proposal) -> Result<(), EngineError> {
        tracing::info!(proposal_id = %proposal.id, "[dry run] would finalize trade");
        Ok(())
    }
}
