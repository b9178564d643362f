use autotrade_models::{
    Category, EngineConfig, Evaluation, OfferState, Proposal, TransportEvent, Valuation, Verdict,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classifier::classify;
use crate::collaborators::AcceptOutcome;
use crate::context::{EngineContext, EvaluationContext};
use crate::valuation;

/// Where a proposal ended up after one event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "resolution", rename_all = "snake_case")]
pub enum Resolution {
    Accepted { pending_confirmation: bool },
    Declined,
    Ignored,
    /// Handed to the market backend; `finalized` if it matched and recorded the trade.
    DelegatedPending { finalized: bool },
    /// A collaborator call failed. The proposal stays evaluated until the
    /// transport reports another change.
    Unresolved,
}

/// Classify and price a proposal. Pure: no collaborator is called, and the
/// same proposal under the same configuration always yields the same
/// category and verdict.
pub fn evaluate(ctx: &EvaluationContext, config: &EngineConfig) -> Evaluation {
    let category = classify(ctx);
    let (category, verdict, valuation, reason) = decide(category, ctx, config);

    Evaluation {
        id: ctx.evaluation_id,
        proposal_id: ctx.proposal.id.clone(),
        category,
        verdict,
        valuation,
        reason,
        evaluated_at: Utc::now(),
    }
}

fn decide(
    category: Category,
    ctx: &EvaluationContext,
    config: &EngineConfig,
) -> (Category, Verdict, Option<Valuation>, String) {
    match category {
        Category::Glitched => (
            category,
            Verdict::Ignore,
            None,
            "item data is missing or inconsistent (the remote service might be down)".to_string(),
        ),
        Category::Unsupported => (
            category,
            Verdict::Ignore,
            None,
            "contains items from an unsupported catalog".to_string(),
        ),
        Category::OwnerOffer => (
            category,
            Verdict::Accept,
            None,
            "offer is from an owner".to_string(),
        ),
        Category::GiftOffer if ctx.proposal.is_gift() && config.accept_gifts => (
            category,
            Verdict::Accept,
            None,
            "gift offer asking for nothing in return".to_string(),
        ),
        Category::GiftOffer => (
            category,
            Verdict::Ignore,
            None,
            "one-sided offer, skipping".to_string(),
        ),
        category if category.is_currency_trade() => {
            match valuation::value(category, ctx, &config.rates) {
                Ok(v) if v.accepted => (
                    category,
                    Verdict::Accept,
                    Some(v),
                    "currency amounts match the configured rates".to_string(),
                ),
                Ok(v) => (
                    category,
                    Verdict::Decline,
                    Some(v),
                    "currency amounts do not match the configured rates".to_string(),
                ),
                Err(e) => {
                    warn!(
                        proposal_id = %ctx.proposal.id,
                        ?category,
                        error = %e,
                        "Cannot price currency trade"
                    );
                    (
                        Category::Unsupported,
                        Verdict::Ignore,
                        None,
                        format!("cannot price {category:?} trade: {e}"),
                    )
                }
            }
        }
        // BuyOrderMatch and SellOrderMatch
        _ => (
            category,
            Verdict::DeferToMarketBackend,
            None,
            "delegated to market backend order matching".to_string(),
        ),
    }
}

/// Drives proposals from "received" to a resolution, calling the offer
/// transport and market backend on the way.
#[derive(Clone)]
pub struct DecisionEngine {
    ctx: EngineContext,
}

impl DecisionEngine {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// Handle one proposal event. Snapshot events carry no proposal and are
    /// left to the snapshot store.
    pub async fn handle_event(&self, event: TransportEvent) -> Resolution {
        match event {
            TransportEvent::NewOffer { proposal } => self.handle_new_offer(proposal).await,
            TransportEvent::OfferStateChanged {
                proposal,
                previous_state,
            } => self.handle_state_change(proposal, previous_state).await,
            TransportEvent::Snapshot { .. } => Resolution::Ignored,
        }
    }

    /// Handle a newly received offer.
    pub async fn handle_new_offer(&self, proposal: Proposal) -> Resolution {
        if proposal.is_our_offer {
            debug!(proposal_id = %proposal.id, "Offer was sent by us, not evaluating");
            return Resolution::Ignored;
        }

        let config = self.ctx.config();
        let ctx = EvaluationContext::new(proposal, &config);
        let evaluation = evaluate(&ctx, &config);

        if evaluation.category == Category::Glitched {
            warn!(
                proposal_id = %ctx.proposal.id,
                partner = %ctx.proposal.partner,
                "Offer is glitched, skipping"
            );
            return Resolution::Ignored;
        }
        info!(
            proposal_id = %ctx.proposal.id,
            partner = %ctx.proposal.partner,
            evaluation_id = %evaluation.id,
            category = ?evaluation.category,
            verdict = ?evaluation.verdict,
            reason = %evaluation.reason,
            "Offer evaluated"
        );

        match evaluation.verdict {
            Verdict::Ignore => Resolution::Ignored,
            Verdict::Accept => self.accept(&ctx, &evaluation).await,
            Verdict::Decline => self.decline(&ctx.proposal).await,
            Verdict::DeferToMarketBackend => self.delegate(&ctx).await,
        }
    }

    /// Handle a lifecycle change of a known offer. Only a switch to
    /// `InvalidItems` needs action.
    pub async fn handle_state_change(
        &self,
        proposal: Proposal,
        previous: OfferState,
    ) -> Resolution {
        debug!(
            proposal_id = %proposal.id,
            from = %previous,
            to = %proposal.state,
            "Offer state changed"
        );

        if proposal.state != OfferState::InvalidItems {
            return Resolution::Ignored;
        }
        if previous == OfferState::Accepted {
            info!(proposal_id = %proposal.id, "Offer was marked invalid after being accepted");
            return Resolution::Ignored;
        }

        info!(proposal_id = %proposal.id, "Offer is now invalid, declining");
        match self.ctx.transport.decline(&proposal).await {
            Ok(()) => {
                debug!(proposal_id = %proposal.id, "Declined");
                Resolution::Declined
            }
            Err(e) => {
                info!(
                    proposal_id = %proposal.id,
                    error = %e,
                    "Offer was marked invalid after being accepted"
                );
                Resolution::Unresolved
            }
        }
    }

    async fn accept(&self, ctx: &EvaluationContext, evaluation: &Evaluation) -> Resolution {
        let proposal = &ctx.proposal;
        let outcome = match self.ctx.transport.accept(proposal).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    proposal_id = %proposal.id,
                    category = ?evaluation.category,
                    error = %e,
                    "Offer couldn't be accepted"
                );
                return Resolution::Unresolved;
            }
        };

        let pending_confirmation = outcome == AcceptOutcome::PendingConfirmation;
        info!(proposal_id = %proposal.id, pending_confirmation, "Offer accepted");

        // Every accepted offer is finalized, owner offers and gifts included.
        debug!(proposal_id = %proposal.id, "Finalizing offer");
        if let Err(e) = self.ctx.backend.finalize(proposal).await {
            warn!(proposal_id = %proposal.id, error = %e, "Failed to finalize accepted offer");
        }

        Resolution::Accepted {
            pending_confirmation,
        }
    }

    async fn decline(&self, proposal: &Proposal) -> Resolution {
        match self.ctx.transport.decline(proposal).await {
            Ok(()) => {
                info!(proposal_id = %proposal.id, "Offer declined");
                Resolution::Declined
            }
            Err(e) => {
                warn!(proposal_id = %proposal.id, error = %e, "Offer couldn't be declined");
                Resolution::Unresolved
            }
        }
    }

    async fn delegate(&self, ctx: &EvaluationContext) -> Resolution {
        let proposal = &ctx.proposal;

        debug!(proposal_id = %proposal.id, "Handling buy orders");
        if self.ctx.backend.match_buy_orders(ctx) == Some(false) {
            debug!(proposal_id = %proposal.id, "Buy order matching vetoed the offer");
            return Resolution::DelegatedPending { finalized: false };
        }

        debug!(proposal_id = %proposal.id, "Handling sell orders");
        match self.ctx.backend.match_sell_orders(ctx).await {
            Ok(true) => {
                debug!(proposal_id = %proposal.id, "Finalizing offer");
                let finalized = match self.ctx.backend.finalize(proposal).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(
                            proposal_id = %proposal.id,
                            error = %e,
                            "Failed to finalize matched offer"
                        );
                        false
                    }
                };
                Resolution::DelegatedPending { finalized }
            }
            Ok(false) => Resolution::DelegatedPending { finalized: false },
            Err(e) => {
                warn!(proposal_id = %proposal.id, error = %e, "Sell order matching failed");
                Resolution::Unresolved
            }
        }
    }
}
