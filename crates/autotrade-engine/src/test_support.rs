//! Test support: item and proposal builders plus recording collaborators.
//!
//! `RecordingTransport` and `RecordingBackend` log every call they receive so
//! tests can assert on the side effects of the decision engine, and can be
//! told to fail or to answer slowly.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use autotrade_models::{
    Item, NegotiationSnapshot, OfferState, Proposal, CSGO_APP_ID, STEAM_APP_ID, TF2_APP_ID,
};
use chrono::Utc;

use crate::collaborators::{AcceptOutcome, MarketBackend, OfferTransport};
use crate::context::EvaluationContext;
use crate::error::EngineError;

pub fn item(app_id: u32, name: &str) -> Item {
    Item::new(app_id, name)
}

pub fn tf2(name: &str) -> Item {
    Item::new(TF2_APP_ID, name)
}

pub fn tf2_key() -> Item {
    tf2("Mann Co. Supply Crate Key")
}

pub fn csgo_key() -> Item {
    Item::new(CSGO_APP_ID, "Chroma 2 Case Key")
}

pub fn gems(amount: u64) -> Item {
    Item::new(STEAM_APP_ID, "753-Gems").with_amount(amount)
}

pub fn sack_of_gems(amount: u64) -> Item {
    Item::new(STEAM_APP_ID, "753-Sack of Gems").with_amount(amount)
}

pub fn proposal(items_to_give: Vec<Item>, items_to_receive: Vec<Item>) -> Proposal {
    proposal_with_id("4821", items_to_give, items_to_receive)
}

pub fn proposal_with_id(
    id: &str,
    items_to_give: Vec<Item>,
    items_to_receive: Vec<Item>,
) -> Proposal {
    Proposal {
        id: id.to_string(),
        partner: "76561198000000002".to_string(),
        items_to_give,
        items_to_receive,
        state: OfferState::Active,
        is_our_offer: false,
        created_at: Utc::now(),
        reported_totals: None,
    }
}

fn push<T>(log: &Mutex<Vec<T>>, entry: T) {
    log.lock().unwrap_or_else(|e| e.into_inner()).push(entry);
}

fn snapshot_of<T: Clone>(log: &Mutex<Vec<T>>) -> Vec<T> {
    log.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Accept(String),
    Decline(String),
}

/// Offer transport that records calls instead of talking to a remote service.
pub struct RecordingTransport {
    calls: Mutex<Vec<TransportCall>>,
    restored: Mutex<Vec<NegotiationSnapshot>>,
    pub accept_outcome: AcceptOutcome,
    pub fail_accept: bool,
    pub fail_decline: bool,
    pub delay: Option<Duration>,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            restored: Mutex::new(Vec::new()),
            accept_outcome: AcceptOutcome::Accepted,
            fail_accept: false,
            fail_decline: false,
            delay: None,
        }
    }

    pub fn failing_accept() -> Self {
        Self {
            fail_accept: true,
            ..Self::new()
        }
    }

    pub fn failing_decline() -> Self {
        Self {
            fail_decline: true,
            ..Self::new()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        snapshot_of(&self.calls)
    }

    pub fn restored(&self) -> Vec<NegotiationSnapshot> {
        snapshot_of(&self.restored)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl OfferTransport for RecordingTransport {
    async fn accept(&self, proposal: &Proposal) -> Result<AcceptOutcome, EngineError> {
        self.pause().await;
        push(&self.calls, TransportCall::Accept(proposal.id.clone()));
        if self.fail_accept {
            return Err(EngineError::Transport("Mock accept failure".to_string()));
        }
        Ok(self.accept_outcome)
    }

    async fn decline(&self, proposal: &Proposal) -> Result<(), EngineError> {
        self.pause().await;
        push(&self.calls, TransportCall::Decline(proposal.id.clone()));
        if self.fail_decline {
            return Err(EngineError::Transport("Mock decline failure".to_string()));
        }
        Ok(())
    }

    fn restore_snapshot(&self, snapshot: NegotiationSnapshot) {
        push(&self.restored, snapshot);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    MatchBuyOrders(String),
    MatchSellOrders(String),
    Finalize(String),
}

/// Market backend with canned matching results that records calls.
pub struct RecordingBackend {
    calls: Mutex<Vec<BackendCall>>,
    pub buy_orders: Option<bool>,
    pub sell_orders: bool,
    pub fail_sell_orders: bool,
    pub fail_finalize: bool,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            buy_orders: None,
            sell_orders: false,
            fail_sell_orders: false,
            fail_finalize: false,
        }
    }

    pub fn matching(buy_orders: Option<bool>, sell_orders: bool) -> Self {
        Self {
            buy_orders,
            sell_orders,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        snapshot_of(&self.calls)
    }

    pub fn finalized(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::Finalize(id) => Some(id),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl MarketBackend for RecordingBackend {
    fn match_buy_orders(&self, ctx: &EvaluationContext) -> Option<bool> {
        push(&self.calls, BackendCall::MatchBuyOrders(ctx.proposal.id.clone()));
        self.buy_orders
    }

    async fn match_sell_orders(&self, ctx: &EvaluationContext) -> Result<bool, EngineError> {
        push(&self.calls, BackendCall::MatchSellOrders(ctx.proposal.id.clone()));
        if self.fail_sell_orders {
            return Err(EngineError::Backend("Mock sell order failure".to_string()));
        }
        Ok(self.sell_orders)
    }

    async fn finalize(&self, proposal: &Proposal) -> Result<(), EngineError> {
        push(&self.calls, BackendCall::Finalize(proposal.id.clone()));
        if self.fail_finalize {
            return Err(EngineError::Backend("Mock finalize failure".to_string()));
        }
        Ok(())
    }
}
