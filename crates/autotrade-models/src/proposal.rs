use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Lifecycle state of a proposal as reported by the offer transport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OfferState {
    Invalid,
    Active,
    Accepted,
    Countered,
    Expired,
    Canceled,
    Declined,
    /// Items left one party's inventory before the trade went through.
    InvalidItems,
    NeedsConfirmation,
    CanceledBySecondFactor,
    InEscrow,
    #[serde(other)]
    Unknown,
}

impl OfferState {
    pub fn name(&self) -> &'static str {
        match self {
            OfferState::Invalid => "Invalid",
            OfferState::Active => "Active",
            OfferState::Accepted => "Accepted",
            OfferState::Countered => "Countered",
            OfferState::Expired => "Expired",
            OfferState::Canceled => "Canceled",
            OfferState::Declined => "Declined",
            OfferState::InvalidItems => "InvalidItems",
            OfferState::NeedsConfirmation => "NeedsConfirmation",
            OfferState::CanceledBySecondFactor => "CanceledBySecondFactor",
            OfferState::InEscrow => "InEscrow",
            OfferState::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for OfferState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Item stack totals per party, as counted by the transport itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartyTotals {
    pub ours: u64,
    pub theirs: u64,
}

/// A snapshot of one trade negotiation. Built fresh from every transport event
/// and never edited afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Proposal {
    pub id: String,
    /// Counterpart account id (SteamID64).
    pub partner: String,
    /// Items the agent would give away.
    #[serde(default)]
    pub items_to_give: Vec<Item>,
    /// Items the counterpart would give to the agent.
    #[serde(default)]
    pub items_to_receive: Vec<Item>,
    pub state: OfferState,
    #[serde(default)]
    pub is_our_offer: bool,
    pub created_at: DateTime<Utc>,
    /// Stack counts the transport reported alongside the item lists, if any.
    #[serde(default)]
    pub reported_totals: Option<PartyTotals>,
}

impl Proposal {
    /// Catalogs represented on either side, sorted.
    pub fn games(&self) -> BTreeSet<u32> {
        self.items_to_give
            .iter()
            .chain(self.items_to_receive.iter())
            .map(|item| item.app_id)
            .collect()
    }

    /// At least one party gives nothing.
    pub fn is_one_sided(&self) -> bool {
        self.items_to_give.is_empty() || self.items_to_receive.is_empty()
    }

    /// The counterpart gives something and asks for nothing.
    pub fn is_gift(&self) -> bool {
        self.items_to_give.is_empty() && !self.items_to_receive.is_empty()
    }

    pub fn stack_totals(&self) -> PartyTotals {
        PartyTotals {
            ours: sum_amounts(&self.items_to_give),
            theirs: sum_amounts(&self.items_to_receive),
        }
    }
}

fn sum_amounts(items: &[Item]) -> u64 {
    items
        .iter()
        .fold(0u64, |total, item| total.saturating_add(item.amount))
}
