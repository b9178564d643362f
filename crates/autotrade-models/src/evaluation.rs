use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of trade a proposal is. Assigned once per evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    OwnerOffer,
    GiftOffer,
    /// Counterpart gives gems for our currency.
    CurrencyBuy,
    /// We give gems for their currency.
    CurrencySell,
    /// Keys and metal only, rebalanced at the configured prices.
    KeyArbitrage,
    BuyOrderMatch,
    SellOrderMatch,
    Unsupported,
    Glitched,
}

impl Category {
    /// Categories the valuation engine prices.
    pub fn is_currency_trade(&self) -> bool {
        matches!(
            self,
            Category::CurrencyBuy | Category::CurrencySell | Category::KeyArbitrage
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accept,
    Decline,
    DeferToMarketBackend,
    Ignore,
}

/// Unit both sides of a valuation were converted into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValuationUnit {
    Gems,
    Refined,
}

/// Result of pricing a currency trade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Valuation {
    pub unit: ValuationUnit,
    /// Value the agent gives, rounded to cents.
    pub ours: Decimal,
    /// Value the counterpart gives, rounded to cents.
    pub theirs: Decimal,
    /// Rounded difference the trade is judged on. Accepted iff `delta <= 0`.
    pub delta: Decimal,
    pub accepted: bool,
}

/// The outcome of one pure evaluation pass over a proposal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    pub id: Uuid,
    pub proposal_id: String,
    pub category: Category,
    pub verdict: Verdict,
    pub valuation: Option<Valuation>,
    pub reason: String,
    pub evaluated_at: DateTime<Utc>,
}
