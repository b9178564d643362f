pub mod config;
pub mod evaluation;
pub mod event;
pub mod item;
pub mod proposal;

pub use config::{EngineConfig, ExchangeRates, RateKey, SnapshotConfig};
pub use evaluation::{Category, Evaluation, Valuation, ValuationUnit, Verdict};
pub use event::{NegotiationSnapshot, TransportEvent};
pub use item::{Item, CSGO_APP_ID, STEAM_APP_ID, TF2_APP_ID};
pub use proposal::{OfferState, PartyTotals, Proposal};
