pub mod classifier;
pub mod collaborators;
pub mod context;
pub mod decision;
pub mod dispatcher;
pub mod error;
pub mod normalizer;
pub mod valuation;

pub mod test_support;

pub use classifier::classify;
pub use collaborators::{AcceptOutcome, MarketBackend, OfferTransport};
pub use context::{EngineContext, EvaluationContext};
pub use decision::{evaluate, DecisionEngine, Resolution};
pub use dispatcher::{Dispatcher, Outcome};
pub use error::EngineError;
pub use normalizer::{CurrencyTotals, CurrencyUnit};
