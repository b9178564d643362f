use autotrade_models::{Category, RateKey};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Offer transport error: {0}")]
    Transport(String),

    #[error("Market backend error: {0}")]
    Backend(String),

    #[error("No usable rate configured: {0}")]
    MissingRate(RateKey),

    #[error("Gems given away in a key/metal trade have no refined price")]
    UnpricedGems,

    #[error("Category {0:?} is not priced by the valuation engine")]
    NotPriced(Category),
}
