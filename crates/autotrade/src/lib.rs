//! autotrade - decision engine for an automated item-trading agent
//!
//! Classifies incoming trade offers, prices currency trades against
//! configured exchange rates and accepts, declines or delegates them.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use autotrade::models::{EngineConfig, Proposal, TransportEvent};
//! use autotrade::engine::{DecisionEngine, Dispatcher, EngineContext};
//! use autotrade::engine::{MarketBackend, OfferTransport};
//! use autotrade::store::FileSnapshotStore;
//! ```

pub use autotrade_engine as engine;
pub use autotrade_models as models;
pub use autotrade_store as store;

pub mod dry_run;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use autotrade_engine::{
    DecisionEngine, EngineContext, EvaluationContext, MarketBackend, OfferTransport,
};
use autotrade_models::{EngineConfig, Evaluation, Proposal};

/// Read and parse a TOML engine configuration.
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig, anyhow::Error> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: EngineConfig = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;

    if config.rates.is_empty() {
        tracing::warn!("No exchange rates configured, currency trades will be ignored");
    } else {
        tracing::debug!(rates = config.rates.len(), "Loaded exchange rates");
    }
    Ok(config)
}

/// Build a DecisionEngine from configuration and collaborators.
pub fn build_engine(
    config: EngineConfig,
    transport: Arc<dyn OfferTransport>,
    backend: Arc<dyn MarketBackend>,
) -> DecisionEngine {
    DecisionEngine::new(EngineContext::with_static_config(transport, backend, config))
}

/// Evaluate a proposal without side effects.
pub fn evaluate(proposal: Proposal, config: &EngineConfig) -> Evaluation {
    let ctx = EvaluationContext::new(proposal, config);
    autotrade_engine::evaluate(&ctx, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotrade_models::{Category, Item, Verdict, STEAM_APP_ID, TF2_APP_ID};
    use std::io::Write;

    #[test]
    fn load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
owners = ["76561198000000001"]
accept_gifts = true

[rates]
buy_gems_ref = "0.5"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert!(config.accept_gifts);
        assert!(config.is_owner("76561198000000001"));
    }

    #[test]
    fn load_config_without_rates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "accept_gifts = false").unwrap();

        let config = load_config(file.path()).unwrap();
        assert!(config.rates.is_empty());
        assert_eq!(config.snapshot.path, "polldata.json");
    }

    #[test]
    fn load_config_reports_path() {
        let err = load_config("/nonexistent/autotrade.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/autotrade.toml"));
    }

    #[test]
    fn evaluate_gift() {
        let config = EngineConfig {
            accept_gifts: true,
            ..Default::default()
        };
        let proposal: Proposal = serde_json::from_value(serde_json::json!({
            "id": "1",
            "partner": "765",
            "state": "active",
            "created_at": "2024-05-01T12:00:00Z",
            "items_to_receive": [
                {
                    "app_id": TF2_APP_ID,
                    "context_id": "2",
                    "asset_id": "9",
                    "market_hash_name": "Refined Metal"
                }
            ]
        }))
        .unwrap();

        let evaluation = evaluate(proposal, &config);
        assert_eq!(evaluation.category, Category::GiftOffer);
        assert_eq!(evaluation.verdict, Verdict::Accept);
    }

    #[test]
    fn evaluate_gems_without_rates_is_ignored() {
        let mut proposal: Proposal = serde_json::from_value(serde_json::json!({
            "id": "2",
            "partner": "765",
            "state": "active",
            "created_at": "2024-05-01T12:00:00Z"
        }))
        .unwrap();
        proposal.items_to_give = vec![Item::new(TF2_APP_ID, "Refined Metal")];
        proposal.items_to_receive = vec![Item::new(STEAM_APP_ID, "753-Gems").with_amount(100)];

        let evaluation = evaluate(proposal, &EngineConfig::default());
        assert_eq!(evaluation.category, Category::Unsupported);
        assert_eq!(evaluation.verdict, Verdict::Ignore);
    }
}
