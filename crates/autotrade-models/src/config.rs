use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the decision engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EngineConfig {
    /// Account ids whose offers are accepted without valuation.
    #[serde(default)]
    pub owners: Vec<String>,
    /// Accept offers that give us items and ask for nothing.
    #[serde(default)]
    pub accept_gifts: bool,
    #[serde(default)]
    pub rates: ExchangeRates,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

impl EngineConfig {
    pub fn is_owner(&self, partner: &str) -> bool {
        self.owners.iter().any(|owner| owner == partner)
    }
}

/// Named exchange rates used by the valuation engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RateKey {
    /// Gems paid out per TF2 key we give when buying gems.
    BuyGemsTf2Key,
    /// Gems paid out per refined metal we give when buying gems.
    BuyGemsRef,
    /// Gems paid out per CS:GO key we give when buying gems.
    BuyGemsCsgoKey,
    /// Gems charged per TF2 key received when selling gems.
    SellGemsTf2Key,
    /// Gems charged per refined metal received when selling gems.
    SellGemsRef,
    /// Gems charged per CS:GO key received when selling gems.
    SellGemsCsgoKey,
    /// Refined metal value of one TF2 key.
    Tf2KeyRefPrice,
    /// Refined metal value of one CS:GO key the counterpart gives.
    SellCsgoRefPrice,
    /// Refined metal value of one CS:GO key we give.
    BuyCsgoRefPrice,
}

impl RateKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateKey::BuyGemsTf2Key => "buy_gems_tf2_key",
            RateKey::BuyGemsRef => "buy_gems_ref",
            RateKey::BuyGemsCsgoKey => "buy_gems_csgo_key",
            RateKey::SellGemsTf2Key => "sell_gems_tf2_key",
            RateKey::SellGemsRef => "sell_gems_ref",
            RateKey::SellGemsCsgoKey => "sell_gems_csgo_key",
            RateKey::Tf2KeyRefPrice => "tf2_key_ref_price",
            RateKey::SellCsgoRefPrice => "sell_csgo_ref_price",
            RateKey::BuyCsgoRefPrice => "buy_csgo_ref_price",
        }
    }
}

impl std::fmt::Display for RateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only rate table. A rate that is missing, zero or negative is unusable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct ExchangeRates(BTreeMap<RateKey, Decimal>);

impl ExchangeRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: RateKey, rate: Decimal) -> Self {
        self.0.insert(key, rate);
        self
    }

    /// The rate for `key`, if it is configured and positive.
    pub fn get(&self, key: RateKey) -> Option<Decimal> {
        self.0
            .get(&key)
            .copied()
            .filter(|rate| rate.is_sign_positive() && !rate.is_zero())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where the negotiation snapshot is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotConfig {
    pub path: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: "polldata.json".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn roundtrip_engine_config() {
        let config = EngineConfig {
            owners: vec!["76561198000000001".to_string()],
            accept_gifts: true,
            rates: ExchangeRates::new()
                .with(RateKey::BuyGemsRef, dec!(0.5))
                .with(RateKey::Tf2KeyRefPrice, dec!(52.33)),
            snapshot: SnapshotConfig::default(),
        };

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn config_from_toml() {
        let toml_str = r#"
owners = ["76561198000000001"]
accept_gifts = true

[rates]
buy_gems_tf2_key = "450"
buy_gems_ref = "0.5"
tf2_key_ref_price = "52.33"

[snapshot]
path = "/tmp/polldata.json"
"#;

        let config: EngineConfig = toml::from_str(toml_str).unwrap();
        assert!(config.accept_gifts);
        assert!(config.is_owner("76561198000000001"));
        assert!(!config.is_owner("76561198000000002"));
        assert_eq!(config.rates.len(), 3);
        assert_eq!(config.rates.get(RateKey::BuyGemsRef), Some(dec!(0.5)));
        assert_eq!(config.snapshot.path, "/tmp/polldata.json");
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert!(!config.accept_gifts);
        assert!(config.owners.is_empty());
        assert!(config.rates.is_empty());
        assert_eq!(config.snapshot.path, "polldata.json");
    }

    #[test]
    fn zero_and_missing_rates_are_unusable() {
        let rates = ExchangeRates::new()
            .with(RateKey::SellGemsRef, dec!(0))
            .with(RateKey::SellGemsTf2Key, dec!(-3))
            .with(RateKey::SellGemsCsgoKey, dec!(380));
        assert_eq!(rates.get(RateKey::SellGemsRef), None);
        assert_eq!(rates.get(RateKey::SellGemsTf2Key), None);
        assert_eq!(rates.get(RateKey::BuyGemsRef), None);
        assert_eq!(rates.get(RateKey::SellGemsCsgoKey), Some(dec!(380)));
    }
}
