use serde::{Deserialize, Serialize};

/// Catalog (Steam app id) of the primary trading game.
pub const TF2_APP_ID: u32 = 440;
/// Catalog that holds CS:GO keys.
pub const CSGO_APP_ID: u32 = 730;
/// Steam community catalog. Gems live here, and it is allowed alongside the primary catalog.
pub const STEAM_APP_ID: u32 = 753;

fn default_amount() -> u64 {
    1
}

/// One stack of items on one side of a proposal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub app_id: u32,
    pub context_id: String,
    pub asset_id: String,
    /// Stack size. Gems come in large stacks, most other items are 1.
    #[serde(default = "default_amount")]
    pub amount: u64,
    /// None when the transport could not resolve the item's description.
    pub market_hash_name: Option<String>,
}

impl Item {
    pub fn new(app_id: u32, market_hash_name: &str) -> Self {
        Self {
            app_id,
            context_id: "2".to_string(),
            asset_id: String::new(),
            amount: 1,
            market_hash_name: Some(market_hash_name.to_string()),
        }
    }

    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.market_hash_name.as_deref()
    }
}
