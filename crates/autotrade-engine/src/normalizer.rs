//! Currency normalization: turns one party's item stacks into per-unit totals.
//!
//! Unit detection is a pure function of an item's catalog and name. Items that
//! match no unit (including items without a resolved name) never fail; they
//! only count against the "everything is currency" check.

use autotrade_models::{Item, CSGO_APP_ID, STEAM_APP_ID, TF2_APP_ID};
use rust_decimal::Decimal;
use serde::Serialize;

/// Gems held by one "Sack of Gems".
pub const GEMS_PER_SACK: u64 = 1000;
/// Scrap in one refined metal.
pub const SCRAP_PER_REFINED: u64 = 9;

const TF2_KEY_NAME: &str = "Mann Co. Supply Crate Key";
const GEMS_NAME: &str = "753-Gems";
const SACK_OF_GEMS_NAME: &str = "753-Sack of Gems";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrencyUnit {
    Metal,
    Tf2Key,
    CsgoKey,
    Gems,
    SackOfGems,
}

/// Scrap value of one metal item, if the item is metal.
pub fn metal_scrap_value(item: &Item) -> Option<u64> {
    if item.app_id != TF2_APP_ID {
        return None;
    }
    match item.name()? {
        "Refined Metal" => Some(9),
        "Reclaimed Metal" => Some(3),
        "Scrap Metal" => Some(1),
        _ => None,
    }
}

pub fn is_metal(item: &Item) -> bool {
    metal_scrap_value(item).is_some()
}

pub fn is_tf2_key(item: &Item) -> bool {
    item.app_id == TF2_APP_ID && item.name() == Some(TF2_KEY_NAME)
}

pub fn is_csgo_key(item: &Item) -> bool {
    item.app_id == CSGO_APP_ID && item.name().is_some_and(|name| name.ends_with("Key"))
}

pub fn is_gems(item: &Item) -> bool {
    item.app_id == STEAM_APP_ID && item.name() == Some(GEMS_NAME)
}

pub fn is_sack_of_gems(item: &Item) -> bool {
    item.app_id == STEAM_APP_ID && item.name() == Some(SACK_OF_GEMS_NAME)
}

pub fn currency_unit(item: &Item) -> Option<CurrencyUnit> {
    if is_metal(item) {
        Some(CurrencyUnit::Metal)
    } else if is_tf2_key(item) {
        Some(CurrencyUnit::Tf2Key)
    } else if is_csgo_key(item) {
        Some(CurrencyUnit::CsgoKey)
    } else if is_gems(item) {
        Some(CurrencyUnit::Gems)
    } else if is_sack_of_gems(item) {
        Some(CurrencyUnit::SackOfGems)
    } else {
        None
    }
}

/// Per-unit totals for one party.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CurrencyTotals {
    pub metal_scrap: u64,
    pub tf2_keys: u64,
    pub csgo_keys: u64,
    pub gems: u64,
    pub sacks_of_gems: u64,
    /// Stacks that are not a currency unit.
    pub other_stacks: usize,
}

impl CurrencyTotals {
    pub fn from_items(items: &[Item]) -> Self {
        let mut totals = Self::default();
        for item in items {
            let amount = item.amount;
            match currency_unit(item) {
                Some(CurrencyUnit::Metal) => {
                    let scrap = metal_scrap_value(item).unwrap_or(0);
                    totals.metal_scrap = totals
                        .metal_scrap
                        .saturating_add(scrap.saturating_mul(amount));
                }
                Some(CurrencyUnit::Tf2Key) => {
                    totals.tf2_keys = totals.tf2_keys.saturating_add(amount)
                }
                Some(CurrencyUnit::CsgoKey) => {
                    totals.csgo_keys = totals.csgo_keys.saturating_add(amount)
                }
                Some(CurrencyUnit::Gems) => totals.gems = totals.gems.saturating_add(amount),
                Some(CurrencyUnit::SackOfGems) => {
                    totals.sacks_of_gems = totals.sacks_of_gems.saturating_add(amount)
                }
                None => totals.other_stacks += 1,
            }
        }
        totals
    }

    /// Metal in refined.
    pub fn metal(&self) -> Decimal {
        Decimal::from(self.metal_scrap) / Decimal::from(SCRAP_PER_REFINED)
    }

    /// Gems with sacks unpacked.
    pub fn gem_value(&self) -> u64 {
        self.gems
            .saturating_add(self.sacks_of_gems.saturating_mul(GEMS_PER_SACK))
    }

    pub fn has_gems(&self) -> bool {
        self.gem_value() > 0
    }

    pub fn has_keys_or_metal(&self) -> bool {
        self.metal_scrap > 0 || self.tf2_keys > 0 || self.csgo_keys > 0
    }

    /// Every stack is a currency unit. Vacuously true for no stacks.
    pub fn all_currency(&self) -> bool {
        self.other_stacks == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(app_id: u32, name: &str) -> Item {
        Item::new(app_id, name)
    }

    #[test]
    fn detects_units() {
        assert_eq!(
            currency_unit(&item(TF2_APP_ID, "Reclaimed Metal")),
            Some(CurrencyUnit::Metal)
        );
        assert_eq!(
            currency_unit(&item(TF2_APP_ID, "Mann Co. Supply Crate Key")),
            Some(CurrencyUnit::Tf2Key)
        );
        assert_eq!(
            currency_unit(&item(CSGO_APP_ID, "Chroma 2 Case Key")),
            Some(CurrencyUnit::CsgoKey)
        );
        assert_eq!(
            currency_unit(&item(STEAM_APP_ID, "753-Gems")),
            Some(CurrencyUnit::Gems)
        );
        assert_eq!(
            currency_unit(&item(STEAM_APP_ID, "753-Sack of Gems")),
            Some(CurrencyUnit::SackOfGems)
        );
    }

    #[test]
    fn catalog_matters() {
        // Right name, wrong catalog.
        assert_eq!(currency_unit(&item(CSGO_APP_ID, "Refined Metal")), None);
        assert_eq!(currency_unit(&item(TF2_APP_ID, "753-Gems")), None);
        assert_eq!(currency_unit(&item(CSGO_APP_ID, "Chroma 2 Case")), None);
    }

    #[test]
    fn unnamed_items_are_not_currency() {
        let mut unnamed = item(TF2_APP_ID, "Refined Metal");
        unnamed.market_hash_name = None;
        assert_eq!(currency_unit(&unnamed), None);

        let totals = CurrencyTotals::from_items(&[unnamed]);
        assert_eq!(totals.metal_scrap, 0);
        assert!(!totals.all_currency());
    }

    #[test]
    fn totals_sum_each_unit() {
        let items = vec![
            item(TF2_APP_ID, "Refined Metal"),
            item(TF2_APP_ID, "Refined Metal"),
            item(TF2_APP_ID, "Reclaimed Metal"),
            item(TF2_APP_ID, "Scrap Metal"),
            item(TF2_APP_ID, "Mann Co. Supply Crate Key"),
            item(CSGO_APP_ID, "Operation Breakout Case Key"),
            item(STEAM_APP_ID, "753-Gems").with_amount(2500),
            item(STEAM_APP_ID, "753-Sack of Gems").with_amount(2),
            item(TF2_APP_ID, "Team Captain"),
        ];
        let totals = CurrencyTotals::from_items(&items);

        assert_eq!(totals.metal_scrap, 22);
        assert_eq!(totals.tf2_keys, 1);
        assert_eq!(totals.csgo_keys, 1);
        assert_eq!(totals.gems, 2500);
        assert_eq!(totals.sacks_of_gems, 2);
        assert_eq!(totals.gem_value(), 4500);
        assert_eq!(totals.other_stacks, 1);
        assert!(!totals.all_currency());
    }

    #[test]
    fn metal_converts_scrap_to_refined() {
        let totals = CurrencyTotals {
            metal_scrap: 18,
            ..Default::default()
        };
        assert_eq!(totals.metal(), dec!(2));

        let one_scrap = CurrencyTotals {
            metal_scrap: 1,
            ..Default::default()
        };
        assert_eq!(one_scrap.metal().round_dp(2), dec!(0.11));
    }

    #[test]
    fn empty_side_is_all_currency() {
        let totals = CurrencyTotals::from_items(&[]);
        assert!(totals.all_currency());
        assert!(!totals.has_gems());
        assert!(!totals.has_keys_or_metal());
    }
}
