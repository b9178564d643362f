//! Offer classification.
//!
//! Rules are tried in order and the first one that yields a category wins.
//! A proposal no rule claims is handed to the market backend.

use autotrade_models::{Category, STEAM_APP_ID, TF2_APP_ID};

use crate::context::EvaluationContext;

/// One classification rule.
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&EvaluationContext) -> Option<Category>,
}

pub const RULES: &[Rule] = &[
    Rule {
        name: "glitched",
        apply: glitched,
    },
    Rule {
        name: "owner",
        apply: owner,
    },
    Rule {
        name: "one_sided",
        apply: one_sided,
    },
    Rule {
        name: "foreign_catalog",
        apply: foreign_catalog,
    },
    Rule {
        name: "currency_exchange",
        apply: currency_exchange,
    },
];

pub fn classify(ctx: &EvaluationContext) -> Category {
    RULES
        .iter()
        .find_map(|rule| (rule.apply)(ctx))
        .unwrap_or_else(|| order_match(ctx))
}

/// Item descriptions missing, or our stack counts disagree with the transport's.
pub fn glitched(ctx: &EvaluationContext) -> Option<Category> {
    let proposal = &ctx.proposal;
    let unnamed = proposal
        .items_to_give
        .iter()
        .chain(proposal.items_to_receive.iter())
        .any(|item| item.name().map_or(true, str::is_empty));
    let miscounted = proposal
        .reported_totals
        .is_some_and(|reported| reported != proposal.stack_totals());

    (unnamed || miscounted).then_some(Category::Glitched)
}

pub fn owner(ctx: &EvaluationContext) -> Option<Category> {
    ctx.from_owner.then_some(Category::OwnerOffer)
}

pub fn one_sided(ctx: &EvaluationContext) -> Option<Category> {
    ctx.proposal.is_one_sided().then_some(Category::GiftOffer)
}

/// Only items from a single catalog we don't trade in.
pub fn foreign_catalog(ctx: &EvaluationContext) -> Option<Category> {
    let mut games = ctx.games.iter();
    match (games.next(), games.next()) {
        (Some(&game), None) if game != TF2_APP_ID && game != STEAM_APP_ID => {
            Some(Category::Unsupported)
        }
        _ => None,
    }
}

/// Pure currency trades. Plain TF2 trades go to the order book instead.
pub fn currency_exchange(ctx: &EvaluationContext) -> Option<Category> {
    let tf2_only = ctx.games.len() == 1 && ctx.games.contains(&TF2_APP_ID);
    if tf2_only || !ctx.ours.all_currency() {
        return None;
    }

    let (ours, theirs) = (&ctx.ours, &ctx.theirs);
    if theirs.has_gems() && !ours.has_gems() {
        Some(Category::CurrencyBuy)
    } else if ours.has_gems() && !theirs.has_gems() {
        Some(Category::CurrencySell)
    } else if ours.has_keys_or_metal() || theirs.has_keys_or_metal() {
        Some(Category::KeyArbitrage)
    } else {
        None
    }
}

/// Fallback: paying only currency means we are filling a buy order.
pub fn order_match(ctx: &EvaluationContext) -> Category {
    if ctx.ours.all_currency() {
        Category::BuyOrderMatch
    } else {
        Category::SellOrderMatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{csgo_key, gems, item, proposal, tf2};
    use autotrade_models::{EngineConfig, PartyTotals};

    fn ctx(proposal: autotrade_models::Proposal) -> EvaluationContext {
        EvaluationContext::new(proposal, &EngineConfig::default())
    }

    fn owner_ctx(mut proposal: autotrade_models::Proposal) -> EvaluationContext {
        proposal.partner = "owner".to_string();
        let config = EngineConfig {
            owners: vec!["owner".to_string()],
            ..Default::default()
        };
        EvaluationContext::new(proposal, &config)
    }

    #[test]
    fn missing_description_is_glitched() {
        let mut broken = tf2("Refined Metal");
        broken.market_hash_name = None;
        let c = owner_ctx(proposal(vec![broken], vec![gems(100)]));
        // Glitch detection runs before the owner bypass.
        assert_eq!(classify(&c), Category::Glitched);
    }

    #[test]
    fn reported_totals_mismatch_is_glitched() {
        let mut p = proposal(vec![tf2("Refined Metal")], vec![gems(100)]);
        p.reported_totals = Some(PartyTotals { ours: 1, theirs: 99 });
        assert_eq!(glitched(&ctx(p.clone())), Some(Category::Glitched));

        p.reported_totals = Some(PartyTotals { ours: 1, theirs: 100 });
        assert_eq!(glitched(&ctx(p)), None);
    }

    #[test]
    fn owner_bypasses_everything_else() {
        let c = owner_ctx(proposal(vec![item(570, "Arcana")], vec![]));
        assert_eq!(classify(&c), Category::OwnerOffer);
    }

    #[test]
    fn one_sided_offers_are_gifts() {
        let gift = ctx(proposal(vec![], vec![tf2("Refined Metal")]));
        assert_eq!(classify(&gift), Category::GiftOffer);

        let begging = ctx(proposal(vec![tf2("Mann Co. Supply Crate Key")], vec![]));
        assert_eq!(classify(&begging), Category::GiftOffer);
    }

    #[test]
    fn gift_wins_over_catalog_check() {
        let c = ctx(proposal(vec![], vec![item(570, "Arcana")]));
        assert_eq!(classify(&c), Category::GiftOffer);
    }

    #[test]
    fn single_foreign_catalog_is_unsupported() {
        let c = ctx(proposal(vec![item(570, "Arcana")], vec![item(570, "Immortal")]));
        assert_eq!(classify(&c), Category::Unsupported);

        let keys_only = ctx(proposal(vec![csgo_key()], vec![csgo_key()]));
        assert_eq!(classify(&keys_only), Category::Unsupported);
    }

    #[test]
    fn gems_for_metal_is_currency_buy() {
        let c = ctx(proposal(vec![tf2("Refined Metal")], vec![gems(500)]));
        assert_eq!(classify(&c), Category::CurrencyBuy);
    }

    #[test]
    fn gems_for_keys_is_currency_sell() {
        let c = ctx(proposal(
            vec![gems(5000)],
            vec![tf2("Mann Co. Supply Crate Key")],
        ));
        assert_eq!(classify(&c), Category::CurrencySell);
    }

    #[test]
    fn csgo_keys_for_metal_is_arbitrage() {
        let c = ctx(proposal(vec![tf2("Refined Metal")], vec![csgo_key()]));
        assert_eq!(classify(&c), Category::KeyArbitrage);
    }

    #[test]
    fn plain_tf2_trade_goes_to_order_book() {
        let c = ctx(proposal(
            vec![tf2("Refined Metal")],
            vec![tf2("Mann Co. Supply Crate Key")],
        ));
        assert_eq!(currency_exchange(&c), None);
        assert_eq!(classify(&c), Category::BuyOrderMatch);

        let selling_hat = ctx(proposal(
            vec![tf2("Team Captain")],
            vec![tf2("Refined Metal")],
        ));
        assert_eq!(classify(&selling_hat), Category::SellOrderMatch);
    }

    #[test]
    fn gems_on_both_sides_falls_through_to_arbitrage() {
        let c = ctx(proposal(
            vec![gems(100), tf2("Refined Metal")],
            vec![gems(100), csgo_key()],
        ));
        assert_eq!(classify(&c), Category::KeyArbitrage);
    }

    #[test]
    fn gems_on_both_sides_only_goes_to_order_book() {
        let c = ctx(proposal(vec![gems(100)], vec![gems(200)]));
        assert_eq!(classify(&c), Category::BuyOrderMatch);
    }

    #[test]
    fn non_currency_on_our_side_skips_currency_rules() {
        let c = ctx(proposal(
            vec![tf2("Team Captain"), tf2("Refined Metal")],
            vec![gems(10_000)],
        ));
        assert_eq!(classify(&c), Category::SellOrderMatch);
    }

    #[test]
    fn rule_order_is_stable() {
        let names: Vec<&str> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "glitched",
                "owner",
                "one_sided",
                "foreign_catalog",
                "currency_exchange"
            ]
        );
    }
}
