//! Pricing of currency trades.
//!
//! Every comparison is made on values rounded to cents with round-half-up
//! (`floor(x * 100 + 0.5) / 100`), so tiny fractional leftovers of
//! scrap-to-refined conversion never turn a fair trade into a rejection.

use autotrade_models::{Category, ExchangeRates, RateKey, Valuation, ValuationUnit};
use rust_decimal::Decimal;

use crate::context::EvaluationContext;
use crate::error::EngineError;
use crate::normalizer::CurrencyTotals;

/// Round to two decimal places, ties toward positive infinity.
pub fn round_cents(value: Decimal) -> Decimal {
    let half = Decimal::new(5, 1);
    (value * Decimal::ONE_HUNDRED + half).floor() / Decimal::ONE_HUNDRED
}

/// `count * rate`, looking the rate up only if the unit is actually present.
fn contribution(
    rates: &ExchangeRates,
    key: RateKey,
    count: Decimal,
) -> Result<Decimal, EngineError> {
    if count.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let rate = rates.get(key).ok_or(EngineError::MissingRate(key))?;
    Ok(count * rate)
}

/// Gem value of a party's keys and metal at the given rates.
fn gem_equivalent(
    totals: &CurrencyTotals,
    rates: &ExchangeRates,
    tf2_key: RateKey,
    metal: RateKey,
    csgo_key: RateKey,
) -> Result<Decimal, EngineError> {
    Ok(contribution(rates, tf2_key, Decimal::from(totals.tf2_keys))?
        + contribution(rates, metal, totals.metal())?
        + contribution(rates, csgo_key, Decimal::from(totals.csgo_keys))?)
}

/// Refined value of a party's metal and keys.
fn metal_equivalent(
    totals: &CurrencyTotals,
    rates: &ExchangeRates,
    csgo_key: RateKey,
) -> Result<Decimal, EngineError> {
    Ok(totals.metal()
        + contribution(rates, RateKey::Tf2KeyRefPrice, Decimal::from(totals.tf2_keys))?
        + contribution(rates, csgo_key, Decimal::from(totals.csgo_keys))?)
}

/// Price a currency trade. Fails if the category is not a currency trade or
/// a rate needed for a unit in the trade is missing.
pub fn value(
    category: Category,
    ctx: &EvaluationContext,
    rates: &ExchangeRates,
) -> Result<Valuation, EngineError> {
    match category {
        Category::CurrencyBuy => value_gem_buy(ctx, rates),
        Category::CurrencySell => value_gem_sell(ctx, rates),
        Category::KeyArbitrage => value_key_arbitrage(ctx, rates),
        other => Err(EngineError::NotPriced(other)),
    }
}

/// Counterpart gives gems; we pay in keys and metal.
pub fn value_gem_buy(
    ctx: &EvaluationContext,
    rates: &ExchangeRates,
) -> Result<Valuation, EngineError> {
    let theirs = Decimal::from(ctx.theirs.gem_value());
    let ours = gem_equivalent(
        &ctx.ours,
        rates,
        RateKey::BuyGemsTf2Key,
        RateKey::BuyGemsRef,
        RateKey::BuyGemsCsgoKey,
    )?;
    let delta = round_cents(theirs - ours);

    Ok(Valuation {
        unit: ValuationUnit::Gems,
        ours: round_cents(ours),
        theirs,
        delta,
        accepted: delta <= Decimal::ZERO,
    })
}

/// We give gems; counterpart pays in keys and metal.
pub fn value_gem_sell(
    ctx: &EvaluationContext,
    rates: &ExchangeRates,
) -> Result<Valuation, EngineError> {
    let ours = Decimal::from(ctx.ours.gem_value());
    let theirs = gem_equivalent(
        &ctx.theirs,
        rates,
        RateKey::SellGemsTf2Key,
        RateKey::SellGemsRef,
        RateKey::SellGemsCsgoKey,
    )?;
    let delta = round_cents(ours - theirs);

    Ok(Valuation {
        unit: ValuationUnit::Gems,
        ours,
        theirs: round_cents(theirs),
        delta,
        accepted: delta <= Decimal::ZERO,
    })
}

/// Keys and metal on both sides, compared in refined. Gems have no refined
/// price, so an arbitrage in which we give gems cannot be priced.
pub fn value_key_arbitrage(
    ctx: &EvaluationContext,
    rates: &ExchangeRates,
) -> Result<Valuation, EngineError> {
    if ctx.ours.has_gems() {
        return Err(EngineError::UnpricedGems);
    }
    let theirs = round_cents(metal_equivalent(&ctx.theirs, rates, RateKey::SellCsgoRefPrice)?);
    let ours = round_cents(metal_equivalent(&ctx.ours, rates, RateKey::BuyCsgoRefPrice)?);
    let delta = ours - theirs;

    Ok(Valuation {
        unit: ValuationUnit::Refined,
        ours,
        theirs,
        delta,
        accepted: theirs >= ours,
    })
}
