//! Check resolution and tier-dependent yields.
//!
//! A check is `1d20 + modifier` against a DC. The margin over the DC picks
//! one of five ordered [`SuccessTier`]s, and every checked action looks up
//! its yield per investment in the tables below. Yields are fixed-point
//! [`Decimal`]s: multiply by the investment count first, then floor.

use holdfast_types::{CheckOutcome, SuccessTier};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::dice::{DiceExpression, roll_expression};
use crate::rng::GameRng;

/// Classify a check total against a DC.
///
/// `>= dc+10` very good, `>= dc+5` good, `>= dc` success, `>= dc-5` poor,
/// otherwise fail. Monotone non-decreasing in `total`.
pub const fn resolve_success_tier(dc: i32, total: i32) -> SuccessTier {
    if total >= dc.saturating_add(10) {
        SuccessTier::VeryGood
    } else if total >= dc.saturating_add(5) {
        SuccessTier::Good
    } else if total >= dc {
        SuccessTier::Success
    } else if total >= dc.saturating_sub(5) {
        SuccessTier::Poor
    } else {
        SuccessTier::Fail
    }
}

/// Roll `1d20 + modifier` against `dc`. Draws exactly one value.
pub fn roll_check(rng: &mut dyn GameRng, modifier: i32, dc: i32) -> CheckOutcome {
    let die = roll_expression(DiceExpression::D20, rng).total;
    let roll = i32::try_from(die).unwrap_or(1);
    let total = roll.saturating_add(modifier);
    CheckOutcome { dc, modifier, roll, total, tier: resolve_success_tier(dc, total) }
}

/// Raw units gathered per invested labor.
pub fn gather_raw_rate(tier: SuccessTier) -> Decimal {
    match tier {
        SuccessTier::VeryGood => Decimal::from(5),
        SuccessTier::Good => Decimal::from(4),
        SuccessTier::Success => Decimal::from(3),
        SuccessTier::Poor => Decimal::from(2),
        SuccessTier::Fail => Decimal::ONE,
    }
}

/// Special units gathered per invested labor, refined from the domain's raw.
pub fn gather_special_rate(tier: SuccessTier) -> Decimal {
    match tier {
        SuccessTier::VeryGood => Decimal::new(5, 1),
        SuccessTier::Good => Decimal::new(25, 2),
        SuccessTier::Success | SuccessTier::Poor | SuccessTier::Fail => Decimal::ZERO,
    }
}

/// Influence gained per invested gold.
pub fn influence_rate(tier: SuccessTier) -> Decimal {
    match tier {
        SuccessTier::VeryGood => Decimal::from(3),
        SuccessTier::Good => Decimal::from(2),
        SuccessTier::Success => Decimal::new(15, 1),
        SuccessTier::Poor => Decimal::ONE,
        SuccessTier::Fail => Decimal::new(5, 1),
    }
}

/// Payout multiplier on gold lent.
pub fn lend_payout_multiplier(tier: SuccessTier) -> Decimal {
    match tier {
        SuccessTier::VeryGood => Decimal::from(2),
        SuccessTier::Good => Decimal::new(175, 2),
        SuccessTier::Success => Decimal::new(15, 1),
        SuccessTier::Poor => Decimal::ONE,
        SuccessTier::Fail => Decimal::new(5, 1),
    }
}

/// Multiplier on the market value of goods sold.
pub fn sell_multiplier(tier: SuccessTier) -> Decimal {
    match tier {
        SuccessTier::VeryGood => Decimal::new(15, 1),
        SuccessTier::Good => Decimal::new(125, 2),
        SuccessTier::Success => Decimal::ONE,
        SuccessTier::Poor => Decimal::new(75, 2),
        SuccessTier::Fail => Decimal::new(5, 1),
    }
}

/// Price percentage paid on an acquisition, or `None` when the check failed
/// and nothing is bought.
pub const fn acquisition_price_percent(tier: SuccessTier) -> Option<u32> {
    match tier {
        SuccessTier::VeryGood => Some(75),
        SuccessTier::Good => Some(90),
        SuccessTier::Success => Some(100),
        SuccessTier::Poor => Some(125),
        SuccessTier::Fail => None,
    }
}

/// `floor(count * rate)`, saturating at `u32::MAX` and never negative.
pub fn floor_yield(count: u32, rate: Decimal) -> u32 {
    let product = Decimal::from(count).saturating_mul(rate).floor();
    product.to_u32().unwrap_or(if product.is_sign_negative() { 0 } else { u32::MAX })
}

/// `ceil(amount * factor)`, saturating at `u32::MAX` and never negative.
pub fn ceil_scaled(amount: u32, factor: Decimal) -> u32 {
    let product = Decimal::from(amount).saturating_mul(factor).ceil();
    product.to_u32().unwrap_or(if product.is_sign_negative() { 0 } else { u32::MAX })
}

/// `ceil(amount * percent / 100)`.
pub fn ceil_percent(amount: u32, percent: u32) -> u32 {
    ceil_scaled(amount, Decimal::new(i64::from(percent), 2))
}
