//! The d20-checked economic actions: gather materials, gain influence, lend
//! money.

use std::collections::BTreeMap;

use holdfast_rules::budgets::{gather_cap, influence_cap, trade_cap};
use holdfast_rules::holdings::domain_stats;
use holdfast_rules::tiers::{
    floor_yield, gather_raw_rate, gather_special_rate, influence_rate, lend_payout_multiplier,
};
use holdfast_rules::roll_check;
use holdfast_types::{Event, EventPayload, MaterialId};

use super::{Acting, require_range, tier_label};
use crate::context::DecideContext;
use crate::error::RuleViolation;

/// Base DC of a gather check.
pub const GATHER_DC: i32 = 10;

/// Base DC of an influence check.
pub const INFLUENCE_DC: i32 = 12;

/// Base DC of a lending check.
pub const LEND_DC: i32 = 12;

/// Gold per lending investment.
pub const LEND_GOLD_PER_INVESTMENT: u32 = 2;

/// Invest labor in gathering from the player's domains.
///
/// Investments are spread over domains in acquisition order, each taking up
/// to its own gather cap. Labor is then pooled per primary raw material and
/// each pool's yield floored once, so two domains of the same raw gather as
/// one. A good enough roll also yields the special material each raw refines
/// into, pooled and floored the same way.
pub fn gather(
    acting: &Acting<'_>,
    investments: u32,
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let player = acting.player;
    require_range(investments, gather_cap(&player.holdings), "gather investment")?;
    let labor = player.turn.labor_available;
    if labor < investments {
        return Err(RuleViolation::resources(format!(
            "gathering needs {investments} labor, only {labor} available"
        )));
    }
    let usage = acting.claim_slot("gather", 1)?;

    let dc = GATHER_DC.saturating_add(acting.mods.gather_dc_delta);
    let check = roll_check(&mut *ctx.rng, player.check_modifiers.materials, dc);

    let mut raw_invested: BTreeMap<&MaterialId, u32> = BTreeMap::new();
    let mut remaining = investments;
    for domain in &player.holdings.domains {
        if remaining == 0 {
            break;
        }
        let allotted = remaining.min(domain_stats(domain.tier).gather_cap);
        remaining = remaining.saturating_sub(allotted);
        let pool = raw_invested.entry(&domain.primary_raw).or_insert(0);
        *pool = pool.saturating_add(allotted);
    }

    let mut raw_gained: BTreeMap<MaterialId, u32> = BTreeMap::new();
    let mut special_invested: BTreeMap<MaterialId, u32> = BTreeMap::new();
    for (raw_id, invested) in raw_invested {
        let raw = floor_yield(invested, gather_raw_rate(check.tier));
        if raw > 0 {
            raw_gained.insert(raw_id.clone(), raw);
        }
        if let Some(refined) = ctx.catalog.material(raw_id).and_then(|m| m.refines_to.clone()) {
            let pool = special_invested.entry(refined).or_insert(0);
            *pool = pool.saturating_add(invested);
        }
    }
    let special_gained: BTreeMap<MaterialId, u32> = special_invested
        .into_iter()
        .map(|(id, invested)| (id, floor_yield(invested, gather_special_rate(check.tier))))
        .filter(|&(_, units)| units > 0)
        .collect();

    let raw_total: u32 = raw_gained.values().fold(0, |acc, n| acc.saturating_add(*n));
    let message = format!(
        "{} gathered materials ({}): {raw_total} raw",
        player.display_name,
        tier_label(check.tier)
    );
    Ok(vec![
        acting.private(EventPayload::PlayerGatherMaterialsResolved {
            player_id: player.id.clone(),
            usage: Some(usage),
            check,
            labor_spent: investments,
            raw_gained,
            special_gained,
        }),
        acting.log(message),
    ])
}

/// Spend gold on influence for this round.
pub fn gain_influence(
    acting: &Acting<'_>,
    investments: u32,
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let player = acting.player;
    require_range(investments, influence_cap(&player.holdings), "influence investment")?;
    acting.require_gold(investments, "gaining influence")?;
    let usage = acting.claim_slot("influence", 1)?;

    let dc = INFLUENCE_DC.saturating_add(acting.mods.influence_dc_delta);
    let check = roll_check(&mut *ctx.rng, player.check_modifiers.influence, dc);
    let influence_gained = floor_yield(investments, influence_rate(check.tier));

    let message = format!(
        "{} sought favor ({}): +{influence_gained} influence",
        player.display_name,
        tier_label(check.tier)
    );
    Ok(vec![
        acting.private(EventPayload::PlayerInfluenceGained {
            player_id: player.id.clone(),
            usage: Some(usage),
            check,
            gold_spent: investments,
            influence_gained,
        }),
        acting.log(message),
    ])
}

/// Lend gold against a payout released at the next maintenance.
pub fn lend_money(
    acting: &Acting<'_>,
    investments: u32,
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let player = acting.player;
    require_range(investments, trade_cap(&player.holdings), "lending investment")?;
    let gold_spent = investments.saturating_mul(LEND_GOLD_PER_INVESTMENT);
    acting.require_gold(gold_spent, "lending")?;
    let usage = acting.claim_slot("lend", 1)?;

    let dc = LEND_DC.saturating_add(acting.mods.lend_dc_delta);
    let check = roll_check(&mut *ctx.rng, player.check_modifiers.money, dc);
    let payout = floor_yield(gold_spent, lend_payout_multiplier(check.tier));

    let message = format!(
        "{} lent {gold_spent} gold ({})",
        player.display_name,
        tier_label(check.tier)
    );
    Ok(vec![
        acting.private(EventPayload::PlayerMoneyLent {
            player_id: player.id.clone(),
            usage: Some(usage),
            check,
            gold_spent,
            payout,
        }),
        acting.log(message),
    ])
}
