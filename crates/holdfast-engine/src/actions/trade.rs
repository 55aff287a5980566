//! Market trade: selling, buying, and the combined sell-and-buy action.
//!
//! Raw materials trade in lots of [`RAW_LOT_SIZE`] units, special materials
//! one unit per lot. Both the lots sold and the lots bought in one action
//! count against the player's trade cap separately.

use std::collections::{BTreeMap, BTreeSet};

use holdfast_rules::budgets::trade_cap;
use holdfast_rules::holdings::MERCHANT_SELL_BONUS;
use holdfast_rules::market::{RAW_LOT_SIZE, purchase_price, sale_value};
use holdfast_rules::tiers::{floor_yield, sell_multiplier};
use holdfast_rules::{Catalog, roll_check};
use holdfast_types::{
    CheckOutcome, Event, EventPayload, MarketId, MarketInstance, MaterialId, MaterialKind,
    SaleItem, SpecialistKind,
};

use super::{Acting, require_range, tier_label};
use crate::context::DecideContext;
use crate::error::RuleViolation;

/// Base DC of a sale check.
pub const SELL_DC: i32 = 12;

/// A validated sale, ready to roll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SalePlan {
    raw: BTreeMap<MaterialId, u32>,
    special: BTreeMap<MaterialId, u32>,
    /// Sum of lot values at the market's current modifiers.
    value: u32,
}

/// A validated purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PurchasePlan {
    material_id: MaterialId,
    kind: MaterialKind,
    units: u32,
    cost: u32,
}

const fn units_per_lot(kind: MaterialKind) -> u32 {
    match kind {
        MaterialKind::Raw => RAW_LOT_SIZE,
        MaterialKind::Special => 1,
    }
}

fn plan_sale(
    acting: &Acting<'_>,
    market: &MarketInstance,
    catalog: &Catalog,
    items: &[SaleItem],
) -> Result<SalePlan, RuleViolation> {
    if items.is_empty() {
        return Err(RuleViolation::input("a sale needs at least one item"));
    }
    let mut seen = BTreeSet::new();
    let mut lots_total: u32 = 0;
    for item in items {
        if !seen.insert(&item.material_id) {
            return Err(RuleViolation::input(format!(
                "material `{}` listed twice in one sale",
                item.material_id
            )));
        }
        if item.lots == 0 {
            return Err(RuleViolation::input("every sale item needs at least one lot"));
        }
        lots_total = lots_total.saturating_add(item.lots);
    }
    require_range(lots_total, trade_cap(&acting.player.holdings), "lots sold")?;

    let economy = &acting.player.economy;
    let mut plan = SalePlan::default();
    for item in items {
        let material = catalog.material(&item.material_id).ok_or_else(|| {
            RuleViolation::input(format!("unknown material `{}`", item.material_id))
        })?;
        let units = item.lots.saturating_mul(units_per_lot(material.kind));
        let held = match material.kind {
            MaterialKind::Raw => economy.raw_of(&item.material_id),
            MaterialKind::Special => economy.special_of(&item.material_id),
        };
        if held < units {
            return Err(RuleViolation::resources(format!(
                "selling {units} `{}` needs that many on hand, only {held} held",
                item.material_id
            )));
        }
        let lot_value = sale_value(material.group, market.modifier(material.group));
        plan.value = plan.value.saturating_add(lot_value.saturating_mul(item.lots));
        let target = match material.kind {
            MaterialKind::Raw => &mut plan.raw,
            MaterialKind::Special => &mut plan.special,
        };
        target.insert(item.material_id.clone(), units);
    }
    Ok(plan)
}

fn plan_purchase(
    acting: &Acting<'_>,
    market: &MarketInstance,
    catalog: &Catalog,
    material_id: &MaterialId,
    lots: u32,
) -> Result<PurchasePlan, RuleViolation> {
    require_range(lots, trade_cap(&acting.player.holdings), "lots bought")?;
    let material = catalog
        .material(material_id)
        .ok_or_else(|| RuleViolation::input(format!("unknown material `{material_id}`")))?;
    let cost = purchase_price(material.group, market.modifier(material.group)).saturating_mul(lots);
    Ok(PurchasePlan {
        material_id: material_id.clone(),
        kind: material.kind,
        units: lots.saturating_mul(units_per_lot(material.kind)),
        cost,
    })
}

fn roll_sale(acting: &Acting<'_>, ctx: &mut DecideContext<'_>, value: u32) -> (CheckOutcome, u32) {
    let player = acting.player;
    let merchants = i32::try_from(player.holdings.specialist_count(SpecialistKind::Merchant))
        .unwrap_or(i32::MAX);
    let modifier =
        player.check_modifiers.money.saturating_add(merchants.saturating_mul(MERCHANT_SELL_BONUS));
    let dc = SELL_DC.saturating_add(acting.mods.sell_dc_delta);
    let check = roll_check(&mut *ctx.rng, modifier, dc);
    (check, floor_yield(value, sell_multiplier(check.tier)))
}

fn sold_event(
    acting: &Acting<'_>,
    usage: holdfast_types::ActionUsage,
    market_id: &MarketId,
    check: CheckOutcome,
    plan: SalePlan,
    gold_gained: u32,
) -> Event {
    acting.private(EventPayload::PlayerMaterialsSold {
        player_id: acting.player.id.clone(),
        usage: Some(usage),
        market_id: market_id.clone(),
        check,
        raw_sold: plan.raw,
        special_sold: plan.special,
        gold_gained,
    })
}

fn bought_event(
    acting: &Acting<'_>,
    usage: Option<holdfast_types::ActionUsage>,
    market_id: &MarketId,
    plan: PurchasePlan,
) -> Event {
    acting.private(EventPayload::PlayerMaterialsBought {
        player_id: acting.player.id.clone(),
        usage,
        market_id: market_id.clone(),
        material_id: plan.material_id,
        kind: plan.kind,
        units: plan.units,
        gold_spent: plan.cost,
    })
}

/// Sell materials at a market.
pub fn sell(
    acting: &Acting<'_>,
    market_id: &MarketId,
    items: &[SaleItem],
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let market = acting.market(market_id)?;
    let plan = plan_sale(acting, market, ctx.catalog, items)?;
    let usage = acting.claim_slot("sell", 1)?;

    let (check, gold_gained) = roll_sale(acting, ctx, plan.value);
    let message = format!(
        "{} sold goods at {market_id} ({}) for {gold_gained} gold",
        acting.player.display_name,
        tier_label(check.tier)
    );
    Ok(vec![sold_event(acting, usage, market_id, check, plan, gold_gained), acting.log(message)])
}

/// Buy materials at a market. No check is rolled.
pub fn buy(
    acting: &Acting<'_>,
    market_id: &MarketId,
    material_id: &MaterialId,
    lots: u32,
    ctx: &DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let market = acting.market(market_id)?;
    let plan = plan_purchase(acting, market, ctx.catalog, material_id, lots)?;
    acting.require_gold(plan.cost, "the purchase")?;
    let usage = acting.claim_slot("buy", 1)?;

    let message = format!(
        "{} bought {} `{material_id}` at {market_id}",
        acting.player.display_name, plan.units
    );
    Ok(vec![bought_event(acting, Some(usage), market_id, plan), acting.log(message)])
}

/// Sell, then buy, at the same market in one action.
///
/// The purchase must be affordable from gold on hand before the sale; the
/// combined action consumes a single slot recorded on the sale.
pub fn sell_buy(
    acting: &Acting<'_>,
    market_id: &MarketId,
    items: &[SaleItem],
    buy_material_id: &MaterialId,
    buy_lots: u32,
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let market = acting.market(market_id)?;
    let sale = plan_sale(acting, market, ctx.catalog, items)?;
    let purchase = plan_purchase(acting, market, ctx.catalog, buy_material_id, buy_lots)?;
    acting.require_gold(purchase.cost, "the purchase")?;
    let usage = acting.claim_slot("sell_buy", 1)?;

    let (check, gold_gained) = roll_sale(acting, ctx, sale.value);
    let message = format!(
        "{} traded at {market_id} ({}): sold for {gold_gained} gold, bought {} `{buy_material_id}`",
        acting.player.display_name,
        tier_label(check.tier),
        purchase.units
    );
    Ok(vec![
        sold_event(acting, usage, market_id, check, sale, gold_gained),
        bought_event(acting, None, market_id, purchase),
        acting.log(message),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use holdfast_types::{CampaignState, ErrorCode, MaterialGroup};

    use crate::actions::fixture::{
        act, apply, campaign, first, grain, local, player, player_mut, set_modifier,
    };

    fn provisions() -> MaterialId {
        MaterialId::new("special.provisions")
    }

    const fn item(material_id: MaterialId, lots: u32) -> SaleItem {
        SaleItem { material_id, lots }
    }

    /// Six grain and one provisions on hand, grain trading one above base.
    fn stocked() -> CampaignState {
        let mut state = campaign();
        set_modifier(&mut state, MaterialGroup::Grain, 1);
        let economy = &mut player_mut(&mut state).economy;
        economy.raw.insert(grain(), 6);
        economy.special.insert(provisions(), 1);
        state
    }

    #[test]
    fn sale_value_scales_with_the_tier() {
        let state = stocked();
        let items = [item(grain(), 1), item(provisions(), 1)];
        // One raw lot at 3+1 and one special unit at 2.
        for (face, gold) in [(12, 6), (17, 7), (2, 3)] {
            let events = act(&state, face, |a, ctx| sell(a, &local(), &items, ctx)).unwrap();
            let EventPayload::PlayerMaterialsSold { raw_sold, special_sold, gold_gained, .. } =
                first(&events)
            else {
                panic!("Expected a sale, got {:?}", first(&events));
            };
            assert_eq!(*gold_gained, gold, "face {face}");
            assert_eq!(raw_sold.get(&grain()), Some(&RAW_LOT_SIZE));
            assert_eq!(special_sold.get(&provisions()), Some(&1));
        }

        let events = act(&state, 12, |a, ctx| sell(a, &local(), &items, ctx)).unwrap();
        let state = apply(&state, &events);
        let economy = &player(&state).economy;
        assert_eq!(economy.gold, 10);
        assert_eq!(economy.raw_total(), 0);
        assert_eq!(economy.special_total(), 0);
    }

    #[test]
    fn raw_lots_must_be_whole_on_hand() {
        let mut state = stocked();
        player_mut(&mut state).economy.raw.insert(grain(), 5);
        let items = [item(grain(), 1)];
        let err = act(&state, 12, |a, ctx| sell(a, &local(), &items, ctx)).unwrap_err();
        assert_eq!(err.code, ErrorCode::Resources);
    }

    #[test]
    fn sales_are_bounded_by_the_trade_cap() {
        let mut state = stocked();
        player_mut(&mut state).economy.raw.insert(grain(), 18);
        let items = [item(grain(), 3)];
        let err = act(&state, 12, |a, ctx| sell(a, &local(), &items, ctx)).unwrap_err();
        assert_eq!(err.code, ErrorCode::Input);
        let items = [item(grain(), 1), item(grain(), 1)];
        let err = act(&state, 12, |a, ctx| sell(a, &local(), &items, ctx)).unwrap_err();
        assert_eq!(err.code, ErrorCode::Input);
    }

    #[test]
    fn raw_purchases_deliver_whole_lots() {
        let mut state = campaign();
        player_mut(&mut state).economy.gold = 8;
        let ore = MaterialId::new("raw.ore");
        let events = act(&state, 12, |a, ctx| buy(a, &local(), &ore, 2, ctx)).unwrap();
        assert!(matches!(
            first(&events),
            EventPayload::PlayerMaterialsBought { units: 12, gold_spent: 8, .. }
        ));
        let state = apply(&state, &events);
        assert_eq!(player(&state).economy.raw_of(&ore), 12);
        assert_eq!(player(&state).economy.gold, 0);
    }

    #[test]
    fn purchases_need_the_gold_up_front() {
        let state = campaign();
        let tools = MaterialId::new("special.tools");
        let err = act(&state, 12, |a, ctx| buy(a, &local(), &tools, 2, ctx)).unwrap_err();
        assert_eq!(err.code, ErrorCode::Resources);
    }

    #[test]
    fn sell_buy_takes_one_slot_under_its_own_key() {
        let state = stocked();
        let items = [item(grain(), 1)];
        let tools = MaterialId::new("special.tools");
        let events =
            act(&state, 12, |a, ctx| sell_buy(a, &local(), &items, &tools, 1, ctx)).unwrap();
        assert!(matches!(
            events.first().map(|e| &e.payload),
            Some(EventPayload::PlayerMaterialsSold { usage: Some(u), gold_gained: 4, .. })
                if u.key == "sell_buy" && u.cost == 1
        ));
        assert!(matches!(
            events.get(1).map(|e| &e.payload),
            Some(EventPayload::PlayerMaterialsBought { usage: None, gold_spent: 3, .. })
        ));

        let state = apply(&state, &events);
        let player = player(&state);
        assert_eq!(player.turn.actions_used, 1);
        assert!(player.turn.has_used("sell_buy"));
        assert_eq!(player.economy.gold, 5);
        assert_eq!(player.economy.special_of(&tools), 1);

        let err = act(&state, 12, |a, ctx| sell_buy(a, &local(), &items, &tools, 1, ctx))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Actions);
    }

    #[test]
    fn unknown_and_gated_markets_are_rejected() {
        let mut state = stocked();
        let items = [item(grain(), 1)];
        let far = MarketId::new("far");
        let err = act(&state, 12, |a, ctx| sell(a, &far, &items, ctx)).unwrap_err();
        assert_eq!(err.code, ErrorCode::Input);

        for market in &mut state.markets {
            market.requires_trade_enterprise = true;
        }
        let err = act(&state, 12, |a, ctx| sell(a, &local(), &items, ctx)).unwrap_err();
        assert_eq!(err.code, ErrorCode::State);
    }
}
