//! Maintenance resolution for one player.
//!
//! The order is fixed: release pending gold, pay event taxes, complete due
//! projects, set the round's budgets, pay upkeep, produce, lose raw to
//! raids, feed the workforce. Budgets are set here, once the round's
//! section events are known.
//! Upkeep is paid holding by holding (domains, workshops, storages,
//! production city properties, trade enterprises, then troops); a holding
//! whose upkeep cannot be met in full pays nothing and degrades instead.

use std::collections::BTreeMap;

use holdfast_rules::budgets::{labor_budget, raid_protection, workforce_raw_upkeep};
use holdfast_rules::holdings::{
    TENANT_GOLD, city_property_stats, domain_stats, office_stats, organization_stats,
    storage_stats, trade_enterprise_stats, troop_stats, workshop_stats,
};
use holdfast_rules::section_events::{apply_delta, scale_floor};
use holdfast_rules::{Catalog, EffectKind, EventModifiers};
use holdfast_types::{
    CityPropertyMode, FacilityId, FacilityInstance, HoldingId, Holdings, MaintenanceReport,
    MaterialId, OfficeYieldMode, PlayerState, RulesConfig, TroopKind,
};

use super::reset;
use crate::actions::draw_in_id_order;

/// Gold and labor still available while upkeep is being paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Purse {
    gold: u32,
    labor: u32,
    paid_gold: u32,
    paid_labor: u32,
}

impl Purse {
    /// Pay an upkeep bill in full, or nothing at all.
    const fn pay(&mut self, gold: u32, labor: u32) -> bool {
        if self.gold < gold || self.labor < labor {
            return false;
        }
        self.gold = self.gold.saturating_sub(gold);
        self.labor = self.labor.saturating_sub(labor);
        self.paid_gold = self.paid_gold.saturating_add(gold);
        self.paid_labor = self.paid_labor.saturating_add(labor);
        true
    }

    /// Pay per-unit troop upkeep for as many units as gold allows.
    /// Returns the number of units left unpaid.
    fn pay_units(&mut self, units: u32, per_unit: u32) -> u32 {
        let Some(affordable) = self.gold.checked_div(per_unit) else {
            return 0;
        };
        let affordable = affordable.min(units);
        let cost = affordable.saturating_mul(per_unit);
        self.gold = self.gold.saturating_sub(cost);
        self.paid_gold = self.paid_gold.saturating_add(cost);
        units.saturating_sub(affordable)
    }
}

/// Upkeep gold after event deltas and facility reductions. Event deltas
/// only touch holdings that carry upkeep in the first place.
fn upkeep_gold(
    base: u32,
    mods: &EventModifiers,
    facilities: &[FacilityInstance],
    catalog: &Catalog,
) -> u32 {
    let adjusted = if base > 0 { apply_delta(base, mods.upkeep_gold_delta) } else { 0 };
    adjusted.saturating_sub(catalog.effect_total(facilities, EffectKind::UpkeepReduction))
}

/// Holdings as they stand once projects due this round are complete.
fn with_completed_projects(holdings: &Holdings, round: u32) -> (Holdings, Vec<FacilityId>) {
    let mut next = holdings.clone();
    let mut completed = Vec::new();
    let (due, pending): (Vec<_>, Vec<_>) =
        next.long_term_projects.drain(..).partition(|p| p.completes_round <= round);
    next.long_term_projects = pending;
    for project in due {
        if let Some(facilities) = next.facilities_of_mut(&project.host) {
            facilities.push(FacilityInstance {
                id: project.id.clone(),
                key: project.facility_key.clone(),
                built_round: round,
            });
            completed.push(project.id);
        }
    }
    (next, completed)
}

fn add(map: &mut BTreeMap<MaterialId, u32>, id: &MaterialId, amount: u32) {
    if amount > 0 {
        let entry = map.entry(id.clone()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }
}

/// Resolve one player's maintenance for `round`.
#[allow(clippy::too_many_lines)]
pub fn resolve(
    player: &PlayerState,
    round: u32,
    rules: &RulesConfig,
    mods: &EventModifiers,
    catalog: &Catalog,
) -> MaintenanceReport {
    let mut report = MaintenanceReport::default();
    let economy = &player.economy;

    // Pending income and taxes.
    report.pending_released = economy.pending.gold;
    let mut gold = economy.gold.saturating_add(report.pending_released);
    let domain_count = u32::try_from(player.holdings.domains.len()).unwrap_or(u32::MAX);
    let tax = mods.flat_tax.saturating_add(mods.tax_per_domain.saturating_mul(domain_count));
    report.taxes_paid = tax.min(gold);
    gold = gold.saturating_sub(report.taxes_paid);

    let (holdings, completed) = with_completed_projects(&player.holdings, round);
    report.completed_projects = completed;

    let budgets = reset::budgets(&holdings, rules, mods, catalog);
    report.labor_budget = budgets.labor;
    report.influence_budget = budgets.influence;

    // Upkeep.
    let mut purse = Purse { gold, labor: budgets.labor, paid_gold: 0, paid_labor: 0 };
    for domain in &holdings.domains {
        let stats = domain_stats(domain.tier);
        let bill = upkeep_gold(stats.upkeep_gold, mods, &domain.facilities, catalog);
        if !purse.pay(bill, stats.upkeep_labor) {
            report.degraded_domain_ids.push(domain.id.clone());
        }
    }
    for workshop in &holdings.workshops {
        let stats = workshop_stats(workshop.size);
        let bill = upkeep_gold(stats.upkeep_gold, mods, &workshop.facilities, catalog);
        if purse.pay(bill, stats.upkeep_labor) {
            report.maintained_workshop_ids.push(workshop.id.clone());
        }
    }
    for storage in &holdings.storages {
        let stats = storage_stats(storage.size);
        let bill = upkeep_gold(stats.upkeep_gold, mods, &storage.facilities, catalog);
        if purse.pay(bill, stats.upkeep_labor) {
            report.maintained_storage_ids.push(storage.id.clone());
        }
    }
    for city in holdings.city_properties.iter().filter(|c| c.mode == CityPropertyMode::Production) {
        let bill = city_property_stats(city.size)
            .production_upkeep_gold
            .saturating_sub(catalog.effect_total(&city.facilities, EffectKind::UpkeepReduction));
        if !purse.pay(bill, 0) {
            report.unpaid_holding_ids.push(city.id.clone());
        }
    }
    for enterprise in &holdings.trade_enterprises {
        let bill = trade_enterprise_stats(enterprise.size)
            .upkeep_gold
            .saturating_sub(catalog.effect_total(&enterprise.facilities, EffectKind::UpkeepReduction));
        if !purse.pay(bill, 0) {
            report.unpaid_holding_ids.push(enterprise.id.clone());
        }
    }
    let troops = holdings.troops;
    report.deserted_mercenaries =
        purse.pay_units(troops.mercenaries, troop_stats(TroopKind::Mercenary).upkeep);
    report.deserted_guards = purse.pay_units(troops.guards, troop_stats(TroopKind::Guard).upkeep);
    report.upkeep_gold = purse.paid_gold;
    report.upkeep_labor = purse.paid_labor;

    // Production.
    let unpaid = |id: &HoldingId| report.unpaid_holding_ids.contains(id);
    let mut gold_produced: u32 = 0;
    let mut produce = |amount: u32| gold_produced = gold_produced.saturating_add(amount);
    let mut raw_produced = BTreeMap::new();

    for domain in &holdings.domains {
        let degraded = report.degraded_domain_ids.contains(&domain.id);
        let tier = if degraded { domain.tier.lower() } else { domain.tier };
        let stats = domain_stats(tier);
        let raw = apply_delta(stats.raw, mods.domain_raw_delta)
            .saturating_add(catalog.effect_total(&domain.facilities, EffectKind::RawProduction));
        add(&mut raw_produced, &domain.primary_raw, raw);
        produce(stats.gold);
        produce(domain.tenants.saturating_mul(TENANT_GOLD));
        produce(catalog.effect_total(&domain.facilities, EffectKind::GoldProduction));
    }
    for city in &holdings.city_properties {
        if city.mode == CityPropertyMode::Leased {
            let leased = city_property_stats(city.size).leased_gold;
            produce(apply_delta(leased, mods.leased_city_gold_delta));
        }
        if !unpaid(&city.id) {
            produce(catalog.effect_total(&city.facilities, EffectKind::GoldProduction));
        }
    }
    for office in holdings.offices.iter().filter(|o| o.yield_mode == OfficeYieldMode::Gold) {
        produce(scale_floor(office_stats(office.size).gold_yield, mods.office_income));
    }
    for enterprise in &holdings.trade_enterprises {
        if unpaid(&enterprise.id) {
            continue;
        }
        produce(scale_floor(trade_enterprise_stats(enterprise.size).gold, mods.trade_income));
        produce(catalog.effect_total(&enterprise.facilities, EffectKind::GoldProduction));
    }
    for organization in &holdings.organizations {
        produce(organization_stats(organization.kind, organization.size).gold);
        produce(catalog.effect_total(&organization.facilities, EffectKind::GoldProduction));
    }
    for workshop in &holdings.workshops {
        produce(catalog.effect_total(&workshop.facilities, EffectKind::GoldProduction));
    }
    for storage in &holdings.storages {
        produce(catalog.effect_total(&storage.facilities, EffectKind::GoldProduction));
    }
    report.gold_produced = gold_produced;

    // Raids and workforce, drawn from stock plus fresh production.
    let mut stock = economy.raw.clone();
    for (id, amount) in &raw_produced {
        add(&mut stock, id, *amount);
    }
    report.raw_produced = raw_produced;

    let mut defended = holdings.clone();
    defended.troops.mercenaries =
        defended.troops.mercenaries.saturating_sub(report.deserted_mercenaries);
    defended.troops.guards = defended.troops.guards.saturating_sub(report.deserted_guards);
    let raid_loss = mods.raid_loss.saturating_sub(raid_protection(&defended, catalog));
    report.raid_losses = draw_in_id_order(&mut stock, raid_loss);

    let workforce = workforce_raw_upkeep(labor_budget(&holdings, rules, catalog), rules);
    report.workforce_upkeep = draw_in_id_order(&mut stock, workforce);

    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use holdfast_types::{
        CityProperty, CheckModifiers, Domain, DomainTier, Economy, HoldingKind, HoldingRef,
        HoldingSize, LongTermProject, PendingIncome, PlayerId, TurnState, UserId, Workshop,
    };

    fn grain() -> MaterialId {
        MaterialId::new("raw.grain")
    }

    fn starter_player() -> PlayerState {
        PlayerState {
            id: PlayerId::new("player-1"),
            user_id: UserId::new("u1"),
            display_name: "Aldric".to_owned(),
            check_modifiers: CheckModifiers::default(),
            holdings: Holdings {
                domains: vec![Domain {
                    id: HoldingId::new("dom-1"),
                    tier: DomainTier::Starter,
                    primary_raw: grain(),
                    tenants: 0,
                    facilities: Vec::new(),
                }],
                city_properties: vec![CityProperty {
                    id: HoldingId::new("city-2"),
                    size: HoldingSize::Small,
                    mode: CityPropertyMode::Leased,
                    facilities: Vec::new(),
                }],
                next_seq: 2,
                ..Holdings::default()
            },
            economy: Economy { gold: 4, ..Economy::default() },
            turn: TurnState { labor_available: 5, influence_available: 1, ..TurnState::default() },
        }
    }

    fn resolve_default(player: &PlayerState, mods: &EventModifiers) -> MaintenanceReport {
        resolve(player, 1, &RulesConfig::default(), mods, &Catalog::standard())
    }

    #[test]
    fn starter_player_earns_leased_gold_and_feeds_workforce() {
        let report = resolve_default(&starter_player(), &EventModifiers::default());
        assert_eq!(report.gold_produced, 2);
        assert_eq!(report.upkeep_gold, 0);
        assert_eq!(report.raw_produced.get(&grain()), Some(&6));
        // ceil(5 / 4)
        assert_eq!(report.workforce_upkeep.get(&grain()), Some(&2));
        assert!(report.degraded_domain_ids.is_empty());
    }

    #[test]
    fn budgets_carry_the_round_event_deltas() {
        let mods =
            EventModifiers { labor_delta: -2, influence_delta: 1, ..EventModifiers::default() };
        let report = resolve_default(&starter_player(), &mods);
        assert_eq!(report.labor_budget, 3);
        assert_eq!(report.influence_budget, 2);
    }

    #[test]
    fn pending_gold_is_released_before_taxes() {
        let mut player = starter_player();
        player.economy = Economy { gold: 0, pending: PendingIncome { gold: 3 }, ..Economy::default() };
        let mods = EventModifiers { flat_tax: 5, ..EventModifiers::default() };
        let report = resolve_default(&player, &mods);
        assert_eq!(report.pending_released, 3);
        assert_eq!(report.taxes_paid, 3);
    }

    #[test]
    fn unpaid_workshop_is_not_maintained() {
        let mut player = starter_player();
        player.economy.gold = 0;
        player.holdings.workshops.push(Workshop {
            id: HoldingId::new("ws-3"),
            size: HoldingSize::Small,
            facilities: Vec::new(),
        });
        let report = resolve_default(&player, &EventModifiers::default());
        assert!(report.maintained_workshop_ids.is_empty());
        assert_eq!(report.upkeep_gold, 0);

        player.economy.gold = 5;
        let report = resolve_default(&player, &EventModifiers::default());
        assert_eq!(report.maintained_workshop_ids, vec![HoldingId::new("ws-3")]);
        assert_eq!(report.upkeep_gold, 1);
        assert_eq!(report.upkeep_labor, 1);
    }

    #[test]
    fn unpaid_domain_degrades_production() {
        let mut player = starter_player();
        player.economy.gold = 0;
        for domain in &mut player.holdings.domains {
            domain.tier = DomainTier::Medium;
        }
        let report = resolve_default(&player, &EventModifiers::default());
        assert_eq!(report.degraded_domain_ids, vec![HoldingId::new("dom-1")]);
        // Produces at small tier.
        assert_eq!(report.raw_produced.get(&grain()), Some(&10));
    }

    #[test]
    fn unpaid_mercenaries_desert() {
        let mut player = starter_player();
        player.economy.gold = 1;
        player.holdings.troops.mercenaries = 3;
        let report = resolve_default(&player, &EventModifiers::default());
        assert_eq!(report.deserted_mercenaries, 2);
        assert_eq!(report.upkeep_gold, 1);
    }

    #[test]
    fn raids_beyond_protection_take_raw() {
        let mut player = starter_player();
        player.holdings.troops.militia = 1;
        let mods = EventModifiers { raid_loss: 3, ..EventModifiers::default() };
        let report = resolve_default(&player, &mods);
        assert_eq!(report.raid_losses.get(&grain()), Some(&2));
    }

    #[test]
    fn due_projects_complete() {
        let mut player = starter_player();
        player.holdings.long_term_projects.push(LongTermProject {
            id: FacilityId::new("fac-3"),
            host: HoldingRef::new(HoldingKind::Domain, "dom-1"),
            facility_key: "domain.granary".to_owned(),
            started_round: 1,
            completes_round: 1,
        });
        let report = resolve_default(&player, &EventModifiers::default());
        assert_eq!(report.completed_projects, vec![FacilityId::new("fac-3")]);
        // The completed granary already produces.
        assert_eq!(report.raw_produced.get(&grain()), Some(&8));
    }
}
