//! Derived per-player budgets and caps.
//!
//! Budgets use nominal holding ranks: a degraded domain still contributes
//! its full labor. Event deltas are applied by the caller.

use holdfast_types::{
    CityPropertyMode, FacilityInstance, Holdings, OfficeYieldMode, RulesConfig, SpecialistKind,
    TroopKind,
};

use crate::catalog::{Catalog, EffectKind};
use crate::holdings::{
    ARTISAN_WORKSHOP_CAPACITY, CHANCELLOR_INFLUENCE, STEWARD_LABOR, city_property_stats,
    domain_stats, office_stats, organization_stats, trade_enterprise_stats, troop_stats,
};

/// Trade investments allowed with no trade enterprise.
pub const BASE_TRADE_CAP: u32 = 2;

/// Gold investments in influence allowed with no office or organization.
pub const BASE_INFLUENCE_CAP: u32 = 2;

/// Every built facility across all holdings, in holding order.
pub fn all_facilities(holdings: &Holdings) -> impl Iterator<Item = &FacilityInstance> {
    holdings
        .domains
        .iter()
        .flat_map(|h| h.facilities.iter())
        .chain(holdings.city_properties.iter().flat_map(|h| h.facilities.iter()))
        .chain(holdings.workshops.iter().flat_map(|h| h.facilities.iter()))
        .chain(holdings.storages.iter().flat_map(|h| h.facilities.iter()))
        .chain(holdings.organizations.iter().flat_map(|h| h.facilities.iter()))
        .chain(holdings.trade_enterprises.iter().flat_map(|h| h.facilities.iter()))
}

/// Sum of one effect kind over every built facility.
pub fn facility_effect(holdings: &Holdings, catalog: &Catalog, kind: EffectKind) -> u32 {
    all_facilities(holdings)
        .filter_map(|f| catalog.facility(&f.key))
        .fold(0, |acc, def| acc.saturating_add(def.effect(kind)))
}

fn sum(values: impl Iterator<Item = u32>) -> u32 {
    values.fold(0, u32::saturating_add)
}

/// Labor budget before event deltas.
pub fn labor_budget(holdings: &Holdings, rules: &RulesConfig, catalog: &Catalog) -> u32 {
    let domains = sum(holdings.domains.iter().map(|d| domain_stats(d.tier).labor));
    let cities = sum(
        holdings
            .city_properties
            .iter()
            .filter(|c| c.mode == CityPropertyMode::Production)
            .map(|c| city_property_stats(c.size).production_labor),
    );
    let organizations =
        sum(holdings.organizations.iter().map(|o| organization_stats(o.kind, o.size).labor));
    let stewards =
        holdings.specialist_count(SpecialistKind::Steward).saturating_mul(STEWARD_LABOR);
    rules
        .base_labor
        .saturating_add(domains)
        .saturating_add(cities)
        .saturating_add(organizations)
        .saturating_add(facility_effect(holdings, catalog, EffectKind::Labor))
        .saturating_add(stewards)
}

/// Influence budget before event deltas.
pub fn influence_budget(holdings: &Holdings, rules: &RulesConfig, catalog: &Catalog) -> u32 {
    let offices = sum(
        holdings
            .offices
            .iter()
            .filter(|o| o.yield_mode == OfficeYieldMode::Influence)
            .map(|o| office_stats(o.size).influence_yield),
    );
    let organizations =
        sum(holdings.organizations.iter().map(|o| organization_stats(o.kind, o.size).influence));
    let chancellors = holdings
        .specialist_count(SpecialistKind::Chancellor)
        .saturating_mul(CHANCELLOR_INFLUENCE);
    rules
        .base_influence
        .saturating_add(offices)
        .saturating_add(organizations)
        .saturating_add(facility_effect(holdings, catalog, EffectKind::Influence))
        .saturating_add(chancellors)
}

/// Most investments in one trade action (lend, sell, buy).
pub fn trade_cap(holdings: &Holdings) -> u32 {
    BASE_TRADE_CAP.saturating_add(sum(
        holdings.trade_enterprises.iter().map(|t| trade_enterprise_stats(t.size).trade_cap),
    ))
}

/// Most labor invested in one gather action.
pub fn gather_cap(holdings: &Holdings) -> u32 {
    sum(holdings.domains.iter().map(|d| domain_stats(d.tier).gather_cap))
}

/// Most gold invested in one influence action.
pub fn influence_cap(holdings: &Holdings) -> u32 {
    let seats = holdings.offices.len().saturating_add(holdings.organizations.len());
    let seats = u32::try_from(seats).unwrap_or(u32::MAX);
    BASE_INFLUENCE_CAP.saturating_add(seats.saturating_mul(2))
}

/// Raw units the workforce eats per round: `ceil(labor / labor_per_workforce_raw)`.
pub fn workforce_raw_upkeep(labor_budget: u32, rules: &RulesConfig) -> u32 {
    labor_budget.div_ceil(rules.labor_per_workforce_raw.max(1))
}

/// Raid losses absorbed by troops and facilities.
pub fn raid_protection(holdings: &Holdings, catalog: &Catalog) -> u32 {
    let troops = &holdings.troops;
    let units = [TroopKind::Militia, TroopKind::Mercenary, TroopKind::Guard]
        .into_iter()
        .map(|kind| troops.count(kind).saturating_mul(troop_stats(kind).protection));
    sum(units).saturating_add(facility_effect(holdings, catalog, EffectKind::RaidProtection))
}

/// Workshop capacity bonus from artisans.
pub fn artisan_capacity(holdings: &Holdings) -> u32 {
    holdings
        .specialist_count(SpecialistKind::Artisan)
        .saturating_mul(ARTISAN_WORKSHOP_CAPACITY)
}
