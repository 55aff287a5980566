//! Conversion resolution for one player.
//!
//! Maintained workshops refine raw into special materials first. Maintained
//! storages then retain what they can hold, special before raw. Everything
//! else is sold off automatically at the campaign's conversion rates, and
//! the division remainder is lost.

use std::collections::BTreeMap;

use holdfast_rules::budgets::artisan_capacity;
use holdfast_rules::holdings::{storage_stats, workshop_stats};
use holdfast_rules::section_events::{adjusted_divisor, scale_floor};
use holdfast_rules::{Catalog, EffectKind, EventModifiers};
use holdfast_types::{ConversionReport, MaterialId, PlayerState, RulesConfig};

use crate::actions::draw_in_id_order;

fn total(map: &BTreeMap<MaterialId, u32>) -> u32 {
    map.values().fold(0, |acc, n| acc.saturating_add(*n))
}

fn add(map: &mut BTreeMap<MaterialId, u32>, id: &MaterialId, amount: u32) {
    if amount > 0 {
        let entry = map.entry(id.clone()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }
}

/// Special units all maintained workshops can refine this round.
fn workshop_capacity(player: &PlayerState, catalog: &Catalog) -> u32 {
    let maintained = &player.turn.maintained_workshop_ids;
    let mut capacity: u32 = 0;
    let mut any = false;
    for workshop in player.holdings.workshops.iter().filter(|w| maintained.contains(&w.id)) {
        any = true;
        capacity = capacity
            .saturating_add(workshop_stats(workshop.size).capacity)
            .saturating_add(catalog.effect_total(&workshop.facilities, EffectKind::WorkshopCapacity));
    }
    if any { capacity.saturating_add(artisan_capacity(&player.holdings)) } else { 0 }
}

/// Units all maintained storages can retain this round.
fn storage_capacity(
    player: &PlayerState,
    rules: &RulesConfig,
    mods: &EventModifiers,
    catalog: &Catalog,
) -> u32 {
    let maintained = &player.turn.maintained_storage_ids;
    let nominal = player
        .holdings
        .storages
        .iter()
        .filter(|s| maintained.contains(&s.id))
        .map(|s| {
            storage_stats(s.size)
                .base_capacity
                .saturating_mul(rules.storage_capacity_multiplier)
                .saturating_add(catalog.effect_total(&s.facilities, EffectKind::StorageCapacity))
        })
        .fold(0, u32::saturating_add);
    scale_floor(nominal, mods.storage_capacity)
}

/// Resolve one player's conversion.
pub fn resolve(
    player: &PlayerState,
    rules: &RulesConfig,
    mods: &EventModifiers,
    catalog: &Catalog,
) -> ConversionReport {
    let mut report = ConversionReport::default();
    let mut raw = player.economy.raw.clone();
    let mut special = player.economy.special.clone();

    // Workshops.
    let per_special = rules.raw_per_special.max(1);
    let mut capacity = workshop_capacity(player, catalog);
    let refinable: Vec<(MaterialId, MaterialId)> = raw
        .keys()
        .filter_map(|id| {
            let target = catalog.material(id)?.refines_to.clone()?;
            Some((id.clone(), target))
        })
        .collect();
    for (source, target) in refinable {
        if capacity == 0 {
            break;
        }
        let held = raw.get(&source).copied().unwrap_or(0);
        let units = held.checked_div(per_special).unwrap_or(0).min(capacity);
        if units == 0 {
            continue;
        }
        let consumed = units.saturating_mul(per_special);
        let left = held.saturating_sub(consumed);
        if left == 0 {
            raw.remove(&source);
        } else {
            raw.insert(source.clone(), left);
        }
        add(&mut report.workshop_consumed, &source, consumed);
        add(&mut report.workshop_produced, &target, units);
        add(&mut special, &target, units);
        capacity = capacity.saturating_sub(units);
    }

    // Storage, special first.
    let room = storage_capacity(player, rules, mods, catalog);
    report.retained_special = draw_in_id_order(&mut special, room);
    let room = room.saturating_sub(total(&report.retained_special));
    report.retained_raw = draw_in_id_order(&mut raw, room);

    // Auto-conversion of the rest.
    let raw_left = total(&raw);
    let special_left = total(&special);
    let raw_divisor = adjusted_divisor(rules.raw_per_gold, mods.raw_divisor_delta);
    let special_divisor = adjusted_divisor(rules.special_per_gold, mods.special_divisor_delta);
    report.gold_gained = raw_left
        .checked_div(raw_divisor)
        .unwrap_or(0)
        .saturating_add(special_left.checked_div(special_divisor).unwrap_or(0));
    report.raw_lost = raw_left.checked_rem(raw_divisor).unwrap_or(0);
    report.special_lost = special_left.checked_rem(special_divisor).unwrap_or(0);
    report
}
