//! Section event table, draws and modifiers.
//!
//! At the start of each event section a fixed number of distinct rows are
//! drawn from a 39-row table keyed by a `2d20` roll. Rows that need extra
//! dice (a levy, a flood's severity) roll them right after the row is
//! accepted and memoize the results in `meta_rolls`, so later phases derive
//! every modifier from `(table_roll, meta_rolls)` without touching the RNG.

use holdfast_types::{GlobalEvent, RulesConfig};
use rust_decimal::Decimal;

use crate::dice::{DiceExpression, roll_expression};
use crate::rng::GameRng;
use crate::tiers::floor_yield;

/// Re-rolls spent on duplicates before falling back to the lowest unused key.
pub const MAX_DRAW_ATTEMPTS: u32 = 1000;

/// One row of the event table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRow {
    /// `2d20` total selecting the row.
    pub roll: u32,
    /// Event name.
    pub name: &'static str,
    /// Player-facing description.
    pub description: &'static str,
    /// Named sub-rolls resolved when the row is drawn.
    pub sub_rolls: &'static [(&'static str, DiceExpression)],
}

const fn row(roll: u32, name: &'static str, description: &'static str) -> EventRow {
    EventRow { roll, name, description, sub_rolls: &[] }
}

const fn row_with(
    roll: u32,
    name: &'static str,
    description: &'static str,
    sub_rolls: &'static [(&'static str, DiceExpression)],
) -> EventRow {
    EventRow { roll, name, description, sub_rolls }
}

/// The event table, keyed 2..=40.
pub static EVENT_TABLE: [EventRow; 39] = [
    row(2, "Great Plague", "Sickness thins the workforce. Labor -2, gathering DC +2."),
    row_with(3, "Civil War", "Rival claimants levy every house; trade income halves.", &[(
        "levy",
        DiceExpression::of(1, 4),
    )]),
    row(4, "Crop Blight", "Blight spreads through the fields. Domain raw -2."),
    row_with(5, "Sea Raiders", "Raiders strike the coast, or pirates choke the sea lanes.", &[
        ("kind", DiceExpression::of(1, 6)),
        ("strength", DiceExpression::of(1, 6)),
    ]),
    row(6, "Harsh Winter", "Bitter cold. Upkeep gold +1, domain raw -1."),
    row(7, "Royal Levy", "The crown taxes land: 1 gold per domain."),
    row(8, "Court Intrigue", "Whispers at court. Influence DC +3, office income 75%."),
    row_with(9, "River Flood", "The river bursts its banks. Domain raw reduced by severity.", &[(
        "severity",
        DiceExpression::of(1, 3),
    )]),
    row(10, "Trade Embargo", "Ports close. Trade income 50%, sell DC +2."),
    row_with(11, "Bandit Roads", "Bandits prey on the roads and carry off raw goods.", &[(
        "bandits",
        DiceExpression::of(1, 4),
    )]),
    row(12, "Guild Strike", "Buyers hold out. Raw conversion needs one more unit per gold."),
    row(13, "Tax Reform", "A new flat tax of 1 gold."),
    row(14, "Epidemic", "Fever in the villages. Labor -1."),
    row(15, "Drought", "A dry season. Domain raw -1."),
    row(16, "Currency Debasement", "Clipped coin. Special conversion needs one more unit per gold."),
    row(17, "Heresy Trials", "The faithful turn inward. Influence -1."),
    row_with(18, "Border Skirmish", "Border lords demand a war levy.", &[(
        "levy",
        DiceExpression::of(1, 2),
    )]),
    row(19, "Merchant Dispute", "Merchants quarrel over tolls. Sell DC +1."),
    row(20, "Quiet Years", "Nothing of note happens."),
    row(21, "Pilgrimage", "Pilgrims fill the city. Leased city income +1."),
    row(22, "Fair Weather", "Gentle rains. Domain raw +1."),
    row(23, "Royal Favor", "The crown smiles on its officers. Office income 125%."),
    row(24, "Trade Fair", "Buyers flock to market. Sell DC -2, trade income 125%."),
    row(25, "Bountiful Harvest", "Granaries overflow. Domain raw +2."),
    row(26, "New Trade Route", "A new route opens. Trade income 150%."),
    row(27, "Peace Treaty", "Soldiers go home. Upkeep gold -1."),
    row(28, "Builders' Guild", "Masons compete for work. Acquisition prices 90%."),
    row(29, "Scholarly Revival", "Learning flourishes. Influence +1."),
    row(30, "Festival Season", "Feasts and fairs. Leased city income +1, influence DC -1."),
    row(31, "Silver Strike", "Silver flows. Raw conversion needs one fewer unit per gold."),
    row(32, "Population Growth", "More hands in the fields. Labor +1."),
    row(33, "Mild Winter", "Easy travel. Gathering DC -2."),
    row(34, "Banking House", "A bank opens its doors. Lending DC -2."),
    row(35, "Merchant Princes", "Trade houses prosper. Trade income 125%, acquisition prices 110%."),
    row(36, "Refugee Wave", "Refugees arrive. Labor +1, flat tax of 1 gold."),
    row(37, "Warehouse Fire", "Fire in the stores. Storage capacity 50%."),
    row(38, "Granary Reform", "Better stores. Storage capacity 150%."),
    row(39, "Golden Age", "Prosperity everywhere. Domain raw +1, office income 125%."),
    row_with(40, "Comet Omen", "A comet appears. The reading decides its meaning.", &[(
        "reading",
        DiceExpression::of(1, 2),
    )]),
];

/// Look up a table row by key.
pub fn event_row(roll: u32) -> Option<&'static EventRow> {
    EVENT_TABLE.iter().find(|r| r.roll == roll)
}

/// Whether `round` starts an event section.
pub const fn is_event_section_start(rules: &RulesConfig, round: u32) -> bool {
    round >= rules.first_event_round
        && matches!(
            round.saturating_sub(rules.first_event_round).checked_rem(rules.event_section_length),
            Some(0) | None
        )
}

/// Draw the events of a section starting at `section_start`.
///
/// Draws `rules.events_per_section` distinct rows (capped at the table
/// size). Each row's sub-rolls are resolved immediately after it is
/// accepted, so the draw order is row, sub-rolls, row, sub-rolls.
pub fn draw_section_events(
    rules: &RulesConfig,
    section_start: u32,
    rng: &mut dyn GameRng,
) -> Vec<GlobalEvent> {
    let wanted = usize::try_from(rules.events_per_section)
        .unwrap_or(usize::MAX)
        .min(EVENT_TABLE.len());
    let end_round =
        section_start.saturating_add(rules.event_section_length.max(1)).saturating_sub(1);
    let mut taken: Vec<u32> = Vec::with_capacity(wanted);
    let mut events = Vec::with_capacity(wanted);

    while taken.len() < wanted {
        let Some(row) = draw_unique_row(&taken, rng) else { break };
        taken.push(row.roll);
        let meta_rolls = row
            .sub_rolls
            .iter()
            .map(|(name, dice)| ((*name).to_owned(), roll_expression(*dice, rng).total))
            .collect();
        tracing::debug!(roll = row.roll, name = row.name, section_start, "Section event drawn");
        events.push(GlobalEvent {
            table_roll: row.roll,
            name: row.name.to_owned(),
            description: row.description.to_owned(),
            start_round: section_start,
            end_round,
            meta_rolls,
        });
    }
    events
}

fn draw_unique_row(taken: &[u32], rng: &mut dyn GameRng) -> Option<&'static EventRow> {
    for _ in 0..MAX_DRAW_ATTEMPTS {
        let roll = u32::try_from(roll_expression(DiceExpression::TWO_D20, rng).total).unwrap_or(0);
        if !taken.contains(&roll) {
            if let Some(row) = event_row(roll) {
                return Some(row);
            }
        }
    }
    EVENT_TABLE.iter().find(|r| !taken.contains(&r.roll))
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Economic modifiers of one or more active events.
///
/// Deltas add when combined; percentages (stored as factors, 1 = 100%)
/// multiply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventModifiers {
    /// Added to the labor budget.
    pub labor_delta: i32,
    /// Added to the influence budget.
    pub influence_delta: i32,
    /// Added to the gathering DC.
    pub gather_dc_delta: i32,
    /// Added to the influence DC.
    pub influence_dc_delta: i32,
    /// Added to the lending DC.
    pub lend_dc_delta: i32,
    /// Added to the selling DC.
    pub sell_dc_delta: i32,
    /// Added to each domain's raw production.
    pub domain_raw_delta: i32,
    /// Added to the gold upkeep of each paying holding.
    pub upkeep_gold_delta: i32,
    /// Flat tax per player.
    pub flat_tax: u32,
    /// Tax per domain.
    pub tax_per_domain: u32,
    /// Raw units lost to raids before protection.
    pub raid_loss: u32,
    /// Added to the raw-per-gold divisor.
    pub raw_divisor_delta: i32,
    /// Added to the special-per-gold divisor.
    pub special_divisor_delta: i32,
    /// Added to each leased city property's gold.
    pub leased_city_gold_delta: i32,
    /// Factor on trade enterprise income.
    pub trade_income: Decimal,
    /// Factor on office gold income.
    pub office_income: Decimal,
    /// Factor on storage capacity.
    pub storage_capacity: Decimal,
    /// Factor on acquisition gold prices.
    pub acquisition_price: Decimal,
}

impl Default for EventModifiers {
    fn default() -> Self {
        Self {
            labor_delta: 0,
            influence_delta: 0,
            gather_dc_delta: 0,
            influence_dc_delta: 0,
            lend_dc_delta: 0,
            sell_dc_delta: 0,
            domain_raw_delta: 0,
            upkeep_gold_delta: 0,
            flat_tax: 0,
            tax_per_domain: 0,
            raid_loss: 0,
            raw_divisor_delta: 0,
            special_divisor_delta: 0,
            leased_city_gold_delta: 0,
            trade_income: Decimal::ONE,
            office_income: Decimal::ONE,
            storage_capacity: Decimal::ONE,
            acquisition_price: Decimal::ONE,
        }
    }
}

fn meta_u32(event: &GlobalEvent, key: &str) -> u32 {
    u32::try_from(event.meta(key)).unwrap_or(0)
}

impl EventModifiers {
    /// Modifiers of a single drawn event.
    pub fn for_event(event: &GlobalEvent) -> Self {
        let none = Self::default();
        let half = Decimal::new(5, 1);
        let three_quarters = Decimal::new(75, 2);
        let five_quarters = Decimal::new(125, 2);
        match event.table_roll {
            2 => Self { labor_delta: -2, gather_dc_delta: 2, ..none },
            3 => Self { flat_tax: meta_u32(event, "levy"), trade_income: half, ..none },
            4 => Self { domain_raw_delta: -2, ..none },
            5 => {
                if event.meta("kind") <= 3 {
                    Self { raid_loss: meta_u32(event, "strength"), ..none }
                } else {
                    Self { trade_income: half, ..none }
                }
            }
            6 => Self { upkeep_gold_delta: 1, domain_raw_delta: -1, ..none },
            7 => Self { tax_per_domain: 1, ..none },
            8 => Self { influence_dc_delta: 3, office_income: three_quarters, ..none },
            9 => Self {
                domain_raw_delta: i32::try_from(event.meta("severity")).unwrap_or(0).saturating_neg(),
                ..none
            },
            10 => Self { trade_income: half, sell_dc_delta: 2, ..none },
            11 => Self { raid_loss: meta_u32(event, "bandits"), ..none },
            12 => Self { raw_divisor_delta: 1, ..none },
            13 => Self { flat_tax: 1, ..none },
            14 => Self { labor_delta: -1, ..none },
            15 => Self { domain_raw_delta: -1, ..none },
            16 => Self { special_divisor_delta: 1, ..none },
            17 => Self { influence_delta: -1, ..none },
            18 => Self { flat_tax: meta_u32(event, "levy"), ..none },
            19 => Self { sell_dc_delta: 1, ..none },
            21 => Self { leased_city_gold_delta: 1, ..none },
            22 => Self { domain_raw_delta: 1, ..none },
            23 => Self { office_income: five_quarters, ..none },
            24 => Self { sell_dc_delta: -2, trade_income: five_quarters, ..none },
            25 => Self { domain_raw_delta: 2, ..none },
            26 => Self { trade_income: Decimal::new(15, 1), ..none },
            27 => Self { upkeep_gold_delta: -1, ..none },
            28 => Self { acquisition_price: Decimal::new(9, 1), ..none },
            29 => Self { influence_delta: 1, ..none },
            30 => Self { leased_city_gold_delta: 1, influence_dc_delta: -1, ..none },
            31 => Self { raw_divisor_delta: -1, ..none },
            32 => Self { labor_delta: 1, ..none },
            33 => Self { gather_dc_delta: -2, ..none },
            34 => Self { lend_dc_delta: -2, ..none },
            35 => Self {
                trade_income: five_quarters,
                acquisition_price: Decimal::new(11, 1),
                ..none
            },
            36 => Self { labor_delta: 1, flat_tax: 1, ..none },
            37 => Self { storage_capacity: half, ..none },
            38 => Self { storage_capacity: Decimal::new(15, 1), ..none },
            39 => Self { domain_raw_delta: 1, office_income: five_quarters, ..none },
            40 => {
                if event.meta("reading") == 1 {
                    Self { influence_delta: 2, ..none }
                } else {
                    Self { influence_delta: -1, ..none }
                }
            }
            _ => none,
        }
    }

    /// Combine two modifier sets: deltas add, factors multiply.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            labor_delta: self.labor_delta.saturating_add(other.labor_delta),
            influence_delta: self.influence_delta.saturating_add(other.influence_delta),
            gather_dc_delta: self.gather_dc_delta.saturating_add(other.gather_dc_delta),
            influence_dc_delta: self.influence_dc_delta.saturating_add(other.influence_dc_delta),
            lend_dc_delta: self.lend_dc_delta.saturating_add(other.lend_dc_delta),
            sell_dc_delta: self.sell_dc_delta.saturating_add(other.sell_dc_delta),
            domain_raw_delta: self.domain_raw_delta.saturating_add(other.domain_raw_delta),
            upkeep_gold_delta: self.upkeep_gold_delta.saturating_add(other.upkeep_gold_delta),
            flat_tax: self.flat_tax.saturating_add(other.flat_tax),
            tax_per_domain: self.tax_per_domain.saturating_add(other.tax_per_domain),
            raid_loss: self.raid_loss.saturating_add(other.raid_loss),
            raw_divisor_delta: self.raw_divisor_delta.saturating_add(other.raw_divisor_delta),
            special_divisor_delta: self
                .special_divisor_delta
                .saturating_add(other.special_divisor_delta),
            leased_city_gold_delta: self
                .leased_city_gold_delta
                .saturating_add(other.leased_city_gold_delta),
            trade_income: self.trade_income.saturating_mul(other.trade_income),
            office_income: self.office_income.saturating_mul(other.office_income),
            storage_capacity: self.storage_capacity.saturating_mul(other.storage_capacity),
            acquisition_price: self.acquisition_price.saturating_mul(other.acquisition_price),
        }
    }

    /// Combined modifiers of every event active in `round`.
    pub fn active<'a>(events: impl IntoIterator<Item = &'a GlobalEvent>, round: u32) -> Self {
        events
            .into_iter()
            .filter(|e| e.is_active(round))
            .fold(Self::default(), |acc, e| acc.combine(Self::for_event(e)))
    }
}

/// `base + delta`, floored at 0.
pub const fn apply_delta(base: u32, delta: i32) -> u32 {
    if delta >= 0 {
        base.saturating_add(delta.unsigned_abs())
    } else {
        base.saturating_sub(delta.unsigned_abs())
    }
}

/// A conversion divisor adjusted by an event delta, never below 1.
pub fn adjusted_divisor(base: u32, delta: i32) -> u32 {
    apply_delta(base, delta).max(1)
}

/// `floor(amount * factor)`.
pub fn scale_floor(amount: u32, factor: Decimal) -> u32 {
    floor_yield(amount, factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;
    use std::collections::{BTreeMap, BTreeSet};

    fn event(roll: u32, meta: &[(&str, i64)]) -> GlobalEvent {
        GlobalEvent {
            table_roll: roll,
            name: String::new(),
            description: String::new(),
            start_round: 2,
            end_round: 5,
            meta_rolls: meta.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn table_covers_two_to_forty_with_unique_names() {
        let rolls: Vec<u32> = EVENT_TABLE.iter().map(|r| r.roll).collect();
        assert_eq!(rolls, (2..=40).collect::<Vec<u32>>());
        let names: BTreeSet<&str> = EVENT_TABLE.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), EVENT_TABLE.len());
    }

    #[test]
    fn draws_are_unique_and_windowed() {
        let rules = RulesConfig { events_per_section: 5, ..RulesConfig::default() };
        for seed in 0..100 {
            let mut rng = SeededRng::new(seed);
            let events = draw_section_events(&rules, 6, &mut rng);
            assert_eq!(events.len(), 5);
            let keys: BTreeSet<u32> = events.iter().map(|e| e.table_roll).collect();
            assert_eq!(keys.len(), 5);
            assert!(events.iter().all(|e| e.start_round == 6 && e.end_round == 9));
        }
    }

    #[test]
    fn draw_count_is_capped_at_table_size() {
        let rules = RulesConfig { events_per_section: 100, ..RulesConfig::default() };
        let events = draw_section_events(&rules, 2, &mut SeededRng::new(1));
        assert_eq!(events.len(), EVENT_TABLE.len());
    }

    #[test]
    fn sub_rolls_are_memoized() {
        let rules = RulesConfig { events_per_section: 39, ..RulesConfig::default() };
        let events = draw_section_events(&rules, 2, &mut SeededRng::new(9));
        let flood = events.iter().find(|e| e.table_roll == 9).map(|e| e.meta("severity"));
        assert!(flood.is_some_and(|s| (1..=3).contains(&s)));
        let raiders = events.iter().find(|e| e.table_roll == 5);
        assert!(raiders.is_some_and(|e| e.meta_rolls.len() == 2));
    }

    #[test]
    fn event_sections() {
        let rules = RulesConfig::default();
        let starts: Vec<u32> = (1..=12).filter(|r| is_event_section_start(&rules, *r)).collect();
        assert_eq!(starts, vec![2, 6, 10]);
    }

    #[test]
    fn modifiers_follow_sub_rolls() {
        let raid = EventModifiers::for_event(&event(5, &[("kind", 2), ("strength", 4)]));
        assert_eq!(raid.raid_loss, 4);
        assert_eq!(raid.trade_income, Decimal::ONE);
        let pirates = EventModifiers::for_event(&event(5, &[("kind", 5), ("strength", 4)]));
        assert_eq!(pirates.raid_loss, 0);
        assert_eq!(pirates.trade_income, Decimal::new(5, 1));
        let flood = EventModifiers::for_event(&event(9, &[("severity", 3)]));
        assert_eq!(flood.domain_raw_delta, -3);
        let omen = EventModifiers::for_event(&event(40, &[("reading", 2)]));
        assert_eq!(omen.influence_delta, -1);
    }

    #[test]
    fn combined_deltas_add_and_factors_multiply() {
        let events = [event(24, &[]), event(26, &[]), event(14, &[]), event(32, &[])];
        let combined = EventModifiers::active(&events, 3);
        assert_eq!(combined.labor_delta, 0);
        assert_eq!(combined.sell_dc_delta, -2);
        assert_eq!(combined.trade_income, Decimal::new(1875, 3));
        assert_eq!(EventModifiers::active(&events, 6), EventModifiers::default());
    }

    #[test]
    fn deltas_floor_at_zero() {
        assert_eq!(apply_delta(2, -5), 0);
        assert_eq!(apply_delta(2, 3), 5);
        assert_eq!(adjusted_divisor(1, -1), 1);
    }
}
