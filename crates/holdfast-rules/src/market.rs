//! Market roll tables.
//!
//! Each market venue has a raw side and a special side. A side is rolled by
//! a `2d6` table roll followed by one secondary roll per listed group, in
//! table order: hot groups first (positive), cold groups next (negative).
//! Groups a row does not list stay at 0.

use std::collections::BTreeMap;

use holdfast_types::MaterialGroup::{
    Cloth, Grain, Livestock, Luxuries, Ore, Provisions, Textiles, Timber, Tools, Weapons,
};
use holdfast_types::{
    DemandLevel, MarketConfig, MarketInstance, MarketSide, MaterialGroup, MaterialKind, RulesConfig,
};

use crate::dice::{DiceExpression, roll_expression};
use crate::rng::GameRng;

/// Gold value of one raw lot before market modifiers.
pub const RAW_LOT_VALUE: i32 = 3;

/// Raw units in one sale or purchase lot.
pub const RAW_LOT_SIZE: u32 = 6;

/// Gold value of one special unit before market modifiers.
pub const SPECIAL_UNIT_VALUE: i32 = 2;

/// Gold price of one raw lot before market modifiers.
pub const RAW_LOT_PRICE: i32 = 4;

/// Gold price of one special unit before market modifiers.
pub const SPECIAL_UNIT_PRICE: i32 = 3;

/// One secondary roll of a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSwing {
    /// Affected group.
    pub group: MaterialGroup,
    /// +1 for hot groups, -1 for cold groups.
    pub sign: i32,
    /// Dice rolled for the magnitude.
    pub dice: DiceExpression,
}

const fn hot(group: MaterialGroup, count: u32, sides: u32) -> GroupSwing {
    GroupSwing { group, sign: 1, dice: DiceExpression::of(count, sides) }
}

const fn cold(group: MaterialGroup, count: u32, sides: u32) -> GroupSwing {
    GroupSwing { group, sign: -1, dice: DiceExpression::of(count, sides) }
}

/// One row of a market table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketRow {
    /// `2d6` total selecting the row.
    pub roll: u32,
    /// Category name.
    pub category: &'static str,
    /// Demand label.
    pub demand: DemandLevel,
    /// Secondary rolls, in roll order.
    pub swings: &'static [GroupSwing],
}

/// Raw side table, one row per `2d6` total.
pub static RAW_TABLE: [MarketRow; 11] = [
    MarketRow {
        roll: 2,
        category: "Famine",
        demand: DemandLevel::Extreme,
        swings: &[
            hot(Grain, 1, 8),
            hot(Livestock, 1, 4),
            cold(Timber, 1, 2),
            cold(Ore, 1, 2),
            cold(Textiles, 1, 2),
        ],
    },
    MarketRow {
        roll: 3,
        category: "Building boom",
        demand: DemandLevel::High,
        swings: &[hot(Timber, 1, 6), hot(Ore, 1, 4), cold(Grain, 1, 3)],
    },
    MarketRow {
        roll: 4,
        category: "Mining rush",
        demand: DemandLevel::High,
        swings: &[hot(Ore, 1, 6), cold(Timber, 1, 4)],
    },
    MarketRow {
        roll: 5,
        category: "Livestock fair",
        demand: DemandLevel::Elevated,
        swings: &[hot(Livestock, 1, 4), cold(Grain, 1, 2)],
    },
    MarketRow {
        roll: 6,
        category: "Steady trade",
        demand: DemandLevel::Normal,
        swings: &[hot(Grain, 1, 2), cold(Textiles, 1, 2)],
    },
    MarketRow { roll: 7, category: "Calm market", demand: DemandLevel::Normal, swings: &[] },
    MarketRow {
        roll: 8,
        category: "Weaving season",
        demand: DemandLevel::Normal,
        swings: &[hot(Textiles, 1, 3), cold(Livestock, 1, 2)],
    },
    MarketRow {
        roll: 9,
        category: "Timber shortage",
        demand: DemandLevel::Elevated,
        swings: &[hot(Timber, 1, 4), cold(Ore, 1, 3)],
    },
    MarketRow {
        roll: 10,
        category: "Bumper harvest",
        demand: DemandLevel::Low,
        swings: &[hot(Ore, 1, 3), cold(Grain, 1, 3)],
    },
    MarketRow {
        roll: 11,
        category: "Caravan glut",
        demand: DemandLevel::Low,
        swings: &[
            hot(Textiles, 1, 2),
            cold(Grain, 1, 2),
            cold(Timber, 1, 2),
            cold(Ore, 1, 2),
            cold(Livestock, 1, 2),
        ],
    },
    MarketRow {
        roll: 12,
        category: "Golden market",
        demand: DemandLevel::Extreme,
        swings: &[
            hot(Grain, 1, 6),
            hot(Timber, 1, 6),
            hot(Ore, 1, 6),
            hot(Livestock, 1, 6),
            hot(Textiles, 1, 6),
        ],
    },
];

/// Special side table, one row per `2d6` total.
pub static SPECIAL_TABLE: [MarketRow; 11] = [
    MarketRow {
        roll: 2,
        category: "War scare",
        demand: DemandLevel::Extreme,
        swings: &[hot(Weapons, 1, 8), cold(Luxuries, 1, 4), cold(Cloth, 1, 2)],
    },
    MarketRow {
        roll: 3,
        category: "Court season",
        demand: DemandLevel::High,
        swings: &[hot(Luxuries, 1, 6), cold(Tools, 1, 3)],
    },
    MarketRow {
        roll: 4,
        category: "Siege rumours",
        demand: DemandLevel::High,
        swings: &[hot(Provisions, 1, 6), cold(Luxuries, 1, 4)],
    },
    MarketRow {
        roll: 5,
        category: "Guild demand",
        demand: DemandLevel::Elevated,
        swings: &[hot(Tools, 1, 4), cold(Weapons, 1, 2)],
    },
    MarketRow {
        roll: 6,
        category: "Tailors' fair",
        demand: DemandLevel::Normal,
        swings: &[hot(Cloth, 1, 3), cold(Provisions, 1, 2)],
    },
    MarketRow { roll: 7, category: "Calm market", demand: DemandLevel::Normal, swings: &[] },
    MarketRow {
        roll: 8,
        category: "Merchant convoy",
        demand: DemandLevel::Normal,
        swings: &[hot(Luxuries, 1, 2), cold(Tools, 1, 2)],
    },
    MarketRow {
        roll: 9,
        category: "Armory orders",
        demand: DemandLevel::Elevated,
        swings: &[hot(Weapons, 1, 4), cold(Cloth, 1, 3)],
    },
    MarketRow {
        roll: 10,
        category: "Festival",
        demand: DemandLevel::Elevated,
        swings: &[hot(Cloth, 1, 4), hot(Luxuries, 1, 4), cold(Weapons, 1, 3)],
    },
    MarketRow {
        roll: 11,
        category: "Glut of wares",
        demand: DemandLevel::Low,
        swings: &[
            hot(Tools, 1, 2),
            cold(Weapons, 1, 2),
            cold(Luxuries, 1, 2),
            cold(Cloth, 1, 2),
            cold(Provisions, 1, 2),
        ],
    },
    MarketRow {
        roll: 12,
        category: "Bidding frenzy",
        demand: DemandLevel::Extreme,
        swings: &[
            hot(Tools, 1, 6),
            hot(Weapons, 1, 6),
            hot(Luxuries, 1, 6),
            hot(Cloth, 1, 6),
            hot(Provisions, 1, 6),
        ],
    },
];

/// Whether `round` starts a market section. Round 1 always does.
pub const fn is_market_section_start(rules: &RulesConfig, round: u32) -> bool {
    round >= 1 && matches!(round.saturating_sub(1).checked_rem(rules.market_section_length), Some(0) | None)
}

/// The row for a `2d6` total. Totals outside `2..=12` clamp to the
/// nearest row.
const fn row_for(table: &'static [MarketRow; 11], roll: u32) -> &'static MarketRow {
    let [r2, r3, r4, r5, r6, r7, r8, r9, r10, r11, r12] = table;
    match roll {
        ..=2 => r2,
        3 => r3,
        4 => r4,
        5 => r5,
        6 => r6,
        7 => r7,
        8 => r8,
        9 => r9,
        10 => r10,
        11 => r11,
        _ => r12,
    }
}

/// Roll one side of a market.
pub fn roll_side(
    table: &'static [MarketRow; 11],
    groups: [MaterialGroup; 5],
    rng: &mut dyn GameRng,
) -> MarketSide {
    let table_roll = u32::try_from(roll_expression(DiceExpression::TWO_D6, rng).total).unwrap_or(7);
    let mut modifiers: BTreeMap<MaterialGroup, i32> = groups.iter().map(|g| (*g, 0)).collect();
    let row = row_for(table, table_roll);
    for swing in row.swings {
        let magnitude = i32::try_from(roll_expression(swing.dice, rng).total).unwrap_or(0);
        let entry = modifiers.entry(swing.group).or_insert(0);
        *entry = entry.saturating_add(swing.sign.saturating_mul(magnitude));
    }
    MarketSide { table_roll, category: row.category.to_owned(), demand: row.demand, modifiers }
}

/// Roll a configured market venue: raw side, then special side.
pub fn roll_market(config: &MarketConfig, round: u32, rng: &mut dyn GameRng) -> MarketInstance {
    let raw = roll_side(&RAW_TABLE, MaterialGroup::RAW, rng);
    let special = roll_side(&SPECIAL_TABLE, MaterialGroup::SPECIAL, rng);
    tracing::debug!(
        market = %config.id,
        round,
        raw = raw.category.as_str(),
        special = special.category.as_str(),
        "Market rolled"
    );
    MarketInstance {
        id: config.id.clone(),
        requires_trade_enterprise: config.requires_trade_enterprise,
        rolled_round: round,
        raw,
        special,
    }
}

/// Gold value of selling one lot of a group at a market: `max(0, base + modifier)`.
pub const fn sale_value(group: MaterialGroup, modifier: i32) -> u32 {
    let base = match group.kind() {
        MaterialKind::Raw => RAW_LOT_VALUE,
        MaterialKind::Special => SPECIAL_UNIT_VALUE,
    };
    let value = base.saturating_add(modifier);
    if value < 0 { 0 } else { value.unsigned_abs() }
}

/// Gold price of buying one lot of a group at a market: `max(1, base + modifier)`.
pub const fn purchase_price(group: MaterialGroup, modifier: i32) -> u32 {
    let base = match group.kind() {
        MaterialKind::Raw => RAW_LOT_PRICE,
        MaterialKind::Special => SPECIAL_UNIT_PRICE,
    };
    let price = base.saturating_add(modifier);
    if price < 1 { 1 } else { price.unsigned_abs() }
}
