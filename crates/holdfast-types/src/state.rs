//! Campaign and player state.
//!
//! State is never mutated in place by callers: the reducer takes a value and
//! returns the next one. Every map is a [`BTreeMap`] so serialized state is
//! byte-identical across replays.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{DemandLevel, MaterialGroup, Phase};
use crate::holdings::Holdings;
use crate::ids::{CampaignId, HoldingId, MarketId, MaterialId, PlayerId, UserId};
use crate::rules::RulesConfig;

// ---------------------------------------------------------------------------
// Campaign
// ---------------------------------------------------------------------------

/// The full state of one campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignState {
    /// Campaign identifier.
    pub id: CampaignId,
    /// Display name.
    pub name: String,
    /// Rules fixed at creation.
    pub rules: RulesConfig,
    /// Current round, starting at 1.
    pub round: u32,
    /// Current phase.
    pub phase: Phase,
    /// The user allowed to issue GM commands.
    pub gm_user_id: UserId,
    /// Markets of the current market section.
    pub markets: Vec<MarketInstance>,
    /// Every section event drawn so far. Only those whose window contains the
    /// current round are active.
    pub global_events: Vec<GlobalEvent>,
    /// Players keyed by ID.
    pub players: BTreeMap<PlayerId, PlayerState>,
}

impl CampaignState {
    /// Look up a player by ID.
    pub fn player(&self, id: &PlayerId) -> Option<&PlayerState> {
        self.players.get(id)
    }

    /// Look up the player seat owned by a user.
    pub fn player_by_user(&self, user_id: &UserId) -> Option<&PlayerState> {
        self.players.values().find(|p| &p.user_id == user_id)
    }

    /// Look up a rolled market by ID.
    pub fn market(&self, id: &MarketId) -> Option<&MarketInstance> {
        self.markets.iter().find(|m| &m.id == id)
    }

    /// Section events active in the given round.
    pub fn active_events(&self, round: u32) -> impl Iterator<Item = &GlobalEvent> {
        self.global_events.iter().filter(move |e| e.is_active(round))
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Flat bonuses a player adds to each kind of check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckModifiers {
    /// Added to influence checks.
    pub influence: i32,
    /// Added to money checks.
    pub money: i32,
    /// Added to materials checks.
    pub materials: i32,
}

/// One player seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Player identifier.
    pub id: PlayerId,
    /// Owning user.
    pub user_id: UserId,
    /// Name shown in the public feed.
    pub display_name: String,
    /// Check bonuses.
    pub check_modifiers: CheckModifiers,
    /// Owned holdings.
    pub holdings: Holdings,
    /// Liquid assets.
    pub economy: Economy,
    /// Per-round budgets and usage.
    pub turn: TurnState,
}

/// Gold deferred to the next maintenance phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingIncome {
    /// Gold released at the next maintenance.
    pub gold: u32,
}

/// Liquid assets of a player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economy {
    /// Gold on hand.
    pub gold: u32,
    /// Raw material stock by material.
    pub raw: BTreeMap<MaterialId, u32>,
    /// Special material stock by material.
    pub special: BTreeMap<MaterialId, u32>,
    /// Income not yet released.
    pub pending: PendingIncome,
}

impl Economy {
    /// Total raw units across materials.
    pub fn raw_total(&self) -> u32 {
        self.raw.values().fold(0, |acc, n| acc.saturating_add(*n))
    }

    /// Total special units across materials.
    pub fn special_total(&self) -> u32 {
        self.special.values().fold(0, |acc, n| acc.saturating_add(*n))
    }

    /// Units of one raw material on hand.
    pub fn raw_of(&self, id: &MaterialId) -> u32 {
        self.raw.get(id).copied().unwrap_or(0)
    }

    /// Units of one special material on hand.
    pub fn special_of(&self, id: &MaterialId) -> u32 {
        self.special.get(id).copied().unwrap_or(0)
    }
}

/// Per-round budgets and bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// Labor left to invest this round.
    pub labor_available: u32,
    /// Influence left to spend this round.
    pub influence_available: u32,
    /// Action slots spent this round.
    pub actions_used: u32,
    /// Action keys already used this round, in order of use.
    pub action_keys_used: Vec<String>,
    /// Workshops whose upkeep was paid this round.
    pub maintained_workshop_ids: Vec<HoldingId>,
    /// Storages whose upkeep was paid this round.
    pub maintained_storage_ids: Vec<HoldingId>,
    /// Domains producing one tier lower because upkeep went unpaid.
    pub degraded_domain_ids: Vec<HoldingId>,
    /// Holdings withholding income because upkeep went unpaid.
    pub unpaid_holding_ids: Vec<HoldingId>,
}

impl TurnState {
    /// Whether the action key was already used this round.
    pub fn has_used(&self, key: &str) -> bool {
        self.action_keys_used.iter().any(|k| k == key)
    }
}

// ---------------------------------------------------------------------------
// Markets and section events
// ---------------------------------------------------------------------------

/// One rolled market venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketInstance {
    /// Venue identifier.
    pub id: MarketId,
    /// Whether trading here needs a trade enterprise.
    pub requires_trade_enterprise: bool,
    /// Round the venue was rolled.
    pub rolled_round: u32,
    /// Raw-material side.
    pub raw: MarketSide,
    /// Special-material side.
    pub special: MarketSide,
}

impl MarketInstance {
    /// Price modifier for a material group, 0 when neutral or off-side.
    pub fn modifier(&self, group: MaterialGroup) -> i32 {
        let side = match group.kind() {
            crate::enums::MaterialKind::Raw => &self.raw,
            crate::enums::MaterialKind::Special => &self.special,
        };
        side.modifiers.get(&group).copied().unwrap_or(0)
    }
}

/// One side of a market roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSide {
    /// The 2d6 table roll.
    pub table_roll: u32,
    /// Category name of the table row.
    pub category: String,
    /// Demand label of the table row.
    pub demand: DemandLevel,
    /// Price modifier per group; every group of the side is present.
    pub modifiers: BTreeMap<MaterialGroup, i32>,
}

/// A drawn section event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalEvent {
    /// Key of the table row (2..=40).
    pub table_roll: u32,
    /// Event name.
    pub name: String,
    /// Player-facing description.
    pub description: String,
    /// First round the event is active.
    pub start_round: u32,
    /// Last round the event is active.
    pub end_round: u32,
    /// Memoized sub-rolls, e.g. `levy` or `severity`.
    pub meta_rolls: BTreeMap<String, i64>,
}

impl GlobalEvent {
    /// Whether the event's window contains `round`.
    pub const fn is_active(&self, round: u32) -> bool {
        self.start_round <= round && round <= self.end_round
    }

    /// A memoized sub-roll, 0 when absent.
    pub fn meta(&self, key: &str) -> i64 {
        self.meta_rolls.get(key).copied().unwrap_or(0)
    }
}
