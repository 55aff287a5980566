//! Event vocabulary.
//!
//! Events are the only mutation primitive: the reducer folds them into
//! state, and nothing else changes state. Every event carries a
//! [`Visibility`] so the log can be filtered per recipient. Outcome events
//! carry everything the reducer needs (amounts, new entities with their
//! derived IDs), so reducing never consults the catalog or the RNG.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{
    CityPropertyMode, DomainTier, HoldingSize, MaterialKind, OfficeYieldMode, Phase, SuccessTier,
    TroopKind,
};
use crate::holdings::{
    CityProperty, Domain, FacilityInstance, Holdings, HoldingRef, LongTermProject, Office,
    Organization, Specialist, Storage, TradeEnterprise, Workshop,
};
use crate::ids::{CampaignId, FacilityId, HoldingId, MarketId, MaterialId, PlayerId, UserId};
use crate::rules::RulesConfig;
use crate::state::{CheckModifiers, Economy, GlobalEvent, MarketInstance, TurnState};

/// Who may see an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Visibility {
    /// Everyone in the campaign.
    Public,
    /// Only the named player (and the GM).
    Private {
        /// The player allowed to see the event.
        player_id: PlayerId,
    },
}

/// A logged state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Who may see the event.
    pub visibility: Visibility,
    /// What happened.
    pub payload: EventPayload,
}

impl Event {
    /// A public event.
    pub const fn public(payload: EventPayload) -> Self {
        Self { visibility: Visibility::Public, payload }
    }

    /// An event visible only to `player_id`.
    pub const fn private(player_id: PlayerId, payload: EventPayload) -> Self {
        Self { visibility: Visibility::Private { player_id }, payload }
    }
}

/// Action slot consumed by an outcome event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionUsage {
    /// Action key, e.g. `gather`.
    pub key: String,
    /// Slots consumed.
    pub cost: u32,
}

/// A resolved `1d20 + modifier` check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Difficulty class.
    pub dc: i32,
    /// Modifier added to the die.
    pub modifier: i32,
    /// Natural die result.
    pub roll: i32,
    /// `roll + modifier`.
    pub total: i32,
    /// Classified outcome.
    pub tier: SuccessTier,
}

/// A holding gained by an acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "holding", rename_all = "snake_case")]
pub enum AcquiredHolding {
    /// New domain.
    Domain(Domain),
    /// New city property.
    CityProperty(CityProperty),
    /// New workshop.
    Workshop(Workshop),
    /// New storage.
    Storage(Storage),
    /// New office.
    Office(Office),
    /// New organization.
    Organization(Organization),
    /// New trade enterprise.
    TradeEnterprise(TradeEnterprise),
}

/// Result of building a facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FacilityOutcome {
    /// The facility is usable immediately.
    Built {
        /// The new facility.
        facility: FacilityInstance,
    },
    /// Construction spans several rounds.
    Started {
        /// The new project.
        project: LongTermProject,
    },
}

/// The rank a holding was raised to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scale", content = "rank", rename_all = "snake_case")]
pub enum HoldingRank {
    /// Domain tier.
    Domain(DomainTier),
    /// Size of any other holding.
    Sized(HoldingSize),
}

/// A mode switch on a holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum ModeChange {
    /// City property use changed.
    CityProperty {
        /// The property.
        id: HoldingId,
        /// New mode.
        mode: CityPropertyMode,
    },
    /// Office yield changed.
    Office {
        /// The office.
        id: HoldingId,
        /// New yield.
        mode: OfficeYieldMode,
    },
}

/// Everything the maintenance phase did to one player.
///
/// The reducer applies amounts in field order: release pending gold, pay
/// taxes, complete projects, set this round's budgets, pay upkeep, add
/// production, remove raid losses, remove workforce upkeep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceReport {
    /// Pending gold moved to gold on hand.
    pub pending_released: u32,
    /// Event taxes paid.
    pub taxes_paid: u32,
    /// Projects whose facilities became usable this round.
    pub completed_projects: Vec<FacilityId>,
    /// Labor budget for this round, with the round's event deltas.
    pub labor_budget: u32,
    /// Influence budget for this round, with the round's event deltas.
    pub influence_budget: u32,
    /// Gold spent on upkeep.
    pub upkeep_gold: u32,
    /// Labor spent on upkeep.
    pub upkeep_labor: u32,
    /// Workshops whose upkeep was paid.
    pub maintained_workshop_ids: Vec<HoldingId>,
    /// Storages whose upkeep was paid.
    pub maintained_storage_ids: Vec<HoldingId>,
    /// Domains producing at the next lower tier.
    pub degraded_domain_ids: Vec<HoldingId>,
    /// City properties and trade enterprises withholding income.
    pub unpaid_holding_ids: Vec<HoldingId>,
    /// Mercenaries that deserted.
    pub deserted_mercenaries: u32,
    /// Guards that deserted.
    pub deserted_guards: u32,
    /// Gold produced.
    pub gold_produced: u32,
    /// Raw produced by material.
    pub raw_produced: BTreeMap<MaterialId, u32>,
    /// Raw lost to raids beyond troop protection.
    pub raid_losses: BTreeMap<MaterialId, u32>,
    /// Raw consumed to feed the workforce.
    pub workforce_upkeep: BTreeMap<MaterialId, u32>,
}

/// Everything the conversion phase did to one player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Raw consumed by workshops.
    pub workshop_consumed: BTreeMap<MaterialId, u32>,
    /// Special produced by workshops.
    pub workshop_produced: BTreeMap<MaterialId, u32>,
    /// Raw kept in storage for the next round.
    pub retained_raw: BTreeMap<MaterialId, u32>,
    /// Special kept in storage for the next round.
    pub retained_special: BTreeMap<MaterialId, u32>,
    /// Gold from auto-converting the remainder.
    pub gold_gained: u32,
    /// Raw units lost as conversion remainder.
    pub raw_lost: u32,
    /// Special units lost as conversion remainder.
    pub special_lost: u32,
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    // --- Campaign lifecycle ---
    /// A campaign was created at round 1, maintenance.
    CampaignCreated {
        /// Campaign identifier.
        campaign_id: CampaignId,
        /// Display name.
        name: String,
        /// GM user.
        gm_user_id: UserId,
        /// Rules for the campaign's lifetime.
        rules: RulesConfig,
    },
    /// A player took a seat. Public identity only.
    PlayerJoined {
        /// New player.
        player_id: PlayerId,
        /// Owning user.
        user_id: UserId,
        /// Public name.
        display_name: String,
    },
    /// Starting assets of a newly joined player.
    PlayerInitialized {
        /// The player.
        player_id: PlayerId,
        /// Check bonuses.
        check_modifiers: CheckModifiers,
        /// Starting holdings.
        holdings: Box<Holdings>,
        /// Starting economy.
        economy: Box<Economy>,
        /// Starting budgets.
        turn: Box<TurnState>,
    },
    /// The campaign moved to a new phase.
    PhaseAdvanced {
        /// Phase left.
        from: Phase,
        /// Phase entered.
        to: Phase,
        /// Round after the transition.
        round: u32,
    },
    /// A market venue was rolled for a new market section.
    MarketRolled {
        /// The rolled venue. Replaces any earlier roll with the same ID.
        market: MarketInstance,
    },
    /// Section events were drawn.
    SectionEventsRolled {
        /// First round of the section.
        section_start: u32,
        /// Drawn events, in draw order.
        events: Vec<GlobalEvent>,
    },

    // --- Bulk phase resolution ---
    /// Maintenance resolution for one player.
    PlayerMaintenanceResolved {
        /// The player.
        player_id: PlayerId,
        /// What happened.
        report: Box<MaintenanceReport>,
    },
    /// Conversion resolution for one player.
    PlayerConversionResolved {
        /// The player.
        player_id: PlayerId,
        /// What happened.
        report: ConversionReport,
    },
    /// Budgets recomputed and usage cleared for one player.
    PlayerTurnReset {
        /// The player.
        player_id: PlayerId,
        /// New labor budget.
        labor_available: u32,
        /// New influence budget.
        influence_available: u32,
    },

    // --- Action outcomes ---
    /// Gathering resolved.
    PlayerGatherMaterialsResolved {
        /// The player.
        player_id: PlayerId,
        /// Slot consumed.
        usage: Option<ActionUsage>,
        /// Check result.
        check: CheckOutcome,
        /// Labor spent.
        labor_spent: u32,
        /// Raw gained by material.
        raw_gained: BTreeMap<MaterialId, u32>,
        /// Special gained by material.
        special_gained: BTreeMap<MaterialId, u32>,
    },
    /// Influence bought.
    PlayerInfluenceGained {
        /// The player.
        player_id: PlayerId,
        /// Slot consumed.
        usage: Option<ActionUsage>,
        /// Check result.
        check: CheckOutcome,
        /// Gold spent.
        gold_spent: u32,
        /// Influence gained.
        influence_gained: u32,
    },
    /// Money lent; the payout arrives at the next maintenance.
    PlayerMoneyLent {
        /// The player.
        player_id: PlayerId,
        /// Slot consumed.
        usage: Option<ActionUsage>,
        /// Check result.
        check: CheckOutcome,
        /// Gold spent.
        gold_spent: u32,
        /// Gold added to pending income.
        payout: u32,
    },
    /// Materials sold at a market.
    PlayerMaterialsSold {
        /// The player.
        player_id: PlayerId,
        /// Slot consumed.
        usage: Option<ActionUsage>,
        /// Venue.
        market_id: MarketId,
        /// Check result.
        check: CheckOutcome,
        /// Raw units sold by material.
        raw_sold: BTreeMap<MaterialId, u32>,
        /// Special units sold by material.
        special_sold: BTreeMap<MaterialId, u32>,
        /// Proceeds.
        gold_gained: u32,
    },
    /// Materials bought at a market.
    PlayerMaterialsBought {
        /// The player.
        player_id: PlayerId,
        /// Slot consumed. `None` when part of a combined sell-and-buy.
        usage: Option<ActionUsage>,
        /// Venue.
        market_id: MarketId,
        /// Material bought.
        material_id: MaterialId,
        /// Raw or special stock.
        kind: MaterialKind,
        /// Units received.
        units: u32,
        /// Price paid.
        gold_spent: u32,
    },
    /// An acquisition resolved. A failed check acquires nothing.
    PlayerHoldingAcquired {
        /// The player.
        player_id: PlayerId,
        /// Slot consumed.
        usage: Option<ActionUsage>,
        /// Check result.
        check: CheckOutcome,
        /// Gold paid.
        gold_spent: u32,
        /// Influence paid.
        influence_spent: u32,
        /// The new holding, with its derived ID.
        acquired: Option<AcquiredHolding>,
    },
    /// Tenants settled on a domain.
    PlayerTenantsAcquired {
        /// The player.
        player_id: PlayerId,
        /// Slot consumed.
        usage: Option<ActionUsage>,
        /// Domain.
        domain_id: HoldingId,
        /// Families settled.
        count: u32,
        /// Gold paid.
        gold_spent: u32,
    },
    /// Troops recruited.
    PlayerTroopsRecruited {
        /// The player.
        player_id: PlayerId,
        /// Slot consumed.
        usage: Option<ActionUsage>,
        /// Unit kind.
        kind: TroopKind,
        /// Units recruited.
        count: u32,
        /// Gold paid.
        gold_spent: u32,
    },
    /// Specialist hired.
    PlayerSpecialistHired {
        /// The player.
        player_id: PlayerId,
        /// Slot consumed.
        usage: Option<ActionUsage>,
        /// The specialist, with its derived ID.
        specialist: Specialist,
        /// Gold paid.
        gold_spent: u32,
    },
    /// Facility built or construction started.
    PlayerFacilityBuilt {
        /// The player.
        player_id: PlayerId,
        /// Slot consumed.
        usage: Option<ActionUsage>,
        /// Host holding.
        host: HoldingRef,
        /// Gold paid.
        gold_spent: u32,
        /// Raw paid by material.
        raw_spent: BTreeMap<MaterialId, u32>,
        /// Built facility or started project.
        outcome: FacilityOutcome,
    },
    /// Holding raised one rank.
    PlayerHoldingUpgraded {
        /// The player.
        player_id: PlayerId,
        /// Slot consumed.
        usage: Option<ActionUsage>,
        /// Upgraded holding.
        target: HoldingRef,
        /// New rank.
        rank: HoldingRank,
        /// Gold paid.
        gold_spent: u32,
    },
    /// Holding mode switched.
    PlayerHoldingModeChanged {
        /// The player.
        player_id: PlayerId,
        /// The switch.
        change: ModeChange,
    },
    /// A private note.
    PrivateNoteAdded {
        /// Author.
        player_id: PlayerId,
        /// Text.
        text: String,
    },
    /// A human-readable line for the public log.
    PublicLogEntryAdded {
        /// Round of the entry.
        round: u32,
        /// Phase of the entry.
        phase: Phase,
        /// Message.
        message: String,
    },
}

impl EventPayload {
    /// Short stable name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CampaignCreated { .. } => "campaign_created",
            Self::PlayerJoined { .. } => "player_joined",
            Self::PlayerInitialized { .. } => "player_initialized",
            Self::PhaseAdvanced { .. } => "phase_advanced",
            Self::MarketRolled { .. } => "market_rolled",
            Self::SectionEventsRolled { .. } => "section_events_rolled",
            Self::PlayerMaintenanceResolved { .. } => "player_maintenance_resolved",
            Self::PlayerConversionResolved { .. } => "player_conversion_resolved",
            Self::PlayerTurnReset { .. } => "player_turn_reset",
            Self::PlayerGatherMaterialsResolved { .. } => "player_gather_materials_resolved",
            Self::PlayerInfluenceGained { .. } => "player_influence_gained",
            Self::PlayerMoneyLent { .. } => "player_money_lent",
            Self::PlayerMaterialsSold { .. } => "player_materials_sold",
            Self::PlayerMaterialsBought { .. } => "player_materials_bought",
            Self::PlayerHoldingAcquired { .. } => "player_holding_acquired",
            Self::PlayerTenantsAcquired { .. } => "player_tenants_acquired",
            Self::PlayerTroopsRecruited { .. } => "player_troops_recruited",
            Self::PlayerSpecialistHired { .. } => "player_specialist_hired",
            Self::PlayerFacilityBuilt { .. } => "player_facility_built",
            Self::PlayerHoldingUpgraded { .. } => "player_holding_upgraded",
            Self::PlayerHoldingModeChanged { .. } => "player_holding_mode_changed",
            Self::PrivateNoteAdded { .. } => "private_note_added",
            Self::PublicLogEntryAdded { .. } => "public_log_entry_added",
        }
    }
}
