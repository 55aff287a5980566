//! Enumeration types for the Holdfast campaign engine.
//!
//! Closed vocabularies shared by state, commands and events: the round phase
//! cycle, holding tiers and kinds, material classification, check outcomes,
//! actor roles and rule-violation codes.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Round structure
// ---------------------------------------------------------------------------

/// One of the four phases of a campaign round.
///
/// The cycle is `Maintenance -> Actions -> Conversion -> Reset ->
/// Maintenance`; the round counter increments only on the final step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Upkeep is paid and income is produced.
    Maintenance,
    /// Players submit their actions.
    Actions,
    /// Raw materials are refined, stored or sold off.
    Conversion,
    /// Per-round budgets are recomputed.
    Reset,
}

impl Phase {
    /// All phases in cycle order.
    pub const ALL: [Self; 4] = [Self::Maintenance, Self::Actions, Self::Conversion, Self::Reset];

    /// The phase that follows this one. Total, with no fixed points.
    pub const fn next(self) -> Self {
        match self {
            Self::Maintenance => Self::Actions,
            Self::Actions => Self::Conversion,
            Self::Conversion => Self::Reset,
            Self::Reset => Self::Maintenance,
        }
    }

    /// Whether leaving this phase starts a new round.
    pub const fn wraps_round(self) -> bool {
        matches!(self, Self::Reset)
    }
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Maintenance => "maintenance",
            Self::Actions => "actions",
            Self::Conversion => "conversion",
            Self::Reset => "reset",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Outcome tier of a dice check, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessTier {
    /// Missed the DC by more than 5.
    Fail,
    /// Missed the DC by at most 5.
    Poor,
    /// Met the DC.
    Success,
    /// Beat the DC by at least 5.
    Good,
    /// Beat the DC by at least 10.
    VeryGood,
}

// ---------------------------------------------------------------------------
// Holdings
// ---------------------------------------------------------------------------

/// Size rank of a domain. Domains have an extra starter rank below small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainTier {
    /// The modest estate every player starts with.
    Starter,
    /// Small domain.
    Small,
    /// Medium domain.
    Medium,
    /// Large domain.
    Large,
}

impl DomainTier {
    /// One step down, saturating at [`DomainTier::Starter`].
    pub const fn lower(self) -> Self {
        match self {
            Self::Starter | Self::Small => Self::Starter,
            Self::Medium => Self::Small,
            Self::Large => Self::Medium,
        }
    }

    /// One step up, or `None` at the top rank.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Starter => Some(Self::Small),
            Self::Small => Some(Self::Medium),
            Self::Medium => Some(Self::Large),
            Self::Large => None,
        }
    }
}

/// Size rank shared by every holding other than domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingSize {
    /// Small.
    Small,
    /// Medium.
    Medium,
    /// Large.
    Large,
}

impl HoldingSize {
    /// One step up, or `None` at the top rank.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Small => Some(Self::Medium),
            Self::Medium => Some(Self::Large),
            Self::Large => None,
        }
    }
}

/// The category of a holding, used to address holdings generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingKind {
    /// A rural domain.
    Domain,
    /// A property in a city.
    CityProperty,
    /// A workshop refining raw materials.
    Workshop,
    /// A storage retaining materials between rounds.
    Storage,
    /// A political office.
    Office,
    /// A guild, underworld circle or cult.
    Organization,
    /// A trade enterprise.
    TradeEnterprise,
}

impl HoldingKind {
    /// Short stable prefix used when deriving holding IDs.
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::Domain => "dom",
            Self::CityProperty => "city",
            Self::Workshop => "ws",
            Self::Storage => "sto",
            Self::Office => "off",
            Self::Organization => "org",
            Self::TradeEnterprise => "trade",
        }
    }
}

/// How a city property is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityPropertyMode {
    /// Rented out for gold; no upkeep.
    Leased,
    /// Used by the player's own people for labor; costs upkeep.
    Production,
}

/// What an office yields each round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfficeYieldMode {
    /// Gold at maintenance.
    Gold,
    /// Influence added to the per-round budget at reset.
    Influence,
}

/// Flavor of an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationKind {
    /// Craft or merchant guild; adds labor.
    Guild,
    /// Underworld circle; adds gold.
    Underworld,
    /// Cult; adds extra influence.
    Cult,
}

/// A kind of troop unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TroopKind {
    /// Levied peasants; cheap, no upkeep.
    Militia,
    /// Hired swords; desert first when unpaid.
    Mercenary,
    /// Household guards.
    Guard,
}

/// A kind of specialist retainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialistKind {
    /// Raises total workshop capacity.
    Artisan,
    /// Raises the labor budget.
    Steward,
    /// Improves sale checks.
    Merchant,
    /// Raises the influence budget.
    Chancellor,
}

// ---------------------------------------------------------------------------
// Materials and markets
// ---------------------------------------------------------------------------

/// Whether a material is raw or refined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// Harvested raw material.
    Raw,
    /// Refined special material.
    Special,
}

/// Market group a material belongs to. Market modifiers are keyed by group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialGroup {
    // --- Raw ---
    /// Grain and other crops.
    Grain,
    /// Timber.
    Timber,
    /// Ore.
    Ore,
    /// Livestock.
    Livestock,
    /// Wool and fibres.
    Textiles,

    // --- Special ---
    /// Tools.
    Tools,
    /// Weapons.
    Weapons,
    /// Luxury goods.
    Luxuries,
    /// Finished cloth.
    Cloth,
    /// Preserved provisions.
    Provisions,
}

impl MaterialGroup {
    /// Raw-side groups, in table order.
    pub const RAW: [Self; 5] = [Self::Grain, Self::Timber, Self::Ore, Self::Livestock, Self::Textiles];

    /// Special-side groups, in table order.
    pub const SPECIAL: [Self; 5] =
        [Self::Tools, Self::Weapons, Self::Luxuries, Self::Cloth, Self::Provisions];

    /// Which side of the market this group trades on.
    pub const fn kind(self) -> MaterialKind {
        match self {
            Self::Grain | Self::Timber | Self::Ore | Self::Livestock | Self::Textiles => {
                MaterialKind::Raw
            }
            Self::Tools | Self::Weapons | Self::Luxuries | Self::Cloth | Self::Provisions => {
                MaterialKind::Special
            }
        }
    }
}

/// Demand label attached to a market side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandLevel {
    /// Oversupplied.
    Low,
    /// Ordinary trading.
    Normal,
    /// Above ordinary.
    Elevated,
    /// Strong demand.
    High,
    /// Extreme swings.
    Extreme,
}

// ---------------------------------------------------------------------------
// Actors and errors
// ---------------------------------------------------------------------------

/// Role of the actor submitting a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The game master who owns the campaign.
    Gm,
    /// A player.
    Player,
}

/// Short code classifying a rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Wrong actor or role.
    Auth,
    /// Campaign or player missing or already present, or entity in the wrong state.
    State,
    /// Action attempted outside its phase.
    Phase,
    /// Action budget exhausted or action key already used this round.
    Actions,
    /// Malformed or out-of-range command payload.
    Input,
    /// Not enough gold, labor, influence or materials.
    Resources,
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let code = match self {
            Self::Auth => "AUTH",
            Self::State => "STATE",
            Self::Phase => "PHASE",
            Self::Actions => "ACTIONS",
            Self::Input => "INPUT",
            Self::Resources => "RESOURCES",
        };
        f.write_str(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_cycle_has_no_fixed_points() {
        for phase in Phase::ALL {
            assert_ne!(phase.next(), phase);
        }
        let mut phase = Phase::Maintenance;
        for _ in 0..4 {
            phase = phase.next();
        }
        assert_eq!(phase, Phase::Maintenance);
    }

    #[test]
    fn only_reset_wraps_round() {
        let wrapping: Vec<Phase> = Phase::ALL.into_iter().filter(|p| p.wraps_round()).collect();
        assert_eq!(wrapping, vec![Phase::Reset]);
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(SuccessTier::Fail < SuccessTier::Poor);
        assert!(SuccessTier::Good < SuccessTier::VeryGood);
        assert!(DomainTier::Starter < DomainTier::Large);
        assert_eq!(DomainTier::Starter.lower(), DomainTier::Starter);
        assert_eq!(DomainTier::Large.lower(), DomainTier::Medium);
        assert_eq!(HoldingSize::Large.next(), None);
    }

    #[test]
    fn error_codes_render_upper_case() {
        assert_eq!(ErrorCode::Resources.to_string(), "RESOURCES");
        let json = serde_json::to_string(&ErrorCode::Phase).unwrap_or_default();
        assert_eq!(json, "\"PHASE\"");
    }

    #[test]
    fn material_groups_split_by_side() {
        assert!(MaterialGroup::RAW.iter().all(|g| g.kind() == MaterialKind::Raw));
        assert!(MaterialGroup::SPECIAL.iter().all(|g| g.kind() == MaterialKind::Special));
    }
}
