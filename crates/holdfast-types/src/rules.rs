//! Campaign rule configuration.
//!
//! A [`RulesConfig`] is fixed at campaign creation and stored in the
//! campaign state, so replaying a log never depends on ambient settings.
//! Every field is defaulted so a YAML file only needs to list overrides.

use serde::{Deserialize, Serialize};

use crate::enums::HoldingSize;
use crate::ids::{MarketId, MaterialId};
use crate::state::CheckModifiers;

/// Tunable rules of one campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Action slots each player may spend per round.
    #[serde(default = "default_actions_per_round")]
    pub actions_per_round: u32,

    /// Labor budget every player has before holdings.
    #[serde(default = "default_base_labor")]
    pub base_labor: u32,

    /// Influence budget every player has before holdings.
    #[serde(default = "default_base_influence")]
    pub base_influence: u32,

    /// Multiplier applied to the base capacity of every storage.
    #[serde(default = "default_storage_capacity_multiplier")]
    pub storage_capacity_multiplier: u32,

    /// Raw units auto-converted into one gold at the conversion phase.
    #[serde(default = "default_raw_per_gold")]
    pub raw_per_gold: u32,

    /// Special units auto-converted into one gold at the conversion phase.
    #[serde(default = "default_special_per_gold")]
    pub special_per_gold: u32,

    /// Raw units a workshop consumes per special unit produced.
    #[serde(default = "default_raw_per_special")]
    pub raw_per_special: u32,

    /// Labor budget fed by one raw unit of workforce upkeep.
    #[serde(default = "default_labor_per_workforce_raw")]
    pub labor_per_workforce_raw: u32,

    /// Rounds per market section. Markets are re-rolled at each section start.
    #[serde(default = "default_market_section_length")]
    pub market_section_length: u32,

    /// Rounds per event section.
    #[serde(default = "default_event_section_length")]
    pub event_section_length: u32,

    /// Round the first event section starts.
    #[serde(default = "default_first_event_round")]
    pub first_event_round: u32,

    /// Events drawn at each event section start.
    #[serde(default = "default_events_per_section")]
    pub events_per_section: u32,

    /// Market venues rolled at each market section start, in roll order.
    #[serde(default = "default_markets")]
    pub markets: Vec<MarketConfig>,

    /// What a newly joined player starts with.
    #[serde(default)]
    pub starting: StartingConfig,
}

/// One configured market venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Venue identifier.
    pub id: MarketId,
    /// Display name.
    pub name: String,
    /// Whether trading here needs at least one trade enterprise.
    #[serde(default)]
    pub requires_trade_enterprise: bool,
}

/// Starting assets of a newly joined player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingConfig {
    /// Starting gold.
    #[serde(default = "default_starting_gold")]
    pub gold: u32,

    /// Raw material produced by the starter domain.
    #[serde(default = "default_starting_domain_raw")]
    pub domain_raw: MaterialId,

    /// Size of the leased city property every player starts with, if any.
    #[serde(default = "default_starting_city_property")]
    pub city_property: Option<HoldingSize>,

    /// Check modifiers of every new player.
    #[serde(default = "default_check_modifiers")]
    pub check_modifiers: CheckModifiers,
}

/// A rules value that cannot drive a campaign.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesConfigError {
    /// A field that must be at least 1 is zero.
    #[error("rules field `{field}` must be at least 1")]
    Zero {
        /// Offending field.
        field: &'static str,
    },

    /// Two markets share an identifier.
    #[error("duplicate market id `{id}`")]
    DuplicateMarket {
        /// Duplicated identifier.
        id: MarketId,
    },
}

impl RulesConfig {
    /// Reject values that would make the engine divide by zero or stall.
    pub fn validate(&self) -> Result<(), RulesConfigError> {
        let positive = [
            ("actions_per_round", self.actions_per_round),
            ("raw_per_gold", self.raw_per_gold),
            ("special_per_gold", self.special_per_gold),
            ("raw_per_special", self.raw_per_special),
            ("labor_per_workforce_raw", self.labor_per_workforce_raw),
            ("market_section_length", self.market_section_length),
            ("event_section_length", self.event_section_length),
            ("first_event_round", self.first_event_round),
        ];
        if let Some(&(field, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(RulesConfigError::Zero { field });
        }

        let mut seen: Vec<&MarketId> = Vec::with_capacity(self.markets.len());
        for market in &self.markets {
            if seen.contains(&&market.id) {
                return Err(RulesConfigError::DuplicateMarket { id: market.id.clone() });
            }
            seen.push(&market.id);
        }
        Ok(())
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            actions_per_round: default_actions_per_round(),
            base_labor: default_base_labor(),
            base_influence: default_base_influence(),
            storage_capacity_multiplier: default_storage_capacity_multiplier(),
            raw_per_gold: default_raw_per_gold(),
            special_per_gold: default_special_per_gold(),
            raw_per_special: default_raw_per_special(),
            labor_per_workforce_raw: default_labor_per_workforce_raw(),
            market_section_length: default_market_section_length(),
            event_section_length: default_event_section_length(),
            first_event_round: default_first_event_round(),
            events_per_section: default_events_per_section(),
            markets: default_markets(),
            starting: StartingConfig::default(),
        }
    }
}

impl Default for StartingConfig {
    fn default() -> Self {
        Self {
            gold: default_starting_gold(),
            domain_raw: default_starting_domain_raw(),
            city_property: default_starting_city_property(),
            check_modifiers: default_check_modifiers(),
        }
    }
}

const fn default_actions_per_round() -> u32 {
    2
}
const fn default_base_labor() -> u32 {
    3
}
const fn default_base_influence() -> u32 {
    1
}
const fn default_storage_capacity_multiplier() -> u32 {
    2
}
const fn default_raw_per_gold() -> u32 {
    4
}
const fn default_special_per_gold() -> u32 {
    1
}
const fn default_raw_per_special() -> u32 {
    2
}
const fn default_labor_per_workforce_raw() -> u32 {
    4
}
const fn default_market_section_length() -> u32 {
    1
}
const fn default_event_section_length() -> u32 {
    4
}
const fn default_first_event_round() -> u32 {
    2
}
const fn default_events_per_section() -> u32 {
    2
}
fn default_markets() -> Vec<MarketConfig> {
    vec![
        MarketConfig {
            id: MarketId::new("local"),
            name: "Local market".to_owned(),
            requires_trade_enterprise: false,
        },
        MarketConfig {
            id: MarketId::new("overseas"),
            name: "Overseas market".to_owned(),
            requires_trade_enterprise: true,
        },
    ]
}
const fn default_starting_gold() -> u32 {
    4
}
fn default_starting_domain_raw() -> MaterialId {
    MaterialId::new("raw.grain")
}
const fn default_starting_city_property() -> Option<HoldingSize> {
    Some(HoldingSize::Small)
}
const fn default_check_modifiers() -> CheckModifiers {
    CheckModifiers { influence: 3, money: 3, materials: 3 }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let rules = RulesConfig::default();
        assert!(rules.validate().is_ok());
        assert_eq!(rules.actions_per_round, 2);
        assert_eq!(rules.markets.len(), 2);
        assert!(rules.markets.iter().any(|m| m.requires_trade_enterprise));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let rules: RulesConfig = serde_json::from_str(r#"{"actions_per_round": 3}"#).unwrap();
        assert_eq!(rules.actions_per_round, 3);
        assert_eq!(rules.base_labor, 3);
        assert_eq!(rules.starting.gold, 4);
    }

    #[test]
    fn zero_divisor_is_rejected() {
        let rules = RulesConfig { raw_per_gold: 0, ..RulesConfig::default() };
        assert_eq!(rules.validate(), Err(RulesConfigError::Zero { field: "raw_per_gold" }));
    }

    #[test]
    fn duplicate_markets_are_rejected() {
        let mut rules = RulesConfig::default();
        let first = rules.markets.first().cloned().unwrap();
        rules.markets.push(first);
        assert!(matches!(rules.validate(), Err(RulesConfigError::DuplicateMarket { .. })));
    }
}
