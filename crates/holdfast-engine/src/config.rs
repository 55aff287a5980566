//! Configuration loading and typed config structures for Holdfast.
//!
//! The canonical configuration lives in `holdfast-config.yaml` at the
//! project root. Every field is defaulted, so a file only lists overrides
//! and an empty document is a valid configuration.

use std::path::Path;

use holdfast_types::{CampaignId, RulesConfig};
use serde::Deserialize;

/// Environment variable overriding `campaign.seed`.
pub const SEED_ENV: &str = "HOLDFAST_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `holdfast-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HoldfastConfig {
    /// The campaign to run.
    #[serde(default)]
    pub campaign: CampaignConfig,

    /// Rules fixed at campaign creation.
    #[serde(default)]
    pub rules: RulesConfig,

    /// Headless driver settings.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HoldfastConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `HOLDFAST_SEED` overrides `campaign.seed` when it parses as a
    /// number.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.campaign.apply_env_overrides();
        Ok(config)
    }
}

/// The campaign to create.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CampaignConfig {
    /// Campaign identifier.
    #[serde(default = "default_campaign_id")]
    pub id: CampaignId,

    /// Display name.
    #[serde(default = "default_campaign_name")]
    pub name: String,

    /// Seed of the campaign's dice stream.
    #[serde(default = "default_seed")]
    pub seed: u32,
}

impl CampaignConfig {
    /// Apply `HOLDFAST_SEED`, ignoring values that do not parse.
    pub fn apply_env_overrides(&mut self) {
        if let Some(seed) = std::env::var(SEED_ENV).ok().and_then(|v| v.trim().parse().ok()) {
            self.seed = seed;
        }
    }
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self { id: default_campaign_id(), name: default_campaign_name(), seed: default_seed() }
    }
}

/// Headless driver settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Full rounds to play.
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// Display names of the seated players, in joining order.
    #[serde(default = "default_players")]
    pub players: Vec<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { rounds: default_rounds(), players: default_players() }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: LogFormat::default() }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

fn default_campaign_id() -> CampaignId {
    CampaignId::new("holdfast")
}
fn default_campaign_name() -> String {
    "Holdfast".to_owned()
}
const fn default_seed() -> u32 {
    123
}
const fn default_rounds() -> u32 {
    8
}
fn default_players() -> Vec<String> {
    vec!["Aldric".to_owned(), "Berenike".to_owned()]
}
fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = HoldfastConfig::default();
        assert_eq!(config.simulation.rounds, 8);
        assert_eq!(config.simulation.players.len(), 2);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.rules.validate().is_ok());
    }

    #[test]
    fn parse_overrides_nested_rules() {
        let yaml = r#"
campaign:
  id: "vale"
  name: "The Vale"
rules:
  actions_per_round: 3
  starting:
    gold: 10
    city_property: null
simulation:
  rounds: 2
  players: ["Ysolde"]
logging:
  level: "debug"
  format: "json"
"#;
        let config = HoldfastConfig::parse(yaml).unwrap();
        assert_eq!(config.campaign.id, CampaignId::new("vale"));
        assert_eq!(config.rules.actions_per_round, 3);
        assert_eq!(config.rules.raw_per_gold, 4);
        assert_eq!(config.rules.starting.gold, 10);
        assert_eq!(config.rules.starting.city_property, None);
        assert_eq!(config.simulation.players, vec!["Ysolde".to_owned()]);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = HoldfastConfig::parse("").unwrap();
        assert_eq!(config.rules, RulesConfig::default());
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = HoldfastConfig::parse("rules: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = HoldfastConfig::from_file(Path::new("/nonexistent/holdfast-config.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
