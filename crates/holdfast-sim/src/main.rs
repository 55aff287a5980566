//! Headless driver for Holdfast campaigns.
//!
//! Plays a campaign end to end with scripted planners so the engine can
//! be exercised without a host.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `holdfast-config.yaml` (or the path given
//!    as the first argument)
//! 2. Initialize structured logging (tracing)
//! 3. Create the campaign and seat the configured players
//! 4. Play the configured number of rounds
//! 5. Log the result

mod runner;
mod steady;

use std::path::{Path, PathBuf};

use anyhow::Context;
use holdfast_engine::HoldfastConfig;
use holdfast_engine::config::LogFormat;
use holdfast_engine::planner::Planner;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::steady::SteadyPlanner;

const DEFAULT_CONFIG: &str = "holdfast-config.yaml";

fn main() -> anyhow::Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    let (config, from_file) = load_config(&path)?;

    init_tracing(&config);
    if !from_file {
        info!(path = %path.display(), "Config file not found, using defaults");
    }
    info!(
        campaign_id = %config.campaign.id,
        name = config.campaign.name,
        seed = config.campaign.seed,
        rounds = config.simulation.rounds,
        players = config.simulation.players.len(),
        "Configuration loaded"
    );

    let mut planners: Vec<Box<dyn Planner>> = vec![Box::new(SteadyPlanner)];
    let result = runner::run_campaign(&config, &mut planners).context("campaign run failed")?;
    runner::log_run_end(&result);
    Ok(())
}

/// Load configuration, falling back to defaults when the file is absent.
///
/// The flag reports whether the file was read.
fn load_config(path: &Path) -> anyhow::Result<(HoldfastConfig, bool)> {
    if path.exists() {
        let config = HoldfastConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?;
        Ok((config, true))
    } else {
        Ok((HoldfastConfig::parse("")?, false))
    }
}

fn init_tracing(config: &HoldfastConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    match config.logging.format {
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().json().with_env_filter(filter).with_target(true).init();
        }
    }
}
