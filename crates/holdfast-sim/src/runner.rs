//! Campaign driver.
//!
//! [`run_campaign`] creates the configured campaign, seats the players, and
//! plays full rounds: the GM advances into the actions phase, every
//! planner submits its commands, then the GM advances through conversion,
//! reset and into the next maintenance. Rejected commands are logged and
//! skipped; they never stop the run.

use holdfast_engine::planner::Planner;
use holdfast_engine::{
    Actor, DecideContext, HoldfastConfig, InvariantViolation, RuleViolation, apply_event, decide,
};
use holdfast_rules::{Catalog, SeededRng};
use holdfast_types::{CampaignState, Command, Event, PlayerId, UserId};
use tracing::{debug, info, warn};

/// User ID of the driver's GM seat.
pub const GM_USER: &str = "gm";

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A GM command the driver relies on was rejected.
    #[error("GM command rejected: {source}")]
    Rejected {
        /// The underlying violation.
        #[from]
        source: RuleViolation,
    },

    /// The reducer refused an event produced by the engine.
    #[error("event log corrupted: {source}")]
    Invariant {
        /// The underlying invariant violation.
        #[from]
        source: InvariantViolation,
    },

    /// The campaign vanished mid-run.
    #[error("no campaign state")]
    MissingCampaign,
}

/// Outcome of a run.
#[derive(Debug)]
pub struct RunResult {
    /// Final campaign state.
    pub state: CampaignState,
    /// Every event emitted, in order.
    pub log: Vec<Event>,
    /// Player commands accepted.
    pub accepted: u32,
    /// Player commands rejected.
    pub rejected: u32,
}

/// A live campaign: state, log and dice.
struct Session {
    state: Option<CampaignState>,
    log: Vec<Event>,
    rng: SeededRng,
    catalog: Catalog,
}

impl Session {
    /// Decide and fold. The outer error is fatal; the inner one is a
    /// rejected command.
    fn submit(
        &mut self,
        actor: Actor,
        command: &Command,
    ) -> Result<Result<(), RuleViolation>, InvariantViolation> {
        let mut ctx = DecideContext::new(actor, &mut self.rng, &self.catalog);
        let events = match decide(self.state.as_ref(), command, &mut ctx) {
            Ok(events) => events,
            Err(violation) => return Ok(Err(violation)),
        };
        for event in &events {
            self.state = Some(apply_event(self.state.take(), event)?);
        }
        self.log.extend(events);
        Ok(Ok(()))
    }

    fn gm(&mut self, command: &Command) -> Result<(), RunnerError> {
        self.submit(Actor::gm(GM_USER), command)??;
        Ok(())
    }

    fn campaign(&self) -> Result<&CampaignState, RunnerError> {
        self.state.as_ref().ok_or(RunnerError::MissingCampaign)
    }
}

/// Play the configured campaign with one planner per seat.
///
/// `planners` is cycled over the configured players in joining order.
///
/// # Errors
///
/// Returns [`RunnerError`] if a GM command is rejected or the reducer
/// refuses an engine event. Rejected player commands are not errors.
pub fn run_campaign(
    config: &HoldfastConfig,
    planners: &mut [Box<dyn Planner>],
) -> Result<RunResult, RunnerError> {
    let campaign_id = config.campaign.id.clone();
    let mut session = Session {
        state: None,
        log: Vec::new(),
        rng: SeededRng::new(config.campaign.seed),
        catalog: Catalog::standard(),
    };

    session.gm(&Command::CreateCampaign {
        campaign_id: campaign_id.clone(),
        name: config.campaign.name.clone(),
        gm_user_id: UserId::new(GM_USER),
        rules: config.rules.clone(),
    })?;

    for (seat, name) in config.simulation.players.iter().enumerate() {
        let user = format!("user-{}", seat.saturating_add(1));
        let join = Command::JoinCampaign {
            campaign_id: campaign_id.clone(),
            display_name: name.clone(),
        };
        if let Err(violation) = session.submit(Actor::player(user.as_str()), &join)? {
            warn!(user, code = %violation.code, message = %violation.message, "Seat refused");
        }
    }

    let advance = Command::AdvancePhase { campaign_id };
    let mut accepted: u32 = 0;
    let mut rejected: u32 = 0;
    for _ in 0..config.simulation.rounds {
        session.gm(&advance)?;
        let campaign = session.campaign()?.clone();
        let round = campaign.round;

        for (seat, player) in campaign.players.values().enumerate() {
            let Some(planner) = seat.checked_rem(planners.len()).and_then(|slot| planners.get_mut(slot))
            else {
                break;
            };
            for command in planner.plan(&campaign, player, round) {
                match session.submit(Actor::player(player.user_id.clone()), &command)? {
                    Ok(()) => accepted = accepted.saturating_add(1),
                    Err(violation) => {
                        rejected = rejected.saturating_add(1);
                        debug!(
                            round,
                            player_id = %player.id,
                            command = command.name(),
                            code = %violation.code,
                            message = %violation.message,
                            "Planned command rejected"
                        );
                    }
                }
            }
        }

        for _ in 0..3 {
            session.gm(&advance)?;
        }
        log_round_summary(session.campaign()?, round);
    }

    let state = session.state.ok_or(RunnerError::MissingCampaign)?;
    Ok(RunResult { state, log: session.log, accepted, rejected })
}

/// Log one line per player after a round completes.
fn log_round_summary(campaign: &CampaignState, round: u32) {
    for player in campaign.players.values() {
        let holdings = &player.holdings;
        info!(
            round,
            player_id = %player.id,
            name = %player.display_name,
            gold = player.economy.gold,
            pending = player.economy.pending.gold,
            domains = holdings.domains.len(),
            workshops = holdings.workshops.len(),
            "Round summary"
        );
    }
}

/// Log the end of a run.
pub fn log_run_end(result: &RunResult) {
    let leader: Option<&PlayerId> = result
        .state
        .players
        .values()
        .max_by_key(|p| p.economy.gold)
        .map(|p| &p.id);
    info!(
        round = result.state.round,
        events = result.log.len(),
        accepted = result.accepted,
        rejected = result.rejected,
        leader = leader.map(PlayerId::as_str),
        "Campaign run ended"
    );
    if result.accepted == 0 {
        warn!("No player command was accepted");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::steady::SteadyPlanner;
    use holdfast_engine::planner::IdlePlanner;

    fn config(rounds: u32) -> HoldfastConfig {
        let mut config = HoldfastConfig::default();
        config.simulation.rounds = rounds;
        config
    }

    #[test]
    fn idle_players_still_advance_rounds() {
        let mut planners: Vec<Box<dyn Planner>> = vec![Box::new(IdlePlanner)];
        let result = run_campaign(&config(3), &mut planners).unwrap();
        assert_eq!(result.state.round, 4);
        assert_eq!(result.accepted, 0);
        assert_eq!(result.state.players.len(), 2);
    }

    #[test]
    fn steady_planner_gets_commands_accepted() {
        let mut planners: Vec<Box<dyn Planner>> = vec![Box::new(SteadyPlanner)];
        let result = run_campaign(&config(4), &mut planners).unwrap();
        assert!(result.accepted > 0);
    }

    #[test]
    fn runs_are_reproducible() {
        let run = || {
            let mut planners: Vec<Box<dyn Planner>> = vec![Box::new(SteadyPlanner)];
            run_campaign(&config(3), &mut planners).unwrap()
        };
        assert_eq!(run().state, run().state);
    }
}
