//! Contract for whatever decides a player's moves.
//!
//! A planner sees state read-only and answers with commands. It never
//! builds events: every command it returns still goes through
//! [`crate::decide`], so a planner cannot bend the rules.

use holdfast_types::{CampaignState, Command, PlayerState};

/// Chooses the commands one player submits during the actions phase.
pub trait Planner {
    /// Commands to submit for `player` in `round`, in submission order.
    ///
    /// Commands that get rejected are skipped by the driver; the planner
    /// is not asked again within the same round.
    fn plan(&mut self, campaign: &CampaignState, player: &PlayerState, round: u32) -> Vec<Command>;
}

/// A planner that never acts.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePlanner;

impl Planner for IdlePlanner {
    fn plan(&mut self, _: &CampaignState, _: &PlayerState, _: u32) -> Vec<Command> {
        Vec::new()
    }
}
