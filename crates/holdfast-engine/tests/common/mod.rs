//! Shared harness for engine integration tests.
//!
//! A [`Table`] holds one campaign, its event log and its seeded dice, and
//! submits commands the way a host would: decide, then fold the events.

#![allow(clippy::unwrap_used, dead_code)]

use holdfast_engine::{Actor, DecideContext, RuleViolation, apply_event, decide};
use holdfast_rules::{Catalog, SeededRng};
use holdfast_types::{
    CampaignId, CampaignState, Command, Event, PlayerId, PlayerState, RulesConfig, UserId,
};

/// Campaign ID used by every harness table.
pub const CAMPAIGN: &str = "vale";

/// GM user of every harness table.
pub const GM: &str = "gm";

pub struct Table {
    pub state: Option<CampaignState>,
    pub log: Vec<Event>,
    pub rng: SeededRng,
    pub catalog: Catalog,
}

impl Table {
    pub fn new(seed: u32) -> Self {
        Self { state: None, log: Vec::new(), rng: SeededRng::new(seed), catalog: Catalog::standard() }
    }

    /// A created campaign with default rules.
    pub fn created(seed: u32) -> Self {
        let mut table = Self::new(seed);
        table.submit(Actor::gm(GM), &create(RulesConfig::default())).unwrap();
        table
    }

    /// Decide and, on success, apply every event.
    pub fn submit(&mut self, actor: Actor, command: &Command) -> Result<Vec<Event>, RuleViolation> {
        let mut ctx = DecideContext::new(actor, &mut self.rng, &self.catalog);
        let events = decide(self.state.as_ref(), command, &mut ctx)?;
        for event in &events {
            self.state = Some(apply_event(self.state.take(), event).unwrap());
        }
        self.log.extend(events.iter().cloned());
        Ok(events)
    }

    pub fn join(&mut self, user: &str, name: &str) {
        let command = Command::JoinCampaign {
            campaign_id: campaign_id(),
            display_name: name.to_owned(),
        };
        self.submit(Actor::player(user), &command).unwrap();
    }

    pub fn advance(&mut self) {
        self.submit(Actor::gm(GM), &Command::AdvancePhase { campaign_id: campaign_id() })
            .unwrap();
    }

    pub fn campaign(&self) -> &CampaignState {
        self.state.as_ref().unwrap()
    }

    pub fn player(&self, n: usize) -> &PlayerState {
        self.campaign().player(&PlayerId::new(format!("player-{n}"))).unwrap()
    }
}

pub fn campaign_id() -> CampaignId {
    CampaignId::new(CAMPAIGN)
}

pub fn create(rules: RulesConfig) -> Command {
    Command::CreateCampaign {
        campaign_id: campaign_id(),
        name: "The Vale".to_owned(),
        gm_user_id: UserId::new(GM),
        rules,
    }
}
