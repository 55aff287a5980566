//! Shared setup for the action handler tests.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use holdfast_rules::{Catalog, GameRng, SeededRng};
use holdfast_types::{
    CampaignId, CampaignState, CheckModifiers, CityProperty, CityPropertyMode, Command, DemandLevel,
    Domain, DomainTier, Economy, Event, EventPayload, HoldingId, HoldingSize, Holdings, MarketId,
    MarketInstance, MarketSide, MaterialGroup, MaterialId, Phase, PlayerId, PlayerState,
    RulesConfig, TurnState, UserId,
};

use super::Acting;
use crate::context::{Actor, DecideContext};
use crate::decide;
use crate::error::RuleViolation;
use crate::reducer::reduce_events;

pub const GM: &str = "gm";
pub const USER: &str = "u1";

/// Dice that always land on one face, clamped to the die.
#[derive(Debug, Clone, Copy)]
pub struct Loaded(pub i64);

impl GameRng for Loaded {
    fn next_int_inclusive(&mut self, min: i64, max: i64) -> i64 {
        if max < min { min } else { self.0.clamp(min, max) }
    }
}

pub fn campaign_id() -> CampaignId {
    CampaignId::new("c1")
}

pub fn player_id() -> PlayerId {
    PlayerId::new("player-1")
}

pub fn local() -> MarketId {
    MarketId::new("local")
}

pub fn grain() -> MaterialId {
    MaterialId::new("raw.grain")
}

/// A market with every group at its base price.
pub fn neutral_market() -> MarketInstance {
    let side = |table_roll: u32| MarketSide {
        table_roll,
        category: "Calm market".to_owned(),
        demand: DemandLevel::Normal,
        modifiers: BTreeMap::new(),
    };
    MarketInstance {
        id: local(),
        requires_trade_enterprise: false,
        rolled_round: 1,
        raw: side(7),
        special: side(7),
    }
}

/// Round one, actions phase, one seat holding the starting assets.
pub fn campaign() -> CampaignState {
    let player = PlayerState {
        id: player_id(),
        user_id: UserId::new(USER),
        display_name: "Aldric".to_owned(),
        check_modifiers: CheckModifiers::default(),
        holdings: Holdings {
            domains: vec![Domain {
                id: HoldingId::new("dom-1"),
                tier: DomainTier::Starter,
                primary_raw: grain(),
                tenants: 0,
                facilities: Vec::new(),
            }],
            city_properties: vec![CityProperty {
                id: HoldingId::new("city-2"),
                size: HoldingSize::Small,
                mode: CityPropertyMode::Leased,
                facilities: Vec::new(),
            }],
            next_seq: 2,
            ..Holdings::default()
        },
        economy: Economy { gold: 4, ..Economy::default() },
        turn: TurnState { labor_available: 5, influence_available: 1, ..TurnState::default() },
    };
    let mut players = BTreeMap::new();
    players.insert(player.id.clone(), player);
    CampaignState {
        id: campaign_id(),
        name: "Vale".to_owned(),
        rules: RulesConfig::default(),
        round: 1,
        phase: Phase::Actions,
        gm_user_id: UserId::new(GM),
        markets: vec![neutral_market()],
        global_events: Vec::new(),
        players,
    }
}

pub fn player(campaign: &CampaignState) -> &PlayerState {
    campaign.player(&player_id()).unwrap()
}

pub fn player_mut(campaign: &mut CampaignState) -> &mut PlayerState {
    campaign.players.get_mut(&player_id()).unwrap()
}

/// Set one group's price modifier at the local market.
pub fn set_modifier(campaign: &mut CampaignState, group: MaterialGroup, modifier: i32) {
    let market = campaign.markets.iter_mut().find(|m| m.id == local()).unwrap();
    let side = match group.kind() {
        holdfast_types::MaterialKind::Raw => &mut market.raw,
        holdfast_types::MaterialKind::Special => &mut market.special,
    };
    side.modifiers.insert(group, modifier);
}

/// Run a handler for the seated player with every die showing `face`.
pub fn act<F>(campaign: &CampaignState, face: i64, handler: F) -> Result<Vec<Event>, RuleViolation>
where
    F: FnOnce(&Acting<'_>, &mut DecideContext<'_>) -> Result<Vec<Event>, RuleViolation>,
{
    let catalog = Catalog::standard();
    let mut dice = Loaded(face);
    let mut ctx = DecideContext::new(Actor::player(USER), &mut dice, &catalog);
    let acting = Acting::begin(Some(campaign), &campaign_id(), &ctx.actor)?;
    handler(&acting, &mut ctx)
}

/// Submit a command through the full decision path.
pub fn submit(campaign: &CampaignState, command: &Command, actor: Actor) -> Vec<Event> {
    let catalog = Catalog::standard();
    let mut rng = SeededRng::new(11);
    let mut ctx = DecideContext::new(actor, &mut rng, &catalog);
    decide(Some(campaign), command, &mut ctx).unwrap()
}

/// Advance one phase as the GM.
pub fn advance(campaign: &CampaignState) -> CampaignState {
    let command = Command::AdvancePhase { campaign_id: campaign_id() };
    let events = submit(campaign, &command, Actor::gm(GM));
    apply(campaign, &events)
}

pub fn apply(campaign: &CampaignState, events: &[Event]) -> CampaignState {
    reduce_events(Some(campaign.clone()), events).unwrap().unwrap()
}

/// The payload of the handler's first event.
pub const fn first(events: &[Event]) -> &EventPayload {
    &events.first().unwrap().payload
}
