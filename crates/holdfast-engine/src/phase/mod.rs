//! Phase state machine.
//!
//! A round runs `maintenance -> actions -> conversion -> reset`, and leaving
//! reset starts the next round at maintenance. Each transition resolves its
//! bulk economics for every player, in player ID order, and emits one report
//! event per player followed by `PhaseAdvanced` and a public log line.
//!
//! # Submodules
//!
//! - [`maintenance`] -- Upkeep, production, raids and workforce upkeep.
//! - [`conversion`] -- Workshop refining, storage retention, auto-sale.
//! - [`reset`] -- Per-round labor and influence budgets. Reset grants the
//!   nominal budgets; maintenance applies the deltas of the events active
//!   in the new round.
//!
//! RNG draws happen only when leaving maintenance: section events first
//! (each row followed by its sub-rolls), then every configured market, raw
//! side before special side. Bulk resolution itself never draws.

pub mod conversion;
pub mod maintenance;
pub mod reset;

use holdfast_rules::EventModifiers;
use holdfast_rules::market::{is_market_section_start, roll_market};
use holdfast_rules::section_events::{draw_section_events, is_event_section_start};
use holdfast_types::{CampaignState, Event, EventPayload, Phase};
use tracing::{debug, info};

use crate::actions::log_entry;
use crate::context::DecideContext;

/// Resolve the transition out of the campaign's current phase.
///
/// Authorization is checked by the caller. The transition itself cannot
/// fail; every shortfall degrades gracefully instead.
pub fn advance(campaign: &CampaignState, ctx: &mut DecideContext<'_>) -> Vec<Event> {
    let from = campaign.phase;
    let to = from.next();
    let round = if from.wraps_round() { campaign.round.saturating_add(1) } else { campaign.round };

    info!(round = campaign.round, from = %from, to = %to, "Phase transition started");

    let mut events = match from {
        Phase::Maintenance => leave_maintenance(campaign, ctx),
        Phase::Actions => leave_actions(campaign, ctx),
        Phase::Conversion => leave_conversion(campaign, ctx),
        Phase::Reset => Vec::new(),
    };

    events.push(Event::public(EventPayload::PhaseAdvanced { from, to, round }));
    let message = if from.wraps_round() {
        format!("Round {round} begins")
    } else {
        format!("Round {round}: {to} phase begins")
    };
    events.push(log_entry(campaign, message));

    info!(round, phase = %to, events = events.len(), "Phase transition completed");
    events
}

fn leave_maintenance(campaign: &CampaignState, ctx: &mut DecideContext<'_>) -> Vec<Event> {
    let rules = &campaign.rules;
    let round = campaign.round;
    let mut events = Vec::new();

    let drawn = if is_event_section_start(rules, round) {
        let drawn = draw_section_events(rules, round, &mut *ctx.rng);
        info!(round, drawn = drawn.len(), "Section events rolled");
        events.push(Event::public(EventPayload::SectionEventsRolled {
            section_start: round,
            events: drawn.clone(),
        }));
        drawn
    } else {
        Vec::new()
    };

    if is_market_section_start(rules, round) {
        for config in &rules.markets {
            let market = roll_market(config, round, &mut *ctx.rng);
            events.push(Event::public(EventPayload::MarketRolled { market }));
        }
        info!(round, markets = rules.markets.len(), "Markets rolled");
    }

    let mods = EventModifiers::active(campaign.global_events.iter().chain(drawn.iter()), round);
    for player in campaign.players.values() {
        let report = maintenance::resolve(player, round, rules, &mods, ctx.catalog);
        debug!(
            round,
            player_id = %player.id,
            upkeep_gold = report.upkeep_gold,
            gold_produced = report.gold_produced,
            degraded = report.degraded_domain_ids.len(),
            "Maintenance resolved"
        );
        events.push(Event::private(player.id.clone(), EventPayload::PlayerMaintenanceResolved {
            player_id: player.id.clone(),
            report: Box::new(report),
        }));
    }
    events
}

fn leave_actions(campaign: &CampaignState, ctx: &DecideContext<'_>) -> Vec<Event> {
    let mods = EventModifiers::active(&campaign.global_events, campaign.round);
    let mut events = Vec::new();
    for player in campaign.players.values() {
        let economy = &player.economy;
        if economy.raw_total() == 0 && economy.special_total() == 0 {
            continue;
        }
        let report = conversion::resolve(player, &campaign.rules, &mods, ctx.catalog);
        debug!(
            round = campaign.round,
            player_id = %player.id,
            gold_gained = report.gold_gained,
            raw_lost = report.raw_lost,
            special_lost = report.special_lost,
            "Conversion resolved"
        );
        events.push(Event::private(player.id.clone(), EventPayload::PlayerConversionResolved {
            player_id: player.id.clone(),
            report,
        }));
    }
    events
}

fn leave_conversion(campaign: &CampaignState, ctx: &DecideContext<'_>) -> Vec<Event> {
    let mods = EventModifiers::default();
    campaign
        .players
        .values()
        .map(|player| {
            let budgets = reset::budgets(&player.holdings, &campaign.rules, &mods, ctx.catalog);
            debug!(
                round = campaign.round,
                player_id = %player.id,
                labor = budgets.labor,
                influence = budgets.influence,
                "Turn reset"
            );
            Event::private(player.id.clone(), EventPayload::PlayerTurnReset {
                player_id: player.id.clone(),
                labor_available: budgets.labor,
                influence_available: budgets.influence,
            })
        })
        .collect()
}
