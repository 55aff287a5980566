//! Command validation and event emission.
//!
//! [`decide`] is the only way commands become events. It reads state and
//! never changes it, so callers may run it speculatively and discard the
//! result. Every command is checked in a fixed order: authorization, phase,
//! input, resources, action slots, and only then dice.

use holdfast_rules::EventModifiers;
use holdfast_types::{
    CampaignId, CampaignState, CityProperty, CityPropertyMode, Command, Domain, DomainTier,
    Economy, Event, EventPayload, HoldingId, Holdings, MaterialKind, Phase, PlayerId, Role,
    RulesConfig, TurnState, UserId,
};
use tracing::debug;

use crate::actions::{
    Acting, acquisitions, building, checks, log_entry, require_campaign, require_player, trade,
};
use crate::context::DecideContext;
use crate::error::RuleViolation;
use crate::phase;
use crate::phase::reset;

/// Longest display name, in characters.
pub const MAX_DISPLAY_NAME: usize = 40;

/// Longest private note, in characters.
pub const MAX_NOTE: usize = 500;

/// Validate `command` against `state` and produce the events it causes.
///
/// # Errors
///
/// Returns a [`RuleViolation`] when the command is rejected. A rejected
/// command produces no events and draws nothing from the RNG.
pub fn decide(
    state: Option<&CampaignState>,
    command: &Command,
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let result = dispatch(state, command, ctx);
    match &result {
        Ok(events) => {
            debug!(command = command.name(), events = events.len(), "Command accepted");
        }
        Err(violation) => {
            debug!(command = command.name(), code = %violation.code, "Command rejected");
        }
    }
    result
}

fn dispatch(
    state: Option<&CampaignState>,
    command: &Command,
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    match command {
        Command::CreateCampaign { campaign_id, name, gm_user_id, rules } => {
            create_campaign(state, campaign_id, name, gm_user_id, rules, ctx)
        }
        Command::AdvancePhase { campaign_id } => {
            let campaign = require_campaign(state, campaign_id)?;
            require_gm(campaign, ctx)?;
            Ok(phase::advance(campaign, ctx))
        }
        Command::JoinCampaign { campaign_id, display_name } => {
            join_campaign(state, campaign_id, display_name, ctx)
        }
        Command::AddPrivateNote { campaign_id, text } => {
            add_private_note(state, campaign_id, text, ctx)
        }
        _ => {
            let acting = Acting::begin(state, command.campaign_id(), &ctx.actor)?;
            act(&acting, command, ctx)
        }
    }
}

/// Route an actions-phase command to its handler.
fn act(
    acting: &Acting<'_>,
    command: &Command,
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    match command {
        Command::GatherMaterials { investments, .. } => checks::gather(acting, *investments, ctx),
        Command::GainInfluence { investments, .. } => {
            checks::gain_influence(acting, *investments, ctx)
        }
        Command::LendMoney { investments, .. } => checks::lend_money(acting, *investments, ctx),
        Command::SellMaterials { market_id, items, .. } => {
            trade::sell(acting, market_id, items, ctx)
        }
        Command::BuyMaterials { market_id, material_id, lots, .. } => {
            trade::buy(acting, market_id, material_id, *lots, ctx)
        }
        Command::SellBuy { market_id, items, buy_material_id, buy_lots, .. } => {
            trade::sell_buy(acting, market_id, items, buy_material_id, *buy_lots, ctx)
        }
        Command::AcquireOffice { size, .. } => acquisitions::acquire_office(acting, *size, ctx),
        Command::AcquireDomain { tier, primary_raw, .. } => {
            acquisitions::acquire_domain(acting, *tier, primary_raw, ctx)
        }
        Command::AcquireCityProperty { size, .. } => {
            acquisitions::acquire_city_property(acting, *size, ctx)
        }
        Command::AcquireWorkshop { size, .. } => acquisitions::acquire_workshop(acting, *size, ctx),
        Command::AcquireStorage { size, .. } => acquisitions::acquire_storage(acting, *size, ctx),
        Command::AcquireTradeEnterprise { size, .. } => {
            acquisitions::acquire_trade_enterprise(acting, *size, ctx)
        }
        Command::AcquireOrganization { kind, size, .. } => {
            acquisitions::acquire_organization(acting, *kind, *size, ctx)
        }
        Command::AcquireTenants { domain_id, count, .. } => {
            acquisitions::acquire_tenants(acting, domain_id, *count)
        }
        Command::RecruitTroops { kind, count, .. } => {
            acquisitions::recruit_troops(acting, *kind, *count)
        }
        Command::HireSpecialist { kind, .. } => acquisitions::hire_specialist(acting, *kind),
        Command::Upgrade { target, .. } => acquisitions::upgrade(acting, target),
        Command::BuildFacility { host, facility_key, .. } => {
            building::build_facility(acting, host, facility_key, ctx)
        }
        Command::SetCityPropertyMode { property_id, mode, .. } => {
            building::set_city_property_mode(acting, property_id, *mode)
        }
        Command::SetOfficeYieldMode { office_id, mode, .. } => {
            building::set_office_yield_mode(acting, office_id, *mode)
        }
        Command::CreateCampaign { .. }
        | Command::AdvancePhase { .. }
        | Command::JoinCampaign { .. }
        | Command::AddPrivateNote { .. } => {
            Err(RuleViolation::state(format!("`{}` is not a player action", command.name())))
        }
    }
}

/// Require the actor to be the campaign's GM.
fn require_gm(campaign: &CampaignState, ctx: &DecideContext<'_>) -> Result<(), RuleViolation> {
    let actor = &ctx.actor;
    if actor.role != Role::Gm || actor.user_id != campaign.gm_user_id {
        return Err(RuleViolation::auth(format!(
            "only the GM of `{}` may do that",
            campaign.id
        )));
    }
    Ok(())
}

fn create_campaign(
    state: Option<&CampaignState>,
    campaign_id: &CampaignId,
    name: &str,
    gm_user_id: &UserId,
    rules: &RulesConfig,
    ctx: &DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    if let Some(existing) = state {
        return Err(RuleViolation::state(format!("campaign `{}` already exists", existing.id)));
    }
    if ctx.actor.role != Role::Gm || &ctx.actor.user_id != gm_user_id {
        return Err(RuleViolation::auth("only a GM may create a campaign for themselves"));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(RuleViolation::input("campaign name must not be empty"));
    }
    rules.validate().map_err(|e| RuleViolation::input(e.to_string()))?;
    let starting_raw = &rules.starting.domain_raw;
    let is_raw = ctx.catalog.material(starting_raw).is_some_and(|m| m.kind == MaterialKind::Raw);
    if !is_raw {
        return Err(RuleViolation::input(format!(
            "starting domain material `{starting_raw}` is not a raw material"
        )));
    }

    Ok(vec![
        Event::public(EventPayload::CampaignCreated {
            campaign_id: campaign_id.clone(),
            name: name.to_owned(),
            gm_user_id: gm_user_id.clone(),
            rules: rules.clone(),
        }),
        Event::public(EventPayload::PublicLogEntryAdded {
            round: 1,
            phase: Phase::Maintenance,
            message: format!("Campaign {name} founded"),
        }),
    ])
}

/// Starting holdings: a starter domain and, when configured, a leased city
/// property. IDs are derived from the holding counter like any later one.
fn starting_holdings(rules: &RulesConfig) -> Holdings {
    let mut holdings = Holdings {
        domains: vec![Domain {
            id: HoldingId::new("dom-1"),
            tier: DomainTier::Starter,
            primary_raw: rules.starting.domain_raw.clone(),
            tenants: 0,
            facilities: Vec::new(),
        }],
        next_seq: 1,
        ..Holdings::default()
    };
    if let Some(size) = rules.starting.city_property {
        holdings.city_properties.push(CityProperty {
            id: HoldingId::new("city-2"),
            size,
            mode: CityPropertyMode::Leased,
            facilities: Vec::new(),
        });
        holdings.next_seq = 2;
    }
    holdings
}

fn join_campaign(
    state: Option<&CampaignState>,
    campaign_id: &CampaignId,
    display_name: &str,
    ctx: &DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let campaign = require_campaign(state, campaign_id)?;
    let actor = &ctx.actor;
    if actor.role != Role::Player {
        return Err(RuleViolation::auth("only players may take a seat"));
    }
    if campaign.player_by_user(&actor.user_id).is_some() {
        return Err(RuleViolation::state(format!(
            "user `{}` already joined `{campaign_id}`",
            actor.user_id
        )));
    }
    let display_name = display_name.trim();
    let length = display_name.chars().count();
    if length == 0 || length > MAX_DISPLAY_NAME {
        return Err(RuleViolation::input(format!(
            "display name must be 1 to {MAX_DISPLAY_NAME} characters"
        )));
    }

    let player_id = PlayerId::new(format!("player-{}", campaign.players.len().saturating_add(1)));
    let rules = &campaign.rules;
    let holdings = starting_holdings(rules);
    // A seat taken before this round's maintenance gets its budgets
    // replaced there.
    let mods = EventModifiers::active(&campaign.global_events, campaign.round);
    let budgets = reset::budgets(&holdings, rules, &mods, ctx.catalog);

    Ok(vec![
        Event::public(EventPayload::PlayerJoined {
            player_id: player_id.clone(),
            user_id: actor.user_id.clone(),
            display_name: display_name.to_owned(),
        }),
        Event::private(player_id.clone(), EventPayload::PlayerInitialized {
            player_id,
            check_modifiers: rules.starting.check_modifiers,
            holdings: Box::new(holdings),
            economy: Box::new(Economy { gold: rules.starting.gold, ..Economy::default() }),
            turn: Box::new(TurnState {
                labor_available: budgets.labor,
                influence_available: budgets.influence,
                ..TurnState::default()
            }),
        }),
        log_entry(campaign, format!("{display_name} joined the campaign")),
    ])
}

fn add_private_note(
    state: Option<&CampaignState>,
    campaign_id: &CampaignId,
    text: &str,
    ctx: &DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let campaign = require_campaign(state, campaign_id)?;
    let player = require_player(campaign, &ctx.actor)?;
    let length = text.chars().count();
    if length == 0 || length > MAX_NOTE {
        return Err(RuleViolation::input(format!("notes must be 1 to {MAX_NOTE} characters")));
    }
    Ok(vec![
        Event::private(player.id.clone(), EventPayload::PrivateNoteAdded {
            player_id: player.id.clone(),
            text: text.to_owned(),
        }),
        log_entry(campaign, format!("{} wrote a private note", player.display_name)),
    ])
}
