//! Facilities and holding mode switches.
//!
//! Building takes no action slot but uses the `facility` key, so a player
//! builds at most one facility per round. Mode switches are free.

use holdfast_rules::holdings::slots_of;
use holdfast_types::{
    CityPropertyMode, Event, EventPayload, FacilityId, FacilityInstance, FacilityOutcome,
    HoldingId, HoldingRef, LongTermProject, ModeChange, OfficeYieldMode,
};

use super::{Acting, draw_in_id_order};
use crate::context::DecideContext;
use crate::error::RuleViolation;

/// Build a catalog facility on one of the player's holdings.
///
/// Facilities taking more than one round start a long-term project that
/// completes during the maintenance of its final round. Projects occupy a
/// slot on their host like built facilities do. Raw costs are paid from any
/// raw material, in material ID order.
pub fn build_facility(
    acting: &Acting<'_>,
    host: &HoldingRef,
    facility_key: &str,
    ctx: &DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let player = acting.player;
    let holdings = &player.holdings;
    let slots = slots_of(holdings, host)
        .ok_or_else(|| RuleViolation::state(format!("no {:?} `{}`", host.kind, host.id)))?;
    let def = ctx
        .catalog
        .facility(facility_key)
        .ok_or_else(|| RuleViolation::input(format!("unknown facility `{facility_key}`")))?;
    if def.host != host.kind {
        return Err(RuleViolation::input(format!(
            "`{facility_key}` cannot be built on a {:?}",
            host.kind
        )));
    }
    let built = holdings.facilities_of(host).map_or(0, <[FacilityInstance]>::len);
    let used = u32::try_from(built.saturating_add(holdings.projects_on(host))).unwrap_or(u32::MAX);
    if used >= slots {
        return Err(RuleViolation::state(format!(
            "`{}` has no free facility slot ({used} of {slots} used)",
            host.id
        )));
    }

    acting.require_gold(def.cost_gold, "the facility")?;
    let raw_held = player.economy.raw_total();
    if raw_held < def.cost_raw {
        return Err(RuleViolation::resources(format!(
            "the facility needs {} raw materials, only {raw_held} held",
            def.cost_raw
        )));
    }
    let usage = acting.claim_slot("facility", 0)?;

    let mut stock = player.economy.raw.clone();
    let raw_spent = draw_in_id_order(&mut stock, def.cost_raw);
    let id = FacilityId::new(acting.next_id("fac"));
    let round = acting.campaign.round;
    let outcome = if def.build_rounds <= 1 {
        FacilityOutcome::Built {
            facility: FacilityInstance { id, key: def.key.clone(), built_round: round },
        }
    } else {
        FacilityOutcome::Started {
            project: LongTermProject {
                id,
                host: host.clone(),
                facility_key: def.key.clone(),
                started_round: round,
                completes_round: round.saturating_add(def.build_rounds).saturating_sub(1),
            },
        }
    };

    let verb = match outcome {
        FacilityOutcome::Built { .. } => "built",
        FacilityOutcome::Started { .. } => "started building",
    };
    let message = format!("{} {verb} a {} on {}", player.display_name, def.name, host.id);
    Ok(vec![
        acting.private(EventPayload::PlayerFacilityBuilt {
            player_id: player.id.clone(),
            usage: Some(usage),
            host: host.clone(),
            gold_spent: def.cost_gold,
            raw_spent,
            outcome,
        }),
        acting.log(message),
    ])
}

/// Switch a city property between leased and production use.
pub fn set_city_property_mode(
    acting: &Acting<'_>,
    property_id: &HoldingId,
    mode: CityPropertyMode,
) -> Result<Vec<Event>, RuleViolation> {
    let player = acting.player;
    let property = player
        .holdings
        .city_properties
        .iter()
        .find(|c| &c.id == property_id)
        .ok_or_else(|| RuleViolation::state(format!("no city property `{property_id}`")))?;
    if property.mode == mode {
        return Err(RuleViolation::input(format!("`{property_id}` is already in that mode")));
    }
    let label = match mode {
        CityPropertyMode::Leased => "leased out",
        CityPropertyMode::Production => "put to production",
    };
    let message = format!("{} {label} {property_id}", player.display_name);
    Ok(vec![
        acting.private(EventPayload::PlayerHoldingModeChanged {
            player_id: player.id.clone(),
            change: ModeChange::CityProperty { id: property_id.clone(), mode },
        }),
        acting.log(message),
    ])
}

/// Switch what an office yields.
pub fn set_office_yield_mode(
    acting: &Acting<'_>,
    office_id: &HoldingId,
    mode: OfficeYieldMode,
) -> Result<Vec<Event>, RuleViolation> {
    let player = acting.player;
    let office = player
        .holdings
        .offices
        .iter()
        .find(|o| &o.id == office_id)
        .ok_or_else(|| RuleViolation::state(format!("no office `{office_id}`")))?;
    if office.yield_mode == mode {
        return Err(RuleViolation::input(format!("`{office_id}` already yields that")));
    }
    let label = match mode {
        OfficeYieldMode::Gold => "gold",
        OfficeYieldMode::Influence => "influence",
    };
    let message = format!("{} turned {office_id} to yield {label}", player.display_name);
    Ok(vec![
        acting.private(EventPayload::PlayerHoldingModeChanged {
            player_id: player.id.clone(),
            change: ModeChange::Office { id: office_id.clone(), mode },
        }),
        acting.log(message),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use holdfast_types::{
        CampaignState, Command, ErrorCode, HoldingKind, HoldingSize, Office, Phase,
    };

    use crate::actions::fixture::{
        USER, act, advance, apply, campaign, campaign_id, first, grain, player, player_mut, submit,
    };
    use crate::context::Actor;

    fn domain() -> HoldingRef {
        HoldingRef::new(HoldingKind::Domain, "dom-1")
    }

    fn funded() -> CampaignState {
        let mut state = campaign();
        let economy = &mut player_mut(&mut state).economy;
        economy.gold = 30;
        economy.raw.insert(grain(), 10);
        state
    }

    #[test]
    fn single_round_facility_is_built_at_once() {
        let state = funded();
        let events = act(&state, 10, |a, ctx| build_facility(a, &domain(), "domain.granary", ctx))
            .unwrap();
        let EventPayload::PlayerFacilityBuilt { gold_spent, raw_spent, outcome, usage, .. } =
            first(&events)
        else {
            panic!("Expected a facility, got {:?}", first(&events));
        };
        assert_eq!(*gold_spent, 4);
        assert_eq!(raw_spent.get(&grain()), Some(&2));
        assert!(matches!(outcome, FacilityOutcome::Built { .. }));
        assert!(matches!(usage, Some(u) if u.key == "facility" && u.cost == 0));

        let state = apply(&state, &events);
        let player = player(&state);
        assert_eq!(player.economy.gold, 26);
        assert_eq!(player.economy.raw_of(&grain()), 8);
        assert_eq!(player.turn.actions_used, 0);
        let built = player.holdings.facilities_of(&domain()).unwrap();
        assert_eq!(built.first().map(|f| f.key.as_str()), Some("domain.granary"));
    }

    #[test]
    fn one_facility_per_round() {
        let state = funded();
        let events = act(&state, 10, |a, ctx| build_facility(a, &domain(), "domain.mill", ctx))
            .unwrap();
        let state = apply(&state, &events);
        let err = act(&state, 10, |a, ctx| build_facility(a, &domain(), "domain.granary", ctx))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Actions);
    }

    #[test]
    fn facilities_need_a_free_slot_on_a_matching_host() {
        let mut state = funded();
        let err = act(&state, 10, |a, ctx| build_facility(a, &domain(), "storage.cellar", ctx))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Input);
        let err = act(&state, 10, |a, ctx| build_facility(a, &domain(), "domain.moat", ctx))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Input);

        // Starter domains have two slots.
        let dom = player_mut(&mut state).holdings.domains.first_mut().unwrap();
        for n in 0..2 {
            dom.facilities.push(FacilityInstance {
                id: FacilityId::new(format!("fac-{n}")),
                key: "domain.mill".to_owned(),
                built_round: 1,
            });
        }
        let err = act(&state, 10, |a, ctx| build_facility(a, &domain(), "domain.granary", ctx))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::State);
    }

    #[test]
    fn raw_cost_must_be_on_hand() {
        let mut state = funded();
        player_mut(&mut state).economy.raw.insert(grain(), 1);
        let err = act(&state, 10, |a, ctx| build_facility(a, &domain(), "domain.granary", ctx))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Resources);
    }

    #[test]
    fn long_project_completes_at_its_final_maintenance() {
        let state = funded();
        let command = Command::BuildFacility {
            campaign_id: campaign_id(),
            host: domain(),
            facility_key: "domain.manor_house".to_owned(),
        };
        let events = submit(&state, &command, Actor::player(USER));
        assert!(matches!(
            first(&events),
            EventPayload::PlayerFacilityBuilt {
                outcome: FacilityOutcome::Started { project },
                ..
            } if project.completes_round == 2
        ));
        let mut state = apply(&state, &events);
        assert_eq!(player(&state).holdings.long_term_projects.len(), 1);

        // Actions, conversion and reset of round 1, then round 2 maintenance.
        for _ in 0..3 {
            state = advance(&state);
            assert_eq!(player(&state).holdings.long_term_projects.len(), 1);
        }
        assert_eq!((state.round, state.phase), (2, Phase::Maintenance));

        let state = advance(&state);
        let holdings = &player(&state).holdings;
        assert!(holdings.long_term_projects.is_empty());
        let built = holdings.facilities_of(&domain()).unwrap();
        assert_eq!(built.first().map(|f| f.key.as_str()), Some("domain.manor_house"));
    }

    #[test]
    fn city_property_modes_switch_freely() {
        let state = campaign();
        let id = HoldingId::new("city-2");
        let events =
            act(&state, 10, |a, _| set_city_property_mode(a, &id, CityPropertyMode::Production))
                .unwrap();
        let state = apply(&state, &events);
        let player = player(&state);
        let property = player.holdings.city_properties.first().unwrap();
        assert_eq!(property.mode, CityPropertyMode::Production);
        assert_eq!(player.turn.actions_used, 0);

        let err = act(&state, 10, |a, _| {
            set_city_property_mode(a, &id, CityPropertyMode::Production)
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Input);
        let err = act(&state, 10, |a, _| {
            set_city_property_mode(a, &HoldingId::new("city-9"), CityPropertyMode::Leased)
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::State);
    }

    #[test]
    fn office_yields_switch_freely() {
        let mut state = campaign();
        let id = HoldingId::new("off-3");
        player_mut(&mut state).holdings.offices.push(Office {
            id: id.clone(),
            size: HoldingSize::Small,
            yield_mode: OfficeYieldMode::Gold,
        });
        let err = act(&state, 10, |a, _| set_office_yield_mode(a, &id, OfficeYieldMode::Gold))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Input);

        let events =
            act(&state, 10, |a, _| set_office_yield_mode(a, &id, OfficeYieldMode::Influence))
                .unwrap();
        let state = apply(&state, &events);
        let office = player(&state).holdings.offices.first().unwrap();
        assert_eq!(office.yield_mode, OfficeYieldMode::Influence);

        let err = act(&state, 10, |a, _| {
            set_office_yield_mode(a, &HoldingId::new("off-9"), OfficeYieldMode::Gold)
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::State);
    }
}
