//! Event log core: the pure reducer.
//!
//! [`apply_event`] is the only way campaign state changes. Each payload
//! touches only its own subtree, every amount is applied with saturating
//! arithmetic, and nothing here reads the catalog or draws from an RNG, so
//! folding the same log always yields the same state.

use std::collections::BTreeMap;

use holdfast_types::{
    AcquiredHolding, ActionUsage, CampaignState, ConversionReport, Economy, Event, EventPayload,
    FacilityInstance, FacilityOutcome, HoldingKind, HoldingRank, HoldingRef, Holdings,
    MaintenanceReport, MaterialId, MaterialKind, ModeChange, Phase, PlayerId, PlayerState,
    TurnState,
};

use crate::error::InvariantViolation;

/// Apply one event to a campaign.
///
/// `CampaignCreated` requires `None`; every other event requires an
/// existing campaign and, where it names one, an existing player.
#[allow(clippy::too_many_lines)]
pub fn apply_event(
    state: Option<CampaignState>,
    event: &Event,
) -> Result<CampaignState, InvariantViolation> {
    let payload = &event.payload;
    let name = payload.name();

    if let EventPayload::CampaignCreated { campaign_id, name, gm_user_id, rules } = payload {
        if state.is_some() {
            return Err(InvariantViolation::CampaignExists);
        }
        return Ok(CampaignState {
            id: campaign_id.clone(),
            name: name.clone(),
            rules: rules.clone(),
            round: 1,
            phase: Phase::Maintenance,
            gm_user_id: gm_user_id.clone(),
            markets: Vec::new(),
            global_events: Vec::new(),
            players: BTreeMap::new(),
        });
    }

    let mut state = state.ok_or(InvariantViolation::MissingCampaign { event: name })?;
    let round = state.round;

    match payload {
        EventPayload::CampaignCreated { .. } => return Err(InvariantViolation::CampaignExists),

        EventPayload::PlayerJoined { player_id, user_id, display_name } => {
            if state.players.contains_key(player_id) {
                return Err(InvariantViolation::DuplicatePlayer { player_id: player_id.clone() });
            }
            state.players.insert(player_id.clone(), PlayerState {
                id: player_id.clone(),
                user_id: user_id.clone(),
                display_name: display_name.clone(),
                check_modifiers: holdfast_types::CheckModifiers::default(),
                holdings: Holdings::default(),
                economy: Economy::default(),
                turn: TurnState::default(),
            });
        }

        EventPayload::PlayerInitialized { player_id, check_modifiers, holdings, economy, turn } => {
            let player = player_mut(&mut state, player_id, name)?;
            player.check_modifiers = *check_modifiers;
            player.holdings = holdings.as_ref().clone();
            player.economy = economy.as_ref().clone();
            player.turn = turn.as_ref().clone();
        }

        EventPayload::PhaseAdvanced { to, round, .. } => {
            state.phase = *to;
            state.round = *round;
        }

        EventPayload::MarketRolled { market } => {
            if let Some(existing) = state.markets.iter_mut().find(|m| m.id == market.id) {
                *existing = market.clone();
            } else {
                state.markets.push(market.clone());
            }
        }

        EventPayload::SectionEventsRolled { events, .. } => {
            state.global_events.extend(events.iter().cloned());
        }

        EventPayload::PlayerMaintenanceResolved { player_id, report } => {
            let player = player_mut(&mut state, player_id, name)?;
            apply_maintenance(player, report, round, name)?;
        }

        EventPayload::PlayerConversionResolved { player_id, report } => {
            let player = player_mut(&mut state, player_id, name)?;
            apply_conversion(&mut player.economy, report);
        }

        EventPayload::PlayerTurnReset { player_id, labor_available, influence_available } => {
            let player = player_mut(&mut state, player_id, name)?;
            player.turn = TurnState {
                labor_available: *labor_available,
                influence_available: *influence_available,
                ..TurnState::default()
            };
        }

        EventPayload::PlayerGatherMaterialsResolved {
            player_id,
            usage,
            labor_spent,
            raw_gained,
            special_gained,
            ..
        } => {
            let player = player_mut(&mut state, player_id, name)?;
            record_usage(&mut player.turn, usage.as_ref());
            player.turn.labor_available = player.turn.labor_available.saturating_sub(*labor_spent);
            add_all(&mut player.economy.raw, raw_gained);
            add_all(&mut player.economy.special, special_gained);
        }

        EventPayload::PlayerInfluenceGained { player_id, usage, gold_spent, influence_gained, .. } => {
            let player = player_mut(&mut state, player_id, name)?;
            record_usage(&mut player.turn, usage.as_ref());
            player.economy.gold = player.economy.gold.saturating_sub(*gold_spent);
            player.turn.influence_available =
                player.turn.influence_available.saturating_add(*influence_gained);
        }

        EventPayload::PlayerMoneyLent { player_id, usage, gold_spent, payout, .. } => {
            let player = player_mut(&mut state, player_id, name)?;
            record_usage(&mut player.turn, usage.as_ref());
            player.economy.gold = player.economy.gold.saturating_sub(*gold_spent);
            player.economy.pending.gold = player.economy.pending.gold.saturating_add(*payout);
        }

        EventPayload::PlayerMaterialsSold {
            player_id,
            usage,
            raw_sold,
            special_sold,
            gold_gained,
            ..
        } => {
            let player = player_mut(&mut state, player_id, name)?;
            record_usage(&mut player.turn, usage.as_ref());
            take_all(&mut player.economy.raw, raw_sold);
            take_all(&mut player.economy.special, special_sold);
            player.economy.gold = player.economy.gold.saturating_add(*gold_gained);
        }

        EventPayload::PlayerMaterialsBought {
            player_id,
            usage,
            material_id,
            kind,
            units,
            gold_spent,
            ..
        } => {
            let player = player_mut(&mut state, player_id, name)?;
            record_usage(&mut player.turn, usage.as_ref());
            player.economy.gold = player.economy.gold.saturating_sub(*gold_spent);
            let stock = match kind {
                MaterialKind::Raw => &mut player.economy.raw,
                MaterialKind::Special => &mut player.economy.special,
            };
            add_stock(stock, material_id, *units);
        }

        EventPayload::PlayerHoldingAcquired {
            player_id,
            usage,
            gold_spent,
            influence_spent,
            acquired,
            ..
        } => {
            let player = player_mut(&mut state, player_id, name)?;
            record_usage(&mut player.turn, usage.as_ref());
            player.economy.gold = player.economy.gold.saturating_sub(*gold_spent);
            player.turn.influence_available =
                player.turn.influence_available.saturating_sub(*influence_spent);
            if let Some(holding) = acquired {
                add_holding(&mut player.holdings, holding.clone());
                player.holdings.next_seq = player.holdings.next_seq.saturating_add(1);
            }
        }

        EventPayload::PlayerTenantsAcquired { player_id, usage, domain_id, count, gold_spent } => {
            let player = player_mut(&mut state, player_id, name)?;
            record_usage(&mut player.turn, usage.as_ref());
            player.economy.gold = player.economy.gold.saturating_sub(*gold_spent);
            let domain = player
                .holdings
                .domains
                .iter_mut()
                .find(|d| &d.id == domain_id)
                .ok_or_else(|| unknown_holding(name, domain_id.as_str()))?;
            domain.tenants = domain.tenants.saturating_add(*count);
        }

        EventPayload::PlayerTroopsRecruited { player_id, usage, kind, count, gold_spent } => {
            let player = player_mut(&mut state, player_id, name)?;
            record_usage(&mut player.turn, usage.as_ref());
            player.economy.gold = player.economy.gold.saturating_sub(*gold_spent);
            let units = player.holdings.troops.count_mut(*kind);
            *units = units.saturating_add(*count);
        }

        EventPayload::PlayerSpecialistHired { player_id, usage, specialist, gold_spent } => {
            let player = player_mut(&mut state, player_id, name)?;
            record_usage(&mut player.turn, usage.as_ref());
            player.economy.gold = player.economy.gold.saturating_sub(*gold_spent);
            player.holdings.specialists.push(specialist.clone());
            player.holdings.next_seq = player.holdings.next_seq.saturating_add(1);
        }

        EventPayload::PlayerFacilityBuilt {
            player_id,
            usage,
            host,
            gold_spent,
            raw_spent,
            outcome,
        } => {
            let player = player_mut(&mut state, player_id, name)?;
            record_usage(&mut player.turn, usage.as_ref());
            player.economy.gold = player.economy.gold.saturating_sub(*gold_spent);
            take_all(&mut player.economy.raw, raw_spent);
            match outcome {
                FacilityOutcome::Built { facility } => {
                    player
                        .holdings
                        .facilities_of_mut(host)
                        .ok_or_else(|| unknown_holding(name, host.id.as_str()))?
                        .push(facility.clone());
                }
                FacilityOutcome::Started { project } => {
                    if !player.holdings.contains(host) {
                        return Err(unknown_holding(name, host.id.as_str()));
                    }
                    player.holdings.long_term_projects.push(project.clone());
                }
            }
            player.holdings.next_seq = player.holdings.next_seq.saturating_add(1);
        }

        EventPayload::PlayerHoldingUpgraded { player_id, usage, target, rank, gold_spent } => {
            let player = player_mut(&mut state, player_id, name)?;
            record_usage(&mut player.turn, usage.as_ref());
            player.economy.gold = player.economy.gold.saturating_sub(*gold_spent);
            set_rank(&mut player.holdings, target, *rank, name)?;
        }

        EventPayload::PlayerHoldingModeChanged { player_id, change } => {
            let player = player_mut(&mut state, player_id, name)?;
            match change {
                ModeChange::CityProperty { id, mode } => {
                    player
                        .holdings
                        .city_properties
                        .iter_mut()
                        .find(|c| &c.id == id)
                        .ok_or_else(|| unknown_holding(name, id.as_str()))?
                        .mode = *mode;
                }
                ModeChange::Office { id, mode } => {
                    player
                        .holdings
                        .offices
                        .iter_mut()
                        .find(|o| &o.id == id)
                        .ok_or_else(|| unknown_holding(name, id.as_str()))?
                        .yield_mode = *mode;
                }
            }
        }

        EventPayload::PrivateNoteAdded { player_id, .. } => {
            player_mut(&mut state, player_id, name)?;
        }

        EventPayload::PublicLogEntryAdded { .. } => {}
    }

    Ok(state)
}

/// Fold a sequence of events over an optional starting state.
pub fn reduce_events<'a>(
    initial: Option<CampaignState>,
    events: impl IntoIterator<Item = &'a Event>,
) -> Result<Option<CampaignState>, InvariantViolation> {
    events.into_iter().try_fold(initial, |state, event| apply_event(state, event).map(Some))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn player_mut<'a>(
    state: &'a mut CampaignState,
    player_id: &PlayerId,
    event: &'static str,
) -> Result<&'a mut PlayerState, InvariantViolation> {
    state
        .players
        .get_mut(player_id)
        .ok_or_else(|| InvariantViolation::UnknownPlayer { event, player_id: player_id.clone() })
}

fn unknown_holding(event: &'static str, holding_id: &str) -> InvariantViolation {
    InvariantViolation::UnknownHolding { event, holding_id: holding_id.to_owned() }
}

fn record_usage(turn: &mut TurnState, usage: Option<&ActionUsage>) {
    if let Some(usage) = usage {
        turn.actions_used = turn.actions_used.saturating_add(usage.cost);
        turn.action_keys_used.push(usage.key.clone());
    }
}

fn add_stock(stock: &mut BTreeMap<MaterialId, u32>, id: &MaterialId, amount: u32) {
    if amount == 0 {
        return;
    }
    let entry = stock.entry(id.clone()).or_insert(0);
    *entry = entry.saturating_add(amount);
}

fn take_stock(stock: &mut BTreeMap<MaterialId, u32>, id: &MaterialId, amount: u32) {
    if let Some(entry) = stock.get_mut(id) {
        *entry = entry.saturating_sub(amount);
        if *entry == 0 {
            stock.remove(id);
        }
    }
}

fn add_all(stock: &mut BTreeMap<MaterialId, u32>, amounts: &BTreeMap<MaterialId, u32>) {
    for (id, amount) in amounts {
        add_stock(stock, id, *amount);
    }
}

fn take_all(stock: &mut BTreeMap<MaterialId, u32>, amounts: &BTreeMap<MaterialId, u32>) {
    for (id, amount) in amounts {
        take_stock(stock, id, *amount);
    }
}

fn add_holding(holdings: &mut Holdings, acquired: AcquiredHolding) {
    match acquired {
        AcquiredHolding::Domain(h) => holdings.domains.push(h),
        AcquiredHolding::CityProperty(h) => holdings.city_properties.push(h),
        AcquiredHolding::Workshop(h) => holdings.workshops.push(h),
        AcquiredHolding::Storage(h) => holdings.storages.push(h),
        AcquiredHolding::Office(h) => holdings.offices.push(h),
        AcquiredHolding::Organization(h) => holdings.organizations.push(h),
        AcquiredHolding::TradeEnterprise(h) => holdings.trade_enterprises.push(h),
    }
}

fn set_rank(
    holdings: &mut Holdings,
    target: &HoldingRef,
    rank: HoldingRank,
    event: &'static str,
) -> Result<(), InvariantViolation> {
    let id = &target.id;
    let missing = || unknown_holding(event, id.as_str());
    match (target.kind, rank) {
        (HoldingKind::Domain, HoldingRank::Domain(tier)) => {
            holdings.domains.iter_mut().find(|h| &h.id == id).ok_or_else(missing)?.tier = tier;
        }
        (HoldingKind::CityProperty, HoldingRank::Sized(size)) => {
            holdings.city_properties.iter_mut().find(|h| &h.id == id).ok_or_else(missing)?.size =
                size;
        }
        (HoldingKind::Workshop, HoldingRank::Sized(size)) => {
            holdings.workshops.iter_mut().find(|h| &h.id == id).ok_or_else(missing)?.size = size;
        }
        (HoldingKind::Storage, HoldingRank::Sized(size)) => {
            holdings.storages.iter_mut().find(|h| &h.id == id).ok_or_else(missing)?.size = size;
        }
        (HoldingKind::Office, HoldingRank::Sized(size)) => {
            holdings.offices.iter_mut().find(|h| &h.id == id).ok_or_else(missing)?.size = size;
        }
        (HoldingKind::Organization, HoldingRank::Sized(size)) => {
            holdings.organizations.iter_mut().find(|h| &h.id == id).ok_or_else(missing)?.size =
                size;
        }
        (HoldingKind::TradeEnterprise, HoldingRank::Sized(size)) => {
            holdings.trade_enterprises.iter_mut().find(|h| &h.id == id).ok_or_else(missing)?.size =
                size;
        }
        _ => return Err(missing()),
    }
    Ok(())
}

fn apply_maintenance(
    player: &mut PlayerState,
    report: &MaintenanceReport,
    round: u32,
    event: &'static str,
) -> Result<(), InvariantViolation> {
    let economy = &mut player.economy;
    economy.gold = economy.gold.saturating_add(report.pending_released);
    economy.pending.gold = economy.pending.gold.saturating_sub(report.pending_released);
    economy.gold = economy.gold.saturating_sub(report.taxes_paid);

    for facility_id in &report.completed_projects {
        let Some(index) =
            player.holdings.long_term_projects.iter().position(|p| &p.id == facility_id)
        else {
            return Err(unknown_holding(event, facility_id.as_str()));
        };
        let project = player.holdings.long_term_projects.remove(index);
        player
            .holdings
            .facilities_of_mut(&project.host)
            .ok_or_else(|| unknown_holding(event, project.host.id.as_str()))?
            .push(FacilityInstance {
                id: project.id,
                key: project.facility_key,
                built_round: round,
            });
    }

    let economy = &mut player.economy;
    economy.gold = economy.gold.saturating_sub(report.upkeep_gold);
    player.turn.labor_available = report.labor_budget.saturating_sub(report.upkeep_labor);
    player.turn.influence_available = report.influence_budget;
    player.turn.maintained_workshop_ids.clone_from(&report.maintained_workshop_ids);
    player.turn.maintained_storage_ids.clone_from(&report.maintained_storage_ids);
    player.turn.degraded_domain_ids.clone_from(&report.degraded_domain_ids);
    player.turn.unpaid_holding_ids.clone_from(&report.unpaid_holding_ids);

    let troops = &mut player.holdings.troops;
    troops.mercenaries = troops.mercenaries.saturating_sub(report.deserted_mercenaries);
    troops.guards = troops.guards.saturating_sub(report.deserted_guards);

    economy.gold = economy.gold.saturating_add(report.gold_produced);
    add_all(&mut economy.raw, &report.raw_produced);
    take_all(&mut economy.raw, &report.raid_losses);
    take_all(&mut economy.raw, &report.workforce_upkeep);
    Ok(())
}

fn apply_conversion(economy: &mut Economy, report: &ConversionReport) {
    economy.raw.clone_from(&report.retained_raw);
    economy.special.clone_from(&report.retained_special);
    economy.raw.retain(|_, n| *n > 0);
    economy.special.retain(|_, n| *n > 0);
    economy.gold = economy.gold.saturating_add(report.gold_gained);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use holdfast_types::{CampaignId, RulesConfig, UserId, Visibility};

    fn created() -> Event {
        Event::public(EventPayload::CampaignCreated {
            campaign_id: CampaignId::new("c1"),
            name: "Vale".to_owned(),
            gm_user_id: UserId::new("gm"),
            rules: RulesConfig::default(),
        })
    }

    fn joined(id: &str) -> Event {
        Event::public(EventPayload::PlayerJoined {
            player_id: PlayerId::new(id),
            user_id: UserId::new(format!("user-{id}")),
            display_name: id.to_owned(),
        })
    }

    #[test]
    fn creation_starts_at_round_one_maintenance() {
        let state = apply_event(None, &created()).unwrap();
        assert_eq!(state.round, 1);
        assert_eq!(state.phase, Phase::Maintenance);
        assert!(state.players.is_empty());
    }

    #[test]
    fn non_creation_events_need_a_campaign() {
        let err = apply_event(None, &joined("player-1")).unwrap_err();
        assert_eq!(err, InvariantViolation::MissingCampaign { event: "player_joined" });
    }

    #[test]
    fn creation_twice_is_rejected() {
        let state = apply_event(None, &created()).unwrap();
        assert_eq!(apply_event(Some(state), &created()), Err(InvariantViolation::CampaignExists));
    }

    #[test]
    fn unknown_players_are_rejected() {
        let state = apply_event(None, &created()).unwrap();
        let event = Event {
            visibility: Visibility::Private { player_id: PlayerId::new("ghost") },
            payload: EventPayload::PrivateNoteAdded {
                player_id: PlayerId::new("ghost"),
                text: "boo".to_owned(),
            },
        };
        assert!(matches!(
            apply_event(Some(state), &event),
            Err(InvariantViolation::UnknownPlayer { .. })
        ));
    }

    #[test]
    fn log_entries_pass_state_through() {
        let state = apply_event(None, &created()).unwrap();
        let log = Event::public(EventPayload::PublicLogEntryAdded {
            round: 1,
            phase: Phase::Maintenance,
            message: "hello".to_owned(),
        });
        assert_eq!(apply_event(Some(state.clone()), &log).unwrap(), state);
    }

    #[test]
    fn reduce_folds_in_order() {
        let events = vec![created(), joined("player-1"), joined("player-2")];
        let state = reduce_events(None, &events).unwrap().unwrap();
        assert_eq!(state.players.len(), 2);
        assert_eq!(reduce_events(None, &Vec::<Event>::new()).unwrap(), None);
    }

    #[test]
    fn materials_never_go_negative() {
        let events = vec![created(), joined("player-1")];
        let state = reduce_events(None, &events).unwrap();
        let mut sold = BTreeMap::new();
        sold.insert(MaterialId::new("raw.grain"), 50);
        let sale = Event::private(PlayerId::new("player-1"), EventPayload::PlayerMaterialsSold {
            player_id: PlayerId::new("player-1"),
            usage: Some(ActionUsage { key: "sell".to_owned(), cost: 1 }),
            market_id: "local".into(),
            check: holdfast_types::CheckOutcome {
                dc: 12,
                modifier: 0,
                roll: 10,
                total: 10,
                tier: holdfast_types::SuccessTier::Poor,
            },
            raw_sold: sold,
            special_sold: BTreeMap::new(),
            gold_gained: 0,
        });
        let state = apply_event(state, &sale).unwrap();
        let player = state.player(&PlayerId::new("player-1")).unwrap();
        assert_eq!(player.economy.raw_total(), 0);
        assert_eq!(player.turn.actions_used, 1);
        assert_eq!(player.turn.action_keys_used, vec!["sell".to_owned()]);
    }
}
