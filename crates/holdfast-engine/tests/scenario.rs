//! Full-round scenarios driven through `decide` and the reducer.

#![allow(clippy::unwrap_used)]

mod common;

use std::collections::BTreeMap;

use common::{GM, Table, campaign_id, create};
use holdfast_engine::{Actor, apply_event, feed};
use holdfast_types::{
    CityPropertyMode, Command, DomainTier, ErrorCode, Event, EventPayload, GlobalEvent,
    HoldingKind, HoldingRef, HoldingSize, MarketId, MaterialId, OfficeYieldMode,
    OrganizationKind, Phase, PlayerId, RulesConfig, SaleItem, SpecialistKind, TroopKind,
    Visibility,
};

/// One of every command a player may only issue in the actions phase.
fn player_actions() -> Vec<Command> {
    let id = campaign_id;
    let grain = || MaterialId::new("raw.grain");
    let local = || MarketId::new("local");
    let lot = || vec![SaleItem { material_id: grain(), lots: 1 }];
    vec![
        Command::GatherMaterials { campaign_id: id(), investments: 1 },
        Command::GainInfluence { campaign_id: id(), investments: 1 },
        Command::LendMoney { campaign_id: id(), investments: 1 },
        Command::SellMaterials { campaign_id: id(), market_id: local(), items: lot() },
        Command::BuyMaterials {
            campaign_id: id(),
            market_id: local(),
            material_id: grain(),
            lots: 1,
        },
        Command::SellBuy {
            campaign_id: id(),
            market_id: local(),
            items: lot(),
            buy_material_id: MaterialId::new("raw.ore"),
            buy_lots: 1,
        },
        Command::AcquireOffice { campaign_id: id(), size: HoldingSize::Small },
        Command::AcquireDomain {
            campaign_id: id(),
            tier: DomainTier::Small,
            primary_raw: grain(),
        },
        Command::AcquireCityProperty { campaign_id: id(), size: HoldingSize::Small },
        Command::AcquireWorkshop { campaign_id: id(), size: HoldingSize::Small },
        Command::AcquireStorage { campaign_id: id(), size: HoldingSize::Small },
        Command::AcquireTradeEnterprise { campaign_id: id(), size: HoldingSize::Small },
        Command::AcquireOrganization {
            campaign_id: id(),
            kind: OrganizationKind::Guild,
            size: HoldingSize::Small,
        },
        Command::AcquireTenants { campaign_id: id(), domain_id: "dom-1".into(), count: 1 },
        Command::RecruitTroops { campaign_id: id(), kind: TroopKind::Militia, count: 1 },
        Command::HireSpecialist { campaign_id: id(), kind: SpecialistKind::Steward },
        Command::Upgrade {
            campaign_id: id(),
            target: HoldingRef::new(HoldingKind::CityProperty, "city-2"),
        },
        Command::BuildFacility {
            campaign_id: id(),
            host: HoldingRef::new(HoldingKind::Domain, "dom-1"),
            facility_key: "domain.granary".to_owned(),
        },
        Command::SetCityPropertyMode {
            campaign_id: id(),
            property_id: "city-2".into(),
            mode: CityPropertyMode::Production,
        },
        Command::SetOfficeYieldMode {
            campaign_id: id(),
            office_id: "office-9".into(),
            mode: OfficeYieldMode::Influence,
        },
    ]
}

#[test]
fn one_round_with_seed_123() {
    let mut table = Table::created(123);
    table.join("u1", "Aldric");
    assert_eq!(table.player(1).economy.gold, 4);
    assert_eq!(table.player(1).turn.labor_available, 5);

    table.advance();
    assert_eq!(table.campaign().phase, Phase::Actions);
    assert_eq!(table.player(1).economy.gold, 6);
    assert_eq!(table.player(1).economy.raw_total(), 4);

    let gather = Command::GatherMaterials { campaign_id: campaign_id(), investments: 2 };
    table.submit(Actor::player("u1"), &gather).unwrap();
    let player = table.player(1);
    assert_eq!(player.turn.actions_used, 1);
    assert_eq!(player.turn.labor_available, 3);
    assert!(player.economy.raw_total() > 4);

    table.advance();
    assert_eq!(table.campaign().phase, Phase::Conversion);
    let player = table.player(1);
    assert_eq!(player.economy.raw_total(), 0);
    assert_eq!(player.economy.special_total(), 0);
    assert!(player.economy.gold >= 6);

    table.advance();
    assert_eq!(table.campaign().phase, Phase::Reset);
    let turn = &table.player(1).turn;
    assert_eq!(turn.actions_used, 0);
    assert!(turn.action_keys_used.is_empty());
    assert_eq!(turn.labor_available, 5);
    assert_eq!(turn.influence_available, 1);

    table.advance();
    assert_eq!(table.campaign().phase, Phase::Maintenance);
    assert_eq!(table.campaign().round, 2);
}

#[test]
fn gathering_in_maintenance_is_a_phase_error() {
    let mut table = Table::created(123);
    table.join("u1", "Aldric");
    let before = table.state.clone();
    let rng_before = table.rng;

    let gather = Command::GatherMaterials { campaign_id: campaign_id(), investments: 1 };
    let err = table.submit(Actor::player("u1"), &gather).unwrap_err();
    assert_eq!(err.code, ErrorCode::Phase);
    assert_eq!(err.to_string().split(':').next(), Some("PHASE"));
    assert_eq!(table.state, before);
    assert_eq!(table.rng, rng_before);
}

#[test]
fn player_actions_outside_the_actions_phase_are_phase_errors() {
    let mut table = Table::created(8);
    table.join("u1", "Aldric");
    for _ in 0..4 {
        let phase = table.campaign().phase;
        if phase != Phase::Actions {
            for command in player_actions() {
                let before = table.state.clone();
                let rng_before = table.rng;
                let err = table.submit(Actor::player("u1"), &command).unwrap_err();
                assert_eq!(err.code, ErrorCode::Phase, "{} in {phase}", command.name());
                assert_eq!(table.state, before, "{} changed state", command.name());
                assert_eq!(table.rng, rng_before, "{} drew dice", command.name());
            }
        }
        table.advance();
    }
    assert_eq!(table.campaign().round, 2);
}

#[test]
fn event_budget_deltas_follow_the_event_window() {
    let mut table = Table::new(31);
    let rules = RulesConfig { first_event_round: 1000, ..RulesConfig::default() };
    table.submit(Actor::gm(GM), &create(rules)).unwrap();
    table.join("u1", "Aldric");
    if let Some(campaign) = table.state.as_mut() {
        // Great Plague: labor -2 for rounds 2 to 5.
        campaign.global_events.push(GlobalEvent {
            table_roll: 2,
            name: "Great Plague".to_owned(),
            description: String::new(),
            start_round: 2,
            end_round: 5,
            meta_rolls: BTreeMap::new(),
        });
    }

    let mut labor = Vec::new();
    for _ in 0..6 {
        table.advance();
        assert_eq!(table.campaign().phase, Phase::Actions);
        labor.push(table.player(1).turn.labor_available);
        for _ in 0..3 {
            table.advance();
        }
    }
    assert_eq!(labor, vec![5, 3, 3, 3, 3, 5]);
}

#[test]
fn first_maintenance_rolls_every_market() {
    let mut table = Table::created(5);
    table.join("u1", "Aldric");
    table.advance();
    let markets = &table.campaign().markets;
    assert_eq!(markets.len(), 2);
    assert!(markets.iter().all(|m| m.rolled_round == 1));
    assert!(table.campaign().global_events.is_empty());
}

#[test]
fn section_events_arrive_in_round_two() {
    let mut table = Table::created(9);
    table.join("u1", "Aldric");
    for _ in 0..4 {
        table.advance();
    }
    assert_eq!(table.campaign().round, 2);
    table.advance();
    let events = &table.campaign().global_events;
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.start_round == 2));
    let rolled = table
        .log
        .iter()
        .filter(|e| matches!(e.payload, EventPayload::SectionEventsRolled { .. }))
        .count();
    assert_eq!(rolled, 1);
}

#[test]
fn one_slot_per_key_per_round() {
    let mut table = Table::created(77);
    table.join("u1", "Aldric");
    table.advance();
    let gather = Command::GatherMaterials { campaign_id: campaign_id(), investments: 1 };
    table.submit(Actor::player("u1"), &gather).unwrap();
    let err = table.submit(Actor::player("u1"), &gather).unwrap_err();
    assert_eq!(err.code, ErrorCode::Actions);
    assert_eq!(table.player(1).turn.actions_used, 1);
}

#[test]
fn private_starting_assets_stay_out_of_the_public_feed() {
    let mut table = Table::created(1);
    table.join("u1", "Aldric");
    table.join("u2", "Berenike");

    let public = feed::public_feed(&table.log);
    assert!(public.iter().all(|e| e.visibility == Visibility::Public));
    assert!(
        public.iter().any(|e| matches!(e.payload, EventPayload::PlayerJoined { .. })),
        "joins are public"
    );
    assert!(!public.iter().any(|e| matches!(e.payload, EventPayload::PlayerInitialized { .. })));

    let mine = feed::player_feed(&table.log, &PlayerId::new("player-1"));
    let initialized: Vec<_> = mine
        .iter()
        .filter_map(|e| match &e.payload {
            EventPayload::PlayerInitialized { player_id, .. } => Some(player_id.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(initialized, vec![PlayerId::new("player-1")]);
}

#[test]
fn replaying_the_log_rebuilds_the_state() {
    let mut table = Table::created(42);
    table.join("u1", "Aldric");
    for _ in 0..6 {
        table.advance();
    }
    let replayed = table
        .log
        .iter()
        .try_fold(None, |state, event: &Event| apply_event(state, event).map(Some))
        .unwrap();
    assert_eq!(replayed.as_ref(), table.state.as_ref());
}
