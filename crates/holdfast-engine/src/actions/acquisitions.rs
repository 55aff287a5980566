//! Acquisitions: new holdings, tenants, troops, specialists and upgrades.
//!
//! Buying a holding rolls a check whose tier sets the final price as a
//! percentage of the event-scaled base price. A failed check buys nothing
//! and costs nothing. Tenants, troops, specialists and upgrades are bought
//! outright with no check.

use holdfast_rules::holdings::{
    MAX_RECRUIT, SPECIALIST_PRICE, TENANT_PRICE, acquisition_dc, city_property_stats,
    domain_acquisition_dc, domain_stats, office_stats, organization_stats, storage_stats,
    trade_enterprise_stats, troop_stats, upgrade_cost, workshop_stats,
};
use holdfast_rules::roll_check;
use holdfast_rules::tiers::{acquisition_price_percent, ceil_percent, ceil_scaled};
use holdfast_types::{
    AcquiredHolding, CityProperty, CityPropertyMode, Domain, DomainTier, Event, EventPayload,
    HoldingId, HoldingKind, HoldingRef, HoldingSize, MaterialId, MaterialKind, Office,
    OfficeYieldMode, Organization, OrganizationKind, Specialist, SpecialistKind, Storage,
    TradeEnterprise, TroopKind, Workshop,
};

use super::{Acting, require_range, tier_label};
use crate::context::DecideContext;
use crate::error::RuleViolation;

/// Which modifier a purchase check adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Standing {
    Money,
    Influence,
}

/// A holding offered for purchase.
#[derive(Debug, Clone)]
struct Offer {
    key: &'static str,
    label: &'static str,
    dc: i32,
    standing: Standing,
    price_gold: u32,
    price_influence: u32,
    holding: AcquiredHolding,
}

fn acquire(
    acting: &Acting<'_>,
    offer: Offer,
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let player = acting.player;
    let base_price = ceil_scaled(offer.price_gold, acting.mods.acquisition_price);
    acting.require_gold(base_price, offer.label)?;
    let influence = player.turn.influence_available;
    if influence < offer.price_influence {
        return Err(RuleViolation::resources(format!(
            "{} costs {} influence, only {influence} available",
            offer.label, offer.price_influence
        )));
    }
    let usage = acting.claim_slot(offer.key, 1)?;

    let modifier = match offer.standing {
        Standing::Money => player.check_modifiers.money,
        Standing::Influence => player.check_modifiers.influence,
    };
    let check = roll_check(&mut *ctx.rng, modifier, offer.dc);
    let price = acquisition_price_percent(check.tier).map(|pct| ceil_percent(base_price, pct));

    let (gold_spent, influence_spent, acquired) = match price {
        Some(price) if price <= player.economy.gold => {
            (price, offer.price_influence, Some(offer.holding))
        }
        _ => (0, 0, None),
    };
    let message = if acquired.is_some() {
        format!(
            "{} acquired a {} ({}) for {gold_spent} gold",
            player.display_name,
            offer.label,
            tier_label(check.tier)
        )
    } else {
        format!(
            "{} failed to acquire a {} ({})",
            player.display_name,
            offer.label,
            tier_label(check.tier)
        )
    };
    Ok(vec![
        acting.private(EventPayload::PlayerHoldingAcquired {
            player_id: player.id.clone(),
            usage: Some(usage),
            check,
            gold_spent,
            influence_spent,
            acquired,
        }),
        acting.log(message),
    ])
}

fn new_id(acting: &Acting<'_>, kind: HoldingKind) -> HoldingId {
    HoldingId::new(acting.next_id(kind.id_prefix()))
}

/// Buy a domain producing `primary_raw`.
pub fn acquire_domain(
    acting: &Acting<'_>,
    tier: DomainTier,
    primary_raw: &MaterialId,
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    if tier == DomainTier::Starter {
        return Err(RuleViolation::input("starter domains cannot be bought"));
    }
    let is_raw = ctx.catalog.material(primary_raw).is_some_and(|m| m.kind == MaterialKind::Raw);
    if !is_raw {
        return Err(RuleViolation::input(format!("`{primary_raw}` is not a raw material")));
    }
    let offer = Offer {
        key: "acquire_domain",
        label: "domain",
        dc: domain_acquisition_dc(tier),
        standing: Standing::Money,
        price_gold: domain_stats(tier).price,
        price_influence: 0,
        holding: AcquiredHolding::Domain(Domain {
            id: new_id(acting, HoldingKind::Domain),
            tier,
            primary_raw: primary_raw.clone(),
            tenants: 0,
            facilities: Vec::new(),
        }),
    };
    acquire(acting, offer, ctx)
}

/// Buy a city property. New properties start leased.
pub fn acquire_city_property(
    acting: &Acting<'_>,
    size: HoldingSize,
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let offer = Offer {
        key: "acquire_city_property",
        label: "city property",
        dc: acquisition_dc(size),
        standing: Standing::Money,
        price_gold: city_property_stats(size).price,
        price_influence: 0,
        holding: AcquiredHolding::CityProperty(CityProperty {
            id: new_id(acting, HoldingKind::CityProperty),
            size,
            mode: CityPropertyMode::Leased,
            facilities: Vec::new(),
        }),
    };
    acquire(acting, offer, ctx)
}

/// Buy a workshop.
pub fn acquire_workshop(
    acting: &Acting<'_>,
    size: HoldingSize,
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let offer = Offer {
        key: "acquire_workshop",
        label: "workshop",
        dc: acquisition_dc(size),
        standing: Standing::Money,
        price_gold: workshop_stats(size).price,
        price_influence: 0,
        holding: AcquiredHolding::Workshop(Workshop {
            id: new_id(acting, HoldingKind::Workshop),
            size,
            facilities: Vec::new(),
        }),
    };
    acquire(acting, offer, ctx)
}

/// Buy a storage.
pub fn acquire_storage(
    acting: &Acting<'_>,
    size: HoldingSize,
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let offer = Offer {
        key: "acquire_storage",
        label: "storage",
        dc: acquisition_dc(size),
        standing: Standing::Money,
        price_gold: storage_stats(size).price,
        price_influence: 0,
        holding: AcquiredHolding::Storage(Storage {
            id: new_id(acting, HoldingKind::Storage),
            size,
            facilities: Vec::new(),
        }),
    };
    acquire(acting, offer, ctx)
}

/// Buy a trade enterprise.
pub fn acquire_trade_enterprise(
    acting: &Acting<'_>,
    size: HoldingSize,
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let offer = Offer {
        key: "acquire_trade_enterprise",
        label: "trade enterprise",
        dc: acquisition_dc(size),
        standing: Standing::Money,
        price_gold: trade_enterprise_stats(size).price,
        price_influence: 0,
        holding: AcquiredHolding::TradeEnterprise(TradeEnterprise {
            id: new_id(acting, HoldingKind::TradeEnterprise),
            size,
            facilities: Vec::new(),
        }),
    };
    acquire(acting, offer, ctx)
}

/// Buy an office. New offices yield gold.
pub fn acquire_office(
    acting: &Acting<'_>,
    size: HoldingSize,
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let stats = office_stats(size);
    let offer = Offer {
        key: "acquire_office",
        label: "office",
        dc: acquisition_dc(size),
        standing: Standing::Influence,
        price_gold: stats.price_gold,
        price_influence: stats.price_influence,
        holding: AcquiredHolding::Office(Office {
            id: new_id(acting, HoldingKind::Office),
            size,
            yield_mode: OfficeYieldMode::Gold,
        }),
    };
    acquire(acting, offer, ctx)
}

/// Buy an organization.
pub fn acquire_organization(
    acting: &Acting<'_>,
    kind: OrganizationKind,
    size: HoldingSize,
    ctx: &mut DecideContext<'_>,
) -> Result<Vec<Event>, RuleViolation> {
    let stats = organization_stats(kind, size);
    let offer = Offer {
        key: "acquire_organization",
        label: "organization",
        dc: acquisition_dc(size),
        standing: Standing::Influence,
        price_gold: stats.price_gold,
        price_influence: stats.price_influence,
        holding: AcquiredHolding::Organization(Organization {
            id: new_id(acting, HoldingKind::Organization),
            kind,
            size,
            facilities: Vec::new(),
        }),
    };
    acquire(acting, offer, ctx)
}

/// Settle tenant families on one of the player's domains.
pub fn acquire_tenants(
    acting: &Acting<'_>,
    domain_id: &HoldingId,
    count: u32,
) -> Result<Vec<Event>, RuleViolation> {
    let player = acting.player;
    let domain = player
        .holdings
        .domain(domain_id)
        .ok_or_else(|| RuleViolation::state(format!("no domain `{domain_id}`")))?;
    let room = domain_stats(domain.tier).tenant_cap.saturating_sub(domain.tenants);
    if room == 0 {
        return Err(RuleViolation::state(format!("domain `{domain_id}` has no room for tenants")));
    }
    require_range(count, room, "tenant families")?;
    let gold_spent = count.saturating_mul(TENANT_PRICE);
    acting.require_gold(gold_spent, "settling tenants")?;
    let usage = acting.claim_slot("acquire_tenants", 1)?;

    let message =
        format!("{} settled {count} tenant families on {domain_id}", player.display_name);
    Ok(vec![
        acting.private(EventPayload::PlayerTenantsAcquired {
            player_id: player.id.clone(),
            usage: Some(usage),
            domain_id: domain_id.clone(),
            count,
            gold_spent,
        }),
        acting.log(message),
    ])
}

/// Recruit troop units.
pub fn recruit_troops(
    acting: &Acting<'_>,
    kind: TroopKind,
    count: u32,
) -> Result<Vec<Event>, RuleViolation> {
    require_range(count, MAX_RECRUIT, "recruits")?;
    let gold_spent = troop_stats(kind).price.saturating_mul(count);
    acting.require_gold(gold_spent, "recruiting")?;
    let usage = acting.claim_slot("recruit", 1)?;

    let player = acting.player;
    let unit = match kind {
        TroopKind::Militia => "militia",
        TroopKind::Mercenary => "mercenary",
        TroopKind::Guard => "guard",
    };
    let message = format!("{} recruited {count} {unit} units", player.display_name);
    Ok(vec![
        acting.private(EventPayload::PlayerTroopsRecruited {
            player_id: player.id.clone(),
            usage: Some(usage),
            kind,
            count,
            gold_spent,
        }),
        acting.log(message),
    ])
}

/// Hire a specialist. At most one of each kind.
pub fn hire_specialist(
    acting: &Acting<'_>,
    kind: SpecialistKind,
) -> Result<Vec<Event>, RuleViolation> {
    let player = acting.player;
    let title = match kind {
        SpecialistKind::Artisan => "an artisan",
        SpecialistKind::Steward => "a steward",
        SpecialistKind::Merchant => "a merchant",
        SpecialistKind::Chancellor => "a chancellor",
    };
    if player.holdings.has_specialist(kind) {
        return Err(RuleViolation::state(format!("{title} is already hired")));
    }
    acting.require_gold(SPECIALIST_PRICE, "hiring a specialist")?;
    let usage = acting.claim_slot("hire", 1)?;

    let specialist = Specialist {
        id: HoldingId::new(acting.next_id("spec")),
        kind,
        hired_round: acting.campaign.round,
    };
    let message = format!("{} hired {title}", player.display_name);
    Ok(vec![
        acting.private(EventPayload::PlayerSpecialistHired {
            player_id: player.id.clone(),
            usage: Some(usage),
            specialist,
            gold_spent: SPECIALIST_PRICE,
        }),
        acting.log(message),
    ])
}

/// Raise a holding one rank, paying the price difference.
pub fn upgrade(acting: &Acting<'_>, target: &HoldingRef) -> Result<Vec<Event>, RuleViolation> {
    let player = acting.player;
    if !player.holdings.contains(target) {
        return Err(RuleViolation::state(format!("no {:?} `{}`", target.kind, target.id)));
    }
    let (rank, gold_spent) = upgrade_cost(&player.holdings, target).ok_or_else(|| {
        RuleViolation::input(format!("`{}` is already at the highest rank", target.id))
    })?;
    acting.require_gold(gold_spent, "the upgrade")?;
    let usage = acting.claim_slot("upgrade", 1)?;

    let message = format!("{} upgraded {}", player.display_name, target.id);
    Ok(vec![
        acting.private(EventPayload::PlayerHoldingUpgraded {
            player_id: player.id.clone(),
            usage: Some(usage),
            target: target.clone(),
            rank,
            gold_spent,
        }),
        acting.log(message),
    ])
}
