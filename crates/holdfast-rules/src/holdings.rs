//! Per-rank holding, troop and specialist tables.
//!
//! All values are whole units (`u32`). Prices are gold unless a field says
//! otherwise. Facility effects are not included here; see
//! [`crate::catalog`] and [`crate::budgets`].

use holdfast_types::{
    DomainTier, HoldingKind, HoldingRank, HoldingRef, HoldingSize, Holdings, OrganizationKind,
    SpecialistKind, TroopKind,
};

/// Gold per tenant family settled on a domain.
pub const TENANT_PRICE: u32 = 3;

/// Gold each tenant family pays per round.
pub const TENANT_GOLD: u32 = 1;

/// Gold to hire any specialist.
pub const SPECIALIST_PRICE: u32 = 6;

/// Workshop capacity added by each artisan.
pub const ARTISAN_WORKSHOP_CAPACITY: u32 = 2;

/// Labor budget added by each steward.
pub const STEWARD_LABOR: u32 = 1;

/// Bonus each merchant adds to sell checks.
pub const MERCHANT_SELL_BONUS: i32 = 2;

/// Influence budget added by each chancellor.
pub const CHANCELLOR_INFLUENCE: u32 = 1;

/// Most troop units recruited by one command.
pub const MAX_RECRUIT: u32 = 4;

// ---------------------------------------------------------------------------
// Domains
// ---------------------------------------------------------------------------

/// Output, costs and limits of one domain tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainStats {
    /// Raw units produced per round.
    pub raw: u32,
    /// Gold produced per round.
    pub gold: u32,
    /// Labor added to the budget.
    pub labor: u32,
    /// Gold upkeep per round.
    pub upkeep_gold: u32,
    /// Labor upkeep per round.
    pub upkeep_labor: u32,
    /// Facility slots.
    pub slots: u32,
    /// Labor that may be invested in gathering here per action.
    pub gather_cap: u32,
    /// Most tenant families.
    pub tenant_cap: u32,
    /// Purchase price. The starter tier is only priced for upgrade deltas.
    pub price: u32,
}

/// Stats of a domain tier.
pub const fn domain_stats(tier: DomainTier) -> DomainStats {
    match tier {
        DomainTier::Starter => DomainStats {
            raw: 6,
            gold: 0,
            labor: 2,
            upkeep_gold: 0,
            upkeep_labor: 0,
            slots: 2,
            gather_cap: 2,
            tenant_cap: 0,
            price: 6,
        },
        DomainTier::Small => DomainStats {
            raw: 10,
            gold: 1,
            labor: 4,
            upkeep_gold: 1,
            upkeep_labor: 0,
            slots: 4,
            gather_cap: 4,
            tenant_cap: 2,
            price: 12,
        },
        DomainTier::Medium => DomainStats {
            raw: 16,
            gold: 2,
            labor: 6,
            upkeep_gold: 2,
            upkeep_labor: 1,
            slots: 6,
            gather_cap: 6,
            tenant_cap: 4,
            price: 24,
        },
        DomainTier::Large => DomainStats {
            raw: 24,
            gold: 4,
            labor: 8,
            upkeep_gold: 4,
            upkeep_labor: 2,
            slots: 8,
            gather_cap: 8,
            tenant_cap: 6,
            price: 48,
        },
    }
}

// ---------------------------------------------------------------------------
// Sized holdings
// ---------------------------------------------------------------------------

/// Stats of a workshop size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkshopStats {
    /// Special units refined per round.
    pub capacity: u32,
    /// Gold upkeep.
    pub upkeep_gold: u32,
    /// Labor upkeep.
    pub upkeep_labor: u32,
    /// Facility slots.
    pub slots: u32,
    /// Purchase price.
    pub price: u32,
}

/// Stats of a workshop size.
pub const fn workshop_stats(size: HoldingSize) -> WorkshopStats {
    match size {
        HoldingSize::Small => {
            WorkshopStats { capacity: 2, upkeep_gold: 1, upkeep_labor: 1, slots: 1, price: 8 }
        }
        HoldingSize::Medium => {
            WorkshopStats { capacity: 4, upkeep_gold: 2, upkeep_labor: 1, slots: 2, price: 16 }
        }
        HoldingSize::Large => {
            WorkshopStats { capacity: 6, upkeep_gold: 3, upkeep_labor: 2, slots: 3, price: 32 }
        }
    }
}

/// Stats of a storage size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageStats {
    /// Units retained before the campaign's storage multiplier.
    pub base_capacity: u32,
    /// Gold upkeep.
    pub upkeep_gold: u32,
    /// Labor upkeep.
    pub upkeep_labor: u32,
    /// Facility slots.
    pub slots: u32,
    /// Purchase price.
    pub price: u32,
}

/// Stats of a storage size.
pub const fn storage_stats(size: HoldingSize) -> StorageStats {
    match size {
        HoldingSize::Small => {
            StorageStats { base_capacity: 5, upkeep_gold: 1, upkeep_labor: 0, slots: 1, price: 6 }
        }
        HoldingSize::Medium => {
            StorageStats { base_capacity: 10, upkeep_gold: 1, upkeep_labor: 1, slots: 2, price: 12 }
        }
        HoldingSize::Large => {
            StorageStats { base_capacity: 20, upkeep_gold: 2, upkeep_labor: 1, slots: 3, price: 24 }
        }
    }
}

/// Stats of a city property size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityPropertyStats {
    /// Gold per round while leased.
    pub leased_gold: u32,
    /// Labor added to the budget while in production.
    pub production_labor: u32,
    /// Gold upkeep while in production. Leased properties cost nothing.
    pub production_upkeep_gold: u32,
    /// Facility slots.
    pub slots: u32,
    /// Purchase price.
    pub price: u32,
}

/// Stats of a city property size.
pub const fn city_property_stats(size: HoldingSize) -> CityPropertyStats {
    match size {
        HoldingSize::Small => CityPropertyStats {
            leased_gold: 2,
            production_labor: 1,
            production_upkeep_gold: 0,
            slots: 1,
            price: 10,
        },
        HoldingSize::Medium => CityPropertyStats {
            leased_gold: 4,
            production_labor: 2,
            production_upkeep_gold: 1,
            slots: 2,
            price: 20,
        },
        HoldingSize::Large => CityPropertyStats {
            leased_gold: 8,
            production_labor: 4,
            production_upkeep_gold: 2,
            slots: 3,
            price: 40,
        },
    }
}

/// Stats of an office size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfficeStats {
    /// Gold per round in gold mode.
    pub gold_yield: u32,
    /// Influence added to the budget in influence mode.
    pub influence_yield: u32,
    /// Gold price.
    pub price_gold: u32,
    /// Influence price.
    pub price_influence: u32,
}

/// Stats of an office size.
pub const fn office_stats(size: HoldingSize) -> OfficeStats {
    match size {
        HoldingSize::Small => {
            OfficeStats { gold_yield: 2, influence_yield: 1, price_gold: 8, price_influence: 2 }
        }
        HoldingSize::Medium => {
            OfficeStats { gold_yield: 4, influence_yield: 2, price_gold: 16, price_influence: 4 }
        }
        HoldingSize::Large => {
            OfficeStats { gold_yield: 8, influence_yield: 4, price_gold: 32, price_influence: 8 }
        }
    }
}

/// Stats of an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrganizationStats {
    /// Influence added to the budget.
    pub influence: u32,
    /// Gold per round.
    pub gold: u32,
    /// Labor added to the budget.
    pub labor: u32,
    /// Facility slots.
    pub slots: u32,
    /// Gold price.
    pub price_gold: u32,
    /// Influence price.
    pub price_influence: u32,
}

/// Stats of an organization of the given kind and size.
pub const fn organization_stats(kind: OrganizationKind, size: HoldingSize) -> OrganizationStats {
    let (base_influence, flavor, slots, price_gold, price_influence): (u32, u32, u32, u32, u32) =
        match size {
            HoldingSize::Small => (1, 1, 1, 8, 1),
            HoldingSize::Medium => (2, 2, 2, 16, 2),
            HoldingSize::Large => (3, 3, 3, 32, 4),
        };
    let guild_labor = match size {
        HoldingSize::Small | HoldingSize::Medium => 1,
        HoldingSize::Large => 2,
    };
    match kind {
        OrganizationKind::Guild => OrganizationStats {
            influence: base_influence,
            gold: 0,
            labor: guild_labor,
            slots,
            price_gold,
            price_influence,
        },
        OrganizationKind::Underworld => OrganizationStats {
            influence: base_influence,
            gold: flavor,
            labor: 0,
            slots,
            price_gold,
            price_influence,
        },
        OrganizationKind::Cult => OrganizationStats {
            influence: base_influence.saturating_add(1),
            gold: 0,
            labor: 0,
            slots,
            price_gold,
            price_influence,
        },
    }
}

/// Stats of a trade enterprise size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeEnterpriseStats {
    /// Gold per round.
    pub gold: u32,
    /// Gold upkeep.
    pub upkeep_gold: u32,
    /// Trade investments added to the cap.
    pub trade_cap: u32,
    /// Facility slots.
    pub slots: u32,
    /// Purchase price.
    pub price: u32,
}

/// Stats of a trade enterprise size.
pub const fn trade_enterprise_stats(size: HoldingSize) -> TradeEnterpriseStats {
    match size {
        HoldingSize::Small => {
            TradeEnterpriseStats { gold: 2, upkeep_gold: 1, trade_cap: 2, slots: 1, price: 12 }
        }
        HoldingSize::Medium => {
            TradeEnterpriseStats { gold: 4, upkeep_gold: 1, trade_cap: 4, slots: 2, price: 24 }
        }
        HoldingSize::Large => {
            TradeEnterpriseStats { gold: 6, upkeep_gold: 2, trade_cap: 6, slots: 3, price: 48 }
        }
    }
}

/// DC of the check to acquire a holding of this size.
pub const fn acquisition_dc(size: HoldingSize) -> i32 {
    match size {
        HoldingSize::Small => 10,
        HoldingSize::Medium => 14,
        HoldingSize::Large => 18,
    }
}

/// DC of the check to acquire a domain of this tier.
pub const fn domain_acquisition_dc(tier: DomainTier) -> i32 {
    match tier {
        DomainTier::Starter | DomainTier::Small => 10,
        DomainTier::Medium => 14,
        DomainTier::Large => 18,
    }
}

// ---------------------------------------------------------------------------
// Troops
// ---------------------------------------------------------------------------

/// Stats of a troop kind, per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TroopStats {
    /// Gold to recruit.
    pub price: u32,
    /// Gold upkeep per round.
    pub upkeep: u32,
    /// Raid losses absorbed per round.
    pub protection: u32,
}

/// Stats of a troop kind.
pub const fn troop_stats(kind: TroopKind) -> TroopStats {
    match kind {
        TroopKind::Militia => TroopStats { price: 1, upkeep: 0, protection: 1 },
        TroopKind::Mercenary => TroopStats { price: 3, upkeep: 1, protection: 2 },
        TroopKind::Guard => TroopStats { price: 2, upkeep: 1, protection: 2 },
    }
}

/// Every specialist kind, in hiring-table order.
pub const SPECIALISTS: [SpecialistKind; 4] = [
    SpecialistKind::Artisan,
    SpecialistKind::Steward,
    SpecialistKind::Merchant,
    SpecialistKind::Chancellor,
];

// ---------------------------------------------------------------------------
// Generic lookups
// ---------------------------------------------------------------------------

/// Facility slots of the referenced holding. Offices have none.
pub fn slots_of(holdings: &Holdings, target: &HoldingRef) -> Option<u32> {
    let id = &target.id;
    match target.kind {
        HoldingKind::Domain => holdings.domain(id).map(|d| domain_stats(d.tier).slots),
        HoldingKind::CityProperty => holdings
            .city_properties
            .iter()
            .find(|h| &h.id == id)
            .map(|h| city_property_stats(h.size).slots),
        HoldingKind::Workshop => {
            holdings.workshops.iter().find(|h| &h.id == id).map(|h| workshop_stats(h.size).slots)
        }
        HoldingKind::Storage => {
            holdings.storages.iter().find(|h| &h.id == id).map(|h| storage_stats(h.size).slots)
        }
        HoldingKind::Office => holdings.offices.iter().find(|h| &h.id == id).map(|_| 0),
        HoldingKind::Organization => holdings
            .organizations
            .iter()
            .find(|h| &h.id == id)
            .map(|h| organization_stats(h.kind, h.size).slots),
        HoldingKind::TradeEnterprise => holdings
            .trade_enterprises
            .iter()
            .find(|h| &h.id == id)
            .map(|h| trade_enterprise_stats(h.size).slots),
    }
}

/// Current rank of the referenced holding.
pub fn rank_of(holdings: &Holdings, target: &HoldingRef) -> Option<HoldingRank> {
    let id = &target.id;
    let sized = HoldingRank::Sized;
    match target.kind {
        HoldingKind::Domain => holdings.domain(id).map(|d| HoldingRank::Domain(d.tier)),
        HoldingKind::CityProperty => {
            holdings.city_properties.iter().find(|h| &h.id == id).map(|h| sized(h.size))
        }
        HoldingKind::Workshop => holdings.workshops.iter().find(|h| &h.id == id).map(|h| sized(h.size)),
        HoldingKind::Storage => holdings.storages.iter().find(|h| &h.id == id).map(|h| sized(h.size)),
        HoldingKind::Office => holdings.offices.iter().find(|h| &h.id == id).map(|h| sized(h.size)),
        HoldingKind::Organization => {
            holdings.organizations.iter().find(|h| &h.id == id).map(|h| sized(h.size))
        }
        HoldingKind::TradeEnterprise => {
            holdings.trade_enterprises.iter().find(|h| &h.id == id).map(|h| sized(h.size))
        }
    }
}

/// Gold price of a holding kind at a rank. Organizations are priced as a
/// guild; every organization kind costs the same.
pub const fn price_at(kind: HoldingKind, rank: HoldingRank) -> u32 {
    match (kind, rank) {
        (_, HoldingRank::Domain(tier)) => domain_stats(tier).price,
        (HoldingKind::Domain, HoldingRank::Sized(_)) => 0,
        (HoldingKind::Workshop, HoldingRank::Sized(size)) => workshop_stats(size).price,
        (HoldingKind::CityProperty, HoldingRank::Sized(size)) => city_property_stats(size).price,
        (HoldingKind::Storage, HoldingRank::Sized(size)) => storage_stats(size).price,
        (HoldingKind::Office, HoldingRank::Sized(size)) => office_stats(size).price_gold,
        (HoldingKind::Organization, HoldingRank::Sized(size)) => {
            organization_stats(OrganizationKind::Guild, size).price_gold
        }
        (HoldingKind::TradeEnterprise, HoldingRank::Sized(size)) => {
            trade_enterprise_stats(size).price
        }
    }
}

/// The next rank of a holding and the gold to reach it, or `None` when the
/// holding is missing or already at the top rank.
pub fn upgrade_cost(holdings: &Holdings, target: &HoldingRef) -> Option<(HoldingRank, u32)> {
    let current = rank_of(holdings, target)?;
    let next = match current {
        HoldingRank::Domain(tier) => HoldingRank::Domain(tier.next()?),
        HoldingRank::Sized(size) => HoldingRank::Sized(size.next()?),
    };
    let cost = price_at(target.kind, next).saturating_sub(price_at(target.kind, current));
    Some((next, cost))
}
