//! Holding entities owned by a player.
//!
//! Holdings carry only their identity, rank and built facilities. What a
//! holding produces or costs is derived from its rank through the rule
//! tables in `holdfast-rules`, and what a facility does is resolved through
//! the injected catalog -- neither is stored inline.

use serde::{Deserialize, Serialize};

use crate::enums::{
    CityPropertyMode, DomainTier, HoldingKind, HoldingSize, OfficeYieldMode, OrganizationKind,
    SpecialistKind, TroopKind,
};
use crate::ids::{FacilityId, HoldingId, MaterialId};

/// Generic reference to one holding of a player.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HoldingRef {
    /// Which collection the holding lives in.
    pub kind: HoldingKind,
    /// The holding's ID.
    pub id: HoldingId,
}

impl HoldingRef {
    /// Build a reference from its parts.
    pub fn new(kind: HoldingKind, id: impl Into<HoldingId>) -> Self {
        Self { kind, id: id.into() }
    }
}

/// A built facility. Cost and effects live in the catalog under `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityInstance {
    /// Unique facility ID.
    pub id: FacilityId,
    /// Catalog key, e.g. `domain.granary`.
    pub key: String,
    /// Round the facility became usable.
    pub built_round: u32,
}

/// A facility under construction that completes in a later round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongTermProject {
    /// ID the facility will carry once complete.
    pub id: FacilityId,
    /// Holding the facility is being built on.
    pub host: HoldingRef,
    /// Catalog key of the facility.
    pub facility_key: String,
    /// Round construction started.
    pub started_round: u32,
    /// First round whose maintenance materializes the facility.
    pub completes_round: u32,
}

/// A rural domain producing raw materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Holding ID.
    pub id: HoldingId,
    /// Size rank.
    pub tier: DomainTier,
    /// Raw material the domain produces and gathers.
    pub primary_raw: MaterialId,
    /// Number of tenant families paying rent.
    pub tenants: u32,
    /// Built facilities.
    pub facilities: Vec<FacilityInstance>,
}

/// A city property, leased out or used for production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityProperty {
    /// Holding ID.
    pub id: HoldingId,
    /// Size rank.
    pub size: HoldingSize,
    /// Current use.
    pub mode: CityPropertyMode,
    /// Built facilities.
    pub facilities: Vec<FacilityInstance>,
}

/// A workshop refining raw into special materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workshop {
    /// Holding ID.
    pub id: HoldingId,
    /// Size rank.
    pub size: HoldingSize,
    /// Built facilities.
    pub facilities: Vec<FacilityInstance>,
}

/// A storage retaining materials across the conversion phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    /// Holding ID.
    pub id: HoldingId,
    /// Size rank.
    pub size: HoldingSize,
    /// Built facilities.
    pub facilities: Vec<FacilityInstance>,
}

/// A political office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Office {
    /// Holding ID.
    pub id: HoldingId,
    /// Size rank.
    pub size: HoldingSize,
    /// What the office yields.
    pub yield_mode: OfficeYieldMode,
}

/// A guild, underworld circle or cult.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Holding ID.
    pub id: HoldingId,
    /// Flavor.
    pub kind: OrganizationKind,
    /// Size rank.
    pub size: HoldingSize,
    /// Built facilities.
    pub facilities: Vec<FacilityInstance>,
}

/// A trade enterprise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEnterprise {
    /// Holding ID.
    pub id: HoldingId,
    /// Size rank.
    pub size: HoldingSize,
    /// Built facilities.
    pub facilities: Vec<FacilityInstance>,
}

/// Troop counts by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Troops {
    /// Militia units.
    pub militia: u32,
    /// Mercenary units.
    pub mercenaries: u32,
    /// Guard units.
    pub guards: u32,
}

impl Troops {
    /// Unit count of one kind.
    pub const fn count(&self, kind: TroopKind) -> u32 {
        match kind {
            TroopKind::Militia => self.militia,
            TroopKind::Mercenary => self.mercenaries,
            TroopKind::Guard => self.guards,
        }
    }

    /// Mutable unit count of one kind.
    pub const fn count_mut(&mut self, kind: TroopKind) -> &mut u32 {
        match kind {
            TroopKind::Militia => &mut self.militia,
            TroopKind::Mercenary => &mut self.mercenaries,
            TroopKind::Guard => &mut self.guards,
        }
    }
}

/// A hired specialist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialist {
    /// Holding-style ID.
    pub id: HoldingId,
    /// Specialty.
    pub kind: SpecialistKind,
    /// Round of hiring.
    pub hired_round: u32,
}

/// Everything a player owns besides liquid assets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holdings {
    /// Domains, in acquisition order.
    pub domains: Vec<Domain>,
    /// City properties.
    pub city_properties: Vec<CityProperty>,
    /// Workshops.
    pub workshops: Vec<Workshop>,
    /// Storages.
    pub storages: Vec<Storage>,
    /// Offices.
    pub offices: Vec<Office>,
    /// Organizations.
    pub organizations: Vec<Organization>,
    /// Trade enterprises.
    pub trade_enterprises: Vec<TradeEnterprise>,
    /// Troops.
    pub troops: Troops,
    /// Facilities still under construction.
    pub long_term_projects: Vec<LongTermProject>,
    /// Specialists.
    pub specialists: Vec<Specialist>,
    /// Counter used to derive unique IDs for new holdings and facilities.
    pub next_seq: u32,
}

impl Holdings {
    /// Look up a domain by ID.
    pub fn domain(&self, id: &HoldingId) -> Option<&Domain> {
        self.domains.iter().find(|d| &d.id == id)
    }

    /// Whether the referenced holding exists.
    pub fn contains(&self, target: &HoldingRef) -> bool {
        let id = &target.id;
        match target.kind {
            HoldingKind::Domain => self.domains.iter().any(|h| &h.id == id),
            HoldingKind::CityProperty => self.city_properties.iter().any(|h| &h.id == id),
            HoldingKind::Workshop => self.workshops.iter().any(|h| &h.id == id),
            HoldingKind::Storage => self.storages.iter().any(|h| &h.id == id),
            HoldingKind::Office => self.offices.iter().any(|h| &h.id == id),
            HoldingKind::Organization => self.organizations.iter().any(|h| &h.id == id),
            HoldingKind::TradeEnterprise => self.trade_enterprises.iter().any(|h| &h.id == id),
        }
    }

    /// Facilities built on the referenced holding. Offices carry none.
    pub fn facilities_of(&self, target: &HoldingRef) -> Option<&[FacilityInstance]> {
        let id = &target.id;
        match target.kind {
            HoldingKind::Domain => {
                self.domains.iter().find(|h| &h.id == id).map(|h| h.facilities.as_slice())
            }
            HoldingKind::CityProperty => self
                .city_properties
                .iter()
                .find(|h| &h.id == id)
                .map(|h| h.facilities.as_slice()),
            HoldingKind::Workshop => {
                self.workshops.iter().find(|h| &h.id == id).map(|h| h.facilities.as_slice())
            }
            HoldingKind::Storage => {
                self.storages.iter().find(|h| &h.id == id).map(|h| h.facilities.as_slice())
            }
            HoldingKind::Office => {
                self.offices.iter().find(|h| &h.id == id).map(|_| &[][..])
            }
            HoldingKind::Organization => self
                .organizations
                .iter()
                .find(|h| &h.id == id)
                .map(|h| h.facilities.as_slice()),
            HoldingKind::TradeEnterprise => self
                .trade_enterprises
                .iter()
                .find(|h| &h.id == id)
                .map(|h| h.facilities.as_slice()),
        }
    }

    /// Mutable facility list of the referenced holding. Offices carry none.
    pub fn facilities_of_mut(&mut self, target: &HoldingRef) -> Option<&mut Vec<FacilityInstance>> {
        let id = &target.id;
        match target.kind {
            HoldingKind::Domain => {
                self.domains.iter_mut().find(|h| &h.id == id).map(|h| &mut h.facilities)
            }
            HoldingKind::CityProperty => {
                self.city_properties.iter_mut().find(|h| &h.id == id).map(|h| &mut h.facilities)
            }
            HoldingKind::Workshop => {
                self.workshops.iter_mut().find(|h| &h.id == id).map(|h| &mut h.facilities)
            }
            HoldingKind::Storage => {
                self.storages.iter_mut().find(|h| &h.id == id).map(|h| &mut h.facilities)
            }
            HoldingKind::Office => None,
            HoldingKind::Organization => {
                self.organizations.iter_mut().find(|h| &h.id == id).map(|h| &mut h.facilities)
            }
            HoldingKind::TradeEnterprise => self
                .trade_enterprises
                .iter_mut()
                .find(|h| &h.id == id)
                .map(|h| &mut h.facilities),
        }
    }

    /// Projects under construction on the referenced holding.
    pub fn projects_on(&self, target: &HoldingRef) -> usize {
        self.long_term_projects.iter().filter(|p| &p.host == target).count()
    }

    /// Whether a specialist of the given kind has been hired.
    pub fn has_specialist(&self, kind: SpecialistKind) -> bool {
        self.specialists.iter().any(|s| s.kind == kind)
    }

    /// Number of specialists of the given kind.
    pub fn specialist_count(&self, kind: SpecialistKind) -> u32 {
        let count = self.specialists.iter().filter(|s| s.kind == kind).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}
