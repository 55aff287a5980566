//! Facility and material catalog.
//!
//! The catalog is static data: what each facility costs and does, and how
//! each material is classified. It is constructed once, never mutated, and
//! passed to the decision engine explicitly. [`Catalog::standard`] is the
//! built-in set; [`Catalog::from_yaml`] loads an alternative.

use std::collections::BTreeMap;

use holdfast_types::{FacilityInstance, HoldingKind, MaterialGroup, MaterialId, MaterialKind};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// What a facility contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Extra raw units produced by the host domain.
    RawProduction,
    /// Extra gold produced by the host.
    GoldProduction,
    /// Labor added to the budget.
    Labor,
    /// Influence added to the budget.
    Influence,
    /// Special units the host workshop may refine.
    WorkshopCapacity,
    /// Units the host storage may retain.
    StorageCapacity,
    /// Gold taken off the host's upkeep.
    UpkeepReduction,
    /// Raid losses absorbed.
    RaidProtection,
}

/// One effect of a facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityEffect {
    /// What is affected.
    pub kind: EffectKind,
    /// By how much.
    pub amount: u32,
}

impl FacilityEffect {
    /// Build an effect.
    pub const fn new(kind: EffectKind, amount: u32) -> Self {
        Self { kind, amount }
    }
}

/// A buildable facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityDef {
    /// Stable key, e.g. `domain.granary`.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Holding kind that can host it.
    pub host: HoldingKind,
    /// Gold cost.
    #[serde(default)]
    pub cost_gold: u32,
    /// Raw units consumed, any material.
    #[serde(default)]
    pub cost_raw: u32,
    /// Rounds of construction. 1 means usable immediately.
    #[serde(default = "default_build_rounds")]
    pub build_rounds: u32,
    /// What the facility does once built.
    #[serde(default)]
    pub effects: Vec<FacilityEffect>,
}

impl FacilityDef {
    /// Total amount of one effect kind.
    pub fn effect(&self, kind: EffectKind) -> u32 {
        self.effects
            .iter()
            .filter(|e| e.kind == kind)
            .fold(0, |acc, e| acc.saturating_add(e.amount))
    }
}

/// A tradeable material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialDef {
    /// Stable key, e.g. `raw.grain`.
    pub id: MaterialId,
    /// Display name.
    pub name: String,
    /// Raw or special.
    pub kind: MaterialKind,
    /// Market group.
    pub group: MaterialGroup,
    /// Special material this raw refines into, if any.
    #[serde(default)]
    pub refines_to: Option<MaterialId>,
}

/// Read-only lookup of facilities and materials.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    facilities: BTreeMap<String, FacilityDef>,
    materials: BTreeMap<MaterialId, MaterialDef>,
}

/// On-disk shape of a catalog.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    facilities: Vec<FacilityDef>,
    #[serde(default)]
    materials: Vec<MaterialDef>,
}

const fn default_build_rounds() -> u32 {
    1
}

impl Catalog {
    /// Build a catalog, rejecting duplicates and dangling references.
    pub fn new(
        facilities: Vec<FacilityDef>,
        materials: Vec<MaterialDef>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for material in materials {
            if catalog.materials.contains_key(&material.id) {
                return Err(CatalogError::DuplicateKey { key: material.id.to_string() });
            }
            if material.group.kind() != material.kind {
                return Err(CatalogError::InvalidEntry {
                    key: material.id.to_string(),
                    reason: format!("group {:?} does not trade as {:?}", material.group, material.kind),
                });
            }
            catalog.materials.insert(material.id.clone(), material);
        }
        for material in catalog.materials.values() {
            if let Some(target) = &material.refines_to {
                let refined = catalog.materials.get(target);
                if material.kind != MaterialKind::Raw
                    || refined.is_none_or(|m| m.kind != MaterialKind::Special)
                {
                    return Err(CatalogError::InvalidEntry {
                        key: material.id.to_string(),
                        reason: format!("cannot refine into {target}"),
                    });
                }
            }
        }
        for facility in facilities {
            if catalog.facilities.contains_key(&facility.key) {
                return Err(CatalogError::DuplicateKey { key: facility.key });
            }
            if facility.build_rounds == 0 {
                return Err(CatalogError::InvalidEntry {
                    key: facility.key,
                    reason: "build_rounds must be at least 1".to_owned(),
                });
            }
            if facility.host == HoldingKind::Office {
                return Err(CatalogError::InvalidEntry {
                    key: facility.key,
                    reason: "offices cannot host facilities".to_owned(),
                });
            }
            catalog.facilities.insert(facility.key.clone(), facility);
        }
        Ok(catalog)
    }

    /// Parse a YAML document with `facilities` and `materials` lists.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yml::from_str(yaml)?;
        Self::new(file.facilities, file.materials)
    }

    /// Look up a facility definition.
    pub fn facility(&self, key: &str) -> Option<&FacilityDef> {
        self.facilities.get(key)
    }

    /// Look up a material definition.
    pub fn material(&self, id: &MaterialId) -> Option<&MaterialDef> {
        self.materials.get(id)
    }

    /// All facilities, by key.
    pub fn facilities(&self) -> impl Iterator<Item = &FacilityDef> {
        self.facilities.values()
    }

    /// All materials, by ID.
    pub fn materials(&self) -> impl Iterator<Item = &MaterialDef> {
        self.materials.values()
    }

    /// Sum of one effect kind over built facilities. Unknown keys add nothing.
    pub fn effect_total(&self, facilities: &[FacilityInstance], kind: EffectKind) -> u32 {
        facilities
            .iter()
            .filter_map(|f| self.facility(&f.key))
            .fold(0, |acc, def| acc.saturating_add(def.effect(kind)))
    }

    /// The built-in catalog.
    pub fn standard() -> Self {
        let materials = vec![
            raw("raw.grain", "Grain", MaterialGroup::Grain, "special.provisions"),
            raw("raw.timber", "Timber", MaterialGroup::Timber, "special.tools"),
            raw("raw.ore", "Ore", MaterialGroup::Ore, "special.weapons"),
            raw("raw.livestock", "Livestock", MaterialGroup::Livestock, "special.fine_leather"),
            raw("raw.wool", "Wool", MaterialGroup::Textiles, "special.cloth"),
            special("special.provisions", "Provisions", MaterialGroup::Provisions),
            special("special.tools", "Tools", MaterialGroup::Tools),
            special("special.weapons", "Weapons", MaterialGroup::Weapons),
            special("special.fine_leather", "Fine leather", MaterialGroup::Luxuries),
            special("special.cloth", "Cloth", MaterialGroup::Cloth),
        ];
        let facilities = vec![
            facility("domain.granary", "Granary", HoldingKind::Domain, 4, 2, 1, &[(
                EffectKind::RawProduction,
                2,
            )]),
            facility("domain.mill", "Mill", HoldingKind::Domain, 6, 0, 1, &[(
                EffectKind::GoldProduction,
                1,
            )]),
            facility("domain.manor_house", "Manor house", HoldingKind::Domain, 10, 4, 2, &[
                (EffectKind::Labor, 1),
                (EffectKind::Influence, 1),
            ]),
            facility("domain.watchtower", "Watchtower", HoldingKind::Domain, 4, 0, 1, &[(
                EffectKind::RaidProtection,
                3,
            )]),
            facility("workshop.forge", "Forge", HoldingKind::Workshop, 6, 2, 1, &[(
                EffectKind::WorkshopCapacity,
                2,
            )]),
            facility("workshop.guild_seal", "Guild seal", HoldingKind::Workshop, 5, 0, 1, &[(
                EffectKind::UpkeepReduction,
                1,
            )]),
            facility("storage.cellar", "Cellar", HoldingKind::Storage, 3, 0, 1, &[(
                EffectKind::StorageCapacity,
                5,
            )]),
            facility("storage.warehouse", "Warehouse", HoldingKind::Storage, 8, 4, 2, &[(
                EffectKind::StorageCapacity,
                15,
            )]),
            facility("city.shopfront", "Shopfront", HoldingKind::CityProperty, 6, 0, 1, &[(
                EffectKind::GoldProduction,
                2,
            )]),
            facility("city.tenement", "Tenement", HoldingKind::CityProperty, 5, 2, 1, &[(
                EffectKind::Labor,
                1,
            )]),
            facility("org.safehouse", "Safehouse", HoldingKind::Organization, 6, 0, 1, &[
                (EffectKind::Influence, 1),
                (EffectKind::RaidProtection, 1),
            ]),
            facility(
                "trade.counting_house",
                "Counting house",
                HoldingKind::TradeEnterprise,
                8,
                0,
                1,
                &[(EffectKind::GoldProduction, 2)],
            ),
        ];
        let mut catalog = Self::default();
        for m in materials {
            catalog.materials.insert(m.id.clone(), m);
        }
        for f in facilities {
            catalog.facilities.insert(f.key.clone(), f);
        }
        catalog
    }
}

fn raw(id: &str, name: &str, group: MaterialGroup, refines_to: &str) -> MaterialDef {
    MaterialDef {
        id: MaterialId::new(id),
        name: name.to_owned(),
        kind: MaterialKind::Raw,
        group,
        refines_to: Some(MaterialId::new(refines_to)),
    }
}

fn special(id: &str, name: &str, group: MaterialGroup) -> MaterialDef {
    MaterialDef {
        id: MaterialId::new(id),
        name: name.to_owned(),
        kind: MaterialKind::Special,
        group,
        refines_to: None,
    }
}

fn facility(
    key: &str,
    name: &str,
    host: HoldingKind,
    cost_gold: u32,
    cost_raw: u32,
    build_rounds: u32,
    effects: &[(EffectKind, u32)],
) -> FacilityDef {
    FacilityDef {
        key: key.to_owned(),
        name: name.to_owned(),
        host,
        cost_gold,
        cost_raw,
        build_rounds,
        effects: effects.iter().map(|&(kind, amount)| FacilityEffect::new(kind, amount)).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use holdfast_types::FacilityId;

    #[test]
    fn standard_catalog_is_self_consistent() {
        let standard = Catalog::standard();
        let rebuilt = Catalog::new(
            standard.facilities().cloned().collect(),
            standard.materials().cloned().collect(),
        )
        .unwrap();
        assert_eq!(rebuilt, standard);
        assert_eq!(standard.facilities().count(), 12);
        assert_eq!(standard.materials().count(), 10);
    }

    #[test]
    fn every_raw_refines_into_a_special() {
        let catalog = Catalog::standard();
        for m in catalog.materials().filter(|m| m.kind == MaterialKind::Raw) {
            let target = m.refines_to.as_ref().and_then(|id| catalog.material(id)).unwrap();
            assert_eq!(target.kind, MaterialKind::Special);
        }
    }

    #[test]
    fn multi_round_facilities() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.facility("domain.manor_house").unwrap().build_rounds, 2);
        assert_eq!(catalog.facility("storage.warehouse").unwrap().build_rounds, 2);
        assert_eq!(catalog.facility("domain.granary").unwrap().build_rounds, 1);
    }

    #[test]
    fn effect_total_ignores_unknown_keys() {
        let catalog = Catalog::standard();
        let built = vec![
            FacilityInstance { id: FacilityId::new("f1"), key: "storage.cellar".into(), built_round: 1 },
            FacilityInstance { id: FacilityId::new("f2"), key: "storage.warehouse".into(), built_round: 3 },
            FacilityInstance { id: FacilityId::new("f3"), key: "nope".into(), built_round: 3 },
        ];
        assert_eq!(catalog.effect_total(&built, EffectKind::StorageCapacity), 20);
        assert_eq!(catalog.effect_total(&built, EffectKind::Labor), 0);
    }

    #[test]
    fn loads_yaml() {
        let yaml = r"
materials:
  - id: raw.clay
    name: Clay
    kind: raw
    group: ore
    refines_to: special.bricks
  - id: special.bricks
    name: Bricks
    kind: special
    group: tools
facilities:
  - key: domain.kiln
    name: Kiln
    host: domain
    cost_gold: 5
    effects:
      - kind: gold_production
        amount: 1
";
        let catalog = Catalog::from_yaml(yaml).unwrap();
        let kiln = catalog.facility("domain.kiln").unwrap();
        assert_eq!(kiln.build_rounds, 1);
        assert_eq!(kiln.effect(EffectKind::GoldProduction), 1);
        assert!(catalog.material(&MaterialId::new("raw.clay")).is_some());
    }

    #[test]
    fn rejects_dangling_refinement() {
        let yaml = r"
materials:
  - id: raw.clay
    name: Clay
    kind: raw
    group: ore
    refines_to: special.missing
";
        assert!(matches!(Catalog::from_yaml(yaml), Err(CatalogError::InvalidEntry { .. })));
    }

    #[test]
    fn rejects_zero_build_rounds() {
        let yaml = r"
facilities:
  - key: domain.kiln
    name: Kiln
    host: domain
    build_rounds: 0
";
        assert!(matches!(Catalog::from_yaml(yaml), Err(CatalogError::InvalidEntry { .. })));
    }
}
