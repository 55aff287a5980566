//! Deterministic rule primitives for the Holdfast campaign engine.
//!
//! Everything in this crate is a pure function of its inputs plus an
//! explicitly passed [`rng::GameRng`]. The decision engine composes these
//! primitives; nothing here knows about commands or events.
//!
//! # Modules
//!
//! - [`rng`] -- Seeded and entropy-backed random streams
//! - [`dice`] -- `NdM` dice expressions
//! - [`tiers`] -- Check resolution and tier-dependent yield tables
//! - [`holdings`] -- Per-rank holding, troop and specialist tables
//! - [`catalog`] -- Facility and material catalog
//! - [`budgets`] -- Derived per-player budgets and caps
//! - [`market`] -- Market roll tables
//! - [`section_events`] -- Section event table, draws and modifiers
//! - [`error`] -- Error types

pub mod budgets;
pub mod catalog;
pub mod dice;
pub mod error;
pub mod holdings;
pub mod market;
pub mod rng;
pub mod section_events;
pub mod tiers;

pub use catalog::{Catalog, EffectKind, FacilityDef, FacilityEffect, MaterialDef};
pub use dice::{DiceExpression, DiceRoll, roll_dice, roll_expression};
pub use error::{CatalogError, DiceError};
pub use rng::{EntropyRng, GameRng, SeededRng};
pub use section_events::EventModifiers;
pub use tiers::{resolve_success_tier, roll_check};
