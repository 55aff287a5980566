//! Shared type definitions for the Holdfast campaign engine.
//!
//! This crate contains all the core domain types used across the Holdfast
//! workspace: identifiers, enumerations, campaign and player state, holding
//! entities, the rules configuration, and the command and event
//! vocabularies. It has no behavior beyond small accessors; rules live in
//! `holdfast-rules` and state transitions in `holdfast-engine`.

pub mod commands;
pub mod enums;
pub mod events;
pub mod holdings;
pub mod ids;
pub mod rules;
pub mod state;

pub use commands::*;
pub use enums::*;
pub use events::*;
pub use holdings::*;
pub use ids::*;
pub use rules::*;
pub use state::*;
