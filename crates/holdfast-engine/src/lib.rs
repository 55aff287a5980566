//! Event-sourced campaign engine for Holdfast.
//!
//! State changes only by folding events through [`apply_event`]; events
//! are only produced by [`decide`], which validates a command against the
//! current state and the rules. Given the same seed and the same command
//! sequence, the resulting state is byte-identical.
//!
//! # Modules
//!
//! - [`actions`] -- Handlers for actions-phase commands.
//! - [`config`] -- Configuration loading from `holdfast-config.yaml` into
//!   strongly-typed structs.
//! - [`context`] -- [`Actor`] and [`DecideContext`].
//! - [`decide`] -- Command validation and event emission.
//! - [`error`] -- [`RuleViolation`] and [`InvariantViolation`].
//! - [`feed`] -- Per-player filtering of the event log.
//! - [`phase`] -- The four-phase round state machine and bulk resolution.
//! - [`planner`] -- [`Planner`] trait and [`IdlePlanner`].
//! - [`reducer`] -- The pure event reducer.
//!
//! [`Planner`]: planner::Planner
//! [`IdlePlanner`]: planner::IdlePlanner

pub mod actions;
pub mod config;
pub mod context;
pub mod decide;
pub mod error;
pub mod feed;
pub mod phase;
pub mod planner;
pub mod reducer;

pub use config::{ConfigError, HoldfastConfig};
pub use context::{Actor, DecideContext};
pub use decide::decide;
pub use error::{InvariantViolation, RuleViolation};
pub use reducer::{apply_event, reduce_events};
