//! Error types for the holdfast-engine crate.
//!
//! [`RuleViolation`] is the only failure a well-behaved caller ever sees: a
//! command was rejected before any event was produced. [`InvariantViolation`]
//! means the reducer was handed an event that does not fit the state, which
//! only happens when a caller fabricates or reorders events.

use holdfast_types::{ErrorCode, PlayerId};

/// A rejected command. No events were produced and state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct RuleViolation {
    /// Classification of the failure.
    pub code: ErrorCode,
    /// Human-readable explanation.
    pub message: String,
}

impl RuleViolation {
    /// Build a violation with the given code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Wrong actor or role.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Auth, message)
    }

    /// Missing or duplicate entity, or entity in the wrong state.
    pub fn state(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::State, message)
    }

    /// Command issued in the wrong phase.
    pub fn phase(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Phase, message)
    }

    /// Action budget exhausted or key reused.
    pub fn actions(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Actions, message)
    }

    /// Malformed or out-of-range payload.
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Input, message)
    }

    /// Not enough gold, labor, influence or materials.
    pub fn resources(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Resources, message)
    }
}

/// The reducer was handed an event that does not fit the current state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// A non-creation event arrived before the campaign existed.
    #[error("event {event} requires an existing campaign")]
    MissingCampaign {
        /// Name of the event.
        event: &'static str,
    },

    /// A creation event arrived for an existing campaign.
    #[error("campaign already exists")]
    CampaignExists,

    /// The event names a player the campaign does not have.
    #[error("event {event} names unknown player {player_id}")]
    UnknownPlayer {
        /// Name of the event.
        event: &'static str,
        /// The unknown player.
        player_id: PlayerId,
    },

    /// The player already exists.
    #[error("player {player_id} already exists")]
    DuplicatePlayer {
        /// The duplicated player.
        player_id: PlayerId,
    },

    /// The event names a holding the player does not have.
    #[error("event {event} names unknown holding {holding_id}")]
    UnknownHolding {
        /// Name of the event.
        event: &'static str,
        /// The unknown holding.
        holding_id: String,
    },
}
