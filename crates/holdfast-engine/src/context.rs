//! Per-call decision context.

use holdfast_rules::{Catalog, GameRng};
use holdfast_types::{Role, UserId};

/// The authenticated identity submitting a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Authenticated user.
    pub user_id: UserId,
    /// Claimed role.
    pub role: Role,
}

impl Actor {
    /// A GM actor.
    pub fn gm(user_id: impl Into<UserId>) -> Self {
        Self { user_id: user_id.into(), role: Role::Gm }
    }

    /// A player actor.
    pub fn player(user_id: impl Into<UserId>) -> Self {
        Self { user_id: user_id.into(), role: Role::Player }
    }
}

/// Everything [`crate::decide`] needs besides state and command.
///
/// A rejected command leaves the RNG untouched: every check that can fail
/// runs before the first draw.
pub struct DecideContext<'a> {
    /// Who is acting.
    pub actor: Actor,
    /// Dice source.
    pub rng: &'a mut dyn GameRng,
    /// Facility and material catalog.
    pub catalog: &'a Catalog,
}

impl<'a> DecideContext<'a> {
    /// Assemble a context.
    pub const fn new(actor: Actor, rng: &'a mut dyn GameRng, catalog: &'a Catalog) -> Self {
        Self { actor, rng, catalog }
    }
}

impl core::fmt::Debug for DecideContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecideContext").field("actor", &self.actor).finish_non_exhaustive()
    }
}
