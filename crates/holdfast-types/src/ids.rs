//! Type-safe identifier wrappers around [`String`].
//!
//! Every entity in a campaign has a strongly-typed ID to prevent accidental
//! mixing of identifiers at compile time. IDs are plain strings so that the
//! engine can derive them deterministically from campaign state (a replay
//! must produce byte-identical IDs), never from clocks or entropy.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from anything string-like.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a campaign.
    CampaignId
}

define_id! {
    /// Identity of an authenticated user (GM or player) submitting commands.
    UserId
}

define_id! {
    /// Unique identifier for a player seat within a campaign.
    PlayerId
}

define_id! {
    /// Unique identifier for a holding (domain, workshop, office, ...).
    HoldingId
}

define_id! {
    /// Unique identifier for a built facility instance or long-term project.
    FacilityId
}

define_id! {
    /// Catalog key of a material, e.g. `raw.grain` or `special.tools`.
    MaterialId
}

define_id! {
    /// Identifier of a market venue, e.g. `local` or `overseas`.
    MarketId
}
