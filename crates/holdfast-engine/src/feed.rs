//! Per-recipient filtering of the event log.
//!
//! Public events reach everyone. Private events reach only the player they
//! name. Passing `None` as the viewer yields the public feed.

use holdfast_types::{Event, PlayerId, Visibility};

/// Whether `viewer` may see `event`.
pub fn visible_to(event: &Event, viewer: Option<&PlayerId>) -> bool {
    match (&event.visibility, viewer) {
        (Visibility::Public, _) => true,
        (Visibility::Private { player_id }, Some(viewer)) => player_id == viewer,
        (Visibility::Private { .. }, None) => false,
    }
}

/// Events everyone may see, in log order.
pub fn public_feed<'a>(events: impl IntoIterator<Item = &'a Event>) -> Vec<&'a Event> {
    events.into_iter().filter(|e| visible_to(e, None)).collect()
}

/// Public events plus the player's own private events, in log order.
pub fn player_feed<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    player_id: &PlayerId,
) -> Vec<&'a Event> {
    events.into_iter().filter(|e| visible_to(e, Some(player_id))).collect()
}
