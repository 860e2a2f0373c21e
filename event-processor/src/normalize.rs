//! Source update -> internal event.

use linkbot_core::{Event, EventKind, Routing, Update};
use tracing::warn;

/// Converts one update. Updates without a message become [`EventKind::Unknown`]; a message without a sender keeps
/// its text but carries no routing.
pub fn event_from_update(update: Update) -> Event {
    let Some(message) = update.message else {
        warn!(update_id = update.id, "incoming update has no message");
        return Event::unknown();
    };

    match message.sender {
        Some(username) => Event::message(
            message.text,
            Routing {
                chat_id: message.chat_id,
                username,
            },
        ),
        None => {
            warn!(update_id = update.id, chat_id = message.chat_id, "incoming message has no sender");
            Event {
                kind: EventKind::Message,
                text: message.text,
                routing: None,
            }
        }
    }
}
