//! Adapters from Telegram (teloxide) types to linkbot_core types.
//! Depends only on teloxide and linkbot_core type definitions.

use linkbot_core::{IncomingMessage, Update};
use teloxide::types::{UpdateKind, User};

/// Owner key for a Telegram user: the username, or the numeric id for users without one.
pub fn sender_identity(user: &User) -> String {
    user.username
        .clone()
        .unwrap_or_else(|| user.id.0.to_string())
}

/// Wraps a teloxide Update for conversion to core [`Update`].
pub struct TelegramUpdateWrapper<'a>(pub &'a teloxide::types::Update);

impl<'a> TelegramUpdateWrapper<'a> {
    /// New messages carry text (empty for media), chat and sender; every other update kind has no message.
    pub fn to_core(&self) -> Update {
        let message = match &self.0.kind {
            UpdateKind::Message(msg) => Some(IncomingMessage {
                text: msg.text().unwrap_or("").to_string(),
                sender: msg.from.as_ref().map(sender_identity),
                chat_id: msg.chat.id.0,
            }),
            _ => None,
        };

        Update {
            id: i64::from(self.0.id.0),
            message,
        }
    }
}
