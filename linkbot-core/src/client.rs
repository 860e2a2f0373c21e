//! Update-source abstraction: pull updates after a cursor and send text replies.
//!
//! [`BotClient`] is transport-agnostic; `linkbot-telegram` implements it via teloxide and tests
//! substitute recording mocks.

use crate::error::Result;
use crate::types::Update;
use async_trait::async_trait;

/// The two remote operations the bot needs from its chat platform.
#[async_trait]
pub trait BotClient: Send + Sync {
    /// Returns up to `limit` updates whose id is `>= offset`, in source order. An empty vec is not an error.
    async fn get_updates(&self, offset: i64, limit: usize) -> Result<Vec<Update>>;
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;
}
