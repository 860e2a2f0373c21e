//! Core types: source updates, normalized events with routing metadata, and the Fetcher / Processor traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One update as delivered by the source. `message` is `None` for updates the bot does not understand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub id: i64,
    pub message: Option<IncomingMessage>,
}

/// Message payload of an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub text: String,
    /// Identity of the sender; owner key for saved pages. `None` when the platform did not attach a sender.
    pub sender: Option<String>,
    /// Chat the reply goes to.
    pub chat_id: i64,
}

/// Kind of a normalized event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Message,
    Unknown,
}

/// Where a reply goes and whose storage it touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routing {
    pub chat_id: i64,
    pub username: String,
}

/// Normalized unit of work handed from the fetcher to a processor. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub text: String,
    pub routing: Option<Routing>,
}

impl Event {
    /// A message event with routing metadata.
    pub fn message(text: impl Into<String>, routing: Routing) -> Self {
        Self {
            kind: EventKind::Message,
            text: text.into(),
            routing: Some(routing),
        }
    }

    /// An event the processor cannot classify: empty text, no routing.
    pub fn unknown() -> Self {
        Self {
            kind: EventKind::Unknown,
            text: String::new(),
            routing: None,
        }
    }
}

/// Pulls the next batch of events. Owns the cursor.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, limit: usize) -> crate::error::Result<Vec<Event>>;
}

/// Handles a single event. Called concurrently for every event of a batch.
#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(&self, event: Event) -> crate::error::Result<()>;
}
