//! Event processor: cursor-driven fetch plus per-event dispatch.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use commands::CommandInterpreter;
use linkbot_core::{BotClient, Event, EventKind, Fetcher, HandlerError, Processor, Result};
use storage::PageStore;
use tracing::{debug, instrument};

use crate::normalize::event_from_update;

/// Fetches updates from a [`BotClient`] and handles them with a [`CommandInterpreter`].
///
/// The cursor starts at 0 and only moves forward, to one past the highest update id of each non-empty fetch.
pub struct EventProcessor {
    client: Arc<dyn BotClient>,
    interpreter: CommandInterpreter,
    offset: AtomicI64,
}

impl EventProcessor {
    pub fn new(client: Arc<dyn BotClient>, store: Arc<dyn PageStore>) -> Self {
        let interpreter = CommandInterpreter::new(client.clone(), store);
        Self {
            client,
            interpreter,
            offset: AtomicI64::new(0),
        }
    }

    /// Next update id to request.
    pub fn offset(&self) -> i64 {
        self.offset.load(Ordering::SeqCst)
    }

    async fn process_message(&self, event: Event) -> Result<()> {
        let routing = event.routing.ok_or(HandlerError::MissingRouting)?;
        self.interpreter
            .execute(&event.text, &routing.username, routing.chat_id)
            .await
    }
}

#[async_trait]
impl Fetcher for EventProcessor {
    #[instrument(skip(self))]
    async fn fetch(&self, limit: usize) -> Result<Vec<Event>> {
        let offset = self.offset();
        let updates = self.client.get_updates(offset, limit).await?;

        let Some(max_id) = updates.iter().map(|u| u.id).max() else {
            debug!(offset, "there are no new updates");
            return Ok(Vec::new());
        };

        let events: Vec<Event> = updates.into_iter().map(event_from_update).collect();
        self.offset.fetch_max(max_id + 1, Ordering::SeqCst);

        debug!(count = events.len(), next_offset = self.offset(), "fetched updates");
        Ok(events)
    }
}

#[async_trait]
impl Processor for EventProcessor {
    async fn process(&self, event: Event) -> Result<()> {
        match event.kind {
            EventKind::Message => self.process_message(event).await,
            EventKind::Unknown => Err(HandlerError::UnknownEventKind.into()),
        }
    }
}
