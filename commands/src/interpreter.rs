//! Runs one classified command against the page store and sends the reply.

use std::fmt::Write;
use std::sync::Arc;

use linkbot_core::{BotClient, LinkbotError, Result};
use storage::{Page, PageStore, StorageError};
use tracing::{debug, info, instrument};

use crate::command::Command;
use crate::messages::*;

/// Command interpreter. Holds no state of its own between invocations.
#[derive(Clone)]
pub struct CommandInterpreter {
    client: Arc<dyn BotClient>,
    store: Arc<dyn PageStore>,
}

impl CommandInterpreter {
    pub fn new(client: Arc<dyn BotClient>, store: Arc<dyn PageStore>) -> Self {
        Self { client, store }
    }

    /// Interprets `text` from `username` and sends exactly one reply to `chat_id`.
    ///
    /// Expected empty outcomes (nothing saved, missing argument, unknown page) are replies, not errors.
    /// Errors are backend storage failures and failed sends; in that case nothing or nothing more is sent.
    #[instrument(skip(self, text))]
    pub async fn execute(&self, text: &str, username: &str, chat_id: i64) -> Result<()> {
        let command = Command::parse(text);
        info!(command = command.name(), "got new command");

        let reply = self.reply_for(command, username).await?;
        self.client.send_message(chat_id, &reply).await?;

        debug!(reply_len = reply.len(), "reply sent");
        Ok(())
    }

    async fn reply_for(&self, command: Command, username: &str) -> Result<String> {
        let reply = match command {
            Command::Save(url) => self.save_page(&url, username).await?,
            Command::Start => MSG_HELLO.to_string(),
            Command::Help => MSG_HELP.to_string(),
            Command::Random => self.random_page(username).await?,
            Command::Read(None) | Command::Remove(None) => MSG_URL_REQUIRED.to_string(),
            Command::Read(Some(url)) => self.mark_as_read(&url, username).await?,
            Command::Remove(Some(url)) => self.remove_page(&url, username).await?,
            Command::List => self.list_pages(username).await?,
            Command::Unknown(_) => MSG_UNKNOWN_COMMAND.to_string(),
        };
        Ok(reply)
    }

    async fn save_page(&self, url: &str, username: &str) -> Result<String> {
        if self.store.exists(username, url).await.map_err(storage_error)? {
            return Ok(MSG_ALREADY_EXISTS.to_string());
        }
        self.store.save(username, url).await.map_err(storage_error)?;
        info!(username = %username, url = %url, "page saved");
        Ok(MSG_SAVED.to_string())
    }

    async fn random_page(&self, username: &str) -> Result<String> {
        match self.store.random_unread(username).await {
            Ok(page) => Ok(page.url),
            Err(StorageError::NotFound(_)) => Ok(MSG_NO_SAVED_PAGES.to_string()),
            Err(e) => Err(storage_error(e)),
        }
    }

    async fn mark_as_read(&self, url: &str, username: &str) -> Result<String> {
        match self.store.mark_read(username, url).await {
            Ok(()) => Ok(MSG_MARKED_AS_READ.to_string()),
            Err(StorageError::NotFound(_)) => Ok(MSG_NOT_IN_LIST.to_string()),
            Err(e) => Err(storage_error(e)),
        }
    }

    async fn remove_page(&self, url: &str, username: &str) -> Result<String> {
        match self.store.remove(username, url).await {
            Ok(()) => Ok(MSG_REMOVED.to_string()),
            Err(StorageError::NotFound(_)) => Ok(MSG_NOT_IN_LIST.to_string()),
            Err(e) => Err(storage_error(e)),
        }
    }

    async fn list_pages(&self, username: &str) -> Result<String> {
        match self.store.list(username).await {
            Ok(pages) if !pages.is_empty() => Ok(render_list(&pages)),
            Ok(_) | Err(StorageError::NotFound(_)) => Ok(MSG_NO_SAVED_PAGES.to_string()),
            Err(e) => Err(storage_error(e)),
        }
    }
}

fn storage_error(e: StorageError) -> LinkbotError {
    LinkbotError::Storage(e.to_string())
}

/// Header, blank line, then `N. [ ] url` / `N. [x] url` per page in list order.
pub fn render_list(pages: &[Page]) -> String {
    let mut out = format!("{}\n\n", LIST_HEADER);
    for (i, page) in pages.iter().enumerate() {
        let status = if page.read { "[x]" } else { "[ ]" };
        let _ = writeln!(out, "{}. {} {}", i + 1, status, page.url);
    }
    out
}
