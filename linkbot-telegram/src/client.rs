//! teloxide-backed [`BotClient`]. Production code talks to Telegram; tests substitute another BotClient impl
//! or point the API URL at a mock server.

use async_trait::async_trait;
use linkbot_core::{BotClient, LinkbotError, Result, Update};
use teloxide::payloads::GetUpdatesSetters;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::debug;

use crate::adapters::TelegramUpdateWrapper;
use crate::config::TelegramConfig;

/// Telegram accepts 1..=100 updates per getUpdates call.
pub const MAX_UPDATES_LIMIT: usize = 100;

/// Thin wrapper around teloxide::Bot that implements linkbot-core's BotClient trait.
#[derive(Clone)]
pub struct TelegramClient {
    bot: teloxide::Bot,
}

impl TelegramClient {
    /// Creates a client from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Builds the teloxide Bot from config, applying the custom API URL when set.
    pub fn from_config(config: &TelegramConfig) -> anyhow::Result<Self> {
        let mut bot = teloxide::Bot::new(config.bot_token.clone());
        if let Some(ref url) = config.telegram_api_url {
            let url = reqwest::Url::parse(url)
                .map_err(|e| anyhow::anyhow!("invalid Telegram API URL {}: {}", url, e))?;
            bot = bot.set_api_url(url);
        }
        Ok(Self::new(bot))
    }
}

#[async_trait]
impl BotClient for TelegramClient {
    async fn get_updates(&self, offset: i64, limit: usize) -> Result<Vec<Update>> {
        let offset = i32::try_from(offset).map_err(|_| {
            LinkbotError::Config(format!(
                "update offset {} does not fit the Bot API's 32-bit offset",
                offset
            ))
        })?;
        let limit = limit.clamp(1, MAX_UPDATES_LIMIT) as u8;

        let updates = self
            .bot
            .get_updates()
            .offset(offset)
            .limit(limit)
            .await
            .map_err(|e| LinkbotError::Source(e.to_string()))?;

        debug!(offset, count = updates.len(), "getUpdates returned");
        Ok(updates
            .iter()
            .map(|u| TelegramUpdateWrapper(u).to_core())
            .collect())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text.to_string())
            .await
            .map_err(|e| LinkbotError::Source(e.to_string()))?;
        Ok(())
    }
}
