//! # linkbot-telegram
//!
//! Telegram transport layer: [`TelegramClient`] implements [`linkbot_core::BotClient`] with teloxide
//! (`getUpdates` / `sendMessage`), adapters turn teloxide updates into core [`linkbot_core::Update`]s.
//! No command logic or persistence here.

mod adapters;
mod client;
mod config;

pub use adapters::{sender_identity, TelegramUpdateWrapper};
pub use client::{TelegramClient, MAX_UPDATES_LIMIT};
pub use config::TelegramConfig;
