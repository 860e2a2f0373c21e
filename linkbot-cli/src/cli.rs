//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::BotConfig;

#[derive(Parser)]
#[command(name = "linkbot")]
#[command(about = "Telegram bot that keeps a per-user reading list of links", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; flags override the matching variables).
    Run {
        /// Overrides BOT_TOKEN.
        #[arg(short, long)]
        token: Option<String>,
        /// Overrides TELEGRAM_API_URL.
        #[arg(long)]
        api_url: Option<String>,
        /// Overrides BATCH_SIZE.
        #[arg(short, long)]
        batch_size: Option<usize>,
    },
}

/// Loads [`BotConfig`] from the environment and applies the CLI overrides.
pub fn load_config(
    token: Option<String>,
    api_url: Option<String>,
    batch_size: Option<usize>,
) -> Result<BotConfig> {
    let mut config = BotConfig::load(token)?;
    if api_url.is_some() {
        config.telegram_api_url = api_url;
    }
    if let Some(batch_size) = batch_size {
        config.batch_size = batch_size;
    }
    Ok(config)
}
