//! Bot configuration loaded from environment variables (after `.env`), with CLI overrides applied on top.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use event_consumer::{ConsumerConfig, DEFAULT_BATCH_SIZE, DEFAULT_FAILURE_THRESHOLD};
use linkbot_core::LogFormat;
use linkbot_telegram::TelegramConfig;

pub const DEFAULT_IDLE_WAIT_MS: u64 = 1000;
pub const DEFAULT_DATABASE_URL: &str = "./linkbot.db";

/// Everything `run_bot` needs to assemble the bot.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    pub batch_size: usize,
    pub idle_wait_ms: u64,
    pub failure_threshold: usize,
    /// `memory` or `sqlite`
    pub storage_type: String,
    /// SQLite database used when `storage_type == "sqlite"`
    pub database_url: String,
    pub log_file: Option<String>,
    pub log_format: LogFormat,
    /// Env values that could not be parsed and fell back to defaults. Logged once tracing is up.
    pub warnings: Vec<String>,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();

        let mut warnings = Vec::new();
        let batch_size = parse_or_default("BATCH_SIZE", DEFAULT_BATCH_SIZE, &mut warnings);
        let idle_wait_ms = parse_or_default("IDLE_WAIT_MS", DEFAULT_IDLE_WAIT_MS, &mut warnings);
        let failure_threshold =
            parse_or_default("FAILURE_THRESHOLD", DEFAULT_FAILURE_THRESHOLD, &mut warnings);

        let storage_type = env::var("STORAGE_TYPE")
            .map(|s| s.trim().to_ascii_lowercase())
            .unwrap_or_else(|_| "memory".to_string());
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let log_file = env::var("LOG_FILE").ok().filter(|s| !s.trim().is_empty());
        let log_format = match env::var("LOG_FORMAT") {
            Ok(raw) => LogFormat::from_str(&raw).map_err(|e| anyhow::anyhow!("LOG_FORMAT: {}", e))?,
            Err(_) => LogFormat::default(),
        };

        Ok(Self {
            bot_token,
            telegram_api_url,
            batch_size,
            idle_wait_ms,
            failure_threshold,
            storage_type,
            database_url,
            log_file,
            log_format,
            warnings,
        })
    }

    /// Rejects values that would make the bot unusable before anything is built.
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if !matches!(self.storage_type.as_str(), "memory" | "sqlite") {
            anyhow::bail!(
                "STORAGE_TYPE must be `memory` or `sqlite`, got `{}`",
                self.storage_type
            );
        }
        self.consumer_config().validate()?;
        Ok(())
    }

    pub fn consumer_config(&self) -> ConsumerConfig {
        ConsumerConfig {
            batch_size: self.batch_size,
            idle_wait: Duration::from_millis(self.idle_wait_ms),
            failure_threshold: self.failure_threshold,
        }
    }

    pub fn telegram_config(&self) -> TelegramConfig {
        let config = TelegramConfig::with_token(self.bot_token.clone());
        match self.telegram_api_url {
            Some(ref url) => config.with_api_url(url.clone()),
            None => config,
        }
    }
}

fn parse_or_default<T>(key: &str, default: T, warnings: &mut Vec<String>) -> T
where
    T: FromStr + std::fmt::Display + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warnings.push(format!(
                    "{}={:?} is not a valid number, using default {}",
                    key, raw, default
                ));
                default
            }
        },
        Err(_) => default,
    }
}
