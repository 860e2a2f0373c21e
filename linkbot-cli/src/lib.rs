//! # linkbot-cli
//!
//! Entry point plumbing: argument parsing, env config, and assembly of client, store, processor and consumer.

pub mod cli;
pub mod config;
pub mod runner;

pub use cli::{load_config, Cli, Commands};
pub use config::BotConfig;
pub use runner::{build_store, run_bot, run_with_cancel};
