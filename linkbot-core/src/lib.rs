//! # linkbot-core
//!
//! Core types and traits for the reading-list bot: [`BotClient`] (update source + reply channel),
//! [`Fetcher`] / [`Processor`] seams between the consumer loop and the event processor, event types,
//! the error taxonomy, and tracing initialization. Transport-agnostic; used by every other crate.

pub mod client;
pub mod error;
pub mod logger;
pub mod types;

pub use client::BotClient;
pub use error::{HandlerError, LinkbotError, Result};
pub use logger::{init_tracing, LogFormat};
pub use types::{Event, EventKind, Fetcher, IncomingMessage, Processor, Routing, Update};
