//! # event-consumer
//!
//! [`EventConsumer`] owns the polling cadence: it pulls batches from a [`linkbot_core::Fetcher`], runs one task per
//! event against a [`linkbot_core::Processor`], waits for the whole batch, and stops with an error once a single
//! batch has at least `failure_threshold` failed handlers. Cancellation is cooperative, see [`EventConsumer::run`].

mod config;
mod consumer;

pub use config::{
    ConsumerConfig, DEFAULT_BATCH_SIZE, DEFAULT_FAILURE_THRESHOLD, DEFAULT_IDLE_WAIT,
};
pub use consumer::{BatchOutcome, EventConsumer};
pub use tokio_util::sync::CancellationToken;
