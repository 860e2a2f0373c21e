//! # event-processor
//!
//! [`EventProcessor`] is both the [`linkbot_core::Fetcher`] (owns the update cursor) and the
//! [`linkbot_core::Processor`] (routes message events into [`commands::CommandInterpreter`]).

mod normalize;
mod processor;

pub use normalize::event_from_update;
pub use processor::EventProcessor;
