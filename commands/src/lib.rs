//! # commands
//!
//! Stateless interpreter for chat commands. [`Command::parse`] classifies the text (a bare URL is an implicit save),
//! [`CommandInterpreter`] runs it against a [`storage::PageStore`] and sends exactly one reply through a
//! [`linkbot_core::BotClient`]. All state lives in the store.

mod command;
mod interpreter;
pub mod messages;

pub use command::{is_url, Command};
pub use interpreter::{render_list, CommandInterpreter};
