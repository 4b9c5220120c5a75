//! Chat-bot front-end of the linker.
//!
//! The transport (polling the chat API and sending messages) lives outside
//! this crate; it hands every incoming [`ChatMessage`] to a [`Dispatcher`]
//! and sends back the returned [`Reply`].

pub mod command;
pub mod dispatcher;
pub mod error;
pub mod reply;

pub use command::{Command, CommandParser};
pub use dispatcher::{ChatMessage, Dispatcher};
pub use error::BotError;
pub use reply::{escape_markdown_v2, ParseMode, Reply};
