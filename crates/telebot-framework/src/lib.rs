//! # Telebot Framework
//!
//! The bot-facing layer of the telebot client:
//!
//! - **Bot Facade**: [`Bot`], one async method per remote operation plus
//!   handler registration
//! - **Handlers**: [`MessageHandler`], [`UpdateProcessor`], [`InlineProvider`]
//! - **Dispatch**: [`Bot::process_update`], which routes one update to its
//!   handlers
//! - **Polling**: [`Poller`], the long-poll loop with cursor tracking and
//!   backoff
//!
//! ## Example
//!
//! ```rust,ignore
//! use telebot_framework::{Bot, PollSettings, Poller};
//!
//! let bot = Bot::new(transport).with_command("ping", |bot: Bot, message: Message| async move {
//!     bot.send_message(SendMessage::new(message.chat.id, "pong")).await?;
//!     Ok(())
//! });
//!
//! let mut poller = Poller::start(bot, PollSettings::default()).await?;
//! poller.run(cancel_token).await?;
//! ```

pub mod bot;
pub mod dispatcher;
pub mod handler;
pub mod poller;
mod registry;

#[cfg(test)]
mod testing;

pub use async_trait::async_trait;
pub use bot::{Bot, BotSettings, DEFAULT_INLINE_CACHE_TIME, DEFAULT_UNKNOWN_COMMAND_TEXT};
pub use dispatcher::{Dispatched, MAX_INLINE_RESULTS};
pub use handler::{Flow, HandlerResult, InlineProvider, MessageHandler, UpdateProcessor};
pub use poller::{DEFAULT_POLL_TIMEOUT, PollSettings, Poller};
