//! # Telebot
//!
//! An asynchronous client for the Telegram Bot API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌────────────┐     ┌──────────────────────────────┐
//! │   Runtime   │────▶│   Poller   │────▶│ Bot::process_update          │
//! │  (config,   │     │ (getUpdates│     │  ├─ update processors (seq)  │
//! │   logging)  │     │  + cursor) │     │  ├─ command / processors     │──▶ spawned tasks
//! └─────────────┘     └────────────┘     │  └─ inline providers         │
//!                                        └──────────────────────────────┘
//! ```
//!
//! - **Core** (`telebot-core`): records, the JSON/multipart encoder, envelope
//!   decoding, result projection and the [`Transport`](core::Transport) seam
//! - **Transport** (`telebot-transport`): the `reqwest` implementation
//! - **Framework** (`telebot-framework`): the [`Bot`](framework::Bot) facade,
//!   routing and the long-poll loop
//! - **Runtime** (`telebot-runtime`): configuration, logging and shutdown
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use telebot::prelude::*;
//!
//! async fn ping(bot: Bot, message: Message) -> HandlerResult {
//!     bot.send_message(SendMessage::new(message.chat.id, "pong")).await?;
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = TelebotRuntime::builder().build()?;
//!     runtime.bot().register_command("ping", ping);
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: `telebot.toml` configuration files
//! - `yaml-config`: `telebot.yaml` configuration files
//! - `json-log`: JSON log output

pub use telebot_core as core;
pub use telebot_framework as framework;
pub use telebot_runtime as runtime;
pub use telebot_transport as transport;

/// Commonly used types for writing bots.
///
/// ```rust,ignore
/// use telebot::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use telebot_runtime::{TelebotConfig, TelebotRuntime};

    // Bot facade and handler traits
    pub use telebot_framework::{
        Bot, BotSettings, Flow, HandlerResult, InlineProvider, MessageHandler, PollSettings,
        Poller, UpdateProcessor, async_trait,
    };

    // Records and entities
    pub use telebot_core::model::*;
    pub use telebot_core::{ApiError, ApiResult, InputFile, Reply};

    // Transport
    pub use telebot_core::{HttpClientConfig, Transport};
    pub use telebot_transport::HttpTransport;
}
