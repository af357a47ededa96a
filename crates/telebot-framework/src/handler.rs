//! Handler traits.
//!
//! Four kinds of handlers can be registered on a [`Bot`]:
//!
//! | Kind | Trait | Receives | Registered with |
//! |------|-------|----------|-----------------|
//! | Command | [`MessageHandler`] | messages starting with `/<name>` | [`Bot::register_command`] |
//! | Message processor | [`MessageHandler`] | every other message | [`Bot::register_message_processor`] |
//! | Inline provider | [`InlineProvider`] | inline queries, chosen results, callbacks | [`Bot::register_inline_provider`] |
//! | Update processor | [`UpdateProcessor`] | every update, before routing | [`Bot::register_update_processor`] |
//!
//! Plain async closures implement [`MessageHandler`] and [`UpdateProcessor`]:
//!
//! ```rust,ignore
//! bot.register_command("ping", |bot: Bot, message: Message| async move {
//!     bot.send_message(SendMessage::new(message.chat.id, "pong")).await?;
//!     Ok(())
//! });
//! ```
//!
//! Handler errors are logged by the dispatcher and never reach the poll loop.

use std::future::Future;

use async_trait::async_trait;

use telebot_core::model::{CallbackQuery, ChosenInlineResult, InlineQuery, InlineQueryResult};
use telebot_core::model::{Message, Update};

use crate::bot::Bot;

/// Result type returned by handlers.
pub type HandlerResult = anyhow::Result<()>;

/// Whether routing continues after an update processor ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Hand the update to the next processor, then to the router.
    #[default]
    Continue,
    /// The update was consumed; stop routing it.
    Handled,
}

// =============================================================================
// Message Handlers
// =============================================================================

/// Handles a message. Used for both commands and message processors.
#[async_trait]
pub trait MessageHandler: Send + Sync + 'static {
    /// Processes the message.
    async fn handle(&self, bot: Bot, message: Message) -> HandlerResult;
}

#[async_trait]
impl<F, Fut> MessageHandler for F
where
    F: Fn(Bot, Message) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn handle(&self, bot: Bot, message: Message) -> HandlerResult {
        (self)(bot, message).await
    }
}

// =============================================================================
// Update Processors
// =============================================================================

/// Sees every update before it is routed.
///
/// Processors run one after another in registration order. The first one to
/// return [`Flow::Handled`] stops routing. A processor that fails is logged
/// and treated as [`Flow::Continue`].
#[async_trait]
pub trait UpdateProcessor: Send + Sync + 'static {
    /// Inspects the update.
    async fn process(&self, bot: Bot, update: Update) -> anyhow::Result<Flow>;
}

#[async_trait]
impl<F, Fut> UpdateProcessor for F
where
    F: Fn(Bot, Update) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Flow>> + Send + 'static,
{
    async fn process(&self, bot: Bot, update: Update) -> anyhow::Result<Flow> {
        (self)(bot, update).await
    }
}

// =============================================================================
// Inline Providers
// =============================================================================

/// Supplies inline query results and receives the events that refer back to
/// them.
///
/// Result ids are namespaced as `<provider>:<id>` before the answer is sent.
/// When a user picks a result, [`chosen`](Self::chosen) receives it with the
/// original id restored. Callback data of the form `<provider>:<data>` is
/// delivered to [`callback`](Self::callback) with `data` set to the part after
/// the first `:`.
#[async_trait]
pub trait InlineProvider: Send + Sync + 'static {
    /// Returns results for the query, in display order.
    async fn results(&self, bot: &Bot, query: &InlineQuery)
    -> anyhow::Result<Vec<InlineQueryResult>>;

    /// Called when a user picks one of this provider's results.
    async fn chosen(&self, _bot: &Bot, _result: ChosenInlineResult) -> HandlerResult {
        Ok(())
    }

    /// Called for callback queries addressed to this provider.
    async fn callback(&self, _bot: &Bot, _query: CallbackQuery) -> HandlerResult {
        Ok(())
    }
}
