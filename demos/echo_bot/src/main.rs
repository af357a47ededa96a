//! Echo Bot Example
//!
//! Shows the three routing paths of a telebot bot:
//!
//! - **Commands**: `/echo <text>` and `/help` each have one handler
//! - **Processors**: every other message is logged and echoed back
//! - **Inline**: `@bot <text>` offers the text as an article with a
//!   button whose presses come back to the same provider
//!
//! # Usage
//!
//! ```bash
//! cargo run --package echo-bot -- --token 123456:ABC-DEF
//! # or
//! TELEBOT_BOT__TOKEN=123456:ABC-DEF cargo run --package echo-bot
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use telebot::prelude::*;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Bot token. Overrides `bot.token` from config and environment.
    #[arg(short, long)]
    token: Option<String>,

    /// Config file. Searches for telebot.toml when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile.
    #[arg(short, long)]
    profile: Option<String>,
}

// ============================================================================
// Commands
// ============================================================================

/// Replies with the command arguments.
async fn echo_command(bot: Bot, message: Message) -> HandlerResult {
    let text = match message.command_args() {
        Some(args) if !args.is_empty() => args.to_string(),
        _ => "Usage: /echo <text>".to_string(),
    };
    let mut reply = SendMessage::new(message.chat.id, text);
    reply.reply_to_message_id = Some(message.message_id);
    bot.send_message(reply).await?;
    Ok(())
}

async fn help_command(bot: Bot, message: Message) -> HandlerResult {
    let help_text = "/echo <text> - Echo text\n\
                     /help - This help\n\
                     Anything else is repeated back.\n\
                     Inline: @bot <text>";
    bot.send_message(SendMessage::new(message.chat.id, help_text))
        .await?;
    Ok(())
}

// ============================================================================
// Processors
// ============================================================================

async fn log_message(_bot: Bot, message: Message) -> HandlerResult {
    let sender = message
        .sender
        .as_ref()
        .map(|user| user.first_name.as_str())
        .unwrap_or("Unknown");
    info!(
        chat = message.chat.id,
        sender,
        text = message.text.as_deref().unwrap_or_default(),
        "Message received"
    );
    Ok(())
}

async fn repeat_message(bot: Bot, message: Message) -> HandlerResult {
    if let Some(text) = message.text.as_deref() {
        bot.send_message(SendMessage::new(message.chat.id, text))
            .await?;
    }
    Ok(())
}

// ============================================================================
// Inline
// ============================================================================

/// Offers the query text back as a single article.
struct EchoInline;

#[async_trait]
impl InlineProvider for EchoInline {
    async fn results(&self, _bot: &Bot, query: &InlineQuery) -> Result<Vec<InlineQueryResult>> {
        if query.query.is_empty() {
            return Ok(Vec::new());
        }

        let mut article = InlineQueryResultArticle::new(
            "text",
            format!("Echo: {}", query.query),
            InputMessageContent::text(query.query.clone()),
        );
        article.reply_markup = Some(InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::callback("👍", "echo:like"),
        ]]));
        Ok(vec![article.into()])
    }

    async fn chosen(&self, _bot: &Bot, result: ChosenInlineResult) -> HandlerResult {
        info!(result_id = %result.result_id, query = %result.query, "Inline result chosen");
        Ok(())
    }

    async fn callback(&self, bot: &Bot, query: CallbackQuery) -> HandlerResult {
        let mut answer = AnswerCallbackQuery::new(query.id);
        answer.text = match query.data.as_deref() {
            Some("like") => Some("Thanks!".to_string()),
            other => {
                warn!(data = ?other, "Unexpected callback data");
                None
            }
        };
        bot.answer_callback_query(answer).await?;
        Ok(())
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder = TelebotRuntime::builder();
    if let Some(path) = args.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = args.profile {
        builder = builder.profile(profile);
    }
    if let Some(token) = args.token {
        builder = builder.set("bot.token", token);
    }
    let runtime = builder.build()?;

    runtime
        .bot()
        .register_command("echo", echo_command)
        .register_command("help", help_command)
        .register_message_processor(log_message)
        .register_message_processor(repeat_message)
        .register_inline_provider("echo", EchoInline);

    info!(commands = ?runtime.bot().command_names(), "Echo bot starting");
    runtime.run().await?;
    Ok(())
}
