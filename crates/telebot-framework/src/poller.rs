//! Long polling.
//!
//! The [`Poller`] is a two-phase state machine:
//!
//! 1. [`Poller::start`] confirms the bot's identity with one `getMe` call.
//!    Failure is fatal and no polling happens.
//! 2. [`Poller::run`] repeats `getUpdates` until the cancellation token
//!    fires, spawning one dispatch task per update and advancing the cursor
//!    past every update it saw.
//!
//! Only one poller may run per bot token; the remote API rejects
//! overlapping long polls.
//!
//! # Failed polls
//!
//! A failed poll (remote error, undecodable body, or transport failure)
//! leaves the cursor untouched and is retried after an exponential backoff
//! taken from [`RetryConfig`]. A successful poll resets the backoff. After
//! more than `max_retries` consecutive failures, [`Poller::run`] returns the
//! last error.
//!
//! ```rust,ignore
//! let cancel = CancellationToken::new();
//! let mut poller = Poller::start(bot, PollSettings::default()).await?;
//! poller.run(cancel.child_token()).await?;
//! ```

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use telebot_core::model::GetUpdates;
use telebot_core::{ApiResult, RetryConfig};

use crate::bot::Bot;

/// Default server-side long-poll timeout, in seconds.
pub const DEFAULT_POLL_TIMEOUT: u32 = 100;

/// Parameters of the poll loop.
#[derive(Debug, Clone, PartialEq)]
pub struct PollSettings {
    /// Long-poll timeout sent with every `getUpdates`, in seconds.
    pub timeout: u32,
    /// Maximum batch size, or the server default.
    pub limit: Option<u32>,
    /// Backoff applied to failed polls.
    pub retry: RetryConfig,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_POLL_TIMEOUT,
            limit: None,
            retry: RetryConfig::default(),
        }
    }
}

/// Drives the long-poll loop of one bot.
#[derive(Debug)]
pub struct Poller {
    bot: Bot,
    settings: PollSettings,
    cursor: i64,
}

impl Poller {
    /// Confirms the bot's identity and returns a poller ready to run.
    pub async fn start(bot: Bot, settings: PollSettings) -> ApiResult<Self> {
        let me = bot.get_me().await?;
        info!(
            id = me.id,
            username = me.username.as_deref().unwrap_or_default(),
            "Bot identity confirmed"
        );
        Ok(Self {
            bot,
            settings,
            cursor: 0,
        })
    }

    /// Returns the bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Returns the offset sent with the next poll.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Fetches one batch and dispatches it. Returns the batch size.
    ///
    /// Each update is handed to [`Bot::spawn_update`] and never awaited, so
    /// a slow handler or update processor cannot hold up the loop. The
    /// cursor moves past each update before it is spawned.
    pub async fn poll_once(&mut self) -> ApiResult<usize> {
        let request = GetUpdates {
            offset: Some(self.cursor),
            limit: self.settings.limit,
            timeout: Some(self.settings.timeout),
        };
        let updates = self.bot.get_updates(request).await?;
        let count = updates.len();

        for update in updates {
            self.cursor = self.cursor.max(update.update_id + 1);
            drop(self.bot.spawn_update(update));
        }
        Ok(count)
    }

    /// Polls until `cancel` fires.
    ///
    /// Cancellation is checked between polls and during backoff; an
    /// in-flight poll is never interrupted.
    pub async fn run(&mut self, cancel: CancellationToken) -> ApiResult<()> {
        let retry = self.settings.retry.clone();
        let mut failures = 0u32;
        let mut delay = retry.initial_delay;

        info!(cursor = self.cursor, timeout = self.settings.timeout, "Polling started");
        while !cancel.is_cancelled() {
            match self.poll_once().await {
                Ok(count) => {
                    if count > 0 {
                        debug!(count, cursor = self.cursor, "Batch dispatched");
                    }
                    failures = 0;
                    delay = retry.initial_delay;
                }
                Err(err) => {
                    failures += 1;
                    if failures > retry.max_retries {
                        error!(failures, error = %err, "Polling failed, giving up");
                        return Err(err);
                    }
                    warn!(
                        attempt = failures,
                        max_retries = retry.max_retries,
                        delay = ?delay,
                        error = %err,
                        "Polling failed, retrying"
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(delay) => {}
                    }
                    delay = retry.next_delay(delay);
                }
            }
        }
        info!(cursor = self.cursor, "Polling stopped");
        Ok(())
    }
}
