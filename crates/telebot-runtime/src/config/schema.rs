//! Configuration schema definitions.
//!
//! ```toml
//! [bot]
//! token = "123456:ABC-DEF"
//! api_url = "https://api.telegram.org"
//! request_timeout_secs = 120
//!
//! [polling]
//! timeout_secs = 100
//! limit = 100
//!
//! [polling.retry]
//! max_retries = 5
//! initial_delay_ms = 1000
//!
//! [inline]
//! cache_time_secs = 60
//!
//! [logging]
//! level = "debug"
//! format = "pretty"
//!
//! [logging.filters]
//! telebot_transport = "trace"
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use telebot_core::HttpClientConfig;
use telebot_core::transport::config::DEFAULT_API_URL;
use telebot_framework::{
    BotSettings, DEFAULT_INLINE_CACHE_TIME, DEFAULT_POLL_TIMEOUT, DEFAULT_UNKNOWN_COMMAND_TEXT,
    PollSettings,
};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelebotConfig {
    /// Account and endpoint settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Long-poll loop settings.
    #[serde(default)]
    pub polling: PollingConfig,

    /// Inline mode settings.
    #[serde(default)]
    pub inline: InlineConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TelebotConfig {
    /// Dispatch settings for the bot facade.
    pub fn bot_settings(&self) -> BotSettings {
        BotSettings {
            inline_cache_time: self.inline.cache_time_secs,
            unknown_command_text: self.bot.unknown_command_text.clone(),
        }
    }
}

// =============================================================================
// Bot
// =============================================================================

/// Account and endpoint settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Bot token issued by the API.
    #[serde(default)]
    pub token: String,

    /// API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Path prefix inserted before `bot<token>`, for API proxies.
    #[serde(default)]
    pub prefix: String,

    /// HTTP request timeout in seconds. Must exceed the poll timeout.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Reply sent for unregistered commands.
    #[serde(default = "default_unknown_command_text")]
    pub unknown_command_text: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_api_url(),
            prefix: String::new(),
            request_timeout_secs: default_request_timeout(),
            unknown_command_text: default_unknown_command_text(),
        }
    }
}

impl BotConfig {
    /// Converts to the transport endpoint configuration.
    pub fn to_client_config(&self) -> HttpClientConfig {
        HttpClientConfig::new(self.token.clone())
            .with_api_url(self.api_url.clone())
            .with_prefix(self.prefix.clone())
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.token.is_empty() { "" } else { "***" };
        f.debug_struct("BotConfig")
            .field("token", &token)
            .field("api_url", &self.api_url)
            .field("prefix", &self.prefix)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("unknown_command_text", &self.unknown_command_text)
            .finish()
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_unknown_command_text() -> String {
    DEFAULT_UNKNOWN_COMMAND_TEXT.to_string()
}

// =============================================================================
// Polling
// =============================================================================

/// Long-poll loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Server-side long-poll timeout in seconds.
    #[serde(default = "default_poll_timeout")]
    pub timeout_secs: u32,

    /// Maximum updates per batch (1-100). Unset uses the server default.
    #[serde(default)]
    pub limit: Option<u32>,

    /// Backoff for failed polls.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_poll_timeout(),
            limit: None,
            retry: RetryConfig::default(),
        }
    }
}

impl PollingConfig {
    /// Converts to poller settings.
    pub fn to_poll_settings(&self) -> PollSettings {
        PollSettings {
            timeout: self.timeout_secs,
            limit: self.limit,
            retry: self.retry.to_core_retry(),
        }
    }
}

fn default_poll_timeout() -> u32 {
    DEFAULT_POLL_TIMEOUT
}

/// Retry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Consecutive failed polls tolerated before the loop stops.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay after the first failure in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay between retries in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Exponential backoff multiplier.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetryConfig {
    /// Converts to core retry config.
    pub fn to_core_retry(&self) -> telebot_core::RetryConfig {
        telebot_core::RetryConfig {
            max_retries: self.max_retries,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            multiplier: self.backoff_multiplier,
        }
    }
}

fn default_max_retries() -> u32 {
    5
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

// =============================================================================
// Inline
// =============================================================================

/// Inline mode settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineConfig {
    /// `cache_time` sent with every inline query answer, in seconds.
    #[serde(default = "default_cache_time")]
    pub cache_time_secs: u32,
}

impl Default for InlineConfig {
    fn default() -> Self {
        Self {
            cache_time_secs: default_cache_time(),
        }
    }
}

fn default_cache_time() -> u32 {
    DEFAULT_INLINE_CACHE_TIME
}

// =============================================================================
// Logging
// =============================================================================

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Output destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Log file path, required when `output` is `file`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Log file rotation.
    #[serde(default)]
    pub rotation: LogRotation,

    /// Per-module levels, e.g. `telebot_transport = "trace"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,

    /// Include thread ids.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include source file and line.
    #[serde(default)]
    pub file_location: bool,

    /// Span lifecycle events to log.
    #[serde(default)]
    pub span_events: SpanEventConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file_path: None,
            rotation: LogRotation::default(),
            filters: HashMap::new(),
            thread_ids: false,
            file_location: false,
            span_events: SpanEventConfig::default(),
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line output.
    #[default]
    Compact,
    /// Default `tracing-subscriber` output.
    Full,
    /// Multi-line, human-friendly output.
    Pretty,
    /// JSON lines. Needs the `json-log` feature.
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Log file rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

/// Span events to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}
