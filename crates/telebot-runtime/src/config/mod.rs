//! Configuration for telebot applications.
//!
//! Settings are layered with figment from built-in defaults, `telebot.toml`
//! files, `TELEBOT_*` environment variables and programmatic overrides,
//! then checked by [`validate_config`] before anything is started.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    BotConfig, InlineConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig,
    PollingConfig, RetryConfig, SpanEventConfig, TelebotConfig,
};
pub use validation::validate_config;
