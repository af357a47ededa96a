//! Telebot Runtime - configuration, logging and lifecycle for telebot bots.
//!
//! This crate provides:
//! - Layered configuration (`telebot.toml`, `TELEBOT_*` variables, overrides)
//! - Logging setup driven by that configuration
//! - [`TelebotRuntime`], which polls until Ctrl+C or SIGTERM
//!
//! ```ignore
//! use telebot_runtime::TelebotRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = TelebotRuntime::builder().build()?;
//!
//!     runtime.bot().register_command("start", start);
//!
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{ConfigError, ConfigLoader, ConfigResult, Profile, TelebotConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{RuntimeBuilder, TelebotRuntime};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros for handler code.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
