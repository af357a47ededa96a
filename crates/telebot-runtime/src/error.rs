//! Runtime error types.

use thiserror::Error;

use telebot_core::{ApiError, TransportError};

use crate::config::ConfigError;

/// Errors that stop a runtime from starting or running.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP transport could not be built.
    #[error("Failed to build transport: {0}")]
    Transport(#[from] TransportError),

    /// `getMe` failed, so polling never started.
    #[error("Failed to confirm bot identity: {0}")]
    Startup(#[source] ApiError),

    /// The poll loop gave up after exhausting its retries.
    #[error("Polling stopped: {0}")]
    Polling(#[source] ApiError),
}

impl RuntimeError {
    /// Returns the remote error code behind a startup or polling failure.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::Startup(err) | Self::Polling(err) => err.code(),
            _ => None,
        }
    }
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
