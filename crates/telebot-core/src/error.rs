//! Unified error types for the telebot client.
//!
//! Every outbound call can fail in one of four ways, and each has its own
//! variant on [`ApiError`]:
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | [`ApiError::Remote`] | The remote API answered `ok: false`. |
//! | [`ApiError::MalformedResponse`] | The body could not be decoded. |
//! | [`ApiError::Encoding`] | The request record could not be put on the wire. |
//! | [`ApiError::Transport`] | The HTTP exchange itself failed. |
//!
//! Handler failures during update dispatch are reported as [`HandlerError`]
//! and never leave the dispatcher.

use thiserror::Error;

// =============================================================================
// Transport Errors
// =============================================================================

/// Errors that can occur while moving bytes to and from the remote API.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {url} - {reason}")]
    ConnectionFailed {
        /// The URL that failed to connect.
        url: String,
        /// Reason for failure.
        reason: String,
    },

    /// The server answered with a non-success status on an unenveloped
    /// endpoint (file download).
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// A one-shot file stream was already consumed by an earlier request.
    #[error("file stream was already consumed by a previous request")]
    StreamConsumed,

    /// Invalid configuration.
    #[error("invalid transport configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// =============================================================================
// Encoding Errors
// =============================================================================

/// A record could not be represented in either wire format.
///
/// Raised by the encoder before any network I/O takes place.
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    /// A float field holds NaN or an infinity, which JSON cannot carry.
    #[error("field '{field}' holds a non-finite float")]
    NonFiniteFloat {
        /// Wire name of the offending field.
        field: String,
    },

    /// Serializing the JSON document failed.
    #[error("serialization failed: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

// =============================================================================
// API Errors
// =============================================================================

/// Error type for API calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The remote API reported failure (`ok: false`).
    #[error("CODE {code}: {description}")]
    Remote {
        /// The `error_code` of the envelope.
        code: i64,
        /// The `description` of the envelope.
        description: String,
    },

    /// The response body is not a valid envelope, or its `result` does not
    /// match the type expected by the call.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request record could not be encoded.
    #[error(transparent)]
    Encoding(#[from] EncodeError),

    /// Transport error.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A call that expects a typed payload got a bare success confirmation.
    #[error("'{method}' succeeded but returned no result")]
    MissingResult {
        /// The API method name.
        method: String,
    },
}

impl ApiError {
    /// Creates a remote error from envelope fields.
    pub fn remote(code: i64, description: impl Into<String>) -> Self {
        Self::Remote {
            code,
            description: description.into(),
        }
    }

    /// Returns the remote error code, if this is a remote error.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Remote { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the remote API explicitly rejected the call.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

// =============================================================================
// Handler Errors
// =============================================================================

/// A registered handler failed while processing an inbound update.
///
/// The dispatcher logs these and carries on with sibling handlers.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// The handler returned an error.
    #[error("handler failed: {0}")]
    Failed(String),

    /// The handler panicked.
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    /// Builds a [`HandlerError::Panicked`] from a caught panic payload.
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        Self::Panicked(message)
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Failed(format!("{err:#}"))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for encoding.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let err = ApiError::remote(400, "Bad Request: chat not found");
        assert_eq!(err.to_string(), "CODE 400: Bad Request: chat not found");
        assert_eq!(err.code(), Some(400));
        assert!(err.is_remote());
    }

    #[test]
    fn test_transport_error_is_not_remote() {
        let err: ApiError = TransportError::Io("reset".into()).into();
        assert!(!err.is_remote());
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_handler_error_from_panic_payload() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        let err = HandlerError::from_panic(payload.as_ref());
        assert!(matches!(err, HandlerError::Panicked(ref m) if m == "boom"));

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned boom"));
        let err = HandlerError::from_panic(payload.as_ref());
        assert_eq!(err.to_string(), "handler panicked: owned boom");
    }
}
