//! Response envelope decoding.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// The uniform wrapper around every API response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Envelope {
    /// Whether the call succeeded.
    #[serde(default)]
    pub ok: bool,
    /// The call's payload. `None` when absent or `null`.
    #[serde(default)]
    pub result: Option<Value>,
    /// Human-readable failure reason.
    #[serde(default)]
    pub description: Option<String>,
    /// Numeric failure code.
    #[serde(default)]
    pub error_code: Option<i64>,
}

/// Decodes a response body into an [`Envelope`].
///
/// Fails with [`ApiError::MalformedResponse`] if the body is not a JSON
/// object.
pub fn decode(body: &[u8]) -> ApiResult<Envelope> {
    serde_json::from_slice(body).map_err(|err| {
        debug!(error = %err, len = body.len(), "Response body is not an envelope");
        ApiError::MalformedResponse(err.to_string())
    })
}
