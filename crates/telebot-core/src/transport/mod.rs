//! Transport abstraction.
//!
//! The [`Transport`] trait is the only seam between the client and the
//! network. The bot facade hands it an already-encoded body and gets raw
//! response bytes back; envelope decoding stays on the caller's side, so
//! an implementation never needs to understand the API's semantics.
//!
//! The production implementation lives in the `telebot-transport` crate.
//! Tests substitute a scripted in-memory double.

pub mod config;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::codec::EncodedBody;
use crate::error::TransportResult;

pub use config::{DEFAULT_API_URL, HttpClientConfig, RetryConfig};

/// A stream of downloaded file chunks.
pub type ByteStream = BoxStream<'static, TransportResult<Bytes>>;

/// Moves encoded requests to the remote API.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `body` to the endpoint of `method` and returns the raw
    /// response body, whatever the HTTP status.
    async fn call(&self, method: &str, body: EncodedBody) -> TransportResult<Vec<u8>>;

    /// GETs the file at `file_path` from the file-serving endpoint.
    async fn download(&self, file_path: &str) -> TransportResult<ByteStream>;
}
