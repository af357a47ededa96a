//! # Telebot Core
//!
//! The wire layer of the telebot client.
//!
//! This crate owns everything between a typed request and the bytes on the
//! network, and between the response bytes and a typed result:
//!
//! - **Typed Records**: the [`Record`] contract and the [`record!`] macro
//! - **File Payloads**: [`InputFile`], which forces multipart encoding
//! - **Codec**: [`encode`], [`decode`] and [`project`]
//! - **Transport Seam**: the [`Transport`] trait and [`HttpClientConfig`]
//! - **Catalogue**: entities and request records in [`model`]
//! - **Errors**: [`ApiError`], [`EncodeError`], [`TransportError`], [`HandlerError`]
//!
//! ## Data Flow
//!
//! ```text
//! ┌────────┐ encode ┌─────────────┐      ┌───────────┐ decode ┌──────────┐ project ┌──────────┐
//! │ Record │───────▶│ EncodedBody │─────▶│ Transport │───────▶│ Envelope │────────▶│ Reply<T> │
//! └────────┘        └─────────────┘      └───────────┘        └──────────┘         └──────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use telebot_core::{codec, model::SendMessage};
//!
//! let body = codec::encode(&SendMessage::new(42, "hello"))?;
//! assert_eq!(body.content_type(), "application/json");
//! ```

pub mod codec;
pub mod error;
pub mod file;
pub mod model;
pub mod record;
pub mod transport;

pub use codec::{EncodedBody, Envelope, Reply, decode, encode, project};
pub use error::{
    ApiError, ApiResult, EncodeError, EncodeResult, HandlerError, TransportError, TransportResult,
};
pub use file::InputFile;
pub use record::{Field, FieldValue, Record, Scalar, ToField};
pub use transport::{ByteStream, HttpClientConfig, RetryConfig, Transport};
