//! Wire codec: request encoding, envelope decoding and result projection.
//!
//! # Outbound
//!
//! ```text
//! Record ──encode──▶ EncodedBody (JSON | multipart) ──▶ Transport
//! ```
//!
//! # Inbound
//!
//! ```text
//! bytes ──decode──▶ Envelope ──project(factory)──▶ Reply<T> | ApiError
//! ```

pub mod decode;
pub mod encode;
pub mod project;

pub use decode::{Envelope, decode};
pub use encode::{EncodedBody, MultipartForm, Part, PartBody, encode};
pub use project::{Reply, entity_or_confirmed, flag, project, typed};
