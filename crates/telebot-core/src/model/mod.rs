//! The record catalogue: entities received from the API and request records
//! sent to it.
//!
//! Inbound entities are plain serde types. Outbound request records are
//! declared with [`record!`](crate::record!) so the encoder can walk them.

pub mod inline;
pub mod keyboard;
pub mod message;
pub mod request;
pub mod types;
pub mod update;

pub use inline::*;
pub use keyboard::*;
pub use message::{LeadingCommand, Message};
pub use request::*;
pub use types::*;
pub use update::{CallbackQuery, ChosenInlineResult, InlineQuery, Update, UpdateKind};
