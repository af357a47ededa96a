//! Inbound updates.
//!
//! An [`Update`] carries exactly one event. The wire form is an object with
//! one populated key per event kind; it is decoded straight into the
//! [`UpdateKind`] sum type so routing code matches on a single enum.

use serde::{Deserialize, Serialize};

use super::message::Message;
use super::types::{Location, User};

/// An incoming inline query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineQuery {
    /// Query identifier.
    pub id: String,
    /// Sender.
    #[serde(rename = "from")]
    pub sender: User,
    /// Sender location, for bots that request it.
    #[serde(default)]
    pub location: Option<Location>,
    /// Query text.
    #[serde(default)]
    pub query: String,
    /// Pagination offset controlled by the bot.
    #[serde(default)]
    pub offset: String,
}

/// An inline result chosen by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChosenInlineResult {
    /// Identifier of the chosen result.
    pub result_id: String,
    /// User who chose the result.
    #[serde(rename = "from")]
    pub sender: User,
    /// Sender location, for bots that request it.
    #[serde(default)]
    pub location: Option<Location>,
    /// Identifier of the sent inline message.
    #[serde(default)]
    pub inline_message_id: Option<String>,
    /// Query used to obtain the result.
    #[serde(default)]
    pub query: String,
}

/// A press on an inline keyboard callback button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackQuery {
    /// Query identifier.
    pub id: String,
    /// User who pressed the button.
    #[serde(rename = "from")]
    pub sender: User,
    /// Message carrying the button, if sent by the bot.
    #[serde(default)]
    pub message: Option<Message>,
    /// Identifier of the inline message carrying the button.
    #[serde(default)]
    pub inline_message_id: Option<String>,
    /// Data attached to the button.
    #[serde(default)]
    pub data: Option<String>,
}

/// The event carried by an update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateKind {
    /// A new message.
    Message(Message),
    /// A new version of a known message.
    EditedMessage(Message),
    /// An inline query.
    InlineQuery(InlineQuery),
    /// A chosen inline result.
    ChosenInlineResult(ChosenInlineResult),
    /// A callback button press.
    CallbackQuery(CallbackQuery),
    /// No known event key was populated.
    Unknown,
}

impl UpdateKind {
    /// Short name of the event kind, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::EditedMessage(_) => "edited_message",
            Self::InlineQuery(_) => "inline_query",
            Self::ChosenInlineResult(_) => "chosen_inline_result",
            Self::CallbackQuery(_) => "callback_query",
            Self::Unknown => "unknown",
        }
    }
}

/// One inbound event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawUpdate")]
pub struct Update {
    /// Monotonic update identifier.
    pub update_id: i64,
    /// The event.
    pub kind: UpdateKind,
}

#[derive(Deserialize)]
struct RawUpdate {
    update_id: i64,
    #[serde(default)]
    message: Option<Message>,
    #[serde(default)]
    edited_message: Option<Message>,
    #[serde(default)]
    inline_query: Option<InlineQuery>,
    #[serde(default)]
    chosen_inline_result: Option<ChosenInlineResult>,
    #[serde(default)]
    callback_query: Option<CallbackQuery>,
}

impl From<RawUpdate> for Update {
    fn from(raw: RawUpdate) -> Self {
        let kind = if let Some(message) = raw.message {
            UpdateKind::Message(message)
        } else if let Some(message) = raw.edited_message {
            UpdateKind::EditedMessage(message)
        } else if let Some(query) = raw.inline_query {
            UpdateKind::InlineQuery(query)
        } else if let Some(result) = raw.chosen_inline_result {
            UpdateKind::ChosenInlineResult(result)
        } else if let Some(query) = raw.callback_query {
            UpdateKind::CallbackQuery(query)
        } else {
            UpdateKind::Unknown
        };
        Self {
            update_id: raw.update_id,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inline_query_update() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 10,
            "inline_query": {
                "id": "q1",
                "from": {"id": 3, "first_name": "Bo"},
                "query": "cats",
                "offset": ""
            }
        }))
        .unwrap();
        assert_eq!(update.update_id, 10);
        match update.kind {
            UpdateKind::InlineQuery(query) => {
                assert_eq!(query.query, "cats");
                assert_eq!(query.sender.id, 3);
            }
            other => panic!("unexpected kind {}", other.name()),
        }
    }

    #[test]
    fn test_unknown_update_kind() {
        let update: Update =
            serde_json::from_value(json!({"update_id": 11, "channel_post": {}})).unwrap();
        assert_eq!(update.kind, UpdateKind::Unknown);
    }

    #[test]
    fn test_callback_query_update() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 12,
            "callback_query": {
                "id": "c1",
                "from": {"id": 3, "first_name": "Bo"},
                "data": "votes:up"
            }
        }))
        .unwrap();
        assert_eq!(update.kind.name(), "callback_query");
    }
}
