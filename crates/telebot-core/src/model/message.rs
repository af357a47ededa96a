//! The message entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::keyboard::InlineKeyboardMarkup;
use super::types::{
    Audio, Chat, Contact, Document, Location, MessageEntity, PhotoSize, Sticker, User, Venue,
    Video, Voice,
};

/// A message.
///
/// The wire field `from` is exposed as [`sender`](Message::sender).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier inside the chat.
    pub message_id: i64,
    /// Sender. Absent for channel posts.
    #[serde(rename = "from", default)]
    pub sender: Option<User>,
    /// Send time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub date: DateTime<Utc>,
    /// Last edit time.
    #[serde(with = "chrono::serde::ts_seconds_option", default)]
    pub edit_date: Option<DateTime<Utc>>,
    /// Conversation the message belongs to.
    pub chat: Chat,
    /// Original sender of a forwarded message.
    #[serde(default)]
    pub forward_from: Option<User>,
    /// Original channel of a forwarded message.
    #[serde(default)]
    pub forward_from_chat: Option<Chat>,
    /// Original send time of a forwarded message.
    #[serde(with = "chrono::serde::ts_seconds_option", default)]
    pub forward_date: Option<DateTime<Utc>>,
    /// The message this one replies to.
    #[serde(default)]
    pub reply_to_message: Option<Box<Message>>,
    /// Text of a text message.
    #[serde(default)]
    pub text: Option<String>,
    /// Special entities in the text.
    #[serde(default)]
    pub entities: Vec<MessageEntity>,
    /// Audio attachment.
    #[serde(default)]
    pub audio: Option<Audio>,
    /// Document attachment.
    #[serde(default)]
    pub document: Option<Document>,
    /// Available sizes of a photo attachment.
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
    /// Sticker attachment.
    #[serde(default)]
    pub sticker: Option<Sticker>,
    /// Video attachment.
    #[serde(default)]
    pub video: Option<Video>,
    /// Voice note attachment.
    #[serde(default)]
    pub voice: Option<Voice>,
    /// Caption of a media attachment.
    #[serde(default)]
    pub caption: Option<String>,
    /// Shared contact.
    #[serde(default)]
    pub contact: Option<Contact>,
    /// Shared location.
    #[serde(default)]
    pub location: Option<Location>,
    /// Shared venue.
    #[serde(default)]
    pub venue: Option<Venue>,
    /// Member added to the group.
    #[serde(default)]
    pub new_chat_member: Option<User>,
    /// Member removed from the group.
    #[serde(default)]
    pub left_chat_member: Option<User>,
    /// New chat title.
    #[serde(default)]
    pub new_chat_title: Option<String>,
    /// New chat photo.
    #[serde(default)]
    pub new_chat_photo: Vec<PhotoSize>,
    /// The chat photo was deleted.
    #[serde(default)]
    pub delete_chat_photo: bool,
    /// The group was created.
    #[serde(default)]
    pub group_chat_created: bool,
    /// The supergroup was created.
    #[serde(default)]
    pub supergroup_chat_created: bool,
    /// The channel was created.
    #[serde(default)]
    pub channel_chat_created: bool,
    /// The group migrated to the supergroup with this id.
    #[serde(default)]
    pub migrate_to_chat_id: Option<i64>,
    /// The supergroup migrated from the group with this id.
    #[serde(default)]
    pub migrate_from_chat_id: Option<i64>,
    /// Pinned message.
    #[serde(default)]
    pub pinned_message: Option<Box<Message>>,
    /// Inline keyboard attached to the message.
    #[serde(default)]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

/// The command a message starts with, as seen by routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadingCommand<'a> {
    /// The message does not start with a `bot_command` entity.
    None,
    /// The command token, without the slash.
    Command(&'a str),
    /// A `bot_command` entity leads the message but its range does not
    /// select a slice of the text.
    Unreadable,
}

impl Message {
    /// Classifies how the message starts.
    ///
    /// A message starts with a command when its first entity at offset 0 is
    /// a `bot_command`.
    pub fn leading_command(&self) -> LeadingCommand<'_> {
        let Some(text) = self.text.as_deref() else {
            return LeadingCommand::None;
        };
        let Some(entity) = self.leading_command_entity() else {
            return LeadingCommand::None;
        };
        match text.get(1..entity.length) {
            Some(command) => LeadingCommand::Command(command),
            None => LeadingCommand::Unreadable,
        }
    }

    /// Returns the leading bot command, without the slash.
    ///
    /// For `/whoiam extra` this returns `whoiam`.
    pub fn command(&self) -> Option<&str> {
        match self.leading_command() {
            LeadingCommand::Command(command) => Some(command),
            LeadingCommand::None | LeadingCommand::Unreadable => None,
        }
    }

    /// Returns the text after the leading command, trimmed.
    pub fn command_args(&self) -> Option<&str> {
        let text = self.text.as_deref()?;
        let entity = self.leading_command_entity()?;
        text.get(entity.length..).map(str::trim)
    }

    fn leading_command_entity(&self) -> Option<&MessageEntity> {
        self.entities
            .iter()
            .find(|entity| entity.is_bot_command() && entity.offset == 0)
    }

    /// Returns the sender's id, if any.
    pub fn sender_id(&self) -> Option<i64> {
        self.sender.as_ref().map(|user| user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(text: &str, entities: serde_json::Value) -> Message {
        serde_json::from_value(json!({
            "message_id": 1,
            "from": {"id": 10, "first_name": "Ann"},
            "date": 1_700_000_000,
            "chat": {"id": 10, "type": "private"},
            "text": text,
            "entities": entities,
        }))
        .unwrap()
    }

    #[test]
    fn test_from_maps_to_sender() {
        let msg = message("hello", json!([]));
        assert_eq!(msg.sender_id(), Some(10));
        assert_eq!(msg.date.timestamp(), 1_700_000_000);

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["from"]["id"], 10);
        assert!(value.get("sender").is_none());
    }

    #[test]
    fn test_command_token() {
        let msg = message(
            "/whoiam extra",
            json!([{"type": "bot_command", "offset": 0, "length": 7}]),
        );
        assert_eq!(msg.command(), Some("whoiam"));
        assert_eq!(msg.command_args(), Some("extra"));
    }

    #[test]
    fn test_command_must_lead_the_text() {
        let msg = message(
            "say /hello",
            json!([{"type": "bot_command", "offset": 4, "length": 6}]),
        );
        assert_eq!(msg.command(), None);

        let msg = message("/hello", json!([{"type": "mention", "offset": 0, "length": 6}]));
        assert_eq!(msg.command(), None);
        assert_eq!(msg.leading_command(), LeadingCommand::None);
    }

    #[test]
    fn test_bad_command_range_is_unreadable() {
        let msg = message("/hi", json!([{"type": "bot_command", "offset": 0, "length": 9}]));
        assert_eq!(msg.leading_command(), LeadingCommand::Unreadable);
        assert_eq!(msg.command(), None);

        // Ends inside the two-byte 'é'.
        let msg = message("/café", json!([{"type": "bot_command", "offset": 0, "length": 5}]));
        assert_eq!(msg.leading_command(), LeadingCommand::Unreadable);

        let msg = message("/café", json!([{"type": "bot_command", "offset": 0, "length": 6}]));
        assert_eq!(msg.leading_command(), LeadingCommand::Command("café"));
    }

    #[test]
    fn test_nested_reply() {
        let msg: Message = serde_json::from_value(json!({
            "message_id": 2,
            "date": 1,
            "chat": {"id": -5, "type": "group", "title": "G"},
            "reply_to_message": {
                "message_id": 1,
                "date": 0,
                "chat": {"id": -5, "type": "group"},
                "text": "first"
            }
        }))
        .unwrap();
        assert_eq!(
            msg.reply_to_message.and_then(|reply| reply.text),
            Some("first".to_string())
        );
    }
}
