//! Shared entity types received from the API.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::record::{FieldValue, Scalar, ToField};

// =============================================================================
// Identifier
// =============================================================================

/// A chat or user identifier, either numeric or a `@username` string.
///
/// The remote API mixes both representations, so identifier fields accept
/// either one transparently.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Numeric identifier.
    Int(i64),
    /// String identifier, such as `@channelusername`.
    Str(String),
}

impl Identifier {
    /// Returns the numeric value, parsing string identifiers if needed.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(id) => Some(*id),
            Self::Str(id) => id.parse().ok(),
        }
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for Identifier {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for Identifier {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

impl ToField for Identifier {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        Some(FieldValue::Scalar(match self {
            Self::Int(id) => Scalar::Int(*id),
            Self::Str(id) => Scalar::Str(id),
        }))
    }
}

/// Deserializes an integer id sent either as a number or as a string.
pub(crate) fn int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let id = Identifier::deserialize(deserializer)?;
    id.as_i64()
        .ok_or_else(|| serde::de::Error::custom(format!("invalid integer id '{id}'")))
}

// =============================================================================
// Actors
// =============================================================================

/// A user or bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    #[serde(deserialize_with = "int_or_string")]
    pub id: i64,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Username, without the leading `@`.
    #[serde(default)]
    pub username: Option<String>,
}

/// Kind of chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    /// One-to-one chat.
    Private,
    /// Basic group.
    Group,
    /// Supergroup.
    Supergroup,
    /// Channel.
    Channel,
    /// A kind this library does not know about.
    #[serde(other)]
    Unknown,
}

/// A chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    /// Unique identifier.
    #[serde(deserialize_with = "int_or_string")]
    pub id: i64,
    /// Chat kind.
    #[serde(rename = "type")]
    pub kind: ChatType,
    /// Title, for groups, supergroups and channels.
    #[serde(default)]
    pub title: Option<String>,
    /// Username, for private chats and public groups or channels.
    #[serde(default)]
    pub username: Option<String>,
    /// First name of the other party in a private chat.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name of the other party in a private chat.
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Membership status of a chat member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// Chat owner.
    Creator,
    /// Administrator.
    Administrator,
    /// Regular member.
    Member,
    /// Left the chat.
    Left,
    /// Banned.
    Kicked,
    /// A status this library does not know about.
    #[serde(other)]
    Unknown,
}

/// One member of a chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMember {
    /// The member.
    pub user: User,
    /// Membership status.
    pub status: MemberStatus,
}

// =============================================================================
// Message Parts
// =============================================================================

/// A special entity in a message text, such as a command or a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEntity {
    /// Entity kind, e.g. `bot_command`, `mention`, `url`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Offset in the text.
    pub offset: usize,
    /// Length of the entity.
    pub length: usize,
    /// URL opened on tap, for `text_link` entities.
    #[serde(default)]
    pub url: Option<String>,
    /// Mentioned user, for `text_mention` entities.
    #[serde(default)]
    pub user: Option<User>,
}

impl MessageEntity {
    /// Entity kind of a bot command.
    pub const BOT_COMMAND: &'static str = "bot_command";

    /// Returns `true` for a bot command entity.
    pub fn is_bot_command(&self) -> bool {
        self.kind == Self::BOT_COMMAND
    }
}

/// One size of a photo or thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoSize {
    /// File identifier.
    pub file_id: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// File size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// An audio file treated as music.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audio {
    /// File identifier.
    pub file_id: String,
    /// Duration in seconds.
    #[serde(default)]
    pub duration: u32,
    /// Performer.
    #[serde(default)]
    pub performer: Option<String>,
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// File size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// A general file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// File identifier.
    pub file_id: String,
    /// Thumbnail.
    #[serde(default)]
    pub thumb: Option<PhotoSize>,
    /// Original file name.
    #[serde(default)]
    pub file_name: Option<String>,
    /// MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// File size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// A sticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    /// File identifier.
    pub file_id: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Thumbnail.
    #[serde(default)]
    pub thumb: Option<PhotoSize>,
    /// Associated emoji.
    #[serde(default)]
    pub emoji: Option<String>,
    /// File size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// A video file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// File identifier.
    pub file_id: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Duration in seconds.
    #[serde(default)]
    pub duration: u32,
    /// Thumbnail.
    #[serde(default)]
    pub thumb: Option<PhotoSize>,
    /// MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// File size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// A voice note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    /// File identifier.
    pub file_id: String,
    /// Duration in seconds.
    #[serde(default)]
    pub duration: u32,
    /// MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// File size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// A phone contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Phone number.
    pub phone_number: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// User id, if the contact is a known user.
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// A point on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Longitude.
    pub longitude: f64,
    /// Latitude.
    pub latitude: f64,
}

/// A venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    /// Venue location.
    pub location: Location,
    /// Name.
    pub title: String,
    /// Address.
    pub address: String,
    /// Foursquare identifier.
    #[serde(default)]
    pub foursquare_id: Option<String>,
}

// =============================================================================
// Files
// =============================================================================

/// A file ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// File identifier.
    pub file_id: String,
    /// File size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
    /// Path to pass to the download endpoint.
    #[serde(default)]
    pub file_path: Option<String>,
}

/// A user's profile pictures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfilePhotos {
    /// Total number of pictures the user has.
    pub total_count: u32,
    /// Requested pictures, each in up to four sizes.
    #[serde(default)]
    pub photos: Vec<Vec<PhotoSize>>,
}
