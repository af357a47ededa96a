//! Request records, one per API method.
//!
//! Required fields are taken by each record's `new`; optional ones are
//! filled with struct update syntax:
//!
//! ```rust,ignore
//! let request = SendMessage {
//!     parse_mode: Some(ParseMode::Markdown),
//!     ..SendMessage::new(chat_id, "*hello*")
//! };
//! ```
//!
//! The fields shared by every `send*` call (`disable_notification`,
//! `reply_to_message_id`, `reply_markup`) are declared on each record
//! after its own fields.

use crate::file::InputFile;
use crate::record;
use crate::record::{FieldValue, Scalar, ToField};

use super::inline::InlineQueryResult;
use super::keyboard::{InlineKeyboardMarkup, ReplyMarkup};
use super::types::Identifier;

// =============================================================================
// Field Types
// =============================================================================

/// Text formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Markdown.
    Markdown,
    /// HTML.
    Html,
}

impl ParseMode {
    /// Wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "Markdown",
            Self::Html => "HTML",
        }
    }
}

impl ToField for ParseMode {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        Some(FieldValue::Scalar(Scalar::Str(self.as_str())))
    }
}

/// Activity shown in the chat header while the bot prepares a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    /// Typing text.
    Typing,
    /// Uploading a photo.
    UploadPhoto,
    /// Recording a video.
    RecordVideo,
    /// Uploading a video.
    UploadVideo,
    /// Recording audio.
    RecordAudio,
    /// Uploading audio.
    UploadAudio,
    /// Uploading a document.
    UploadDocument,
    /// Looking up a location.
    FindLocation,
}

impl ChatAction {
    /// Wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::UploadPhoto => "upload_photo",
            Self::RecordVideo => "record_video",
            Self::UploadVideo => "upload_video",
            Self::RecordAudio => "record_audio",
            Self::UploadAudio => "upload_audio",
            Self::UploadDocument => "upload_document",
            Self::FindLocation => "find_location",
        }
    }
}

impl ToField for ChatAction {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        Some(FieldValue::Scalar(Scalar::Str(self.as_str())))
    }
}

/// A file to send: a new upload, or the id (or URL) of a file the API
/// already knows.
#[derive(Debug, Clone)]
pub enum FileRef {
    /// Upload this payload.
    Upload(InputFile),
    /// Reuse a stored file by id, or fetch one by URL.
    Id(String),
}

impl ToField for FileRef {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        match self {
            Self::Upload(file) => file.to_field(),
            Self::Id(id) => id.to_field(),
        }
    }
}

impl From<InputFile> for FileRef {
    fn from(file: InputFile) -> Self {
        Self::Upload(file)
    }
}

impl From<String> for FileRef {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for FileRef {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

// =============================================================================
// Updates & Files
// =============================================================================

record! {
    /// `getUpdates` parameters.
    #[derive(Debug, Clone, Default)]
    pub struct GetUpdates {
        /// First update id to return.
        pub offset: Option<i64>,
        /// Maximum number of updates.
        pub limit: Option<u32>,
        /// Long-poll timeout in seconds.
        pub timeout: Option<u32>,
    }
}

record! {
    /// `setWebhook` parameters. An empty URL removes the webhook.
    #[derive(Debug, Clone, Default)]
    pub struct SetWebhook {
        /// HTTPS URL receiving updates.
        pub url: String,
        /// Public key certificate, for self-signed setups.
        pub certificate: Option<InputFile>,
    }
}

record! {
    /// `getFile` parameters.
    #[derive(Debug, Clone)]
    pub struct GetFile {
        /// File identifier.
        pub file_id: String,
    }
}

impl GetFile {
    /// Creates the request.
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
        }
    }
}

record! {
    /// `getUserProfilePhotos` parameters.
    #[derive(Debug, Clone)]
    pub struct GetUserProfilePhotos {
        /// Target user.
        pub user_id: i64,
        /// Number of the first photo.
        pub offset: Option<u32>,
        /// Maximum number of photos.
        pub limit: Option<u32>,
    }
}

impl GetUserProfilePhotos {
    /// Creates the request.
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            offset: None,
            limit: None,
        }
    }
}

// =============================================================================
// Sending
// =============================================================================

record! {
    /// `sendMessage` parameters.
    #[derive(Debug, Clone)]
    pub struct SendMessage {
        /// Target chat.
        pub chat_id: Identifier,
        /// Message text.
        pub text: String,
        /// Text formatting.
        pub parse_mode: Option<ParseMode>,
        /// Disable link previews.
        pub disable_web_page_preview: Option<bool>,
        /// Send silently.
        pub disable_notification: Option<bool>,
        /// Message to reply to.
        pub reply_to_message_id: Option<i64>,
        /// Keyboard or reply prompt.
        pub reply_markup: Option<ReplyMarkup>,
    }
}

impl SendMessage {
    /// Creates the request.
    pub fn new(chat_id: impl Into<Identifier>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            parse_mode: None,
            disable_web_page_preview: None,
            disable_notification: None,
            reply_to_message_id: None,
            reply_markup: None,
        }
    }
}

record! {
    /// `forwardMessage` parameters.
    #[derive(Debug, Clone)]
    pub struct ForwardMessage {
        /// Target chat.
        pub chat_id: Identifier,
        /// Chat the message comes from.
        pub from_chat_id: Identifier,
        /// Send silently.
        pub disable_notification: Option<bool>,
        /// Message to forward.
        pub message_id: i64,
    }
}

impl ForwardMessage {
    /// Creates the request.
    pub fn new(
        chat_id: impl Into<Identifier>,
        from_chat_id: impl Into<Identifier>,
        message_id: i64,
    ) -> Self {
        Self {
            chat_id: chat_id.into(),
            from_chat_id: from_chat_id.into(),
            disable_notification: None,
            message_id,
        }
    }
}

record! {
    /// `sendPhoto` parameters.
    #[derive(Debug, Clone)]
    pub struct SendPhoto {
        /// Target chat.
        pub chat_id: Identifier,
        /// Photo to send.
        pub photo: FileRef,
        /// Caption.
        pub caption: Option<String>,
        /// Send silently.
        pub disable_notification: Option<bool>,
        /// Message to reply to.
        pub reply_to_message_id: Option<i64>,
        /// Keyboard or reply prompt.
        pub reply_markup: Option<ReplyMarkup>,
    }
}

impl SendPhoto {
    /// Creates the request.
    pub fn new(chat_id: impl Into<Identifier>, photo: impl Into<FileRef>) -> Self {
        Self {
            chat_id: chat_id.into(),
            photo: photo.into(),
            caption: None,
            disable_notification: None,
            reply_to_message_id: None,
            reply_markup: None,
        }
    }
}

record! {
    /// `sendAudio` parameters.
    #[derive(Debug, Clone)]
    pub struct SendAudio {
        /// Target chat.
        pub chat_id: Identifier,
        /// Audio to send.
        pub audio: FileRef,
        /// Duration in seconds.
        pub duration: Option<u32>,
        /// Performer.
        pub performer: Option<String>,
        /// Track name.
        pub title: Option<String>,
        /// Send silently.
        pub disable_notification: Option<bool>,
        /// Message to reply to.
        pub reply_to_message_id: Option<i64>,
        /// Keyboard or reply prompt.
        pub reply_markup: Option<ReplyMarkup>,
    }
}

impl SendAudio {
    /// Creates the request.
    pub fn new(chat_id: impl Into<Identifier>, audio: impl Into<FileRef>) -> Self {
        Self {
            chat_id: chat_id.into(),
            audio: audio.into(),
            duration: None,
            performer: None,
            title: None,
            disable_notification: None,
            reply_to_message_id: None,
            reply_markup: None,
        }
    }
}

record! {
    /// `sendDocument` parameters.
    #[derive(Debug, Clone)]
    pub struct SendDocument {
        /// Target chat.
        pub chat_id: Identifier,
        /// File to send.
        pub document: FileRef,
        /// Caption.
        pub caption: Option<String>,
        /// Send silently.
        pub disable_notification: Option<bool>,
        /// Message to reply to.
        pub reply_to_message_id: Option<i64>,
        /// Keyboard or reply prompt.
        pub reply_markup: Option<ReplyMarkup>,
    }
}

impl SendDocument {
    /// Creates the request.
    pub fn new(chat_id: impl Into<Identifier>, document: impl Into<FileRef>) -> Self {
        Self {
            chat_id: chat_id.into(),
            document: document.into(),
            caption: None,
            disable_notification: None,
            reply_to_message_id: None,
            reply_markup: None,
        }
    }
}

record! {
    /// `sendSticker` parameters.
    #[derive(Debug, Clone)]
    pub struct SendSticker {
        /// Target chat.
        pub chat_id: Identifier,
        /// Sticker to send.
        pub sticker: FileRef,
        /// Send silently.
        pub disable_notification: Option<bool>,
        /// Message to reply to.
        pub reply_to_message_id: Option<i64>,
        /// Keyboard or reply prompt.
        pub reply_markup: Option<ReplyMarkup>,
    }
}

impl SendSticker {
    /// Creates the request.
    pub fn new(chat_id: impl Into<Identifier>, sticker: impl Into<FileRef>) -> Self {
        Self {
            chat_id: chat_id.into(),
            sticker: sticker.into(),
            disable_notification: None,
            reply_to_message_id: None,
            reply_markup: None,
        }
    }
}

record! {
    /// `sendVideo` parameters.
    #[derive(Debug, Clone)]
    pub struct SendVideo {
        /// Target chat.
        pub chat_id: Identifier,
        /// Video to send.
        pub video: FileRef,
        /// Duration in seconds.
        pub duration: Option<u32>,
        /// Width.
        pub width: Option<u32>,
        /// Height.
        pub height: Option<u32>,
        /// Caption.
        pub caption: Option<String>,
        /// Send silently.
        pub disable_notification: Option<bool>,
        /// Message to reply to.
        pub reply_to_message_id: Option<i64>,
        /// Keyboard or reply prompt.
        pub reply_markup: Option<ReplyMarkup>,
    }
}

impl SendVideo {
    /// Creates the request.
    pub fn new(chat_id: impl Into<Identifier>, video: impl Into<FileRef>) -> Self {
        Self {
            chat_id: chat_id.into(),
            video: video.into(),
            duration: None,
            width: None,
            height: None,
            caption: None,
            disable_notification: None,
            reply_to_message_id: None,
            reply_markup: None,
        }
    }
}

record! {
    /// `sendVoice` parameters.
    #[derive(Debug, Clone)]
    pub struct SendVoice {
        /// Target chat.
        pub chat_id: Identifier,
        /// Voice note to send.
        pub voice: FileRef,
        /// Duration in seconds.
        pub duration: Option<u32>,
        /// Send silently.
        pub disable_notification: Option<bool>,
        /// Message to reply to.
        pub reply_to_message_id: Option<i64>,
        /// Keyboard or reply prompt.
        pub reply_markup: Option<ReplyMarkup>,
    }
}

impl SendVoice {
    /// Creates the request.
    pub fn new(chat_id: impl Into<Identifier>, voice: impl Into<FileRef>) -> Self {
        Self {
            chat_id: chat_id.into(),
            voice: voice.into(),
            duration: None,
            disable_notification: None,
            reply_to_message_id: None,
            reply_markup: None,
        }
    }
}

record! {
    /// `sendLocation` parameters.
    #[derive(Debug, Clone)]
    pub struct SendLocation {
        /// Target chat.
        pub chat_id: Identifier,
        /// Latitude.
        pub latitude: f64,
        /// Longitude.
        pub longitude: f64,
        /// Send silently.
        pub disable_notification: Option<bool>,
        /// Message to reply to.
        pub reply_to_message_id: Option<i64>,
        /// Keyboard or reply prompt.
        pub reply_markup: Option<ReplyMarkup>,
    }
}

impl SendLocation {
    /// Creates the request.
    pub fn new(chat_id: impl Into<Identifier>, latitude: f64, longitude: f64) -> Self {
        Self {
            chat_id: chat_id.into(),
            latitude,
            longitude,
            disable_notification: None,
            reply_to_message_id: None,
            reply_markup: None,
        }
    }
}

record! {
    /// `sendVenue` parameters.
    #[derive(Debug, Clone)]
    pub struct SendVenue {
        /// Target chat.
        pub chat_id: Identifier,
        /// Latitude.
        pub latitude: f64,
        /// Longitude.
        pub longitude: f64,
        /// Venue name.
        pub title: String,
        /// Address.
        pub address: String,
        /// Foursquare identifier.
        pub foursquare_id: Option<String>,
        /// Send silently.
        pub disable_notification: Option<bool>,
        /// Message to reply to.
        pub reply_to_message_id: Option<i64>,
        /// Keyboard or reply prompt.
        pub reply_markup: Option<ReplyMarkup>,
    }
}

impl SendVenue {
    /// Creates the request.
    pub fn new(
        chat_id: impl Into<Identifier>,
        latitude: f64,
        longitude: f64,
        title: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            chat_id: chat_id.into(),
            latitude,
            longitude,
            title: title.into(),
            address: address.into(),
            foursquare_id: None,
            disable_notification: None,
            reply_to_message_id: None,
            reply_markup: None,
        }
    }
}

record! {
    /// `sendContact` parameters.
    #[derive(Debug, Clone)]
    pub struct SendContact {
        /// Target chat.
        pub chat_id: Identifier,
        /// Phone number.
        pub phone_number: String,
        /// First name.
        pub first_name: String,
        /// Last name.
        pub last_name: Option<String>,
        /// Send silently.
        pub disable_notification: Option<bool>,
        /// Message to reply to.
        pub reply_to_message_id: Option<i64>,
        /// Keyboard or reply prompt.
        pub reply_markup: Option<ReplyMarkup>,
    }
}

impl SendContact {
    /// Creates the request.
    pub fn new(
        chat_id: impl Into<Identifier>,
        phone_number: impl Into<String>,
        first_name: impl Into<String>,
    ) -> Self {
        Self {
            chat_id: chat_id.into(),
            phone_number: phone_number.into(),
            first_name: first_name.into(),
            last_name: None,
            disable_notification: None,
            reply_to_message_id: None,
            reply_markup: None,
        }
    }
}

record! {
    /// `sendChatAction` parameters.
    #[derive(Debug, Clone)]
    pub struct SendChatAction {
        /// Target chat.
        pub chat_id: Identifier,
        /// Activity to show.
        pub action: ChatAction,
    }
}

impl SendChatAction {
    /// Creates the request.
    pub fn new(chat_id: impl Into<Identifier>, action: ChatAction) -> Self {
        Self {
            chat_id: chat_id.into(),
            action,
        }
    }
}

// =============================================================================
// Inline Mode & Callbacks
// =============================================================================

record! {
    /// `answerInlineQuery` parameters.
    #[derive(Debug, Clone)]
    pub struct AnswerInlineQuery {
        /// Query being answered.
        pub inline_query_id: String,
        /// Results, at most 50.
        pub results: Vec<InlineQueryResult>,
        /// Seconds the results may be cached.
        pub cache_time: Option<u32>,
        /// Cache per user instead of per query.
        pub is_personal: Option<bool>,
        /// Offset to request the next page with.
        pub next_offset: Option<String>,
        /// Label of a button switching to a private chat.
        pub switch_pm_text: Option<String>,
        /// Start parameter sent with that button.
        pub switch_pm_parameter: Option<String>,
    }
}

impl AnswerInlineQuery {
    /// Creates the request.
    pub fn new(inline_query_id: impl Into<String>, results: Vec<InlineQueryResult>) -> Self {
        Self {
            inline_query_id: inline_query_id.into(),
            results,
            cache_time: None,
            is_personal: None,
            next_offset: None,
            switch_pm_text: None,
            switch_pm_parameter: None,
        }
    }
}

record! {
    /// `answerCallbackQuery` parameters.
    #[derive(Debug, Clone)]
    pub struct AnswerCallbackQuery {
        /// Query being answered.
        pub callback_query_id: String,
        /// Notification text.
        pub text: Option<String>,
        /// Show an alert instead of a notification.
        pub show_alert: Option<bool>,
    }
}

impl AnswerCallbackQuery {
    /// Creates the request.
    pub fn new(callback_query_id: impl Into<String>) -> Self {
        Self {
            callback_query_id: callback_query_id.into(),
            text: None,
            show_alert: None,
        }
    }
}

// =============================================================================
// Editing
// =============================================================================

/// The message an edit applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum EditTarget {
    /// A message in a chat.
    Chat {
        /// Chat holding the message.
        chat_id: Identifier,
        /// Message to edit.
        message_id: i64,
    },
    /// A message sent via inline mode.
    Inline(String),
}

impl EditTarget {
    fn split(self) -> (Option<Identifier>, Option<i64>, Option<String>) {
        match self {
            Self::Chat {
                chat_id,
                message_id,
            } => (Some(chat_id), Some(message_id), None),
            Self::Inline(id) => (None, None, Some(id)),
        }
    }
}

record! {
    /// `editMessageText` parameters.
    #[derive(Debug, Clone)]
    pub struct EditMessageText {
        /// Chat holding the message.
        pub chat_id: Option<Identifier>,
        /// Message to edit.
        pub message_id: Option<i64>,
        /// Inline message to edit.
        pub inline_message_id: Option<String>,
        /// New text.
        pub text: String,
        /// Text formatting.
        pub parse_mode: Option<ParseMode>,
        /// Disable link previews.
        pub disable_web_page_preview: Option<bool>,
        /// New inline keyboard.
        pub reply_markup: Option<InlineKeyboardMarkup>,
    }
}

impl EditMessageText {
    /// Creates the request.
    pub fn new(target: EditTarget, text: impl Into<String>) -> Self {
        let (chat_id, message_id, inline_message_id) = target.split();
        Self {
            chat_id,
            message_id,
            inline_message_id,
            text: text.into(),
            parse_mode: None,
            disable_web_page_preview: None,
            reply_markup: None,
        }
    }
}

record! {
    /// `editMessageCaption` parameters.
    #[derive(Debug, Clone)]
    pub struct EditMessageCaption {
        /// Chat holding the message.
        pub chat_id: Option<Identifier>,
        /// Message to edit.
        pub message_id: Option<i64>,
        /// Inline message to edit.
        pub inline_message_id: Option<String>,
        /// New caption.
        pub caption: Option<String>,
        /// New inline keyboard.
        pub reply_markup: Option<InlineKeyboardMarkup>,
    }
}

impl EditMessageCaption {
    /// Creates the request.
    pub fn new(target: EditTarget, caption: impl Into<String>) -> Self {
        let (chat_id, message_id, inline_message_id) = target.split();
        Self {
            chat_id,
            message_id,
            inline_message_id,
            caption: Some(caption.into()),
            reply_markup: None,
        }
    }
}

record! {
    /// `editMessageReplyMarkup` parameters.
    #[derive(Debug, Clone)]
    pub struct EditMessageReplyMarkup {
        /// Chat holding the message.
        pub chat_id: Option<Identifier>,
        /// Message to edit.
        pub message_id: Option<i64>,
        /// Inline message to edit.
        pub inline_message_id: Option<String>,
        /// New inline keyboard. `None` removes it.
        pub reply_markup: Option<InlineKeyboardMarkup>,
    }
}

impl EditMessageReplyMarkup {
    /// Creates the request.
    pub fn new(target: EditTarget, reply_markup: Option<InlineKeyboardMarkup>) -> Self {
        let (chat_id, message_id, inline_message_id) = target.split();
        Self {
            chat_id,
            message_id,
            inline_message_id,
            reply_markup,
        }
    }
}

// =============================================================================
// Chat Administration
// =============================================================================

record! {
    /// Parameters of calls that only name a chat: `leaveChat`, `getChat`,
    /// `getChatAdministrators` and `getChatMembersCount`.
    #[derive(Debug, Clone)]
    pub struct ChatRequest {
        /// Target chat.
        pub chat_id: Identifier,
    }
}

impl ChatRequest {
    /// Creates the request.
    pub fn new(chat_id: impl Into<Identifier>) -> Self {
        Self {
            chat_id: chat_id.into(),
        }
    }
}

record! {
    /// Parameters of calls that name a chat member: `kickChatMember`,
    /// `unbanChatMember` and `getChatMember`.
    #[derive(Debug, Clone)]
    pub struct ChatMemberRequest {
        /// Target chat.
        pub chat_id: Identifier,
        /// Target user.
        pub user_id: i64,
    }
}

impl ChatMemberRequest {
    /// Creates the request.
    pub fn new(chat_id: impl Into<Identifier>, user_id: i64) -> Self {
        Self {
            chat_id: chat_id.into(),
            user_id,
        }
    }
}
