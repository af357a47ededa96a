//! Inline mode: query results and the message content they send.
//!
//! Every result kind is its own record. [`InlineQueryResult`] wraps them and
//! adds the `type` discriminant in front of the kind's own fields when
//! encoded, so the kinds never carry it themselves.

use crate::record;
use crate::record::{Field, FieldValue, Record, Scalar, ToField};

use super::keyboard::InlineKeyboardMarkup;
use super::request::ParseMode;

// =============================================================================
// Input Message Content
// =============================================================================

record! {
    /// Text content of a message sent by a result.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InputTextMessageContent {
        /// Message text.
        pub message_text: String,
        /// Text formatting.
        pub parse_mode: Option<ParseMode>,
        /// Disable link previews.
        pub disable_web_page_preview: Option<bool>,
    }
}

record! {
    /// Location content of a message sent by a result.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InputLocationMessageContent {
        /// Latitude.
        pub latitude: f64,
        /// Longitude.
        pub longitude: f64,
    }
}

record! {
    /// Venue content of a message sent by a result.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InputVenueMessageContent {
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
    }
}

record! {
    /// Contact content of a message sent by a result.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InputContactMessageContent {
        /// Phone number.
        pub phone_number: String,
        /// First name.
        pub first_name: String,
        /// Last name.
        pub last_name: Option<String>,
    }
}

/// The content of the message sent when a result is chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum InputMessageContent {
    /// Text.
    Text(InputTextMessageContent),
    /// Location.
    Location(InputLocationMessageContent),
    /// Venue.
    Venue(InputVenueMessageContent),
    /// Contact.
    Contact(InputContactMessageContent),
}

impl InputMessageContent {
    /// Creates plain text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(InputTextMessageContent {
            message_text: text.into(),
            ..InputTextMessageContent::default()
        })
    }
}

impl ToField for InputMessageContent {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        match self {
            Self::Text(content) => content.to_field(),
            Self::Location(content) => content.to_field(),
            Self::Venue(content) => content.to_field(),
            Self::Contact(content) => content.to_field(),
        }
    }
}

// =============================================================================
// Result Kinds
// =============================================================================

record! {
    /// A link to an article or web page.
    #[derive(Debug, Clone, PartialEq)]
    pub struct InlineQueryResultArticle {
        /// Result identifier.
        pub id: String,
        /// Title.
        pub title: String,
        /// Content of the message to send.
        pub input_message_content: InputMessageContent,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// URL of the result.
        pub url: Option<String>,
        /// Hide the URL in the message.
        pub hide_url: Option<bool>,
        /// Short description.
        pub description: Option<String>,
        /// Thumbnail URL.
        pub thumb_url: Option<String>,
        /// Thumbnail width.
        pub thumb_width: Option<u32>,
        /// Thumbnail height.
        pub thumb_height: Option<u32>,
    }
}

impl InlineQueryResultArticle {
    /// Creates an article result.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        input_message_content: InputMessageContent,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            input_message_content,
            reply_markup: None,
            url: None,
            hide_url: None,
            description: None,
            thumb_url: None,
            thumb_width: None,
            thumb_height: None,
        }
    }
}

record! {
    /// A link to a photo.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultPhoto {
        /// Result identifier.
        pub id: String,
        /// Photo URL.
        pub photo_url: String,
        /// Thumbnail URL.
        pub thumb_url: String,
        /// Photo width.
        pub photo_width: Option<u32>,
        /// Photo height.
        pub photo_height: Option<u32>,
        /// Title.
        pub title: Option<String>,
        /// Short description.
        pub description: Option<String>,
        /// Caption.
        pub caption: Option<String>,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the photo.
        pub input_message_content: Option<InputMessageContent>,
    }
}

record! {
    /// A photo stored on the servers.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultCachedPhoto {
        /// Result identifier.
        pub id: String,
        /// File identifier of the photo.
        pub photo_file_id: String,
        /// Title.
        pub title: Option<String>,
        /// Short description.
        pub description: Option<String>,
        /// Caption.
        pub caption: Option<String>,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the photo.
        pub input_message_content: Option<InputMessageContent>,
    }
}

record! {
    /// A link to an animated GIF.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultGif {
        /// Result identifier.
        pub id: String,
        /// GIF URL.
        pub gif_url: String,
        /// Thumbnail URL.
        pub thumb_url: String,
        /// GIF width.
        pub gif_width: Option<u32>,
        /// GIF height.
        pub gif_height: Option<u32>,
        /// Title.
        pub title: Option<String>,
        /// Caption.
        pub caption: Option<String>,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the animation.
        pub input_message_content: Option<InputMessageContent>,
    }
}

record! {
    /// An animated GIF stored on the servers.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultCachedGif {
        /// Result identifier.
        pub id: String,
        /// File identifier of the GIF.
        pub gif_file_id: String,
        /// Title.
        pub title: Option<String>,
        /// Caption.
        pub caption: Option<String>,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the animation.
        pub input_message_content: Option<InputMessageContent>,
    }
}

record! {
    /// A link to a silent MPEG-4 animation.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultMpeg4Gif {
        /// Result identifier.
        pub id: String,
        /// Animation URL.
        pub mpeg4_url: String,
        /// Thumbnail URL.
        pub thumb_url: String,
        /// Video width.
        pub mpeg4_width: Option<u32>,
        /// Video height.
        pub mpeg4_height: Option<u32>,
        /// Title.
        pub title: Option<String>,
        /// Caption.
        pub caption: Option<String>,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the animation.
        pub input_message_content: Option<InputMessageContent>,
    }
}

record! {
    /// A silent MPEG-4 animation stored on the servers.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultCachedMpeg4Gif {
        /// Result identifier.
        pub id: String,
        /// File identifier of the animation.
        pub mpeg4_file_id: String,
        /// Title.
        pub title: Option<String>,
        /// Caption.
        pub caption: Option<String>,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the animation.
        pub input_message_content: Option<InputMessageContent>,
    }
}

record! {
    /// A link to a video player or file.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultVideo {
        /// Result identifier.
        pub id: String,
        /// Video URL.
        pub video_url: String,
        /// `text/html` or `video/mp4`.
        pub mime_type: String,
        /// Thumbnail URL.
        pub thumb_url: String,
        /// Title.
        pub title: String,
        /// Caption.
        pub caption: Option<String>,
        /// Video width.
        pub video_width: Option<u32>,
        /// Video height.
        pub video_height: Option<u32>,
        /// Duration in seconds.
        pub video_duration: Option<u32>,
        /// Short description.
        pub description: Option<String>,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the video.
        pub input_message_content: Option<InputMessageContent>,
    }
}

record! {
    /// A video stored on the servers.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultCachedVideo {
        /// Result identifier.
        pub id: String,
        /// File identifier of the video.
        pub video_file_id: String,
        /// Title.
        pub title: String,
        /// Short description.
        pub description: Option<String>,
        /// Caption.
        pub caption: Option<String>,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the video.
        pub input_message_content: Option<InputMessageContent>,
    }
}

record! {
    /// A link to an MP3 file.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultAudio {
        /// Result identifier.
        pub id: String,
        /// Audio URL.
        pub audio_url: String,
        /// Title.
        pub title: String,
        /// Performer.
        pub performer: Option<String>,
        /// Duration in seconds.
        pub audio_duration: Option<u32>,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the audio.
        pub input_message_content: Option<InputMessageContent>,
    }
}

record! {
    /// An MP3 file stored on the servers.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultCachedAudio {
        /// Result identifier.
        pub id: String,
        /// File identifier of the audio.
        pub audio_file_id: String,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the audio.
        pub input_message_content: Option<InputMessageContent>,
    }
}

record! {
    /// A link to an OGG voice recording.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultVoice {
        /// Result identifier.
        pub id: String,
        /// Recording URL.
        pub voice_url: String,
        /// Title.
        pub title: String,
        /// Duration in seconds.
        pub voice_duration: Option<u32>,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the recording.
        pub input_message_content: Option<InputMessageContent>,
    }
}

record! {
    /// A voice recording stored on the servers.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultCachedVoice {
        /// Result identifier.
        pub id: String,
        /// File identifier of the recording.
        pub voice_file_id: String,
        /// Title.
        pub title: String,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the recording.
        pub input_message_content: Option<InputMessageContent>,
    }
}

record! {
    /// A link to a PDF or ZIP file.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultDocument {
        /// Result identifier.
        pub id: String,
        /// Title.
        pub title: String,
        /// File URL.
        pub document_url: String,
        /// `application/pdf` or `application/zip`.
        pub mime_type: String,
        /// Caption.
        pub caption: Option<String>,
        /// Short description.
        pub description: Option<String>,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the file.
        pub input_message_content: Option<InputMessageContent>,
        /// Thumbnail URL.
        pub thumb_url: Option<String>,
        /// Thumbnail width.
        pub thumb_width: Option<u32>,
        /// Thumbnail height.
        pub thumb_height: Option<u32>,
    }
}

record! {
    /// A file stored on the servers.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultCachedDocument {
        /// Result identifier.
        pub id: String,
        /// Title.
        pub title: String,
        /// File identifier of the document.
        pub document_file_id: String,
        /// Short description.
        pub description: Option<String>,
        /// Caption.
        pub caption: Option<String>,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the file.
        pub input_message_content: Option<InputMessageContent>,
    }
}

record! {
    /// A location on a map.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultLocation {
        /// Result identifier.
        pub id: String,
        /// Latitude.
        pub latitude: f64,
        /// Longitude.
        pub longitude: f64,
        /// Title.
        pub title: String,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the location.
        pub input_message_content: Option<InputMessageContent>,
        /// Thumbnail URL.
        pub thumb_url: Option<String>,
        /// Thumbnail width.
        pub thumb_width: Option<u32>,
        /// Thumbnail height.
        pub thumb_height: Option<u32>,
    }
}

record! {
    /// A venue.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultVenue {
        /// Result identifier.
        pub id: String,
        /// Latitude.
        pub latitude: f64,
        /// Longitude.
        pub longitude: f64,
        /// Title.
        pub title: String,
        /// Address.
        pub address: String,
        /// Foursquare identifier.
        pub foursquare_id: Option<String>,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the venue.
        pub input_message_content: Option<InputMessageContent>,
        /// Thumbnail URL.
        pub thumb_url: Option<String>,
        /// Thumbnail width.
        pub thumb_width: Option<u32>,
        /// Thumbnail height.
        pub thumb_height: Option<u32>,
    }
}

record! {
    /// A contact with a phone number.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultContact {
        /// Result identifier.
        pub id: String,
        /// Phone number.
        pub phone_number: String,
        /// First name.
        pub first_name: String,
        /// Last name.
        pub last_name: Option<String>,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the contact.
        pub input_message_content: Option<InputMessageContent>,
        /// Thumbnail URL.
        pub thumb_url: Option<String>,
        /// Thumbnail width.
        pub thumb_width: Option<u32>,
        /// Thumbnail height.
        pub thumb_height: Option<u32>,
    }
}

record! {
    /// A sticker stored on the servers.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InlineQueryResultCachedSticker {
        /// Result identifier.
        pub id: String,
        /// File identifier of the sticker.
        pub sticker_file_id: String,
        /// Inline keyboard attached to the sent message.
        pub reply_markup: Option<InlineKeyboardMarkup>,
        /// Content sent instead of the sticker.
        pub input_message_content: Option<InputMessageContent>,
    }
}

// =============================================================================
// Result Union
// =============================================================================

macro_rules! inline_results {
    ($($(#[$meta:meta])* $variant:ident($kind:ident) => $wire:literal),* $(,)?) => {
        /// One result of an inline query.
        #[derive(Debug, Clone, PartialEq)]
        pub enum InlineQueryResult {
            $(
                $(#[$meta])*
                $variant($kind),
            )*
        }

        impl InlineQueryResult {
            /// Returns the wire `type` of this result.
            pub fn type_name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => $wire,)*
                }
            }

            /// Returns the result identifier.
            pub fn id(&self) -> &str {
                match self {
                    $(Self::$variant(result) => &result.id,)*
                }
            }

            /// Replaces the result identifier.
            pub fn set_id(&mut self, id: impl Into<String>) {
                let id = id.into();
                match self {
                    $(Self::$variant(result) => result.id = id,)*
                }
            }

            fn kind(&self) -> &dyn Record {
                match self {
                    $(Self::$variant(result) => result as &dyn Record,)*
                }
            }
        }

        $(
            impl From<$kind> for InlineQueryResult {
                fn from(result: $kind) -> Self {
                    Self::$variant(result)
                }
            }
        )*
    };
}

inline_results! {
    /// Article.
    Article(InlineQueryResultArticle) => "article",
    /// Photo by URL.
    Photo(InlineQueryResultPhoto) => "photo",
    /// Cached photo.
    CachedPhoto(InlineQueryResultCachedPhoto) => "photo",
    /// GIF by URL.
    Gif(InlineQueryResultGif) => "gif",
    /// Cached GIF.
    CachedGif(InlineQueryResultCachedGif) => "gif",
    /// MPEG-4 animation by URL.
    Mpeg4Gif(InlineQueryResultMpeg4Gif) => "mpeg4_gif",
    /// Cached MPEG-4 animation.
    CachedMpeg4Gif(InlineQueryResultCachedMpeg4Gif) => "mpeg4_gif",
    /// Video by URL.
    Video(InlineQueryResultVideo) => "video",
    /// Cached video.
    CachedVideo(InlineQueryResultCachedVideo) => "video",
    /// Audio by URL.
    Audio(InlineQueryResultAudio) => "audio",
    /// Cached audio.
    CachedAudio(InlineQueryResultCachedAudio) => "audio",
    /// Voice recording by URL.
    Voice(InlineQueryResultVoice) => "voice",
    /// Cached voice recording.
    CachedVoice(InlineQueryResultCachedVoice) => "voice",
    /// Document by URL.
    Document(InlineQueryResultDocument) => "document",
    /// Cached document.
    CachedDocument(InlineQueryResultCachedDocument) => "document",
    /// Location.
    Location(InlineQueryResultLocation) => "location",
    /// Venue.
    Venue(InlineQueryResultVenue) => "venue",
    /// Contact.
    Contact(InlineQueryResultContact) => "contact",
    /// Cached sticker.
    CachedSticker(InlineQueryResultCachedSticker) => "sticker",
}

impl Record for InlineQueryResult {
    fn fields(&self) -> Vec<Field<'_>> {
        let mut fields = vec![Field {
            name: "type",
            value: FieldValue::Scalar(Scalar::Str(self.type_name())),
        }];
        fields.extend(self.kind().fields());
        fields
    }
}

impl ToField for InlineQueryResult {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        Some(FieldValue::Record(self))
    }
}
