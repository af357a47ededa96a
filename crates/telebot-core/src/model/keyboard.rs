//! Reply markup: custom keyboards, inline keyboards and reply prompts.

use serde::{Deserialize, Serialize};

use crate::record;
use crate::record::{FieldValue, ToField};

record! {
    /// One button of a custom reply keyboard.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct KeyboardButton {
        /// Button text, sent as a message when pressed.
        pub text: String,
        /// Share the user's phone number when pressed.
        #[serde(default)]
        pub request_contact: Option<bool>,
        /// Share the user's location when pressed.
        #[serde(default)]
        pub request_location: Option<bool>,
    }
}

impl KeyboardButton {
    /// Creates a plain text button.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

record! {
    /// A custom keyboard replacing the user's input keyboard.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct ReplyKeyboardMarkup {
        /// Button rows.
        pub keyboard: Vec<Vec<KeyboardButton>>,
        /// Fit the keyboard height to its buttons.
        #[serde(default)]
        pub resize_keyboard: Option<bool>,
        /// Hide the keyboard after one use.
        #[serde(default)]
        pub one_time_keyboard: Option<bool>,
        /// Show only to mentioned users.
        #[serde(default)]
        pub selective: Option<bool>,
    }
}

record! {
    /// Removes a custom keyboard.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ReplyKeyboardRemove {
        /// Always `true`.
        pub remove_keyboard: bool,
        /// Remove only for mentioned users.
        #[serde(default)]
        pub selective: Option<bool>,
    }
}

impl Default for ReplyKeyboardRemove {
    fn default() -> Self {
        Self {
            remove_keyboard: true,
            selective: None,
        }
    }
}

record! {
    /// One button of an inline keyboard.
    ///
    /// Exactly one of the optional fields should be set.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct InlineKeyboardButton {
        /// Label.
        pub text: String,
        /// URL opened when pressed.
        #[serde(default)]
        pub url: Option<String>,
        /// Data sent back in a callback query when pressed.
        #[serde(default)]
        pub callback_data: Option<String>,
        /// Query inserted in the input field when pressed.
        #[serde(default)]
        pub switch_inline_query: Option<String>,
    }
}

impl InlineKeyboardButton {
    /// Creates a button that sends `data` back as a callback query.
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(data.into()),
            ..Self::default()
        }
    }

    /// Creates a button that opens `url`.
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
            ..Self::default()
        }
    }
}

record! {
    /// A keyboard attached to a message.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct InlineKeyboardMarkup {
        /// Button rows.
        pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
    }
}

impl InlineKeyboardMarkup {
    /// Creates a markup from button rows.
    pub fn new(rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self {
            inline_keyboard: rows,
        }
    }
}

record! {
    /// Asks the client to show a reply interface.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ForceReply {
        /// Always `true`.
        pub force_reply: bool,
        /// Ask only mentioned users.
        #[serde(default)]
        pub selective: Option<bool>,
    }
}

impl Default for ForceReply {
    fn default() -> Self {
        Self {
            force_reply: true,
            selective: None,
        }
    }
}

/// Any of the four reply markup kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyMarkup {
    /// Inline keyboard.
    InlineKeyboard(InlineKeyboardMarkup),
    /// Custom reply keyboard.
    Keyboard(ReplyKeyboardMarkup),
    /// Keyboard removal.
    Remove(ReplyKeyboardRemove),
    /// Reply prompt.
    ForceReply(ForceReply),
}

impl ToField for ReplyMarkup {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        match self {
            Self::InlineKeyboard(markup) => markup.to_field(),
            Self::Keyboard(markup) => markup.to_field(),
            Self::Remove(markup) => markup.to_field(),
            Self::ForceReply(markup) => markup.to_field(),
        }
    }
}

impl From<InlineKeyboardMarkup> for ReplyMarkup {
    fn from(markup: InlineKeyboardMarkup) -> Self {
        Self::InlineKeyboard(markup)
    }
}

impl From<ReplyKeyboardMarkup> for ReplyMarkup {
    fn from(markup: ReplyKeyboardMarkup) -> Self {
        Self::Keyboard(markup)
    }
}

impl From<ReplyKeyboardRemove> for ReplyMarkup {
    fn from(markup: ReplyKeyboardRemove) -> Self {
        Self::Remove(markup)
    }
}

impl From<ForceReply> for ReplyMarkup {
    fn from(markup: ForceReply) -> Self {
        Self::ForceReply(markup)
    }
}
