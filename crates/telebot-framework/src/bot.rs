//! The bot facade.
//!
//! A [`Bot`] binds the codec and a [`Transport`] into one method per remote
//! operation, and owns the handler registries consulted by the dispatcher.
//! It is cheap to clone; clones share the transport, identity and
//! registries.
//!
//! Every binding runs the same pipeline:
//!
//! ```text
//! request record ──encode──▶ Transport::call ──decode──▶ Envelope ──project──▶ result
//! ```
//!
//! Each binding names its success factory:
//!
//! | Return type | Factory | Example |
//! |-------------|---------|---------|
//! | `ApiResult<T>` | [`typed`] | `send_message`, `get_chat_administrators`, `get_chat_members_count` |
//! | `ApiResult<()>` | [`flag`] | `send_chat_action`, `answer_inline_query` |
//! | `ApiResult<Reply<Message>>` | [`entity_or_confirmed`] | `edit_message_text` |
//!
//! Failures are logged with the method name and then returned unchanged.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, error};

use telebot_core::codec::{entity_or_confirmed, flag, typed};
use telebot_core::model::{
    AnswerCallbackQuery, AnswerInlineQuery, Chat, ChatMember, ChatMemberRequest, ChatRequest,
    EditMessageCaption, EditMessageReplyMarkup, EditMessageText, File, ForwardMessage, GetFile,
    GetUpdates, GetUserProfilePhotos, Message, SendAudio, SendChatAction, SendContact,
    SendDocument, SendLocation, SendMessage, SendPhoto, SendSticker, SendVenue, SendVideo,
    SendVoice, SetWebhook, Update, User, UserProfilePhotos,
};
use telebot_core::{
    ApiError, ApiResult, ByteStream, EncodeResult, EncodedBody, Reply, Transport, decode, encode,
    project, record,
};

use crate::handler::{InlineProvider, MessageHandler, UpdateProcessor};
use crate::registry::Registry;

/// Default `cache_time` of inline query answers, in seconds.
pub const DEFAULT_INLINE_CACHE_TIME: u32 = 60;

/// Default reply to a command nobody registered.
pub const DEFAULT_UNKNOWN_COMMAND_TEXT: &str = "Unknown command";

/// Dispatch settings of a [`Bot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSettings {
    /// `cache_time` sent with every inline query answer.
    pub inline_cache_time: u32,
    /// Text sent back when a message starts with an unregistered command.
    pub unknown_command_text: String,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            inline_cache_time: DEFAULT_INLINE_CACHE_TIME,
            unknown_command_text: DEFAULT_UNKNOWN_COMMAND_TEXT.to_string(),
        }
    }
}

record! {
    /// Parameters of methods that take none.
    #[derive(Debug, Default)]
    struct NoParams {}
}

type Factory<T> = fn(Value) -> ApiResult<Reply<T>>;

/// A bot client.
#[derive(Clone)]
pub struct Bot {
    inner: Arc<BotInner>,
}

struct BotInner {
    transport: Arc<dyn Transport>,
    registry: Registry,
    me: RwLock<Option<User>>,
    settings: BotSettings,
}

impl Bot {
    /// Creates a bot over the given transport with default settings.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_settings(Arc::new(transport), BotSettings::default())
    }

    /// Creates a bot over a shared transport.
    pub fn with_settings(transport: Arc<dyn Transport>, settings: BotSettings) -> Self {
        Self {
            inner: Arc::new(BotInner {
                transport,
                registry: Registry::default(),
                me: RwLock::new(None),
                settings,
            }),
        }
    }

    /// Returns the dispatch settings.
    pub fn settings(&self) -> &BotSettings {
        &self.inner.settings
    }

    /// Returns the transport.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    /// Returns the bot's own account, once [`get_me`](Self::get_me) succeeded.
    pub fn me(&self) -> Option<User> {
        self.inner.me.read().clone()
    }

    pub(crate) fn me_id(&self) -> Option<i64> {
        self.inner.me.read().as_ref().map(|user| user.id)
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers the handler for `/<name>`, replacing any earlier one.
    pub fn register_command(&self, name: impl Into<String>, handler: impl MessageHandler) -> &Self {
        let name = name.into();
        if self.registry().insert_command(name.clone(), Arc::new(handler)) {
            debug!(command = %name, "Command handler replaced");
        } else {
            debug!(command = %name, "Command registered");
        }
        self
    }

    /// Registers a processor for messages that do not start with a command.
    pub fn register_message_processor(&self, handler: impl MessageHandler) -> &Self {
        self.registry().push_processor(Arc::new(handler));
        self
    }

    /// Registers an inline provider under `name`, replacing any provider
    /// with the same name.
    ///
    /// The name namespaces the provider's result ids and must not contain
    /// `:`.
    pub fn register_inline_provider(
        &self,
        name: impl Into<String>,
        provider: impl InlineProvider,
    ) -> &Self {
        let name = name.into();
        if self.registry().insert_provider(name.clone(), Arc::new(provider)) {
            debug!(provider = %name, "Inline provider replaced");
        } else {
            debug!(provider = %name, "Inline provider registered");
        }
        self
    }

    /// Registers a processor that sees every update before routing.
    pub fn register_update_processor(&self, processor: impl UpdateProcessor) -> &Self {
        self.registry().push_update_processor(Arc::new(processor));
        self
    }

    /// Registers a command (builder pattern).
    pub fn with_command(self, name: impl Into<String>, handler: impl MessageHandler) -> Self {
        self.register_command(name, handler);
        self
    }

    /// Registers a message processor (builder pattern).
    pub fn with_message_processor(self, handler: impl MessageHandler) -> Self {
        self.register_message_processor(handler);
        self
    }

    /// Registers an inline provider (builder pattern).
    pub fn with_inline_provider(self, name: impl Into<String>, provider: impl InlineProvider) -> Self {
        self.register_inline_provider(name, provider);
        self
    }

    /// Registers an update processor (builder pattern).
    pub fn with_update_processor(self, processor: impl UpdateProcessor) -> Self {
        self.register_update_processor(processor);
        self
    }

    /// Returns the registered command names, sorted.
    pub fn command_names(&self) -> Vec<String> {
        self.registry().command_names()
    }

    /// Returns the registered provider names, in answer order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry().provider_names()
    }

    // =========================================================================
    // Call Pipeline
    // =========================================================================

    async fn request<T: Send>(
        &self,
        method: &'static str,
        body: EncodeResult<EncodedBody>,
        factory: Factory<T>,
    ) -> ApiResult<Reply<T>> {
        let result = self.round_trip(method, body, factory).await;
        if let Err(err) = &result {
            error!(method, error = %err, "API call failed");
        }
        result
    }

    async fn round_trip<T: Send>(
        &self,
        method: &'static str,
        body: EncodeResult<EncodedBody>,
        factory: Factory<T>,
    ) -> ApiResult<Reply<T>> {
        let body = body?;
        debug!(method, content_type = body.content_type(), "Calling API");
        let bytes = self.inner.transport.call(method, body).await?;
        project(decode(&bytes)?, factory)
    }

    async fn request_payload<T: Send>(
        &self,
        method: &'static str,
        body: EncodeResult<EncodedBody>,
        factory: Factory<T>,
    ) -> ApiResult<T> {
        self.request(method, body, factory)
            .await?
            .into_payload(method)
            .inspect_err(|err| error!(method, error = %err, "API call returned no result"))
    }
}

macro_rules! impl_api {
    // Confirmation only
    ($(#[$meta:meta])* $name:ident, $method:literal, $req:ty $(,)?) => {
        $(#[$meta])*
        pub async fn $name(&self, request: $req) -> ApiResult<()> {
            self.request($method, encode(&request), flag).await.map(|_| ())
        }
    };
    // Edited entity, or a confirmation for inline messages
    ($(#[$meta:meta])* $name:ident, $method:literal, $req:ty => Reply<$ret:ty> $(,)?) => {
        $(#[$meta])*
        pub async fn $name(&self, request: $req) -> ApiResult<Reply<$ret>> {
            self.request($method, encode(&request), entity_or_confirmed::<$ret>).await
        }
    };
    // Typed payload
    ($(#[$meta:meta])* $name:ident, $method:literal, $req:ty => $ret:ty $(,)?) => {
        $(#[$meta])*
        pub async fn $name(&self, request: $req) -> ApiResult<$ret> {
            self.request_payload($method, encode(&request), typed::<$ret>).await
        }
    };
}

impl Bot {
    /// Returns the bot's own account and remembers it for self-echo
    /// filtering.
    pub async fn get_me(&self) -> ApiResult<User> {
        let me = self
            .request_payload("getMe", encode(&NoParams::default()), typed::<User>)
            .await?;
        *self.inner.me.write() = Some(me.clone());
        Ok(me)
    }

    /// Streams a file previously resolved with [`get_file`](Self::get_file).
    ///
    /// The body is not enveloped; a failed download surfaces as
    /// [`ApiError::Transport`].
    pub async fn download_file(&self, file_path: &str) -> ApiResult<ByteStream> {
        self.inner
            .transport
            .download(file_path)
            .await
            .map_err(|err| {
                let err = ApiError::from(err);
                error!(file_path, error = %err, "File download failed");
                err
            })
    }

    impl_api!(
        /// Fetches pending updates by long polling.
        get_updates, "getUpdates", GetUpdates => Vec<Update>
    );
    impl_api!(
        /// Resolves a file id into a downloadable path.
        get_file, "getFile", GetFile => File
    );
    impl_api!(
        /// Lists a user's profile pictures.
        get_user_profile_photos, "getUserProfilePhotos", GetUserProfilePhotos => UserProfilePhotos
    );
    impl_api!(
        /// Sets or removes the webhook.
        set_webhook, "setWebhook", SetWebhook
    );

    impl_api!(
        /// Sends a text message.
        send_message, "sendMessage", SendMessage => Message
    );
    impl_api!(
        /// Forwards a message.
        forward_message, "forwardMessage", ForwardMessage => Message
    );
    impl_api!(
        /// Sends a photo.
        send_photo, "sendPhoto", SendPhoto => Message
    );
    impl_api!(
        /// Sends an audio file.
        send_audio, "sendAudio", SendAudio => Message
    );
    impl_api!(
        /// Sends a general file.
        send_document, "sendDocument", SendDocument => Message
    );
    impl_api!(
        /// Sends a sticker.
        send_sticker, "sendSticker", SendSticker => Message
    );
    impl_api!(
        /// Sends a video.
        send_video, "sendVideo", SendVideo => Message
    );
    impl_api!(
        /// Sends a voice note.
        send_voice, "sendVoice", SendVoice => Message
    );
    impl_api!(
        /// Sends a point on the map.
        send_location, "sendLocation", SendLocation => Message
    );
    impl_api!(
        /// Sends a venue.
        send_venue, "sendVenue", SendVenue => Message
    );
    impl_api!(
        /// Sends a phone contact.
        send_contact, "sendContact", SendContact => Message
    );
    impl_api!(
        /// Shows a chat action such as "typing".
        send_chat_action, "sendChatAction", SendChatAction
    );

    impl_api!(
        /// Answers an inline query.
        answer_inline_query, "answerInlineQuery", AnswerInlineQuery
    );
    impl_api!(
        /// Answers a callback query.
        answer_callback_query, "answerCallbackQuery", AnswerCallbackQuery
    );

    impl_api!(
        /// Edits a message's text.
        ///
        /// Returns the edited message, or [`Reply::Confirmed`] for inline
        /// messages.
        edit_message_text, "editMessageText", EditMessageText => Reply<Message>
    );
    impl_api!(
        /// Edits a message's caption.
        edit_message_caption, "editMessageCaption", EditMessageCaption => Reply<Message>
    );
    impl_api!(
        /// Edits a message's inline keyboard.
        edit_message_reply_markup, "editMessageReplyMarkup", EditMessageReplyMarkup => Reply<Message>
    );

    impl_api!(
        /// Kicks a user from a chat.
        kick_chat_member, "kickChatMember", ChatMemberRequest
    );
    impl_api!(
        /// Leaves a chat.
        leave_chat, "leaveChat", ChatRequest
    );
    impl_api!(
        /// Lifts a ban.
        unban_chat_member, "unbanChatMember", ChatMemberRequest
    );
    impl_api!(
        /// Fetches chat details.
        get_chat, "getChat", ChatRequest => Chat
    );
    impl_api!(
        /// Lists the administrators of a chat.
        get_chat_administrators, "getChatAdministrators", ChatRequest => Vec<ChatMember>
    );
    impl_api!(
        /// Counts the members of a chat.
        get_chat_members_count, "getChatMembersCount", ChatRequest => i64
    );
    impl_api!(
        /// Fetches one member of a chat.
        get_chat_member, "getChatMember", ChatMemberRequest => ChatMember
    );
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("me", &self.me().map(|user| user.id))
            .field("settings", &self.inner.settings)
            .field("registry", &self.inner.registry)
            .finish()
    }
}
