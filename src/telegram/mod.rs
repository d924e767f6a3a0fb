//! A small client for the Telegram Bot API covering what the bot needs: sending photos and
//! messages, deleting messages and long polling for updates.

mod api_response;

pub use api_response::{Update, Message, Chat, User};

use api_response::ApiResponse;
use crate::enums::ParseMode;
use crate::error::{Error, TelegramError};
use crate::helpers::{get_default_middleware, USER_AGENT_STRING};
use crate::types::{ChatId, HttpClient, MessageId, UpdateId};
use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

const API_HOSTNAME: &str = "https://api.telegram.org";
/// How long Telegram holds a `getUpdates` request open waiting for updates.
pub const LONG_POLL_TIMEOUT_SECS: u64 = 30;
/// Must be longer than the long poll timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(LONG_POLL_TIMEOUT_SECS + 30);
/// Maximum length of a photo caption.
pub const CAPTION_LIMIT: usize = 1024;
/// Maximum length of a message.
pub const MESSAGE_LIMIT: usize = 4096;

/// The operations used to deliver notifications and replies.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a photo by URL with an HTML caption.
    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: &str,
        caption: &str,
    ) -> Result<MessageId, TelegramError>;

    /// Sends a text message. Link previews are disabled for HTML messages so that links to the
    /// store don't push the content out of view.
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<MessageId, TelegramError>;

    /// Deletes a message sent by the bot.
    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), TelegramError>;
}

#[derive(Serialize, Debug)]
struct LinkPreviewOptions {
    is_disabled: bool,
}

/// Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramAPI {
    client: HttpClient,
    token: String,
}

// The token is a credential.
impl fmt::Debug for TelegramAPI {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TelegramAPI")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl TelegramAPI {
    /// Creates a new [`TelegramAPI`] using the bot's token from BotFather. Requests are not
    /// retried since a retried send can deliver a message twice.
    pub fn new(token: String) -> Result<Self, Error> {
        Ok(Self {
            client: get_default_middleware(USER_AGENT_STRING, REQUEST_TIMEOUT, 0)?,
            token,
        })
    }

    fn get_api_url(
        &self,
        method: &str,
    ) -> String {
        format!("{}/bot{}/{}", API_HOSTNAME, self.token, method)
    }

    async fn call<P, T>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<T, TelegramError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.post(self.get_api_url(method))
            .json(params)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        // Error responses still carry a JSON body describing the error.
        match serde_json::from_slice::<ApiResponse<T>>(&body) {
            Ok(ApiResponse { ok: true, result: Some(result), .. }) => Ok(result),
            Ok(response) => Err(TelegramError::from_api(
                response.error_code.unwrap_or(status.as_u16() as i64),
                response.description.unwrap_or_else(|| status.to_string()),
                response.parameters.and_then(|parameters| parameters.retry_after),
            )),
            Err(_error) if !status.is_success() => Err(TelegramError::from_api(
                status.as_u16() as i64,
                status.to_string(),
                None,
            )),
            Err(error) => Err(TelegramError::Parse(error)),
        }
    }

    /// Gets the bot's own account. Fails when the token is invalid.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        #[derive(Serialize, Debug)]
        struct GetMeParams {}

        self.call("getMe", &GetMeParams {}).await
    }

    /// Gets updates after `offset`, waiting up to [`LONG_POLL_TIMEOUT_SECS`] for new ones.
    pub async fn get_updates(
        &self,
        offset: Option<UpdateId>,
    ) -> Result<Vec<Update>, TelegramError> {
        #[derive(Serialize, Debug)]
        struct GetUpdatesParams<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            offset: Option<UpdateId>,
            timeout: u64,
            allowed_updates: &'a [&'a str],
        }

        self.call("getUpdates", &GetUpdatesParams {
            offset,
            timeout: LONG_POLL_TIMEOUT_SECS,
            allowed_updates: &["message"],
        }).await
    }
}

#[async_trait]
impl Transport for TelegramAPI {
    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: &str,
        caption: &str,
    ) -> Result<MessageId, TelegramError> {
        #[derive(Serialize, Debug)]
        struct SendPhotoParams<'a> {
            chat_id: ChatId,
            photo: &'a str,
            caption: &'a str,
            parse_mode: ParseMode,
        }

        let message: Message = self.call("sendPhoto", &SendPhotoParams {
            chat_id,
            photo,
            caption,
            parse_mode: ParseMode::Html,
        }).await?;

        Ok(message.message_id)
    }

    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<MessageId, TelegramError> {
        #[derive(Serialize, Debug)]
        struct SendMessageParams<'a> {
            chat_id: ChatId,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            parse_mode: Option<ParseMode>,
            #[serde(skip_serializing_if = "Option::is_none")]
            link_preview_options: Option<LinkPreviewOptions>,
        }

        let link_preview_options = parse_mode.map(|_| LinkPreviewOptions {
            is_disabled: true,
        });
        let message: Message = self.call("sendMessage", &SendMessageParams {
            chat_id,
            text,
            parse_mode,
            link_preview_options,
        }).await?;

        Ok(message.message_id)
    }

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), TelegramError> {
        #[derive(Serialize, Debug)]
        struct DeleteMessageParams {
            chat_id: ChatId,
            message_id: MessageId,
        }

        let _deleted: bool = self.call("deleteMessage", &DeleteMessageParams {
            chat_id,
            message_id,
        }).await?;

        Ok(())
    }
}
