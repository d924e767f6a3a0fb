//! Fakes shared by tests.

use crate::api::Catalog;
use crate::enums::ParseMode;
use crate::error::TelegramError;
use crate::response::Offer;
use crate::telegram::Transport;
use crate::types::{ChatId, MessageId};
use std::collections::HashMap;
use std::sync::Mutex;
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub fn offer(slug: &str) -> Offer {
    Offer {
        title: slug.to_uppercase(),
        image_url: format!("https://cdn1.epicgames.com/{slug}/wide.jpg"),
        start_date: "2024-05-16T15:00:00.000Z".into(),
        end_date: "2024-05-23T15:00:00.000Z".into(),
        url: format!("https://store.epicgames.com/en-US/p/{slug}"),
        slug: slug.into(),
        original_price: "$19.99".into(),
    }
}

/// A raw HTTP/1.1 response with `status` such as `200 OK`.
pub fn http_response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len(),
    )
}

/// Answers every connection on a local port with `response`. Returns the URL to request.
pub async fn serve(response: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut request = [0; 4096];
            let _ = stream.read(&mut request).await;
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    format!("http://{address}/freeGamesPromotions")
}

/// Returns the scripted offers, one list per fetch. Runs out into empty lists.
#[derive(Debug, Default)]
pub struct ScriptedCatalog {
    fetches: Mutex<Vec<Vec<Offer>>>,
}

impl ScriptedCatalog {
    pub fn new(mut fetches: Vec<Vec<Offer>>) -> Self {
        fetches.reverse();

        Self {
            fetches: Mutex::new(fetches),
        }
    }
}

#[async_trait]
impl Catalog for ScriptedCatalog {
    async fn fetch_free_offers(&self) -> Vec<Offer> {
        self.fetches.lock().unwrap().pop().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Photo {
        chat_id: ChatId,
        caption: String,
    },
    Message {
        chat_id: ChatId,
        text: String,
    },
    Deleted {
        chat_id: ChatId,
        message_id: MessageId,
    },
}

impl Sent {
    pub fn chat_id(&self) -> ChatId {
        match self {
            Self::Photo { chat_id, .. } => *chat_id,
            Self::Message { chat_id, .. } => *chat_id,
            Self::Deleted { chat_id, .. } => *chat_id,
        }
    }
}

/// Records everything sent. Chats can be made to fail with an API error code and description.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    failing_chats: Mutex<HashMap<ChatId, (i64, String)>>,
    failing_photos: Mutex<bool>,
}

impl RecordingTransport {
    pub fn fail_chat(&self, chat_id: ChatId, code: i64, description: &str) {
        self.failing_chats.lock().unwrap().insert(chat_id, (code, description.into()));
    }

    pub fn fail_photos(&self) {
        *self.failing_photos.lock().unwrap() = true;
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat_id: ChatId) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|sent| sent.chat_id() == chat_id)
            .collect()
    }

    /// Texts of messages sent to `chat_id`.
    pub fn texts_to(&self, chat_id: ChatId) -> Vec<String> {
        self.sent_to(chat_id)
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Message { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn check(&self, chat_id: ChatId) -> Result<(), TelegramError> {
        match self.failing_chats.lock().unwrap().get(&chat_id) {
            Some((code, description)) => Err(TelegramError::from_api(*code, description.clone(), None)),
            None => Ok(()),
        }
    }

    fn record(&self, sent: Sent) -> MessageId {
        let mut all = self.sent.lock().unwrap();

        all.push(sent);
        all.len() as MessageId
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_photo(
        &self,
        chat_id: ChatId,
        _photo: &str,
        caption: &str,
    ) -> Result<MessageId, TelegramError> {
        self.check(chat_id)?;

        if *self.failing_photos.lock().unwrap() {
            return Err(TelegramError::from_api(400, "Bad Request: wrong file identifier/HTTP URL specified".into(), None));
        }

        Ok(self.record(Sent::Photo {
            chat_id,
            caption: caption.into(),
        }))
    }

    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        _parse_mode: Option<ParseMode>,
    ) -> Result<MessageId, TelegramError> {
        self.check(chat_id)?;

        Ok(self.record(Sent::Message {
            chat_id,
            text: text.into(),
        }))
    }

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), TelegramError> {
        self.check(chat_id)?;
        self.record(Sent::Deleted {
            chat_id,
            message_id,
        });

        Ok(())
    }
}
