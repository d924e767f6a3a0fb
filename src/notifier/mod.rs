//! Delivers offers and replies to chats.

pub mod format;

use crate::enums::ParseMode;
use crate::error::TelegramError;
use crate::response::Offer;
use crate::telegram::Transport;
use crate::types::{ChatId, MessageId};
use std::sync::Arc;
use std::time::Duration;
use chrono_tz::Tz;
use tokio::time::sleep;

/// The result of delivering something to a chat.
#[derive(Debug)]
pub enum SendOutcome {
    Sent,
    /// Delivery failed but the chat may be reachable later.
    Failed(TelegramError),
    /// The chat can no longer be reached, e.g. the bot was blocked or the chat was deleted.
    Unreachable(TelegramError),
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

impl<T> From<Result<T, TelegramError>> for SendOutcome {
    fn from(result: Result<T, TelegramError>) -> Self {
        match result {
            Ok(_) => Self::Sent,
            Err(error) if error.is_permanent() => Self::Unreachable(error),
            Err(error) => Self::Failed(error),
        }
    }
}

/// Pauses between messages to stay under Telegram's rate limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// After a broadcast header.
    pub after_header: Duration,
    /// After each offer.
    pub after_offer: Duration,
    /// After finishing with a recipient during a broadcast.
    pub after_recipient: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            after_header: Duration::from_millis(500),
            after_offer: Duration::from_secs(1),
            after_recipient: Duration::from_secs(1),
        }
    }
}

impl Pacing {
    /// Default pacing with the given pause after each offer.
    pub fn with_offer_delay(after_offer: Duration) -> Self {
        Self {
            after_offer,
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub(crate) fn immediate() -> Self {
        Self {
            after_header: Duration::ZERO,
            after_offer: Duration::ZERO,
            after_recipient: Duration::ZERO,
        }
    }
}

/// Sends offers and replies through a [`Transport`].
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn Transport>,
    timezone: Tz,
    pacing: Pacing,
}

impl Notifier {
    /// Creates a new [`Notifier`]. Dates are displayed in `timezone`.
    pub fn new(
        transport: Arc<dyn Transport>,
        timezone: Tz,
        pacing: Pacing,
    ) -> Self {
        Self {
            transport,
            timezone,
            pacing,
        }
    }

    /// Sends an offer as a photo with a caption, falling back to a text message when the photo
    /// can't be sent.
    pub async fn send(
        &self,
        chat_id: ChatId,
        offer: &Offer,
    ) -> SendOutcome {
        let caption = format::offer_caption(offer, &self.timezone);
        let result = match self.transport.send_photo(chat_id, &offer.image_url, &caption).await {
            Ok(message_id) => Ok(message_id),
            Err(error) => {
                log::warn!("Failed to send photo for {offer} to {chat_id}, sending text instead: {error}");

                let text = format::photo_fallback_text(&caption);

                self.transport.send_message(chat_id, &text, Some(ParseMode::Html)).await
            },
        };
        let outcome = SendOutcome::from(result);

        match &outcome {
            SendOutcome::Sent => log::debug!("Sent {offer} to {chat_id}"),
            SendOutcome::Failed(error) |
            SendOutcome::Unreachable(error) => log::warn!("Failed to send {offer} to {chat_id}: {error}"),
        }

        sleep(self.pacing.after_offer).await;
        outcome
    }

    /// Sends a header followed by each offer. Stops at the first offer which isn't sent.
    pub async fn send_offers(
        &self,
        chat_id: ChatId,
        header: &str,
        offers: &[&Offer],
    ) -> SendOutcome {
        let outcome = SendOutcome::from(self.transport.send_message(chat_id, header, Some(ParseMode::Html)).await);

        if !outcome.is_sent() {
            return outcome;
        }

        sleep(self.pacing.after_header).await;

        for offer in offers {
            let outcome = self.send(chat_id, offer).await;

            if !outcome.is_sent() {
                return outcome;
            }
        }

        SendOutcome::Sent
    }

    /// Sends a plain text reply.
    pub async fn reply(
        &self,
        chat_id: ChatId,
        text: &str,
    ) -> Result<MessageId, TelegramError> {
        self.transport.send_message(chat_id, text, None).await
    }

    /// Deletes a message. Failures are only logged since the message may already be gone.
    pub async fn delete(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) {
        if let Err(error) = self.transport.delete_message(chat_id, message_id).await {
            log::debug!("Could not delete message {message_id} in {chat_id}: {error}");
        }
    }

    /// Waits before moving on to the next recipient of a broadcast.
    pub async fn pause_between_recipients(&self) {
        sleep(self.pacing.after_recipient).await;
    }
}
