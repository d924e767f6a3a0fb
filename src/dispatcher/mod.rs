//! Runs checks and handles commands.

mod scheduler;
mod updates;

pub use scheduler::{start_scheduler, DailySchedule};
pub use updates::{poll_updates, run_update_loop, UpdateSource};

use crate::api::{Catalog, Storefront};
use crate::config::Config;
use crate::detector::detect;
use crate::enums::Command;
use crate::notifier::{format, Notifier, SendOutcome};
use crate::response::Offer;
use crate::store::{NotifiedOffers, Subscribers};
use crate::types::ChatId;
use std::collections::HashSet;
use std::sync::Arc;
use chrono::{NaiveTime, Timelike};
use chrono_tz::Tz;

const CHECKING_TEXT: &str = "Got it, checking the current free games on the Epic Games Store...";
const NO_OFFERS_TEXT: &str = "🤔 No free games were found right now (or the store could not be reached).";
const SEND_FAILED_TEXT: &str = "❌ Something went wrong while sending the games.";
const SUBSCRIBED_TEXT: &str = "🎉 Welcome! You are now subscribed to Epic Games Store free game notifications.";
const ALREADY_SUBSCRIBED_TEXT: &str = "😊 You are already subscribed to Epic Games Store free game notifications.";
const UNSUBSCRIBED_TEXT: &str = "👋 You have been unsubscribed and will no longer receive notifications. Send /start to subscribe again.";
const NOT_SUBSCRIBED_TEXT: &str = "🤔 You are not subscribed. Send /start to subscribe.";

/// A summary of a scheduled check.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Number of offers currently free.
    pub offers_found: usize,
    /// Number of offers which had not been notified yet.
    pub new_offers: usize,
    /// Subscribers which received every new offer.
    pub recipients_reached: usize,
    /// Subscribers removed because they could no longer be reached.
    pub recipients_pruned: usize,
    /// Whether the notified offers were saved.
    pub notified_changed: bool,
}

/// Checks for free games and responds to commands.
pub struct Dispatcher {
    catalog: Arc<dyn Catalog>,
    notifier: Notifier,
    subscribers: Subscribers,
    notified_offers: NotifiedOffers,
    storefront: Storefront,
    check_time: NaiveTime,
    timezone: Tz,
}

impl Dispatcher {
    pub fn new(
        config: &Config,
        catalog: Arc<dyn Catalog>,
        notifier: Notifier,
        subscribers: Subscribers,
        notified_offers: NotifiedOffers,
    ) -> Self {
        Self {
            catalog,
            notifier,
            subscribers,
            notified_offers,
            storefront: config.storefront.clone(),
            check_time: config.check_time,
            timezone: config.timezone,
        }
    }

    /// Fetches the current offers and sends the new ones to every subscriber. The notified offers
    /// are then replaced with the current offers.
    pub async fn run_scheduled_check(&self) -> CheckReport {
        log::info!("Starting scheduled check");

        let notified = self.notified_offers.load().await;
        let subscribers = self.subscribers.load().await;
        let offers = self.catalog.fetch_free_offers().await;
        let mut report = CheckReport {
            offers_found: offers.len(),
            ..CheckReport::default()
        };

        if offers.is_empty() {
            log::info!("No free games found");

            if !notified.is_empty() {
                log::info!("Clearing sent games");
                report.notified_changed = self.notified_offers.save(&HashSet::new()).await;
            }

            return report;
        }

        let detection = detect(&offers, &notified);

        report.new_offers = detection.new_offers.len();

        if detection.new_offers.is_empty() {
            log::info!("No new free games to broadcast");
        } else {
            for offer in &detection.new_offers {
                log::info!("New free game: {offer}");
            }

            let unreachable = self.broadcast(&subscribers, &detection.new_offers, &mut report).await;

            if !unreachable.is_empty() {
                log::info!("Removing {} unreachable subscribers", unreachable.len());
                report.recipients_pruned = self.subscribers.remove_all(&unreachable).await;
            }
        }

        if detection.current_slugs != notified {
            log::info!("Updating sent games to {} slugs", detection.current_slugs.len());
            report.notified_changed = self.notified_offers.save(&detection.current_slugs).await;
        } else {
            log::info!("Free games unchanged since the last check");
        }

        log::info!("Scheduled check finished: {report:?}");
        report
    }

    /// Sends `offers` to each subscriber. Returns the subscribers which can't be reached.
    async fn broadcast(
        &self,
        subscribers: &HashSet<ChatId>,
        offers: &[&Offer],
        report: &mut CheckReport,
    ) -> HashSet<ChatId> {
        let header = format::broadcast_header(&self.storefront.free_games_url());
        let mut unreachable = HashSet::new();
        let mut recipients = subscribers.iter().copied().collect::<Vec<_>>();

        recipients.sort_unstable();
        log::info!("Broadcasting {} new games to {} subscribers", offers.len(), recipients.len());

        for chat_id in recipients {
            match self.notifier.send_offers(chat_id, &header, offers).await {
                SendOutcome::Sent => report.recipients_reached += 1,
                SendOutcome::Unreachable(error) => {
                    log::warn!("Cannot reach {chat_id}, marking for removal: {error}");
                    unreachable.insert(chat_id);
                },
                SendOutcome::Failed(error) => {
                    log::error!("Failed to send to {chat_id}: {error}");
                },
            }

            self.notifier.pause_between_recipients().await;
        }

        unreachable
    }

    /// Sends all current offers to `chat_id` only. The notified offers are not changed.
    pub async fn run_manual_check(&self, chat_id: ChatId) {
        log::info!("Manual check requested by {chat_id}");

        let acknowledgement = self.notifier.reply(chat_id, CHECKING_TEXT).await
            .map_err(|error| log::warn!("Could not acknowledge check for {chat_id}: {error}"))
            .ok();
        let offers = self.catalog.fetch_free_offers().await;

        if let Some(message_id) = acknowledgement {
            self.notifier.delete(chat_id, message_id).await;
        }

        if offers.is_empty() {
            self.reply(chat_id, NO_OFFERS_TEXT).await;
            return;
        }

        let header = format::manual_check_header(&self.storefront.free_games_url());
        let offers = offers.iter().collect::<Vec<_>>();

        match self.notifier.send_offers(chat_id, &header, &offers).await {
            SendOutcome::Sent => log::info!("Manual check results sent to {chat_id}"),
            SendOutcome::Unreachable(error) => {
                log::warn!("Cannot reach {chat_id}, unsubscribing: {error}");
                self.subscribers.remove(&chat_id).await;
            },
            SendOutcome::Failed(error) => {
                log::error!("Failed to send manual check results to {chat_id}: {error}");
                self.reply(chat_id, SEND_FAILED_TEXT).await;
            },
        }
    }

    /// Responds to a command from `chat_id`.
    pub async fn handle_command(
        &self,
        chat_id: ChatId,
        command: Command,
    ) {
        log::debug!("Received /{command} from {chat_id}");

        match command {
            Command::Start => {
                let greeting = if self.subscribers.add(chat_id).await {
                    SUBSCRIBED_TEXT
                } else {
                    ALREADY_SUBSCRIBED_TEXT
                };

                self.reply(chat_id, &format!("{greeting}\n{}", self.help_text())).await;
            },
            Command::Stop => {
                let text = if self.subscribers.remove(&chat_id).await {
                    UNSUBSCRIBED_TEXT
                } else {
                    NOT_SUBSCRIBED_TEXT
                };

                self.reply(chat_id, text).await;
            },
            Command::CheckNow => self.run_manual_check(chat_id).await,
            Command::Help => self.reply(chat_id, &self.help_text()).await,
        }
    }

    fn help_text(&self) -> String {
        format!(
            "I will notify you when *new* free games appear (checked daily at {:02}:{:02} {}).\n\
            Use /checknow to see the current free games.\n\
            Use /stop to unsubscribe.",
            self.check_time.hour(),
            self.check_time.minute(),
            self.timezone.name(),
        )
    }

    async fn reply(
        &self,
        chat_id: ChatId,
        text: &str,
    ) {
        if let Err(error) = self.notifier.reply(chat_id, text).await {
            log::warn!("Failed to reply to {chat_id}: {error}");
        }
    }
}
