//! Notifies Telegram chats about games given away for free on the Epic Games Store.
//!
//! Once a day (and shortly after startup) the store's free games promotions are fetched. Offers
//! which haven't been broadcast yet are sent to every subscribed chat. Chats subscribe with
//! `/start`, unsubscribe with `/stop` and can see the current offers with `/checknow`.

mod detector;
mod helpers;
pub mod api;
pub mod config;
pub mod dispatcher;
pub mod enums;
pub mod error;
pub mod notifier;
pub mod response;
pub mod store;
pub mod telegram;
pub mod time;
pub mod types;

#[cfg(test)]
mod testing;

pub use api::{Catalog, EpicStoreAPI, Storefront};
pub use config::{Config, ConfigError};
pub use detector::{detect, Detection};
pub use dispatcher::{CheckReport, DailySchedule, Dispatcher};
pub use error::{Error, FileError, TelegramError};
pub use helpers::default_data_directory;
pub use notifier::{Notifier, Pacing, SendOutcome};
pub use response::Offer;
pub use telegram::{TelegramAPI, Transport};
