//! Persisted sets of subscribers and already notified offers.
//!
//! Storage is load-all/save-all behind [`SetStore`] so that the JSON files can be swapped for
//! another backend without touching callers.

mod file;
mod memory;
mod persisted_set;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use persisted_set::PersistedSet;

use crate::error::FileError;
use crate::types::{ChatId, OfferSlug};
use std::collections::HashSet;
use std::hash::Hash;
use std::path::Path;
use async_trait::async_trait;

/// File name of the already notified offer slugs.
pub const SENT_GAMES_FILENAME: &str = "sent_games.json";
/// File name of the subscribed chat IDs.
pub const SUBSCRIBERS_FILENAME: &str = "subscribers.json";

/// The chats subscribed to notifications.
pub type Subscribers = PersistedSet<ChatId>;
/// Slugs of the offers already broadcast to subscribers.
pub type NotifiedOffers = PersistedSet<OfferSlug>;

/// Storage for a set of values.
#[async_trait]
pub trait SetStore<T>: Send + Sync
where
    T: Eq + Hash + Send + Sync + 'static,
{
    /// Loads the whole set. A store which has never been saved to is empty.
    async fn load(&self) -> Result<HashSet<T>, FileError>;

    /// Replaces the stored set.
    async fn save(&self, set: &HashSet<T>) -> Result<(), FileError>;
}

/// Opens the subscribers file in `data_directory`.
pub fn subscribers_in(data_directory: &Path) -> Subscribers {
    PersistedSet::new("subscribers", JsonFileStore::new(data_directory.join(SUBSCRIBERS_FILENAME)))
}

/// Opens the notified offers file in `data_directory`.
pub fn notified_offers_in(data_directory: &Path) -> NotifiedOffers {
    PersistedSet::new("sent games", JsonFileStore::new(data_directory.join(SENT_GAMES_FILENAME)))
}
