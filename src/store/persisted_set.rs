use super::SetStore;
use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

/// A set kept in a [`SetStore`]. Storage errors never reach the caller: failed loads are logged
/// and read as empty, failed saves are logged and leave what was stored before.
///
/// There is no locking across processes or tasks. Each mutation reloads the set, so the window
/// for a lost update is only the time between the load and the save.
#[derive(Clone)]
pub struct PersistedSet<T>
where
    T: Eq + Hash + Send + Sync + 'static,
{
    name: &'static str,
    store: Arc<dyn SetStore<T>>,
}

impl<T> PersistedSet<T>
where
    T: Eq + Hash + Clone + Display + Send + Sync + 'static,
{
    /// Creates a new set. `name` is used in log messages.
    pub fn new<S>(name: &'static str, store: S) -> Self
    where
        S: SetStore<T> + 'static,
    {
        Self {
            name,
            store: Arc::new(store),
        }
    }

    /// Loads the set.
    pub async fn load(&self) -> HashSet<T> {
        match self.store.load().await {
            Ok(set) => set,
            Err(error) => {
                log::warn!("Could not read {}, starting fresh: {error}", self.name);
                HashSet::new()
            },
        }
    }

    /// Replaces the stored set. Returns whether the set was saved.
    pub async fn save(&self, set: &HashSet<T>) -> bool {
        log::debug!("Saving {} {}", set.len(), self.name);

        match self.store.save(set).await {
            Ok(()) => true,
            Err(error) => {
                log::error!("Could not save {}: {error}", self.name);
                false
            },
        }
    }

    /// Adds a value. Returns `false` if it was already present.
    pub async fn add(&self, value: T) -> bool {
        let mut set = self.load().await;

        if !set.insert(value.clone()) {
            return false;
        }

        self.save(&set).await;
        log::info!("Added {value} to {}", self.name);
        true
    }

    /// Removes a value. Returns `false` if it was not present.
    pub async fn remove(&self, value: &T) -> bool {
        let mut set = self.load().await;

        if !set.remove(value) {
            return false;
        }

        self.save(&set).await;
        log::info!("Removed {value} from {}", self.name);
        true
    }

    /// Removes every value in `values`. Returns how many were present.
    pub async fn remove_all(&self, values: &HashSet<T>) -> usize {
        let mut set = self.load().await;
        let length = set.len();

        set.retain(|value| !values.contains(value));

        let removed = length - set.len();

        if removed > 0 {
            self.save(&set).await;
            log::info!("Removed {removed} from {}", self.name);
        }

        removed
    }
}
