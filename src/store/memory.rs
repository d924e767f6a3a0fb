use super::SetStore;
use crate::error::FileError;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Mutex;
use async_trait::async_trait;

/// Keeps a set in memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    set: Mutex<HashSet<T>>,
}

impl<T> MemoryStore<T>
where
    T: Clone,
{
    pub fn new(set: HashSet<T>) -> Self {
        Self {
            set: Mutex::new(set),
        }
    }

    /// A copy of the current set.
    pub fn snapshot(&self) -> HashSet<T> {
        self.set.lock()
            .map(|set| set.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl<T> SetStore<T> for MemoryStore<T>
where
    T: Eq + Hash + Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<HashSet<T>, FileError> {
        Ok(self.snapshot())
    }

    async fn save(&self, set: &HashSet<T>) -> Result<(), FileError> {
        let mut stored = self.set.lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        *stored = set.clone();
        Ok(())
    }
}
