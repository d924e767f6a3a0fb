use super::SetStore;
use crate::error::FileError;
use crate::helpers::write_file_atomic;
use std::collections::HashSet;
use std::hash::Hash;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// Stores a set as a JSON array in a file.
#[derive(Debug, Clone)]
pub struct JsonFileStore<T> {
    filepath: PathBuf,
    marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new<P>(filepath: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            filepath: filepath.into(),
            marker: PhantomData,
        }
    }

    /// The path of the file.
    pub fn filepath(&self) -> &Path {
        &self.filepath
    }
}

#[async_trait]
impl<T> SetStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Eq + Hash + Ord + Send + Sync + 'static,
{
    async fn load(&self) -> Result<HashSet<T>, FileError> {
        let data = match async_fs::read_to_string(&self.filepath).await {
            Ok(data) => data,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                log::debug!("{} does not exist yet", self.filepath.display());
                return Ok(HashSet::new());
            },
            Err(error) => return Err(error.into()),
        };
        // Nulls are skipped.
        let items: Vec<Option<T>> = serde_json::from_str(&data)?;

        Ok(items.into_iter().flatten().collect())
    }

    async fn save(&self, set: &HashSet<T>) -> Result<(), FileError> {
        // Sorted so the file doesn't churn between saves of the same set.
        let mut items = set.iter().collect::<Vec<_>>();

        items.sort();

        let data = serde_json::to_string_pretty(&items)?;

        write_file_atomic(&self.filepath, data.as_bytes()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatId;

    fn temp_filepath(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("epic-bot-store-{}", std::process::id()))
            .join(name)
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let store = JsonFileStore::<ChatId>::new(temp_filepath("missing.json"));

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn saves_and_loads_set() {
        let filepath = temp_filepath("subscribers.json");
        let store = JsonFileStore::<ChatId>::new(&filepath);
        let set = HashSet::from([42, -1001234567890, 7]);

        store.save(&set).await.unwrap();

        assert_eq!(store.load().await.unwrap(), set);
        assert_eq!(
            std::fs::read_to_string(&filepath).unwrap(),
            "[\n  -1001234567890,\n  7,\n  42\n]",
        );

        let _ = std::fs::remove_file(&filepath);
    }

    #[tokio::test]
    async fn skips_nulls() {
        let filepath = temp_filepath("with_nulls.json");

        std::fs::create_dir_all(filepath.parent().unwrap()).unwrap();
        std::fs::write(&filepath, r#"["foo", null, "bar"]"#).unwrap();

        let loaded = JsonFileStore::<String>::new(&filepath).load().await.unwrap();

        assert_eq!(loaded, HashSet::from(["foo".to_string(), "bar".to_string()]));

        let _ = std::fs::remove_file(&filepath);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let filepath = temp_filepath("corrupt.json");

        std::fs::create_dir_all(filepath.parent().unwrap()).unwrap();
        std::fs::write(&filepath, r#"{"not": "a list"#).unwrap();

        let result = JsonFileStore::<String>::new(&filepath).load().await;

        assert!(matches!(result, Err(FileError::Parse(_))));

        let _ = std::fs::remove_file(&filepath);
    }
}
