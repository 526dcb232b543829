use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tether_core::{AppError, SecureStorage, StorageKey};
use uuid::Uuid;

const ITEM_EXTENSION: &str = "json";

/// [`SecureStorage`] keeping one file per key inside a directory.
///
/// Writes go to a temporary file of their own that is then renamed over the
/// item, so a crash never leaves a half-written value behind.
#[derive(Debug, Clone)]
pub struct FileSecureStorage {
    directory: PathBuf,
}

impl FileSecureStorage {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn item_path(&self, key: &StorageKey) -> Result<PathBuf, AppError> {
        let name = key.as_str();
        let invalid = name.is_empty()
            || name.starts_with('.')
            || name.contains(['/', '\\'])
            || name.contains('\0');
        if invalid {
            return Err(AppError::validation(
                format!("Storage key '{name}' cannot be used as a file name"),
                "key",
            ));
        }

        Ok(self
            .directory
            .join(format!("{name}.{ITEM_EXTENSION}")))
    }
}

#[async_trait::async_trait]
impl SecureStorage for FileSecureStorage {
    async fn get_item(&self, key: &StorageKey) -> Result<Option<String>, AppError> {
        let path = self.item_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(AppError::unknown_from(error)),
        }
    }

    #[tracing::instrument(name = "FileSecureStorage::set_item", skip(self, value), fields(key = %key))]
    async fn set_item(&self, key: &StorageKey, value: String) -> Result<(), AppError> {
        let path = self.item_path(key)?;
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(AppError::unknown_from)?;

        let staging = path.with_extension(format!("{ITEM_EXTENSION}.{}.tmp", Uuid::new_v4()));
        if let Err(error) = tokio::fs::write(&staging, value).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(AppError::unknown_from(error));
        }
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(AppError::unknown_from)
    }

    async fn remove_item(&self, key: &StorageKey) -> Result<(), AppError> {
        let path = self.item_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(AppError::unknown_from(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::ErrorCode;

    #[tokio::test]
    async fn test_items_round_trip_through_files() {
        let directory = tempfile::tempdir().unwrap();
        let storage = FileSecureStorage::new(directory.path().join("nested"));
        let key = StorageKey::new("tether:session-store");

        assert_eq!(storage.get_item(&key).await.unwrap(), None);

        storage
            .set_item(&key, r#"{"state":{},"version":0}"#.to_string())
            .await
            .unwrap();

        let file = directory.path().join("nested").join("tethersession-store.json");
        assert!(file.exists());
        assert_eq!(
            storage.get_item(&key).await.unwrap().as_deref(),
            Some(r#"{"state":{},"version":0}"#)
        );

        storage.remove_item(&key).await.unwrap();
        assert!(!file.exists());
        storage.remove_item(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_values_survive_a_new_instance() {
        let directory = tempfile::tempdir().unwrap();
        let key = StorageKey::new("session-store");

        FileSecureStorage::new(directory.path())
            .set_item(&key, "kept".to_string())
            .await
            .unwrap();

        let reopened = FileSecureStorage::new(directory.path());
        assert_eq!(
            reopened.get_item(&key).await.unwrap(),
            Some("kept".to_string())
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_to_one_key_all_land() {
        let directory = tempfile::tempdir().unwrap();
        let storage = FileSecureStorage::new(directory.path());
        let key = StorageKey::new("session-store");

        let writers: Vec<_> = (0..16)
            .map(|index| {
                let storage = storage.clone();
                let key = key.clone();
                tokio::spawn(async move { storage.set_item(&key, format!("value-{index}")).await })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap().unwrap();
        }

        let value = storage.get_item(&key).await.unwrap().unwrap();
        assert!(value.starts_with("value-"));
        let leftovers = std::fs::read_dir(directory.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[tokio::test]
    async fn test_keys_cannot_escape_the_directory() {
        let directory = tempfile::tempdir().unwrap();
        let storage = FileSecureStorage::new(directory.path());

        for name in ["../outside", "a/b", "", ".hidden"] {
            let error = storage
                .set_item(&StorageKey::new(name), "value".to_string())
                .await
                .unwrap_err();
            assert_eq!(error.code(), ErrorCode::Validation, "{name:?}");
        }
    }
}
