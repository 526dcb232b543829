use dashmap::DashMap;
use tether_core::{AppError, SecureStorage, StorageKey};

/// Process-local [`SecureStorage`]. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct InMemorySecureStorage {
    items: DashMap<String, String>,
}

impl InMemorySecureStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait::async_trait]
impl SecureStorage for InMemorySecureStorage {
    async fn get_item(&self, key: &StorageKey) -> Result<Option<String>, AppError> {
        Ok(self
            .items
            .get(key.as_str())
            .map(|value| value.value().clone()))
    }

    async fn set_item(&self, key: &StorageKey, value: String) -> Result<(), AppError> {
        self.items.insert(key.as_str().to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &StorageKey) -> Result<(), AppError> {
        self.items.remove(key.as_str());
        Ok(())
    }
}
