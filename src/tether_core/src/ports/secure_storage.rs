use std::fmt;

use async_trait::async_trait;

use crate::error::AppError;

/// Storage key with `:` characters removed, as required by on-device
/// secure stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(name: &str) -> Self {
        Self(name.replace(':', ""))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Port over the platform's secure key/value store.
#[async_trait]
pub trait SecureStorage: Send + Sync {
    async fn get_item(&self, key: &StorageKey) -> Result<Option<String>, AppError>;
    async fn set_item(&self, key: &StorageKey, value: String) -> Result<(), AppError>;
    async fn remove_item(&self, key: &StorageKey) -> Result<(), AppError>;
}

#[async_trait]
impl<T> SecureStorage for std::sync::Arc<T>
where
    T: SecureStorage + ?Sized,
{
    async fn get_item(&self, key: &StorageKey) -> Result<Option<String>, AppError> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &StorageKey, value: String) -> Result<(), AppError> {
        (**self).set_item(key, value).await
    }

    async fn remove_item(&self, key: &StorageKey) -> Result<(), AppError> {
        (**self).remove_item(key).await
    }
}

#[async_trait]
impl<T> SecureStorage for &T
where
    T: SecureStorage + ?Sized,
{
    async fn get_item(&self, key: &StorageKey) -> Result<Option<String>, AppError> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &StorageKey, value: String) -> Result<(), AppError> {
        (**self).set_item(key, value).await
    }

    async fn remove_item(&self, key: &StorageKey) -> Result<(), AppError> {
        (**self).remove_item(key).await
    }
}
