use std::marker::PhantomData;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tether_core::{AppError, SecureStorage, StorageKey};

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    state: &'a T,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope<T> {
    state: T,
    version: u32,
}

/// One store's state, serialized as `{ "state": .., "version": .. }` under a
/// single secure-storage entry.
pub struct PersistedState<T, S> {
    storage: S,
    key: StorageKey,
    version: u32,
    _state: PhantomData<fn() -> T>,
}

impl<T, S> PersistedState<T, S>
where
    T: Serialize + DeserializeOwned,
    S: SecureStorage,
{
    pub fn new(storage: S, name: &str, version: u32) -> Self {
        Self {
            storage,
            key: StorageKey::new(name),
            version,
            _state: PhantomData,
        }
    }

    pub fn key(&self) -> &StorageKey {
        &self.key
    }

    /// Read the stored state.
    ///
    /// Entries written by another version, or that no longer parse, are
    /// discarded and reported as absent. Storage failures are returned.
    #[tracing::instrument(name = "PersistedState::load", skip(self), fields(key = %self.key))]
    pub async fn load(&self) -> Result<Option<T>, AppError> {
        let Some(raw) = self.storage.get_item(&self.key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Envelope<T>>(&raw) {
            Ok(envelope) if envelope.version == self.version => Ok(Some(envelope.state)),
            Ok(envelope) => {
                tracing::warn!(
                    stored = envelope.version,
                    current = self.version,
                    "Discarding persisted state written by another version"
                );
                Ok(None)
            }
            Err(error) => {
                tracing::warn!(%error, "Discarding unreadable persisted state");
                Ok(None)
            }
        }
    }

    pub async fn save(&self, state: &T) -> Result<(), AppError> {
        let envelope = EnvelopeRef {
            state,
            version: self.version,
        };
        let raw = serde_json::to_string(&envelope).map_err(AppError::unknown_from)?;
        self.storage.set_item(&self.key, raw).await
    }
}
