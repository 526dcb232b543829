use std::{sync::Arc, time::Duration};

use tether_adapters::{FileSecureStorage, HttpAuthRepository, Settings};
use tether_application::{
    BootstrapOutcome, REFRESH_THRESHOLD, SESSION_STORE_NAME, SessionLifecycle, SessionStore,
    SignInUseCase, SignOutUseCase, SignUpUseCase,
};
use tether_core::{AppError, AuthRepository, SecureStorage};

use crate::registry::ServiceRegistry;

pub type DynAuthRepository = Arc<dyn AuthRepository>;
pub type DynSecureStorage = Arc<dyn SecureStorage>;
pub type ClientSessionStore = SessionStore<DynAuthRepository, DynSecureStorage>;

/// The session store, its lifecycle and the auth use cases, wired to one
/// provider and one storage.
pub struct TetherClient {
    store: Arc<ClientSessionStore>,
    lifecycle: SessionLifecycle<DynAuthRepository, DynSecureStorage>,
    sign_in: SignInUseCase<DynAuthRepository, DynSecureStorage>,
    sign_up: SignUpUseCase<DynAuthRepository, DynSecureStorage>,
    sign_out: SignOutUseCase<DynAuthRepository, DynSecureStorage>,
}

impl TetherClient {
    pub fn builder() -> TetherClientBuilder {
        TetherClientBuilder::default()
    }

    /// HTTP provider plus file storage, as described by `settings`. The
    /// provider keeps its own session in the same storage directory.
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.provider.request_timeout())
            .build()
            .map_err(AppError::unknown_from)?;

        let storage: DynSecureStorage =
            Arc::new(FileSecureStorage::new(&settings.storage.directory));
        let repository = HttpAuthRepository::new(
            &settings.provider.base_url,
            settings.provider.api_key.clone(),
            http_client,
        )?
        .with_storage(storage.clone());

        Self::builder()
            .auth_repository(Arc::new(repository))?
            .secure_storage(storage)?
            .store_name(&settings.session.store_name)
            .refresh_threshold(settings.session.refresh_threshold())
            .build()
    }

    pub fn store(&self) -> &Arc<ClientSessionStore> {
        &self.store
    }

    pub fn lifecycle(&self) -> &SessionLifecycle<DynAuthRepository, DynSecureStorage> {
        &self.lifecycle
    }

    pub fn sign_in(&self) -> &SignInUseCase<DynAuthRepository, DynSecureStorage> {
        &self.sign_in
    }

    pub fn sign_up(&self) -> &SignUpUseCase<DynAuthRepository, DynSecureStorage> {
        &self.sign_up
    }

    pub fn sign_out(&self) -> &SignOutUseCase<DynAuthRepository, DynSecureStorage> {
        &self.sign_out
    }

    pub async fn start(&self) -> BootstrapOutcome {
        self.lifecycle.start().await
    }

    pub async fn shutdown(&self) {
        self.lifecycle.shutdown().await;
    }
}

pub struct TetherClientBuilder {
    registry: ServiceRegistry,
    store_name: String,
    refresh_threshold: Duration,
}

impl Default for TetherClientBuilder {
    fn default() -> Self {
        Self {
            registry: ServiceRegistry::new(),
            store_name: SESSION_STORE_NAME.to_string(),
            refresh_threshold: REFRESH_THRESHOLD,
        }
    }
}

impl TetherClientBuilder {
    pub fn auth_repository(self, repository: DynAuthRepository) -> Result<Self, AppError> {
        self.registry.configure_auth_repository(repository)?;
        Ok(self)
    }

    pub fn secure_storage(self, storage: DynSecureStorage) -> Result<Self, AppError> {
        self.registry.configure_secure_storage(storage)?;
        Ok(self)
    }

    pub fn store_name(mut self, store_name: &str) -> Self {
        self.store_name = store_name.to_string();
        self
    }

    pub fn refresh_threshold(mut self, threshold: Duration) -> Self {
        self.refresh_threshold = threshold;
        self
    }

    pub fn build(self) -> Result<TetherClient, AppError> {
        let repository = self.registry.auth_repository()?;
        let storage = self.registry.secure_storage()?;

        let store = Arc::new(SessionStore::with_name(
            repository,
            storage,
            &self.store_name,
        ));
        tracing::debug!(store_name = %self.store_name, "Session store created");

        Ok(TetherClient {
            lifecycle: SessionLifecycle::with_refresh_threshold(
                store.clone(),
                self.refresh_threshold,
            ),
            sign_in: SignInUseCase::new(store.clone()),
            sign_up: SignUpUseCase::new(store.clone()),
            sign_out: SignOutUseCase::new(store.clone()),
            store,
        })
    }
}
