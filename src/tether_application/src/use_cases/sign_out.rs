use std::sync::Arc;

use tether_core::{AuthRepository, SecureStorage};

use crate::session_store::SessionStore;

/// Sign-out use case - tells the provider, then clears local state regardless
pub struct SignOutUseCase<R, S> {
    store: Arc<SessionStore<R, S>>,
}

impl<R, S> SignOutUseCase<R, S>
where
    R: AuthRepository,
    S: SecureStorage,
{
    pub fn new(store: Arc<SessionStore<R, S>>) -> Self {
        Self { store }
    }

    /// Execute the sign-out use case
    ///
    /// Provider errors are logged and never keep the local session alive.
    #[tracing::instrument(name = "SignOutUseCase::execute", skip_all)]
    pub async fn execute(&self) {
        if let Err(error) = self.store.repository().sign_out().await {
            tracing::warn!(code = %error.code(), %error, "Provider sign-out failed");
        }
        self.store.sign_out().await;
    }
}
