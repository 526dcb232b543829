use std::sync::Arc;

use tether_core::{AppError, AuthRepository, SecureStorage, Session, SignInInput};

use crate::session_store::SessionStore;

/// Sign-in use case - validates the form, then signs in through the store
pub struct SignInUseCase<R, S> {
    store: Arc<SessionStore<R, S>>,
}

impl<R, S> SignInUseCase<R, S>
where
    R: AuthRepository,
    S: SecureStorage,
{
    pub fn new(store: Arc<SessionStore<R, S>>) -> Self {
        Self { store }
    }

    /// Execute the sign-in use case
    ///
    /// # Arguments
    /// * `input` - Raw form input
    ///
    /// # Returns
    /// The new session, or a validation error without contacting the provider
    #[tracing::instrument(name = "SignInUseCase::execute", skip_all)]
    pub async fn execute(&self, input: SignInInput) -> Result<Session, AppError> {
        let credentials = input.validate()?;
        self.store.sign_in(&credentials).await
    }
}
