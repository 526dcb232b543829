use std::sync::Arc;

use tether_core::{AppError, AuthRepository, SecureStorage, Session, SignUpInput};

use crate::session_store::SessionStore;

/// Sign-up use case - validates the registration form, then signs up through the store
pub struct SignUpUseCase<R, S> {
    store: Arc<SessionStore<R, S>>,
}

impl<R, S> SignUpUseCase<R, S>
where
    R: AuthRepository,
    S: SecureStorage,
{
    pub fn new(store: Arc<SessionStore<R, S>>) -> Self {
        Self { store }
    }

    /// Execute the sign-up use case
    ///
    /// # Arguments
    /// * `input` - Raw registration form input
    ///
    /// # Returns
    /// The session of the new account
    #[tracing::instrument(name = "SignUpUseCase::execute", skip_all)]
    pub async fn execute(&self, input: SignUpInput) -> Result<Session, AppError> {
        let credentials = input.validate()?;
        self.store.sign_up(&credentials).await
    }
}
