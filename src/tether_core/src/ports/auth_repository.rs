use std::{fmt, sync::Arc};

use async_trait::async_trait;

use crate::{
    domain::{credentials::Credentials, session::Session},
    error::AppError,
};

/// Listener registered with [`AuthRepository::subscribe_to_auth_changes`].
///
/// Receives the new session on sign-in and token refresh, `None` on sign-out.
pub type AuthChangeCallback = Arc<dyn Fn(Option<Session>) + Send + Sync>;

/// Port over the remote identity provider.
///
/// Implementations map every provider and transport failure into
/// [`AppError`] before returning.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AppError>;

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AppError>;

    /// Best effort. Callers clear local state regardless of the outcome.
    async fn sign_out(&self) -> Result<(), AppError>;

    /// Exchange the active refresh token for a new token pair.
    async fn refresh_session(&self) -> Result<Session, AppError>;

    /// Make `session` the provider's active session.
    ///
    /// Must be called before [`refresh_session`](Self::refresh_session) when the
    /// session was restored locally, since the provider does not know about it.
    async fn set_session(&self, session: &Session) -> Result<Session, AppError>;

    /// The provider's active session, or `None` when there is none.
    async fn get_session(&self) -> Result<Option<Session>, AppError>;

    fn subscribe_to_auth_changes(&self, callback: AuthChangeCallback) -> Subscription;
}

#[async_trait]
impl<T> AuthRepository for Arc<T>
where
    T: AuthRepository + ?Sized,
{
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AppError> {
        (**self).sign_in(credentials).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AppError> {
        (**self).sign_up(credentials).await
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        (**self).sign_out().await
    }

    async fn refresh_session(&self) -> Result<Session, AppError> {
        (**self).refresh_session().await
    }

    async fn set_session(&self, session: &Session) -> Result<Session, AppError> {
        (**self).set_session(session).await
    }

    async fn get_session(&self) -> Result<Option<Session>, AppError> {
        (**self).get_session().await
    }

    fn subscribe_to_auth_changes(&self, callback: AuthChangeCallback) -> Subscription {
        (**self).subscribe_to_auth_changes(callback)
    }
}

/// Handle to a registered auth-change listener.
///
/// The release action runs exactly once: either through
/// [`unsubscribe`](Self::unsubscribe), which consumes the handle, or when the
/// handle is dropped.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
