use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::Utc;
use dashmap::{DashMap, DashSet, mapref::entry::Entry};
use tether_core::{
    AppError, AuthChangeCallback, AuthChangeEvent, AuthRepository, Credentials, Session,
    Subscription, User,
};
use uuid::Uuid;

use crate::events::AuthEventBus;

pub const MOCK_ACCESS_TOKEN: &str = "mock-access-token";
pub const MOCK_REFRESH_TOKEN: &str = "mock-refresh-token";
pub const MOCK_SESSION_TTL_SECS: i64 = 3600;

struct Account {
    user_id: String,
    password: String,
}

/// In-process identity provider for development and tests.
///
/// Every session it issues carries [`MOCK_ACCESS_TOKEN`] and
/// [`MOCK_REFRESH_TOKEN`], expiring [`MOCK_SESSION_TTL_SECS`] after issue.
#[derive(Default)]
pub struct InMemoryAuthRepository {
    accounts: DashMap<String, Account>,
    revoked_users: DashSet<String>,
    active: ArcSwapOption<Session>,
    events: AuthEventBus,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.accounts.insert(
            email.trim().to_lowercase(),
            Account {
                user_id: Uuid::new_v4().to_string(),
                password: password.to_string(),
            },
        );
        self
    }

    /// Simulate the provider ending the session on its side, e.g. a sign-out
    /// from another device. Listeners are told; the revoked session can no
    /// longer be refreshed or set.
    pub fn revoke_remote_session(&self) {
        if let Some(session) = self.active.swap(None) {
            self.revoked_users.insert(session.user.id.clone());
        }
        tracing::info!("Remote session revoked");
        self.events.publish(AuthChangeEvent::SignedOut);
    }

    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    fn issue(&self, user: User) -> Session {
        self.revoked_users.remove(&user.id);
        let session = Session::new(
            MOCK_ACCESS_TOKEN,
            MOCK_REFRESH_TOKEN,
            Some(Utc::now().timestamp() + MOCK_SESSION_TTL_SECS),
            user,
        );
        self.active.store(Some(Arc::new(session.clone())));
        session
    }

    fn known_user(&self, user: &User) -> bool {
        self.accounts
            .get(&user.email)
            .is_some_and(|account| account.user_id == user.id)
    }
}

#[async_trait::async_trait]
impl AuthRepository for InMemoryAuthRepository {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AppError> {
        let email = credentials.email().as_str();
        let user_id = match self.accounts.get(email) {
            Some(account) if account.password == credentials.expose_password() => {
                account.user_id.clone()
            }
            _ => return Err(AppError::unauthorized("Invalid login credentials")),
        };

        let session = self.issue(User::new(user_id, email));
        self.events
            .publish(AuthChangeEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AppError> {
        let email = credentials.email().as_str();
        let user_id = Uuid::new_v4().to_string();

        match self.accounts.entry(email.to_string()) {
            Entry::Occupied(_) => {
                return Err(AppError::unauthorized("User already registered"));
            }
            Entry::Vacant(entry) => {
                entry.insert(Account {
                    user_id: user_id.clone(),
                    password: credentials.expose_password().to_string(),
                });
            }
        }

        let session = self.issue(User::new(user_id, email));
        self.events
            .publish(AuthChangeEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        self.active.store(None);
        self.events.publish(AuthChangeEvent::SignedOut);
        Ok(())
    }

    async fn refresh_session(&self) -> Result<Session, AppError> {
        let current = self
            .active
            .load_full()
            .ok_or_else(|| AppError::unauthorized("Auth session missing"))?;

        let session = self.issue(current.user.clone());
        self.events
            .publish(AuthChangeEvent::TokenRefreshed(session.clone()));
        Ok(session)
    }

    async fn set_session(&self, session: &Session) -> Result<Session, AppError> {
        if !self.known_user(&session.user) || self.revoked_users.contains(&session.user.id) {
            return Err(AppError::unauthorized("Invalid Refresh Token"));
        }

        self.active.store(Some(Arc::new(session.clone())));
        self.events
            .publish(AuthChangeEvent::SignedIn(session.clone()));
        Ok(session.clone())
    }

    async fn get_session(&self) -> Result<Option<Session>, AppError> {
        Ok(self
            .active
            .load_full()
            .map(|session| session.as_ref().clone()))
    }

    fn subscribe_to_auth_changes(&self, callback: AuthChangeCallback) -> Subscription {
        self.events.subscribe(callback)
    }
}
