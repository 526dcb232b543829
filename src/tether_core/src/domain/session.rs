use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::User;

/// The authenticated credential bundle.
///
/// Replaced wholesale on every sign-in and refresh; never patched in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry of the access token, in seconds since the Unix epoch.
    pub expires_at: Option<i64>,
    pub user: User,
}

impl Session {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: Option<i64>,
        user: User,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at,
            user,
        }
    }

    /// A session without an expiry never counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= now.timestamp())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

/// Push-style event delivered by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthChangeEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

impl AuthChangeEvent {
    /// Sign-in and token refresh both carry the new session; sign-out clears.
    pub fn into_session(self) -> Option<Session> {
        match self {
            AuthChangeEvent::SignedIn(session) | AuthChangeEvent::TokenRefreshed(session) => {
                Some(session)
            }
            AuthChangeEvent::SignedOut => None,
        }
    }
}
