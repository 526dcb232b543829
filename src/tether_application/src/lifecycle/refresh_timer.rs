use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tether_core::{AuthRepository, SecureStorage};
use tokio::{
    sync::watch::{self, error::RecvError},
    task::JoinHandle,
};

use crate::session_store::{SessionState, SessionStore};

/// How long before expiry the session is refreshed.
pub const REFRESH_THRESHOLD: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSchedule {
    Immediately,
    After(Duration),
}

/// `expires_at * 1000 - now - threshold`, in milliseconds. Zero or less
/// means the threshold has already passed.
pub fn schedule_refresh(
    expires_at: i64,
    now: DateTime<Utc>,
    threshold: Duration,
) -> RefreshSchedule {
    let threshold_ms = i64::try_from(threshold.as_millis()).unwrap_or(i64::MAX);
    let until_refresh_ms = expires_at
        .saturating_mul(1000)
        .saturating_sub(now.timestamp_millis())
        .saturating_sub(threshold_ms);

    if until_refresh_ms <= 0 {
        RefreshSchedule::Immediately
    } else {
        RefreshSchedule::After(Duration::from_millis(until_refresh_ms as u64))
    }
}

/// Refreshes the session shortly before it expires.
///
/// Re-schedules whenever the session's expiry changes; a pending timer is
/// dropped as soon as the expiry it was armed for is replaced.
pub struct RefreshScheduler<R, S> {
    store: Arc<SessionStore<R, S>>,
    threshold: Duration,
}

impl<R, S> RefreshScheduler<R, S>
where
    R: AuthRepository + 'static,
    S: SecureStorage + 'static,
{
    pub fn new(store: Arc<SessionStore<R, S>>) -> Self {
        Self::with_threshold(store, REFRESH_THRESHOLD)
    }

    pub fn with_threshold(store: Arc<SessionStore<R, S>>, threshold: Duration) -> Self {
        Self { store, threshold }
    }

    pub fn spawn(self) -> RefreshHandle {
        RefreshHandle {
            task: tokio::spawn(self.run()),
        }
    }

    async fn run(self) {
        let mut state = self.store.subscribe();
        let mut refreshed_for = None;

        loop {
            let expires_at = state.borrow_and_update().expires_at();

            let Some(expires_at) = expires_at else {
                if wait_for_expiry_change(&mut state, None).await.is_err() {
                    return;
                }
                continue;
            };

            match schedule_refresh(expires_at, Utc::now(), self.threshold) {
                // The provider handed back a session that is already due.
                RefreshSchedule::Immediately if refreshed_for == Some(expires_at) => {
                    tracing::warn!(expires_at, "Refreshed session is still inside the threshold");
                    if wait_for_expiry_change(&mut state, Some(expires_at))
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
                RefreshSchedule::Immediately => {
                    refreshed_for = Some(expires_at);
                    self.refresh().await;
                }
                RefreshSchedule::After(delay) => {
                    tracing::info!(expires_at, delay_secs = delay.as_secs(), "Session refresh scheduled");
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {
                            refreshed_for = Some(expires_at);
                            self.refresh().await;
                        }
                        changed = wait_for_expiry_change(&mut state, Some(expires_at)) => {
                            if changed.is_err() {
                                return;
                            }
                        }
                    }
                }
            }
        }
    }

    #[tracing::instrument(name = "RefreshScheduler::refresh", skip_all)]
    async fn refresh(&self) {
        let Some(session) = self.store.state().session else {
            return;
        };

        match self.store.refresh_and_set_session(&session).await {
            Ok(session) => {
                tracing::info!(expires_at = ?session.expires_at, "Session refreshed");
            }
            Err(error) => {
                tracing::warn!(code = %error.code(), %error, "Session refresh failed");
            }
        }
    }
}

async fn wait_for_expiry_change(
    state: &mut watch::Receiver<SessionState>,
    current: Option<i64>,
) -> Result<(), RecvError> {
    loop {
        state.changed().await?;
        if state.borrow_and_update().expires_at() != current {
            return Ok(());
        }
    }
}

/// Owns a running [`RefreshScheduler`]. Stopping or dropping it cancels any
/// pending refresh.
#[derive(Debug)]
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
