use std::{sync::Arc, time::Duration};

use tether_core::{AuthRepository, SecureStorage};
use tokio::sync::Mutex;

use super::{
    bootstrap::{BootstrapOutcome, BootstrapPhase, Bootstrapper},
    listener::{AuthListener, ListenerHandle},
    refresh_timer::{REFRESH_THRESHOLD, RefreshHandle, RefreshScheduler},
};
use crate::session_store::SessionStore;

/// Session validity as seen by the rest of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStatus {
    Unknown,
    Bootstrapping,
    Authenticated,
    Unauthenticated,
}

/// Runs hydration, bootstrap, the provider listener and the refresh timer
/// for one session store.
pub struct SessionLifecycle<R, S> {
    store: Arc<SessionStore<R, S>>,
    bootstrapper: Bootstrapper<R, S>,
    refresh_threshold: Duration,
    listener: Mutex<Option<ListenerHandle>>,
    refresh: Mutex<Option<RefreshHandle>>,
}

impl<R, S> SessionLifecycle<R, S>
where
    R: AuthRepository + 'static,
    S: SecureStorage + 'static,
{
    pub fn new(store: Arc<SessionStore<R, S>>) -> Self {
        Self::with_refresh_threshold(store, REFRESH_THRESHOLD)
    }

    pub fn with_refresh_threshold(store: Arc<SessionStore<R, S>>, threshold: Duration) -> Self {
        Self {
            bootstrapper: Bootstrapper::new(store.clone()),
            store,
            refresh_threshold: threshold,
            listener: Mutex::new(None),
            refresh: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Arc<SessionStore<R, S>> {
        &self.store
    }

    pub fn bootstrapper(&self) -> &Bootstrapper<R, S> {
        &self.bootstrapper
    }

    pub fn status(&self) -> LifecycleStatus {
        match self.bootstrapper.phase() {
            BootstrapPhase::Pending => LifecycleStatus::Unknown,
            BootstrapPhase::Running => LifecycleStatus::Bootstrapping,
            BootstrapPhase::Complete if self.store.state().is_authenticated() => {
                LifecycleStatus::Authenticated
            }
            BootstrapPhase::Complete => LifecycleStatus::Unauthenticated,
        }
    }

    /// Hydrate, subscribe to the provider, bootstrap, then arm the refresh
    /// timer. Calling it again restarts the listener and timer.
    #[tracing::instrument(name = "SessionLifecycle::start", skip_all)]
    pub async fn start(&self) -> BootstrapOutcome {
        self.store.hydrate().await;

        let listener = AuthListener::new(self.store.clone()).start();
        *self.listener.lock().await = Some(listener);

        let outcome = self.bootstrapper.run().await;
        tracing::info!(
            authenticated = matches!(outcome, BootstrapOutcome::Authenticated(_)),
            "Bootstrap finished"
        );

        let refresh =
            RefreshScheduler::with_threshold(self.store.clone(), self.refresh_threshold).spawn();
        *self.refresh.lock().await = Some(refresh);

        outcome
    }

    /// Stop the listener and cancel any pending refresh.
    pub async fn shutdown(&self) {
        if let Some(listener) = self.listener.lock().await.take() {
            listener.stop();
        }
        if let Some(refresh) = self.refresh.lock().await.take() {
            refresh.stop();
        }
    }
}
