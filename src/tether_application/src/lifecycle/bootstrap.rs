use std::sync::Arc;

use tether_core::{AuthRepository, SecureStorage, Session};
use tokio::sync::{OnceCell, watch};

use crate::session_store::SessionStore;

#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapOutcome {
    Authenticated(Session),
    Unauthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapPhase {
    Pending,
    Running,
    Complete,
}

/// Reconciles the persisted session with the provider before it is trusted.
///
/// Always terminates: provider errors are treated as "not signed in".
pub struct Bootstrapper<R, S> {
    store: Arc<SessionStore<R, S>>,
    phase: watch::Sender<BootstrapPhase>,
    outcome: OnceCell<BootstrapOutcome>,
}

impl<R, S> Bootstrapper<R, S>
where
    R: AuthRepository,
    S: SecureStorage,
{
    pub fn new(store: Arc<SessionStore<R, S>>) -> Self {
        Self {
            store,
            phase: watch::Sender::new(BootstrapPhase::Pending),
            outcome: OnceCell::new(),
        }
    }

    pub fn phase(&self) -> BootstrapPhase {
        *self.phase.borrow()
    }

    pub fn is_bootstrapping(&self) -> bool {
        self.phase() != BootstrapPhase::Complete
    }

    pub fn watch_phase(&self) -> watch::Receiver<BootstrapPhase> {
        self.phase.subscribe()
    }

    /// Run the bootstrap sequence once. Later calls return the first outcome.
    pub async fn run(&self) -> BootstrapOutcome {
        self.outcome
            .get_or_init(|| async {
                self.phase.send_replace(BootstrapPhase::Running);
                let outcome = self.reconcile().await;
                self.phase.send_replace(BootstrapPhase::Complete);
                outcome
            })
            .await
            .clone()
    }

    #[tracing::instrument(name = "Bootstrapper::reconcile", skip_all)]
    async fn reconcile(&self) -> BootstrapOutcome {
        if self.store.hydrated().await.is_none() {
            tracing::info!("No persisted session");
            return BootstrapOutcome::Unauthenticated;
        }

        match self.store.repository().get_session().await {
            Ok(Some(session)) => {
                tracing::info!(user_id = %session.user.id, "Persisted session confirmed");
                self.store.commit_session(session.clone()).await;
                BootstrapOutcome::Authenticated(session)
            }
            Ok(None) => {
                tracing::info!("Persisted session no longer valid");
                self.store.clear_session().await;
                BootstrapOutcome::Unauthenticated
            }
            Err(error) => {
                tracing::warn!(code = %error.code(), %error, "Session check failed, signing out");
                self.store.clear_session().await;
                BootstrapOutcome::Unauthenticated
            }
        }
    }
}
