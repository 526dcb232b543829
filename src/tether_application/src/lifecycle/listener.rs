use std::sync::Arc;

use tether_core::{AuthRepository, SecureStorage, Session, Subscription};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::session_store::SessionStore;

/// Mirrors provider-pushed session changes into the store.
pub struct AuthListener<R, S> {
    store: Arc<SessionStore<R, S>>,
}

impl<R, S> AuthListener<R, S>
where
    R: AuthRepository + 'static,
    S: SecureStorage + 'static,
{
    pub fn new(store: Arc<SessionStore<R, S>>) -> Self {
        Self { store }
    }

    /// Subscribe to the provider. The subscription lives as long as the handle.
    pub fn start(&self) -> ListenerHandle {
        let (sender, mut changes) = mpsc::unbounded_channel::<Option<Session>>();

        let subscription = self
            .store
            .repository()
            .subscribe_to_auth_changes(Arc::new(move |session| {
                // The receiver is gone once the handle stopped.
                let _ = sender.send(session);
            }));

        let store = self.store.clone();
        let task = tokio::spawn(async move {
            while let Some(change) = changes.recv().await {
                match change {
                    Some(session) => {
                        tracing::debug!(user_id = %session.user.id, "Provider pushed a session");
                        store.commit_session(session).await;
                    }
                    None => {
                        tracing::info!("Provider signed the session out");
                        store.clear_session().await;
                    }
                }
            }
        });

        ListenerHandle {
            subscription: Some(subscription),
            task,
        }
    }
}

/// Owns a running [`AuthListener`]. Stopping or dropping it unsubscribes.
#[derive(Debug)]
pub struct ListenerHandle {
    subscription: Option<Subscription>,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.task.abort();
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
