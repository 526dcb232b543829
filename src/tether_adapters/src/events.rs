use std::sync::Arc;

use dashmap::DashMap;
use tether_core::{AuthChangeCallback, AuthChangeEvent, Subscription};
use uuid::Uuid;

/// Fan-out of provider auth events to registered listeners.
#[derive(Clone, Default)]
pub struct AuthEventBus {
    listeners: Arc<DashMap<Uuid, AuthChangeCallback>>,
}

impl AuthEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: AuthChangeCallback) -> Subscription {
        let id = Uuid::new_v4();
        self.listeners.insert(id, callback);

        let listeners = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.remove(&id);
            }
        })
    }

    pub fn publish(&self, event: AuthChangeEvent) {
        let session = event.into_session();

        // Callbacks may unsubscribe, so none may run while a shard is locked.
        let listeners: Vec<AuthChangeCallback> = self
            .listeners
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        tracing::debug!(
            listeners = listeners.len(),
            signed_in = session.is_some(),
            "Publishing auth change"
        );
        for listener in listeners {
            listener(session.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
