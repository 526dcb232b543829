use serde::{Deserialize, Serialize};
use tether_core::{AppError, AuthRepository, Credentials, SecureStorage, Session, User};
use tokio::sync::{Mutex, OnceCell, watch};

use crate::persistence::PersistedState;

/// Logical secure-storage name of the session store.
pub const SESSION_STORE_NAME: &str = "session-store";

const SESSION_STATE_VERSION: u32 = 0;

/// Observable state of the session store.
///
/// The current user is derived from `session`, so the two can never
/// disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub session: Option<Session>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|session| &session.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.session.as_ref().and_then(|session| session.expires_at)
    }
}

/// Progress of loading the persisted state.
#[derive(Debug, Clone, PartialEq)]
pub enum Hydration {
    Loading,
    Ready(Session),
    Empty,
}

impl Hydration {
    pub fn is_loading(&self) -> bool {
        matches!(self, Hydration::Loading)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Hydration::Ready(session) => Some(session),
            Hydration::Loading | Hydration::Empty => None,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    session: Option<Session>,
    error: Option<String>,
}

#[derive(Default)]
struct RefreshGate {
    /// Refresh token consumed by the last successful refresh.
    rotated: Option<String>,
}

/// Single holder of the authentication state plus the actions that mutate it.
///
/// Every change is written to secure storage. Refreshes are serialized; the
/// other actions are last-write-wins.
pub struct SessionStore<R, S> {
    repository: R,
    persisted: PersistedState<PersistedSession, S>,
    state: watch::Sender<SessionState>,
    hydration: watch::Sender<Hydration>,
    hydrated: OnceCell<()>,
    refresh_gate: Mutex<RefreshGate>,
    /// Held from snapshot to write so the newest state is the last one stored.
    write_lock: Mutex<()>,
}

impl<R, S> SessionStore<R, S>
where
    R: AuthRepository,
    S: SecureStorage,
{
    pub fn new(repository: R, storage: S) -> Self {
        Self::with_name(repository, storage, SESSION_STORE_NAME)
    }

    pub fn with_name(repository: R, storage: S, store_name: &str) -> Self {
        Self {
            repository,
            persisted: PersistedState::new(storage, store_name, SESSION_STATE_VERSION),
            state: watch::Sender::new(SessionState::default()),
            hydration: watch::Sender::new(Hydration::Loading),
            hydrated: OnceCell::new(),
            refresh_gate: Mutex::new(RefreshGate::default()),
            write_lock: Mutex::new(()),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn hydration(&self) -> Hydration {
        self.hydration.borrow().clone()
    }

    pub fn has_hydrated(&self) -> bool {
        !self.hydration.borrow().is_loading()
    }

    /// Load the persisted state. Runs once; later calls return the first result.
    #[tracing::instrument(name = "SessionStore::hydrate", skip_all)]
    pub async fn hydrate(&self) -> Hydration {
        self.hydrated
            .get_or_init(|| async {
                let restored = match self.persisted.load().await {
                    Ok(restored) => restored.unwrap_or_default(),
                    Err(error) => {
                        tracing::warn!(%error, "Failed to read persisted session state");
                        PersistedSession::default()
                    }
                };

                let hydration = match &restored.session {
                    Some(session) => Hydration::Ready(session.clone()),
                    None => Hydration::Empty,
                };

                self.state.send_modify(|state| {
                    // An action that settled before hydration wins over storage.
                    if state.session.is_none() && !state.is_loading {
                        state.session = restored.session;
                        state.error = restored.error;
                    }
                });
                self.hydration.send_replace(hydration);
            })
            .await;

        self.hydration()
    }

    /// Wait for hydration to finish and return the restored session, if any.
    pub async fn hydrated(&self) -> Option<Session> {
        let mut hydration = self.hydration.subscribe();
        match hydration.wait_for(|hydration| !hydration.is_loading()).await {
            Ok(hydration) => hydration.session().cloned(),
            Err(_) => None,
        }
    }

    #[tracing::instrument(name = "SessionStore::sign_in", skip_all, fields(email = %credentials.email()))]
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AppError> {
        self.begin();
        let result = self.repository.sign_in(credentials).await;
        self.settle(result).await
    }

    #[tracing::instrument(name = "SessionStore::sign_up", skip_all, fields(email = %credentials.email()))]
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AppError> {
        self.begin();
        let result = self.repository.sign_up(credentials).await;
        self.settle(result).await
    }

    /// Clear the local session. Does not contact the provider.
    #[tracing::instrument(name = "SessionStore::sign_out", skip_all)]
    pub async fn sign_out(&self) {
        self.state.send_modify(|state| {
            state.session = None;
            state.is_loading = false;
            state.error = None;
        });
        self.persist().await;
    }

    /// Push `session` to the provider, then refresh it.
    ///
    /// Concurrent callers are serialized. A caller holding a refresh token that
    /// the previous holder already rotated gets the current session back
    /// without another round-trip.
    #[tracing::instrument(name = "SessionStore::refresh_and_set_session", skip_all)]
    pub async fn refresh_and_set_session(&self, session: &Session) -> Result<Session, AppError> {
        let mut gate = self.refresh_gate.lock().await;

        if gate.rotated.as_deref() == Some(session.refresh_token.as_str()) {
            let current = self
                .state
                .borrow()
                .session
                .clone()
                .filter(|current| current.refresh_token != session.refresh_token);
            if let Some(current) = current {
                tracing::debug!("Session already refreshed by a concurrent caller");
                return Ok(current);
            }
        }

        let result = match self.repository.set_session(session).await {
            Ok(_) => self.repository.refresh_session().await,
            Err(error) => Err(error),
        };

        if result.is_ok() {
            gate.rotated = Some(session.refresh_token.clone());
        }

        self.settle(result).await
    }

    /// Adopt a session confirmed or pushed by the provider.
    pub async fn commit_session(&self, session: Session) {
        self.state.send_modify(|state| {
            state.session = Some(session);
            state.error = None;
        });
        self.persist().await;
    }

    /// Drop the local session after the provider reported it gone.
    pub async fn clear_session(&self) {
        self.state.send_modify(|state| {
            state.session = None;
        });
        self.persist().await;
    }

    fn begin(&self) {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });
    }

    async fn settle(&self, result: Result<Session, AppError>) -> Result<Session, AppError> {
        match result {
            Ok(session) => {
                self.state.send_modify(|state| {
                    state.session = Some(session.clone());
                    state.is_loading = false;
                    state.error = None;
                });
                self.persist().await;
                Ok(session)
            }
            Err(error) => {
                tracing::warn!(code = %error.code(), %error, "Session action failed");
                self.state.send_modify(|state| {
                    state.session = None;
                    state.is_loading = false;
                    state.error = Some(error.message().to_string());
                });
                self.persist().await;
                Err(error)
            }
        }
    }

    async fn persist(&self) {
        let _writing = self.write_lock.lock().await;
        let snapshot = {
            let state = self.state.borrow();
            PersistedSession {
                session: state.session.clone(),
                error: state.error.clone(),
            }
        };

        if let Err(error) = self.persisted.save(&snapshot).await {
            tracing::warn!(%error, "Failed to persist session state");
        }
    }
}
