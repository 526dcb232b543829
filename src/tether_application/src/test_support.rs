//! Hand-written port doubles shared by the unit tests of this crate.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tether_core::{
    AppError, AuthChangeCallback, AuthRepository, Credentials, SecureStorage, Session,
    StorageKey, Subscription, User,
};

pub fn session(access_token: &str, expires_at: Option<i64>) -> Session {
    Session::new(
        access_token,
        format!("{access_token}-refresh"),
        expires_at,
        User::new("user-1", "test@example.com"),
    )
}

pub fn in_an_hour() -> Option<i64> {
    Some(chrono::Utc::now().timestamp() + 3600)
}

type Scripted<T> = Mutex<VecDeque<Result<T, AppError>>>;

/// Repository that replays scripted results and records every call.
#[derive(Default)]
pub struct RecordingRepository {
    calls: Mutex<Vec<&'static str>>,
    sign_in: Scripted<Session>,
    sign_up: Scripted<Session>,
    sign_out: Scripted<()>,
    refresh: Scripted<Session>,
    set_session: Scripted<Session>,
    get_session: Scripted<Option<Session>>,
    listeners: Arc<Mutex<HashMap<usize, AuthChangeCallback>>>,
    next_listener: Mutex<usize>,
    released: Arc<Mutex<usize>>,
}

impl RecordingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|call| **call == name).count()
    }

    pub fn push_sign_in(&self, result: Result<Session, AppError>) {
        self.sign_in.lock().unwrap().push_back(result);
    }

    pub fn push_sign_up(&self, result: Result<Session, AppError>) {
        self.sign_up.lock().unwrap().push_back(result);
    }

    pub fn push_sign_out(&self, result: Result<(), AppError>) {
        self.sign_out.lock().unwrap().push_back(result);
    }

    pub fn push_refresh(&self, result: Result<Session, AppError>) {
        self.refresh.lock().unwrap().push_back(result);
    }

    pub fn push_set_session(&self, result: Result<Session, AppError>) {
        self.set_session.lock().unwrap().push_back(result);
    }

    pub fn push_get_session(&self, result: Result<Option<Session>, AppError>) {
        self.get_session.lock().unwrap().push_back(result);
    }

    /// Deliver a provider event to every registered listener.
    pub fn emit(&self, session: Option<Session>) {
        let listeners: Vec<_> = self.listeners.lock().unwrap().values().cloned().collect();
        for listener in listeners {
            listener(session.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    pub fn released_count(&self) -> usize {
        *self.released.lock().unwrap()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }

    fn next<T>(queue: &Scripted<T>, name: &str) -> Result<T, AppError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::unknown(format!("no scripted {name} result"))))
    }
}

#[async_trait]
impl AuthRepository for RecordingRepository {
    async fn sign_in(&self, _credentials: &Credentials) -> Result<Session, AppError> {
        self.record("sign_in");
        Self::next(&self.sign_in, "sign_in")
    }

    async fn sign_up(&self, _credentials: &Credentials) -> Result<Session, AppError> {
        self.record("sign_up");
        Self::next(&self.sign_up, "sign_up")
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        self.record("sign_out");
        Self::next(&self.sign_out, "sign_out")
    }

    async fn refresh_session(&self) -> Result<Session, AppError> {
        self.record("refresh_session");
        Self::next(&self.refresh, "refresh_session")
    }

    async fn set_session(&self, _session: &Session) -> Result<Session, AppError> {
        self.record("set_session");
        Self::next(&self.set_session, "set_session")
    }

    async fn get_session(&self) -> Result<Option<Session>, AppError> {
        self.record("get_session");
        Self::next(&self.get_session, "get_session")
    }

    fn subscribe_to_auth_changes(&self, callback: AuthChangeCallback) -> Subscription {
        let id = {
            let mut next = self.next_listener.lock().unwrap();
            *next += 1;
            *next
        };
        self.listeners.lock().unwrap().insert(id, callback);

        let listeners = self.listeners.clone();
        let released = self.released.clone();
        Subscription::new(move || {
            listeners.lock().unwrap().remove(&id);
            *released.lock().unwrap() += 1;
        })
    }
}

/// Storage backed by a plain map, optionally failing every write.
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        storage
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl SecureStorage for MemoryStorage {
    async fn get_item(&self, key: &StorageKey) -> Result<Option<String>, AppError> {
        Ok(self.raw(key.as_str()))
    }

    async fn set_item(&self, key: &StorageKey, value: String) -> Result<(), AppError> {
        if self.fail_writes {
            return Err(AppError::unknown("keychain unavailable"));
        }
        self.items
            .lock()
            .unwrap()
            .insert(key.as_str().to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &StorageKey) -> Result<(), AppError> {
        self.items.lock().unwrap().remove(key.as_str());
        Ok(())
    }
}
