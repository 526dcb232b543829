use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tether_core::{
    AppError, AuthChangeCallback, AuthChangeEvent, AuthRepository, Credentials, SecureStorage,
    Session, StorageKey, Subscription, User,
};

use super::error_mapping::{Operation, ProviderErrorBody, map_status, map_transport_error};
use crate::events::AuthEventBus;

const API_KEY_HEADER: &str = "apikey";
const TOKEN_PATH: &str = "auth/v1/token";
const SIGN_UP_PATH: &str = "auth/v1/signup";
const USER_PATH: &str = "auth/v1/user";
const LOGOUT_PATH: &str = "auth/v1/logout";

/// Storage name of the provider's own copy of the active session.
pub const PROVIDER_SESSION_KEY: &str = "tether:provider-session";

/// [`AuthRepository`] backed by a GoTrue-style REST auth provider.
///
/// Keeps the provider's active session in memory and, when storage is
/// attached, mirrors it there so a restarted process can resume it.
pub struct HttpAuthRepository {
    http_client: Client,
    base_url: Url,
    api_key: Secret<String>,
    active: ArcSwapOption<Session>,
    storage: Option<Arc<dyn SecureStorage>>,
    events: AuthEventBus,
}

impl HttpAuthRepository {
    pub fn new(
        base_url: &str,
        api_key: Secret<String>,
        http_client: Client,
    ) -> Result<Self, AppError> {
        // `Url::join` drops the last path segment unless the base ends in '/'.
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&base_url).map_err(|error| {
            AppError::validation(format!("Invalid provider URL: {error}"), "base_url")
        })?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
            active: ArcSwapOption::empty(),
            storage: None,
            events: AuthEventBus::new(),
        })
    }

    pub fn with_storage(mut self, storage: Arc<dyn SecureStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        self.base_url
            .join(path)
            .map_err(|error| AppError::unknown(format!("Invalid provider endpoint: {error}")))
    }

    async fn send(
        &self,
        request: RequestBuilder,
        operation: Operation,
    ) -> Result<Response, AppError> {
        let response = request
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .json::<ProviderErrorBody>()
            .await
            .unwrap_or_default();
        tracing::debug!(%status, ?operation, "Auth provider rejected the request");
        Err(map_status(status, body, operation))
    }

    async fn request_session<B: Serialize>(
        &self,
        url: Url,
        body: &B,
        operation: Operation,
    ) -> Result<Session, AppError> {
        let response = self
            .send(self.http_client.post(url).json(body), operation)
            .await?;
        let tokens = response
            .json::<TokenResponse>()
            .await
            .map_err(map_transport_error)?;

        tokens
            .into_session(Utc::now().timestamp())
            .ok_or_else(|| AppError::unauthorized("No session returned"))
    }

    async fn fetch_user(&self, access_token: &str, operation: Operation) -> Result<User, AppError> {
        let request = self
            .http_client
            .get(self.endpoint(USER_PATH)?)
            .bearer_auth(access_token);
        let user = self
            .send(request, operation)
            .await?
            .json::<UserResponse>()
            .await
            .map_err(map_transport_error)?;
        Ok(user.into())
    }

    async fn current(&self) -> Option<Session> {
        if let Some(session) = self.active.load_full() {
            return Some(session.as_ref().clone());
        }

        let storage = self.storage.as_ref()?;
        let key = StorageKey::new(PROVIDER_SESSION_KEY);
        let raw = match storage.get_item(&key).await {
            Ok(raw) => raw?,
            Err(error) => {
                tracing::warn!(%error, "Failed to read the provider session");
                return None;
            }
        };
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                self.active.store(Some(Arc::new(session.clone())));
                Some(session)
            }
            Err(error) => {
                tracing::warn!(%error, "Discarding unreadable provider session");
                None
            }
        }
    }

    async fn activate(&self, session: Session, event: fn(Session) -> AuthChangeEvent) {
        self.active.store(Some(Arc::new(session.clone())));
        if let Some(storage) = &self.storage {
            let key = StorageKey::new(PROVIDER_SESSION_KEY);
            let written = match serde_json::to_string(&session) {
                Ok(raw) => storage.set_item(&key, raw).await,
                Err(error) => Err(AppError::unknown_from(error)),
            };
            if let Err(error) = written {
                tracing::warn!(%error, "Failed to persist the provider session");
            }
        }
        self.events.publish(event(session));
    }

    async fn deactivate(&self) {
        self.active.store(None);
        if let Some(storage) = &self.storage {
            let key = StorageKey::new(PROVIDER_SESSION_KEY);
            if let Err(error) = storage.remove_item(&key).await {
                tracing::warn!(%error, "Failed to remove the provider session");
            }
        }
        self.events.publish(AuthChangeEvent::SignedOut);
    }
}

#[async_trait::async_trait]
impl AuthRepository for HttpAuthRepository {
    #[tracing::instrument(name = "HttpAuthRepository::sign_in", skip_all)]
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AppError> {
        let mut url = self.endpoint(TOKEN_PATH)?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let body = PasswordGrant::from(credentials);
        let session = self.request_session(url, &body, Operation::SignIn).await?;
        self.activate(session.clone(), AuthChangeEvent::SignedIn)
            .await;
        Ok(session)
    }

    #[tracing::instrument(name = "HttpAuthRepository::sign_up", skip_all)]
    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AppError> {
        let url = self.endpoint(SIGN_UP_PATH)?;

        let body = PasswordGrant::from(credentials);
        let session = self.request_session(url, &body, Operation::SignUp).await?;
        self.activate(session.clone(), AuthChangeEvent::SignedIn)
            .await;
        Ok(session)
    }

    #[tracing::instrument(name = "HttpAuthRepository::sign_out", skip_all)]
    async fn sign_out(&self) -> Result<(), AppError> {
        let Some(session) = self.current().await else {
            return Ok(());
        };
        self.deactivate().await;

        let request = self
            .http_client
            .post(self.endpoint(LOGOUT_PATH)?)
            .bearer_auth(&session.access_token);
        match self.send(request, Operation::SignOut).await {
            Ok(_) => Ok(()),
            // The token was already revoked or expired on the provider side.
            Err(AppError::Unauthorized { .. } | AppError::NotFound { .. }) => Ok(()),
            Err(error) => Err(error),
        }
    }

    #[tracing::instrument(name = "HttpAuthRepository::refresh_session", skip_all)]
    async fn refresh_session(&self) -> Result<Session, AppError> {
        let current = self
            .current()
            .await
            .ok_or_else(|| AppError::unauthorized("Auth session missing"))?;

        let mut url = self.endpoint(TOKEN_PATH)?;
        url.query_pairs_mut()
            .append_pair("grant_type", "refresh_token");
        let body = RefreshTokenGrant {
            refresh_token: &current.refresh_token,
        };

        match self.request_session(url, &body, Operation::Refresh).await {
            Ok(session) => {
                self.activate(session.clone(), AuthChangeEvent::TokenRefreshed)
                    .await;
                Ok(session)
            }
            Err(error @ AppError::Unauthorized { .. }) => {
                self.deactivate().await;
                Err(error)
            }
            Err(error) => Err(error),
        }
    }

    /// An expired session is adopted unchecked, since its access token can
    /// no longer be validated; the caller is expected to refresh it.
    #[tracing::instrument(name = "HttpAuthRepository::set_session", skip_all)]
    async fn set_session(&self, session: &Session) -> Result<Session, AppError> {
        let session = if session.is_expired_at(Utc::now()) {
            session.clone()
        } else {
            let user = self
                .fetch_user(&session.access_token, Operation::SetSession)
                .await?;
            Session {
                user,
                ..session.clone()
            }
        };

        self.activate(session.clone(), AuthChangeEvent::SignedIn)
            .await;
        Ok(session)
    }

    #[tracing::instrument(name = "HttpAuthRepository::get_session", skip_all)]
    async fn get_session(&self) -> Result<Option<Session>, AppError> {
        let Some(session) = self.current().await else {
            return Ok(None);
        };

        if session.is_expired_at(Utc::now()) {
            return match self.refresh_session().await {
                Ok(session) => Ok(Some(session)),
                Err(AppError::Unauthorized { .. }) => Ok(None),
                Err(error) => Err(error),
            };
        }

        match self
            .fetch_user(&session.access_token, Operation::GetSession)
            .await
        {
            Ok(user) => {
                let session = Session { user, ..session };
                self.active.store(Some(Arc::new(session.clone())));
                Ok(Some(session))
            }
            Err(AppError::Unauthorized { .. }) => {
                tracing::info!("Provider no longer accepts the stored session");
                self.deactivate().await;
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    fn subscribe_to_auth_changes(&self, callback: AuthChangeCallback) -> Subscription {
        self.events.subscribe(callback)
    }
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

impl<'a> From<&'a Credentials> for PasswordGrant<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            email: credentials.email().as_str(),
            password: credentials.expose_password(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RefreshTokenGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserResponse> for User {
    fn from(user: UserResponse) -> Self {
        User::new(user.id, user.email.unwrap_or_default())
    }
}

/// Token grant response. Sign-up that awaits email confirmation returns a
/// bare user without tokens.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: Option<UserResponse>,
}

impl TokenResponse {
    fn into_session(self, now: i64) -> Option<Session> {
        let expires_at = self
            .expires_at
            .or_else(|| {
                self.expires_in
                    .map(|expires_in| now.saturating_add(expires_in))
            });

        Some(Session::new(
            self.access_token?,
            self.refresh_token?,
            expires_at,
            self.user?.into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use fake::{Fake, faker::internet::en::SafeEmail};
    use serde_json::json;
    use tether_core::{ErrorCode, NetworkFailure, SignInInput};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path, query_param},
    };

    use super::*;
    use crate::persistence::InMemorySecureStorage;

    const API_KEY: &str = "anon-key";

    fn repository(server: &MockServer) -> HttpAuthRepository {
        let http_client = Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        HttpAuthRepository::new(&server.uri(), Secret::new(API_KEY.to_string()), http_client)
            .unwrap()
    }

    fn credentials(email: &str) -> Credentials {
        SignInInput::new(email, "password123").validate().unwrap()
    }

    fn token_body(access_token: &str, email: &str) -> serde_json::Value {
        json!({
            "access_token": access_token,
            "refresh_token": format!("{access_token}-refresh"),
            "expires_in": 3600,
            "token_type": "bearer",
            "user": { "id": "user-1", "email": email }
        })
    }

    fn session(access_token: &str, expires_at: i64) -> Session {
        Session::new(
            access_token,
            format!("{access_token}-refresh"),
            Some(expires_at),
            User::new("user-1", "user@example.com"),
        )
    }

    fn record_events(
        repository: &HttpAuthRepository,
    ) -> (Subscription, Arc<Mutex<Vec<Option<Session>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let subscription = repository.subscribe_to_auth_changes(Arc::new(move |session| {
            sink.lock().unwrap().push(session);
        }));
        (subscription, seen)
    }

    #[tokio::test]
    async fn test_sign_in_sends_password_grant() {
        let server = MockServer::start().await;
        let email: String = SafeEmail().fake();
        let email = email.to_lowercase();

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header(API_KEY_HEADER, API_KEY))
            .and(body_json(json!({ "email": email, "password": "password123" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-1", &email)))
            .expect(1)
            .mount(&server)
            .await;

        let repository = repository(&server);
        let (_subscription, seen) = record_events(&repository);
        let before = Utc::now().timestamp();

        let session = repository.sign_in(&credentials(&email)).await.unwrap();

        assert_eq!(session.access_token, "access-1");
        assert_eq!(session.refresh_token, "access-1-refresh");
        assert_eq!(session.user, User::new("user-1", email));
        let expires_at = session.expires_at.unwrap();
        assert!(expires_at >= before + 3600 && expires_at <= before + 3602);
        assert_eq!(*seen.lock().unwrap(), vec![Some(session)]);
    }

    #[tokio::test]
    async fn test_sign_in_rejected_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let error = repository(&server)
            .sign_in(&credentials("user@example.com"))
            .await
            .unwrap_err();

        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), "Invalid login credentials");
    }

    #[tokio::test]
    async fn test_sign_in_timeout_maps_to_network_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(token_body("late", "user@example.com"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let error = repository(&server)
            .sign_in(&credentials("user@example.com"))
            .await
            .unwrap_err();

        assert_eq!(error.code(), ErrorCode::Network);
        assert!(matches!(
            error,
            AppError::Network {
                failure: NetworkFailure::Timeout,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_provider_maps_to_connection_failure() {
        let repository = HttpAuthRepository::new(
            "http://127.0.0.1:1",
            Secret::new(API_KEY.to_string()),
            Client::new(),
        )
        .unwrap();
        let error = repository
            .sign_in(&credentials("user@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            AppError::Network {
                failure: NetworkFailure::Connection,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_sign_up_existing_account_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "code": 422,
                "error_code": "user_already_exists",
                "msg": "User already registered"
            })))
            .mount(&server)
            .await;

        let error = repository(&server)
            .sign_up(&credentials("taken@example.com"))
            .await
            .unwrap_err();

        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), "User already registered");
    }

    #[tokio::test]
    async fn test_sign_up_without_session_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "user-2",
                "email": "pending@example.com"
            })))
            .mount(&server)
            .await;

        let error = repository(&server)
            .sign_up(&credentials("pending@example.com"))
            .await
            .unwrap_err();

        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_refresh_without_session_fails() {
        let server = MockServer::start().await;

        let error = repository(&server).refresh_session().await.unwrap_err();

        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_session_then_refresh_rotates_tokens() {
        let server = MockServer::start().await;
        let expired = session("stale", Utc::now().timestamp() - 60);

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "refresh_token"))
            .and(body_json(json!({ "refresh_token": "stale-refresh" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(token_body("fresh", "user@example.com")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let repository = repository(&server);
        let adopted = repository.set_session(&expired).await.unwrap();
        assert_eq!(adopted, expired);

        let (_subscription, seen) = record_events(&repository);
        let refreshed = repository.refresh_session().await.unwrap();

        assert_eq!(refreshed.access_token, "fresh");
        assert_eq!(refreshed.refresh_token, "fresh-refresh");
        assert_eq!(*seen.lock().unwrap(), vec![Some(refreshed)]);
    }

    #[tokio::test]
    async fn test_rejected_refresh_signs_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error_description": "Invalid Refresh Token: Refresh Token Not Found"
            })))
            .mount(&server)
            .await;

        let repository = repository(&server);
        repository
            .set_session(&session("stale", Utc::now().timestamp() - 60))
            .await
            .unwrap();
        let (_subscription, seen) = record_events(&repository);

        let error = repository.refresh_session().await.unwrap_err();

        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(*seen.lock().unwrap(), vec![None]);
        assert_eq!(repository.get_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_huge_expires_in_saturates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "expires_in": i64::MAX,
                "user": { "id": "user-1", "email": "user@example.com" }
            })))
            .mount(&server)
            .await;

        let session = repository(&server)
            .sign_in(&credentials("user@example.com"))
            .await
            .unwrap();

        assert_eq!(session.expires_at, Some(i64::MAX));
        assert!(!session.is_expired_at(Utc::now()));
    }

    #[tokio::test]
    async fn test_set_session_validates_live_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer revoked"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "msg": "invalid JWT"
            })))
            .mount(&server)
            .await;

        let error = repository(&server)
            .set_session(&session("revoked", Utc::now().timestamp() + 3600))
            .await
            .unwrap_err();

        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_get_session_confirms_with_provider() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "user-1",
                "email": "renamed@example.com"
            })))
            .mount(&server)
            .await;

        let repository = repository(&server);
        assert_eq!(repository.get_session().await.unwrap(), None);

        let live = session("live", Utc::now().timestamp() + 3600);
        repository.set_session(&live).await.unwrap();
        let confirmed = repository.get_session().await.unwrap().unwrap();

        assert_eq!(confirmed.access_token, "live");
        assert_eq!(confirmed.user.email, "renamed@example.com");
    }

    #[tokio::test]
    async fn test_get_session_drops_revoked_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user-1" })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let repository = repository(&server);
        repository
            .set_session(&session("live", Utc::now().timestamp() + 3600))
            .await
            .unwrap();
        let (_subscription, seen) = record_events(&repository);

        assert_eq!(repository.get_session().await.unwrap(), None);
        assert_eq!(*seen.lock().unwrap(), vec![None]);
    }

    #[tokio::test]
    async fn test_get_session_surfaces_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user-1" })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let repository = repository(&server);
        repository
            .set_session(&session("live", Utc::now().timestamp() + 3600))
            .await
            .unwrap();

        let error = repository.get_session().await.unwrap_err();
        assert_eq!(error.code(), ErrorCode::Unknown);
    }

    #[tokio::test]
    async fn test_sign_out_clears_even_when_token_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user-1" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let repository = repository(&server);
        repository
            .set_session(&session("live", Utc::now().timestamp() + 3600))
            .await
            .unwrap();
        let (_subscription, seen) = record_events(&repository);

        repository.sign_out().await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![None]);
        assert_eq!(repository.get_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_out_without_session_skips_provider() {
        let server = MockServer::start().await;

        repository(&server).sign_out().await.unwrap();

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_session_survives_restart_through_storage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(token_body("kept", "user@example.com")),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer kept"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "user-1",
                "email": "user@example.com"
            })))
            .mount(&server)
            .await;

        let storage: Arc<dyn SecureStorage> = Arc::new(InMemorySecureStorage::new());
        repository(&server)
            .with_storage(storage.clone())
            .sign_in(&credentials("user@example.com"))
            .await
            .unwrap();

        let restarted = repository(&server).with_storage(storage);
        let resumed = restarted.get_session().await.unwrap().unwrap();

        assert_eq!(resumed.access_token, "kept");
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let error = HttpAuthRepository::new(
            "not a url",
            Secret::new(API_KEY.to_string()),
            Client::new(),
        )
        .err()
        .unwrap();

        assert_eq!(error.code(), ErrorCode::Validation);
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let repository = HttpAuthRepository::new(
            "https://project.example.com/gateway",
            Secret::new(API_KEY.to_string()),
            Client::new(),
        )
        .unwrap();

        assert_eq!(
            repository.endpoint(USER_PATH).unwrap().as_str(),
            "https://project.example.com/gateway/auth/v1/user"
        );
    }
}
