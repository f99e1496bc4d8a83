//! Session handling for signed-in users and the admin area.
//!
//! [`ClientState`] is the only place that reads or writes per-browser state; it wraps
//! the cookie-backed `tower_sessions::Session` with typed accessors. [`SessionProvider`]
//! layers the hosted auth service on top of it and publishes [`SessionEvent`]s.

mod store;

pub use store::SweepingStore;

use axum::{extract::FromRequestParts, http::request::Parts, http::StatusCode};
use chrono::Utc;
use tokio::sync::broadcast;
use tower_sessions::Session;

use crate::backend::{BackendClient, BackendError, SignUpOutcome};
use crate::errors::AppError;
use crate::models::{AuthSession, SessionState};

/// Key holding the serialized [`AuthSession`].
pub const AUTH_SESSION_KEY: &str = "auth_session";
/// Key holding the admin marker; independent of the user session.
pub const ADMIN_FLAG_KEY: &str = "admin_auth";

/// Typed view over the per-browser session store.
#[derive(Debug, Clone)]
pub struct ClientState {
    session: Session,
}

impl ClientState {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn auth_session(&self) -> Result<Option<AuthSession>, AppError> {
        Ok(self.session.get(AUTH_SESSION_KEY).await?)
    }

    pub async fn set_auth_session(&self, auth: &AuthSession) -> Result<(), AppError> {
        // New identity, new session id.
        self.session.cycle_id().await?;
        self.session.insert(AUTH_SESSION_KEY, auth).await?;
        Ok(())
    }

    pub async fn clear_auth_session(&self) -> Result<(), AppError> {
        self.session.remove::<AuthSession>(AUTH_SESSION_KEY).await?;
        Ok(())
    }

    pub async fn admin_flag(&self) -> Result<bool, AppError> {
        Ok(self
            .session
            .get::<bool>(ADMIN_FLAG_KEY)
            .await?
            .unwrap_or(false))
    }

    pub async fn set_admin_flag(&self) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        self.session.insert(ADMIN_FLAG_KEY, true).await?;
        Ok(())
    }

    pub async fn clear_admin_flag(&self) -> Result<(), AppError> {
        self.session.remove::<bool>(ADMIN_FLAG_KEY).await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for ClientState
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        Ok(Self::new(session))
    }
}

/// Change notifications for the signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { user_id: String },
    Refreshed { user_id: String },
    Expired { user_id: String },
    SignedOut { user_id: Option<String> },
}

/// Broadcast channel of [`SessionEvent`]s. Sending never fails for lack of subscribers.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }

    /// Log every event until the channel closes.
    pub fn spawn_logger(&self) -> tokio::task::JoinHandle<()> {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => tracing::info!(?event, "Session changed"),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Session event logger skipped {} events", skipped)
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

/// The stored session after rehydration.
#[derive(Debug, Clone)]
pub enum Resolved {
    SignedIn(AuthSession),
    SignedOut,
    /// A session is stored but the backend could not be reached to renew it.
    Resolving,
}

impl Resolved {
    pub fn state(&self) -> SessionState {
        match self {
            Resolved::SignedIn(auth) => SessionState::signed_in(auth.user.clone()),
            Resolved::SignedOut => SessionState::signed_out(),
            Resolved::Resolving => SessionState::resolving(),
        }
    }
}

/// Sign-in, sign-up and sign-out for one request, backed by the hosted auth service.
pub struct SessionProvider<'a> {
    backend: &'a BackendClient,
    events: &'a SessionEvents,
    client: &'a ClientState,
}

impl<'a> SessionProvider<'a> {
    pub fn new(backend: &'a BackendClient, events: &'a SessionEvents, client: &'a ClientState) -> Self {
        Self {
            backend,
            events,
            client,
        }
    }

    /// Rehydrate the stored session, renewing an expired access token.
    pub async fn resolve(&self) -> Result<Resolved, AppError> {
        let Some(stored) = self.client.auth_session().await? else {
            return Ok(Resolved::SignedOut);
        };

        if !stored.is_expired(Utc::now().timestamp()) {
            return Ok(Resolved::SignedIn(stored));
        }

        match self.backend.refresh_session(&stored.refresh_token).await {
            Ok(renewed) => {
                self.client.set_auth_session(&renewed).await?;
                self.events.emit(SessionEvent::Refreshed {
                    user_id: renewed.user.id.clone(),
                });
                Ok(Resolved::SignedIn(renewed))
            }
            Err(err) if err.is_transport() => {
                tracing::warn!("Could not renew session: {}", err);
                Ok(Resolved::Resolving)
            }
            Err(err) => {
                tracing::info!("Stored session rejected by backend: {}", err);
                self.client.clear_auth_session().await?;
                self.events.emit(SessionEvent::Expired {
                    user_id: stored.user.id,
                });
                Ok(Resolved::SignedOut)
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let auth = self
            .backend
            .sign_in_with_password(email, password)
            .await
            .map_err(auth_error)?;
        self.store(&auth).await?;
        Ok(auth)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AppError> {
        let outcome = self
            .backend
            .sign_up(email, password)
            .await
            .map_err(auth_error)?;
        if let SignUpOutcome::SignedIn(auth) = &outcome {
            self.store(auth).await?;
        }
        Ok(outcome)
    }

    /// Clear the local session. Backend revocation is best effort.
    pub async fn sign_out(&self) -> Result<(), AppError> {
        let stored = self.client.auth_session().await?;
        if let Some(auth) = &stored {
            if let Err(err) = self.backend.sign_out(&auth.access_token).await {
                tracing::warn!("Backend sign-out failed: {}", err);
            }
        }
        self.client.clear_auth_session().await?;
        self.events.emit(SessionEvent::SignedOut {
            user_id: stored.map(|auth| auth.user.id),
        });
        Ok(())
    }

    async fn store(&self, auth: &AuthSession) -> Result<(), AppError> {
        self.client.set_auth_session(auth).await?;
        self.events.emit(SessionEvent::SignedIn {
            user_id: auth.user.id.clone(),
        });
        Ok(())
    }
}

/// Auth rejections are shown to the user verbatim; transport failures are not auth errors.
fn auth_error(err: BackendError) -> AppError {
    match err {
        BackendError::Api { message, .. } => AppError::Auth(message),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::models::AuthUser;

    fn client_state() -> ClientState {
        ClientState::new(Session::new(None, Arc::new(SweepingStore::new()), None))
    }

    fn backend(server: &MockServer) -> BackendClient {
        BackendClient::new(server.uri(), "test-anon-key", Duration::from_secs(5)).unwrap()
    }

    fn stored(expires_at: i64) -> AuthSession {
        AuthSession {
            access_token: "old-access".to_string(),
            refresh_token: "old-refresh".to_string(),
            expires_at,
            user: AuthUser {
                id: "user-1".to_string(),
                email: Some("vol@example.com".to_string()),
            },
        }
    }

    #[tokio::test]
    async fn test_admin_flag_accessors() {
        let client = client_state();
        assert!(!client.admin_flag().await.unwrap());
        client.set_admin_flag().await.unwrap();
        assert!(client.admin_flag().await.unwrap());
        client.clear_admin_flag().await.unwrap();
        assert!(!client.admin_flag().await.unwrap());
    }

    #[tokio::test]
    async fn test_admin_flag_is_independent_of_user_session() {
        let client = client_state();
        client.set_auth_session(&stored(i64::MAX)).await.unwrap();
        assert!(!client.admin_flag().await.unwrap());
        client.set_admin_flag().await.unwrap();
        client.clear_auth_session().await.unwrap();
        assert!(client.admin_flag().await.unwrap());
    }

    #[tokio::test]
    async fn test_resolve_signed_out_without_stored_session() {
        let server = MockServer::start().await;
        let backend = backend(&server);
        let events = SessionEvents::new(8);
        let client = client_state();
        let provider = SessionProvider::new(&backend, &events, &client);

        assert_eq!(provider.resolve().await.unwrap().state(), SessionState::signed_out());
    }

    #[tokio::test]
    async fn test_sign_in_stores_session_and_notifies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "expires_in": 3600,
                "user": { "id": "user-1", "email": "vol@example.com" }
            })))
            .mount(&server)
            .await;

        let backend = backend(&server);
        let events = SessionEvents::new(8);
        let mut rx = events.subscribe();
        let client = client_state();
        let provider = SessionProvider::new(&backend, &events, &client);

        provider.sign_in("vol@example.com", "hunter22").await.unwrap();

        let state = provider.resolve().await.unwrap().state();
        assert_eq!(state.user.unwrap().id, "user-1");
        assert_eq!(
            rx.recv().await.unwrap(),
            SessionEvent::SignedIn {
                user_id: "user-1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_sign_in_rejection_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Email not confirmed"
            })))
            .mount(&server)
            .await;

        let backend = backend(&server);
        let events = SessionEvents::new(8);
        let client = client_state();
        let provider = SessionProvider::new(&backend, &events, &client);

        let err = provider.sign_in("vol@example.com", "hunter22").await.unwrap_err();
        assert!(matches!(err, AppError::Auth(ref m) if m == "Email not confirmed"));
        assert!(client.auth_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_refreshed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "new-access",
                "refresh_token": "new-refresh",
                "expires_in": 3600,
                "user": { "id": "user-1", "email": "vol@example.com" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = backend(&server);
        let events = SessionEvents::new(8);
        let client = client_state();
        client.set_auth_session(&stored(0)).await.unwrap();
        let provider = SessionProvider::new(&backend, &events, &client);

        match provider.resolve().await.unwrap() {
            Resolved::SignedIn(auth) => assert_eq!(auth.access_token, "new-access"),
            other => panic!("unexpected resolution: {other:?}"),
        }
        let kept = client.auth_session().await.unwrap().unwrap();
        assert_eq!(kept.refresh_token, "new-refresh");
    }

    #[tokio::test]
    async fn test_rejected_refresh_signs_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "msg": "Invalid Refresh Token: Refresh Token Not Found"
            })))
            .mount(&server)
            .await;

        let backend = backend(&server);
        let events = SessionEvents::new(8);
        let client = client_state();
        client.set_auth_session(&stored(0)).await.unwrap();
        let provider = SessionProvider::new(&backend, &events, &client);

        assert_eq!(provider.resolve().await.unwrap().state(), SessionState::signed_out());
        assert!(client.auth_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_refresh_response_signs_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let backend = backend(&server);
        let events = SessionEvents::new(8);
        let client = client_state();
        client.set_auth_session(&stored(0)).await.unwrap();
        let provider = SessionProvider::new(&backend, &events, &client);

        assert_eq!(provider.resolve().await.unwrap().state(), SessionState::signed_out());
        assert!(client.auth_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_backend_leaves_session_resolving() {
        // Nothing listens on port 9 of localhost.
        let backend =
            BackendClient::new("http://127.0.0.1:9", "test-anon-key", Duration::from_secs(2))
                .unwrap();
        let events = SessionEvents::new(8);
        let client = client_state();
        client.set_auth_session(&stored(0)).await.unwrap();
        let provider = SessionProvider::new(&backend, &events, &client);

        assert_eq!(provider.resolve().await.unwrap().state(), SessionState::resolving());
        assert!(client.auth_session().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sign_out_clears_even_when_backend_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let backend = backend(&server);
        let events = SessionEvents::new(8);
        let mut rx = events.subscribe();
        let client = client_state();
        client.set_auth_session(&stored(i64::MAX)).await.unwrap();
        let provider = SessionProvider::new(&backend, &events, &client);

        provider.sign_out().await.unwrap();
        assert!(client.auth_session().await.unwrap().is_none());
        assert_eq!(
            rx.recv().await.unwrap(),
            SessionEvent::SignedOut {
                user_id: Some("user-1".to_string())
            }
        );
    }
}
