//! GoTrue endpoints: password sign-in, sign-up, refresh and logout.

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::{api_error, BackendClient, BackendError};
use crate::models::{AuthSession, AuthUser};

/// Result of a sign-up request.
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    /// Email confirmation is disabled on the project; the user is signed in.
    SignedIn(AuthSession),
    /// The account exists but must be confirmed by email before signing in.
    ConfirmationRequired,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self) -> AuthSession {
        let expires_at = self
            .expires_at
            .unwrap_or_else(|| Utc::now().timestamp() + self.expires_in.unwrap_or(3600));
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

impl BackendClient {
    /// Exchange email and password for a session.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        let request = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        let response = self.authorize(request, None).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.into_session())
    }

    /// Register a new account.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, BackendError> {
        let request = self
            .http
            .post(self.auth_url("signup"))
            .json(&json!({ "email": email, "password": password }));

        let response = self.authorize(request, None).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        // With confirmation enabled the body is the bare user object, without tokens.
        let body: serde_json::Value = response.json().await?;
        if body.get("access_token").is_some() {
            let token: TokenResponse = serde_json::from_value(body)?;
            Ok(SignUpOutcome::SignedIn(token.into_session()))
        } else if body.get("id").is_some() || body.get("user").is_some() {
            Ok(SignUpOutcome::ConfirmationRequired)
        } else {
            Err(BackendError::UnexpectedResponse(
                "sign-up response carried neither a session nor a user".to_string(),
            ))
        }
    }

    /// Trade a refresh token for a fresh session.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, BackendError> {
        let request = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }));

        let response = self.authorize(request, None).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.into_session())
    }

    /// Revoke the session's refresh tokens on the backend.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let request = self.http.post(self.auth_url("logout"));
        let response = self.authorize(request, Some(access_token)).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }
}
