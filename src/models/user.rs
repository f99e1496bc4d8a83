//! Identity types returned by the hosted auth service.

use serde::{Deserialize, Serialize};

/// The signed-in user as cached in the cookie session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens for one signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds after which the access token must be refreshed
    pub expires_at: i64,
    pub user: AuthUser,
}

impl AuthSession {
    /// Whether the access token has expired at `now` (unix seconds), with a small margin.
    pub fn is_expired(&self, now: i64) -> bool {
        now + 10 >= self.expires_at
    }
}

/// Observable session state consumed by the route guard and views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<AuthUser>,
    pub loading: bool,
}

impl SessionState {
    pub fn signed_in(user: AuthUser) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn resolving() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}
