//! Client for the hosted Supabase project.
//!
//! The portal owns no storage or identity: reports live in a PostgREST table and
//! users in the GoTrue auth service. Both are reached over HTTPS with the project's
//! public key in the `apikey` header.

mod auth;
mod rest;

pub use auth::SignUpOutcome;

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// Failure talking to the hosted backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("API error: {message} (Status: {status})")]
    Api {
        status: StatusCode,
        message: String,
        details: Option<String>,
        hint: Option<String>,
        code: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl BackendError {
    /// Whether the request never produced an answer from the backend.
    ///
    /// A response that arrived but could not be decoded is not a transport failure.
    pub fn is_transport(&self) -> bool {
        match self {
            BackendError::Network(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }
}

/// Error body shapes used by GoTrue (`msg`, `error_description`) and PostgREST (`message`).
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    error_code: Option<String>,
}

/// HTTP client bound to one Supabase project.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl BackendClient {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Attach the project key, and a bearer token (the user's, else the anon key).
    fn authorize(&self, request: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        let bearer = access_token.unwrap_or(&self.anon_key);
        request
            .header("apikey", &self.anon_key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", bearer))
    }
}

/// Turn a non-success response into `BackendError::Api`, keeping the backend's wording.
async fn api_error(response: Response) -> BackendError {
    let status = response.status();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error response".to_string());

    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let message = body
        .msg
        .or(body.error_description)
        .or(body.message)
        .or(body.error)
        .unwrap_or_else(|| {
            if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                text.clone()
            }
        });
    let code = body.error_code.or(body.code.map(|c| match c {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }));

    BackendError::Api {
        status,
        message,
        details: body.details,
        hint: body.hint,
        code,
    }
}
