//! Error handling module for the activity portal.
//!
//! Provides centralized error types with mapping to HTTP status codes and rendered error pages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::backend::BackendError;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const AUTH_ERROR: &str = "AUTH_ERROR";
    pub const BACKEND_ERROR: &str = "BACKEND_ERROR";
    pub const SESSION_ERROR: &str = "SESSION_ERROR";
    pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Admin credential mismatch; never carries detail
    Unauthorized(String),
    /// Resource not found
    NotFound(String),
    /// Client-side validation error, caught before any backend call
    Validation(String),
    /// Rejection from the hosted auth service, message kept verbatim
    Auth(String),
    /// Data error from the hosted backend (insert/select failure)
    Backend {
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },
    /// Cookie session store failure
    Session(String),
    /// Missing or malformed configuration
    Configuration(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Backend { .. } => StatusCode::BAD_GATEWAY,
            AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Auth(_) => codes::AUTH_ERROR,
            AppError::Backend { .. } => codes::BACKEND_ERROR,
            AppError::Session(_) => codes::SESSION_ERROR,
            AppError::Configuration(_) => codes::CONFIGURATION_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Auth(msg) => msg.clone(),
            AppError::Backend { message, .. } => message.clone(),
            AppError::Session(msg) => msg.clone(),
            AppError::Configuration(msg) => msg.clone(),
        }
    }

    /// Message plus the backend's details and hint, for alert banners.
    pub fn user_facing(&self) -> String {
        match self {
            AppError::Backend {
                message,
                details,
                hint,
            } => {
                let mut text = message.clone();
                for extra in [details, hint].into_iter().flatten() {
                    text.push_str(" (");
                    text.push_str(extra);
                    text.push(')');
                }
                text
            }
            other => other.message(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        tracing::error!("Backend error: {}", err);
        match err {
            BackendError::Api {
                message,
                details,
                hint,
                ..
            } => AppError::Backend {
                message,
                details,
                hint,
            },
            other => AppError::Backend {
                message: other.to_string(),
                details: None,
                hint: None,
            },
        }
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        tracing::error!("Session error: {:?}", err);
        AppError::Session(format!("Session error: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let page = crate::views::error_page(status, self.error_code(), &self.user_facing());
        (status, page).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_api_error_keeps_details_and_hint() {
        let err: AppError = BackendError::Api {
            status: StatusCode::FORBIDDEN,
            message: "new row violates row-level security policy".to_string(),
            details: None,
            hint: Some("check the insert policy".to_string()),
            code: Some("42501".to_string()),
        }
        .into();

        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_code(), codes::BACKEND_ERROR);
        assert_eq!(
            err.user_facing(),
            "new row violates row-level security policy (check the insert policy)"
        );
    }

    #[test]
    fn test_display_includes_code() {
        let err = AppError::Auth("Invalid login credentials".to_string());
        assert_eq!(err.to_string(), "AUTH_ERROR: Invalid login credentials");
        assert_eq!(err.user_facing(), "Invalid login credentials");
    }
}
