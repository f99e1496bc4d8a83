//! Configuration module for the activity portal.
//!
//! All configuration is loaded from environment variables with sensible defaults.
//! The hosted backend address and key have no default and must be provided.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::errors::AppError;

/// Admin credentials checked on the server. Never compiled into the binary.
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Supabase project (e.g. https://xyz.supabase.co)
    pub supabase_url: String,
    /// Public (anon) API key of the Supabase project
    pub supabase_anon_key: String,
    /// Table receiving the activity reports
    pub submissions_table: String,
    /// Admin login pair, `None` disables the admin area
    pub admin: Option<AdminCredentials>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Timeout applied to every backend request
    pub http_timeout: Duration,
    /// Mark the session cookie as `Secure`
    pub secure_cookies: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let supabase_url = first_var(&["SUPABASE_URL", "VITE_SUPABASE_URL"]).ok_or_else(|| {
            AppError::Configuration("Missing SUPABASE_URL environment variable".to_string())
        })?;
        let supabase_url = supabase_url.trim_end_matches('/').to_string();
        url::Url::parse(&supabase_url).map_err(|e| {
            AppError::Configuration(format!("Invalid SUPABASE_URL {}: {}", supabase_url, e))
        })?;

        let supabase_anon_key = first_var(&["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"])
            .ok_or_else(|| {
                AppError::Configuration(
                    "Missing SUPABASE_ANON_KEY environment variable".to_string(),
                )
            })?;

        let submissions_table = env::var("PARYAVARAN_SUBMISSIONS_TABLE")
            .unwrap_or_else(|_| "submissions".to_string());

        let admin = match (
            non_empty_var("PARYAVARAN_ADMIN_USERNAME"),
            non_empty_var("PARYAVARAN_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(AdminCredentials { username, password }),
            _ => None,
        };

        let bind_addr = env::var("PARYAVARAN_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = bind_addr.parse().map_err(|_| {
            AppError::Configuration(format!("Invalid PARYAVARAN_BIND_ADDR format: {}", bind_addr))
        })?;

        let log_level = env::var("PARYAVARAN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let http_timeout = match env::var("PARYAVARAN_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|_| {
                AppError::Configuration(format!("Invalid PARYAVARAN_HTTP_TIMEOUT_SECS: {}", raw))
            })?,
            Err(_) => Duration::from_secs(15),
        };

        let secure_cookies = env::var("PARYAVARAN_SECURE_COOKIES")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            submissions_table,
            admin,
            bind_addr,
            log_level,
            http_timeout,
            secure_cookies,
        })
    }
}

fn first_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| non_empty_var(name))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
