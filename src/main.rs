//! Paryavaran activity portal
//!
//! A bilingual (Hindi/English) web portal for reporting environmental conservation
//! activities, backed by a hosted Supabase project for identity and storage.

mod auth;
mod backend;
mod config;
mod errors;
mod guard;
mod handlers;
mod models;
mod session;
mod views;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use backend::BackendClient;
use config::Config;
use errors::AppError;
use session::{SessionEvents, SweepingStore};

/// How often expired sessions are removed from the store.
const SESSION_SWEEP_PERIOD: std::time::Duration = std::time::Duration::from_secs(15 * 60);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendClient>,
    pub config: Arc<Config>,
    pub events: SessionEvents,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Paryavaran activity portal");
    tracing::info!("Backend: {}", config.supabase_url);
    tracing::info!("Submissions table: {}", config.submissions_table);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.admin.is_none() {
        tracing::warn!(
            "No admin credentials configured (PARYAVARAN_ADMIN_USERNAME/PARYAVARAN_ADMIN_PASSWORD). Admin login is disabled!"
        );
    }

    let backend = Arc::new(BackendClient::new(
        config.supabase_url.as_str(),
        config.supabase_anon_key.as_str(),
        config.http_timeout,
    )?);

    let events = SessionEvents::new(64);
    let _event_logger = events.spawn_logger();

    let state = AppState {
        backend,
        config: Arc::new(config.clone()),
        events,
    };

    let sessions = SweepingStore::new();
    let _sweeper = sessions.spawn_sweeper(SESSION_SWEEP_PERIOD);

    // Build router
    let app = create_router(state, sessions);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState, store: SweepingStore) -> Router {
    let sessions = SessionManagerLayer::new(store)
        .with_secure(state.config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(12)));

    // Signed-in users only
    let user_routes = Router::new()
        .route(
            "/form",
            get(handlers::show_form).post(handlers::submit_form),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_user,
        ));

    // Admin flag required
    let admin_routes = Router::new()
        .route("/admin/dashboard", get(handlers::dashboard))
        .route_layer(middleware::from_fn(guard::require_admin));

    Router::new()
        .route("/", get(handlers::landing).post(handlers::authenticate))
        .route("/logout", post(handlers::logout))
        .route(
            "/admin",
            get(handlers::admin_login_form).post(handlers::admin_login),
        )
        .route("/admin/logout", post(handlers::admin_logout))
        .route("/health", get(health_check))
        .merge(user_routes)
        .merge(admin_routes)
        .fallback(not_found)
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found() -> AppError {
    AppError::NotFound("Page not found".to_string())
}
