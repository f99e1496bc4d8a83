//! Admin login, dashboard and logout.

use std::time::Instant;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::auth::{verify_admin, INVALID_CREDENTIALS_MESSAGE};
use crate::errors::AppError;
use crate::guard::ADMIN_LOGIN_PATH;
use crate::models::DashboardStats;
use crate::session::ClientState;
use crate::views::{self, AdminLoginView, DashboardView};
use crate::AppState;

pub const DASHBOARD_PATH: &str = "/admin/dashboard";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load submissions. Please try again.";

#[derive(Debug, Default, Deserialize)]
pub struct AdminLoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub selected: Option<String>,
}

/// GET /admin - Login form, or straight to the dashboard when already admitted.
pub async fn admin_login_form(client: ClientState) -> Result<Response, AppError> {
    if client.admin_flag().await? {
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }
    Ok(views::admin_login_page(&AdminLoginView::default()).into_response())
}

/// POST /admin - Check the pair against configuration.
pub async fn admin_login(
    State(state): State<AppState>,
    client: ClientState,
    Form(form): Form<AdminLoginForm>,
) -> Result<Response, AppError> {
    if verify_admin(state.config.admin.as_ref(), &form.username, &form.password) {
        client.set_admin_flag().await?;
        tracing::info!("Admin signed in");
        return Ok(views::redirecting_page(DASHBOARD_PATH).into_response());
    }

    tracing::warn!("Rejected admin login attempt");
    let err = AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string());
    let view = AdminLoginView {
        username: form.username,
        error: Some(err.message()),
    };
    Ok((err.status_code(), views::admin_login_page(&view)).into_response())
}

/// GET /admin/dashboard - All submissions, newest first.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let started = Instant::now();
    let fetched = state
        .backend
        .list_submissions(&state.config.submissions_table, None)
        .await;

    let (rows, error) = match fetched {
        Ok(rows) => {
            tracing::debug!(
                count = rows.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Loaded submissions"
            );
            (rows, None)
        }
        Err(err) => {
            tracing::error!("Failed to load submissions: {}", err);
            (Vec::new(), Some(LOAD_FAILED_MESSAGE.to_string()))
        }
    };

    let selected = query
        .selected
        .as_deref()
        .and_then(|id| rows.iter().find(|row| row.id.to_string() == id));

    let view = DashboardView {
        rows: &rows,
        stats: DashboardStats::from_rows(&rows),
        error,
        selected,
    };
    views::dashboard_page(&view).into_response()
}

/// POST /admin/logout - Drop the admin flag.
pub async fn admin_logout(client: ClientState) -> Result<Redirect, AppError> {
    client.clear_admin_flag().await?;
    tracing::info!("Admin signed out");
    Ok(Redirect::to(ADMIN_LOGIN_PATH))
}
