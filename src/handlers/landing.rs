//! Public landing page: sign-in and sign-up.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::backend::SignUpOutcome;
use crate::errors::AppError;
use crate::guard::LANDING_PATH;
use crate::session::{ClientState, Resolved, SessionProvider};
use crate::views::{self, AuthMode, LandingView};
use crate::AppState;

/// Path of the report form, where signed-in users land.
pub const FORM_PATH: &str = "/form";

pub const MIN_PASSWORD_CHARS: usize = 6;
pub const SIGN_UP_NOTICE: &str =
    "Account created! Please check your email to verify your account, then sign in.";

#[derive(Debug, Default, Deserialize)]
pub struct LandingQuery {
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl CredentialsForm {
    pub fn mode(&self) -> AuthMode {
        AuthMode::from_param(self.mode.as_deref())
    }

    /// Checks done before the auth service is contacted.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::Validation("Please fill in all fields".to_string()));
        }
        if self.mode() == AuthMode::SignUp {
            if self.password != self.confirm_password {
                return Err(AppError::Validation("Passwords do not match".to_string()));
            }
            if self.password.chars().count() < MIN_PASSWORD_CHARS {
                return Err(AppError::Validation(format!(
                    "Password must be at least {} characters",
                    MIN_PASSWORD_CHARS
                )));
            }
        }
        Ok(())
    }
}

/// GET / - Landing page; signed-in users go straight to the form.
pub async fn landing(
    State(state): State<AppState>,
    client: ClientState,
    Query(query): Query<LandingQuery>,
) -> Result<Response, AppError> {
    let provider = SessionProvider::new(&state.backend, &state.events, &client);
    match provider.resolve().await? {
        Resolved::SignedIn(_) => Ok(Redirect::to(FORM_PATH).into_response()),
        Resolved::Resolving => Ok(views::placeholder().into_response()),
        Resolved::SignedOut => {
            let view = LandingView {
                mode: AuthMode::from_param(query.mode.as_deref()),
                ..Default::default()
            };
            Ok(views::landing_page(&view).into_response())
        }
    }
}

/// POST / - Sign in or sign up, depending on the form's mode.
pub async fn authenticate(
    State(state): State<AppState>,
    client: ClientState,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let mode = form.mode();
    let email = form.email.trim().to_string();

    if let Err(err) = form.validate() {
        return Ok(rejected(mode, email, err));
    }

    let provider = SessionProvider::new(&state.backend, &state.events, &client);
    let attempt = match mode {
        AuthMode::SignIn => provider.sign_in(&email, &form.password).await.map(|_| true),
        AuthMode::SignUp => provider
            .sign_up(&email, &form.password)
            .await
            .map(|outcome| matches!(outcome, SignUpOutcome::SignedIn(_))),
    };

    match attempt {
        Ok(true) => Ok(Redirect::to(FORM_PATH).into_response()),
        Ok(false) => {
            tracing::info!("Account created, awaiting email confirmation");
            let view = LandingView {
                mode: AuthMode::SignIn,
                email,
                error: None,
                notice: Some(SIGN_UP_NOTICE.to_string()),
            };
            Ok(views::landing_page(&view).into_response())
        }
        Err(err @ (AppError::Auth(_) | AppError::Backend { .. })) => {
            tracing::warn!("Authentication failed: {}", err);
            Ok(rejected(mode, email, err))
        }
        Err(err) => Err(err),
    }
}

/// POST /logout - Sign out and return to the landing page.
pub async fn logout(
    State(state): State<AppState>,
    client: ClientState,
) -> Result<Redirect, AppError> {
    SessionProvider::new(&state.backend, &state.events, &client)
        .sign_out()
        .await?;
    Ok(Redirect::to(LANDING_PATH))
}

fn rejected(mode: AuthMode, email: String, err: AppError) -> Response {
    let status = err.status_code();
    let view = LandingView {
        mode,
        email,
        error: Some(err.user_facing()),
        notice: None,
    };
    (status, views::landing_page(&view)).into_response()
}
