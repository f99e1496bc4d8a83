//! Route protection for the report form and the admin dashboard.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::models::SessionState;
use crate::session::{ClientState, Resolved, SessionProvider};
use crate::{views, AppState};

/// Public landing path, where signed-out visitors are sent.
pub const LANDING_PATH: &str = "/";
/// Admin login path, where visitors without the admin flag are sent.
pub const ADMIN_LOGIN_PATH: &str = "/admin";

/// What a protected route should do for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Placeholder,
    Redirect(&'static str),
    Render,
}

/// Loading wins over everything; otherwise a user is required.
pub fn decide(state: &SessionState) -> GuardDecision {
    if state.loading {
        GuardDecision::Placeholder
    } else if state.user.is_none() {
        GuardDecision::Redirect(LANDING_PATH)
    } else {
        GuardDecision::Render
    }
}

/// Middleware for routes that need a signed-in user.
///
/// On success the resolved `AuthSession` is available to handlers as an extension.
pub async fn require_user(
    State(state): State<AppState>,
    client: ClientState,
    mut request: Request,
    next: Next,
) -> Response {
    let provider = SessionProvider::new(&state.backend, &state.events, &client);
    let resolved = match provider.resolve().await {
        Ok(resolved) => resolved,
        Err(e) => return e.into_response(),
    };

    match (decide(&resolved.state()), resolved) {
        (GuardDecision::Render, Resolved::SignedIn(auth)) => {
            request.extensions_mut().insert(auth);
            next.run(request).await
        }
        (GuardDecision::Placeholder, _) => views::placeholder().into_response(),
        (GuardDecision::Redirect(to), _) => Redirect::to(to).into_response(),
        (GuardDecision::Render, _) => Redirect::to(LANDING_PATH).into_response(),
    }
}

/// Middleware for routes behind the admin flag.
pub async fn require_admin(client: ClientState, request: Request, next: Next) -> Response {
    match client.admin_flag().await {
        Ok(true) => next.run(request).await,
        Ok(false) => Redirect::to(ADMIN_LOGIN_PATH).into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthUser;

    fn user() -> AuthUser {
        AuthUser {
            id: "user-1".to_string(),
            email: Some("vol@example.com".to_string()),
        }
    }

    #[test]
    fn test_loading_shows_placeholder_regardless_of_user() {
        assert_eq!(decide(&SessionState::resolving()), GuardDecision::Placeholder);
        let state = SessionState {
            user: Some(user()),
            loading: true,
        };
        assert_eq!(decide(&state), GuardDecision::Placeholder);
    }

    #[test]
    fn test_no_user_redirects_to_landing() {
        assert_eq!(
            decide(&SessionState::signed_out()),
            GuardDecision::Redirect(LANDING_PATH)
        );
    }

    #[test]
    fn test_user_renders() {
        assert_eq!(decide(&SessionState::signed_in(user())), GuardDecision::Render);
    }
}
