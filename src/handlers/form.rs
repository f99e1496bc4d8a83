//! Activity report form.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{AuthSession, SubmissionInput};
use crate::views::{self, FormView};
use crate::AppState;

/// Generic alert shown above the backend's own message when an insert fails.
pub const SUBMIT_FAILED_MESSAGE: &str = "फॉर्म सबमिट करने में त्रुटि। कृपया पुनः प्रयास करें।";

#[derive(Debug, Default, Deserialize)]
pub struct FormQuery {
    #[serde(default)]
    pub submitted: Option<String>,
}

/// GET /form - Empty form, with the success overlay after a submission.
pub async fn show_form(
    Extension(auth): Extension<AuthSession>,
    Query(query): Query<FormQuery>,
) -> Response {
    let view = FormView {
        user_email: auth.user.email,
        submitted: query.submitted.as_deref() == Some("1"),
        ..Default::default()
    };
    views::form_page(&view).into_response()
}

/// POST /form - Validate and insert one report.
pub async fn submit_form(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Form(input): Form<SubmissionInput>,
) -> Response {
    let mut record = match input.validate() {
        Ok(record) => record,
        Err(errors) => {
            let view = FormView {
                user_email: auth.user.email,
                input,
                errors,
                ..Default::default()
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, views::form_page(&view)).into_response();
        }
    };

    record.user_email = auth.user.email.clone();
    record.user_id = Some(auth.user.id.clone());

    let inserted = state
        .backend
        .insert_submission(
            &state.config.submissions_table,
            &record,
            Some(&auth.access_token),
        )
        .await;

    match inserted {
        Ok(row) => {
            tracing::info!(id = %row.id, district = %record.district, "Submission stored");
            Redirect::to("/form?submitted=1").into_response()
        }
        Err(err) => {
            let err = AppError::from(err);
            // Entered data stays in the form for another attempt.
            let view = FormView {
                user_email: auth.user.email,
                input,
                alert: Some(format!("{} {}", SUBMIT_FAILED_MESSAGE, err.user_facing())),
                ..Default::default()
            };
            (err.status_code(), views::form_page(&view)).into_response()
        }
    }
}
