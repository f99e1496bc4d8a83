//! PostgREST access to the reports table: insert one row, list all rows.

use super::{api_error, BackendClient, BackendError};
use crate::models::{NewSubmission, Submission};

impl BackendClient {
    /// Insert one report and return the stored row.
    pub async fn insert_submission(
        &self,
        table: &str,
        record: &NewSubmission,
        access_token: Option<&str>,
    ) -> Result<Submission, BackendError> {
        let request = self
            .http
            .post(self.rest_url(table))
            .header("Prefer", "return=representation")
            .json(&[record]);

        let response = self.authorize(request, access_token).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let mut rows: Vec<Submission> = response.json().await?;
        rows.pop().ok_or_else(|| {
            BackendError::UnexpectedResponse("insert returned no rows".to_string())
        })
    }

    /// Every row, newest first. Unbounded: the table is expected to stay small.
    pub async fn list_submissions(
        &self,
        table: &str,
        access_token: Option<&str>,
    ) -> Result<Vec<Submission>, BackendError> {
        let request = self
            .http
            .get(self.rest_url(table))
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        let response = self.authorize(request, access_token).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::models::{CompletedBy, SubmissionId};

    fn client(server: &MockServer) -> BackendClient {
        BackendClient::new(server.uri(), "test-anon-key", Duration::from_secs(5)).unwrap()
    }

    fn record() -> NewSubmission {
        NewSubmission {
            user_email: Some("vol@example.com".to_string()),
            user_id: Some("user-1".to_string()),
            district: "Indore".to_string(),
            place: "X".to_string(),
            completed_by: CompletedBy::Individual,
            work_description: "planted trees".to_string(),
            result: "50 saplings survived".to_string(),
            google_drive_link: None,
        }
    }

    #[tokio::test]
    async fn test_insert_submission() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/submissions"))
            .and(header("prefer", "return=representation"))
            .and(header("authorization", "Bearer access-1"))
            .and(body_json(json!([{
                "user_email": "vol@example.com",
                "user_id": "user-1",
                "district": "Indore",
                "place": "X",
                "completed_by": "व्यक्तिगत",
                "work_description": "planted trees",
                "result": "50 saplings survived",
                "google_drive_link": null
            }])))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
                "id": 7,
                "created_at": "2026-10-19T08:30:00.123456+00:00",
                "user_email": "vol@example.com",
                "district": "Indore",
                "place": "X",
                "completed_by": "व्यक्तिगत",
                "work_description": "planted trees",
                "result": "50 saplings survived",
                "google_drive_link": null
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let row = client(&server)
            .insert_submission("submissions", &record(), Some("access-1"))
            .await
            .unwrap();
        assert_eq!(row.id, SubmissionId::Number(7));
        assert!(!row.has_link());
    }

    #[tokio::test]
    async fn test_insert_failure_keeps_hint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/submissions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": "42501",
                "details": null,
                "hint": null,
                "message": "new row violates row-level security policy for table \"submissions\""
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .insert_submission("submissions", &record(), None)
            .await
            .unwrap_err();
        match err {
            BackendError::Api { status, message, code, .. } => {
                assert_eq!(status.as_u16(), 401);
                assert!(message.starts_with("new row violates"));
                assert_eq!(code.as_deref(), Some("42501"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/submissions"))
            .and(query_param("order", "created_at.desc"))
            .and(query_param("select", "*"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 2, "created_at": "2026-10-19T09:00:00+00:00", "district": "Dewas" },
                { "id": 1, "created_at": "2026-10-18T09:00:00+00:00", "district": "Indore" }
            ])))
            .mount(&server)
            .await;

        let rows = client(&server)
            .list_submissions("submissions", None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].district.as_deref(), Some("Dewas"));
    }
}
