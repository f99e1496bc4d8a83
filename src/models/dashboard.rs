//! Aggregates shown above the admin submissions table.

use std::collections::HashSet;

use serde::Serialize;

use super::Submission;

/// Summary counts derived from one fetched set of rows.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub unique_users: usize,
    pub with_images: usize,
}

impl DashboardStats {
    pub fn from_rows(rows: &[Submission]) -> Self {
        let unique_users = rows
            .iter()
            .filter_map(|row| row.user_email.as_deref())
            .filter(|email| !email.is_empty())
            .collect::<HashSet<_>>()
            .len();

        Self {
            total: rows.len(),
            unique_users,
            with_images: rows.iter().filter(|row| row.has_link()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubmissionId;

    fn row(id: i64, email: Option<&str>, link: Option<&str>) -> Submission {
        Submission {
            id: SubmissionId::Number(id),
            created_at: None,
            submitted_at: None,
            user_email: email.map(str::to_string),
            user_id: None,
            district: Some("Ujjain".to_string()),
            place: Some("Kshipra ghat".to_string()),
            completed_by: Some("समाज".to_string()),
            work_description: Some("river clean-up".to_string()),
            result: Some("2 tonnes of waste removed".to_string()),
            google_drive_link: link.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_set() {
        assert_eq!(DashboardStats::from_rows(&[]), DashboardStats::default());
    }

    #[test]
    fn test_counts() {
        let rows = vec![
            row(1, Some("a@example.com"), Some("https://drive.google.com/a")),
            row(2, Some("a@example.com"), None),
            row(3, Some("b@example.com"), Some("")),
            row(4, None, Some("https://drive.google.com/b")),
            row(5, Some(""), None),
        ];

        let stats = DashboardStats::from_rows(&rows);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.unique_users, 2);
        assert_eq!(stats.with_images, 2);
    }
}
