//! Activity report model matching the `submissions` table.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who carried out the reported activity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CompletedBy {
    #[serde(rename = "व्यक्तिगत")]
    Individual,
    #[serde(rename = "संस्था/ संगठन")]
    Institution,
    #[serde(rename = "शासन/ प्रशासन")]
    Government,
    #[serde(rename = "संघ/गतिविधि")]
    Association,
    #[serde(rename = "समाज")]
    Society,
}

impl CompletedBy {
    pub const ALL: [CompletedBy; 5] = [
        CompletedBy::Individual,
        CompletedBy::Institution,
        CompletedBy::Government,
        CompletedBy::Association,
        CompletedBy::Society,
    ];

    /// The stored value, as shown in the form.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletedBy::Individual => "व्यक्तिगत",
            CompletedBy::Institution => "संस्था/ संगठन",
            CompletedBy::Government => "शासन/ प्रशासन",
            CompletedBy::Association => "संघ/गतिविधि",
            CompletedBy::Society => "समाज",
        }
    }

    pub fn english(&self) -> &'static str {
        match self {
            CompletedBy::Individual => "Individual",
            CompletedBy::Institution => "Institution/Organization",
            CompletedBy::Government => "Government/Administration",
            CompletedBy::Association => "Association/Activity",
            CompletedBy::Society => "Society",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for CompletedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row identifier assigned by the backend; the table may use a bigint or a uuid key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SubmissionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionId::Number(n) => write!(f, "{}", n),
            SubmissionId::Text(s) => f.write_str(s),
        }
    }
}

/// A persisted activity report.
///
/// Rows are read leniently: older rows may miss fields the form now requires,
/// and `completed_by` is kept as the raw stored string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub completed_by: Option<String>,
    #[serde(default)]
    pub work_description: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub google_drive_link: Option<String>,
}

impl Submission {
    /// When the row was stored; tables may carry either timestamp column, or both.
    pub fn submitted_on(&self) -> Option<DateTime<Utc>> {
        self.created_at.or(self.submitted_at)
    }

    /// Whether an image link is attached.
    pub fn has_link(&self) -> bool {
        self.google_drive_link
            .as_deref()
            .is_some_and(|link| !link.trim().is_empty())
    }

    /// The image link, only when it is safe to put in an `href`.
    ///
    /// Rows can be written straight to the table, bypassing form validation.
    pub fn web_link(&self) -> Option<&str> {
        self.google_drive_link
            .as_deref()
            .map(str::trim)
            .filter(|link| is_web_link(link))
    }
}

/// Insert payload for one activity report.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewSubmission {
    pub user_email: Option<String>,
    pub user_id: Option<String>,
    pub district: String,
    pub place: String,
    pub completed_by: CompletedBy,
    pub work_description: String,
    pub result: String,
    pub google_drive_link: Option<String>,
}

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    District,
    Place,
    CompletedBy,
    WorkDescription,
    Result,
    GoogleDriveLink,
}

/// Validation messages keyed by field.
pub type FieldErrors = BTreeMap<Field, &'static str>;

pub const REQUIRED_MESSAGE: &str = "यह फील्ड आवश्यक है";
pub const CHOOSE_OPTION_MESSAGE: &str = "कृपया एक विकल्प चुनें";
pub const INVALID_LINK_MESSAGE: &str = "कृपया मान्य लिंक दर्ज करें (Please enter a valid link)";

/// Raw form body as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionInput {
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub completed_by: String,
    #[serde(default)]
    pub work_description: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub google_drive_link: String,
}

impl SubmissionInput {
    /// Validate the raw fields and build the insert payload.
    ///
    /// Required text fields are stored as entered; only whitespace-only input is rejected.
    pub fn validate(&self) -> Result<NewSubmission, FieldErrors> {
        let mut errors = FieldErrors::new();

        for (field, value) in [
            (Field::District, &self.district),
            (Field::Place, &self.place),
            (Field::WorkDescription, &self.work_description),
            (Field::Result, &self.result),
        ] {
            if value.trim().is_empty() {
                errors.insert(field, REQUIRED_MESSAGE);
            }
        }

        let completed_by = CompletedBy::parse(self.completed_by.trim());
        if completed_by.is_none() {
            errors.insert(Field::CompletedBy, CHOOSE_OPTION_MESSAGE);
        }

        let link = self.google_drive_link.trim();
        let google_drive_link = if link.is_empty() {
            None
        } else if is_web_link(link) {
            Some(link.to_string())
        } else {
            errors.insert(Field::GoogleDriveLink, INVALID_LINK_MESSAGE);
            None
        };

        match completed_by {
            Some(completed_by) if errors.is_empty() => Ok(NewSubmission {
                user_email: None,
                user_id: None,
                district: self.district.clone(),
                place: self.place.clone(),
                completed_by,
                work_description: self.work_description.clone(),
                result: self.result.clone(),
                google_drive_link,
            }),
            _ => Err(errors),
        }
    }
}

pub(crate) fn is_web_link(raw: &str) -> bool {
    url::Url::parse(raw)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}
