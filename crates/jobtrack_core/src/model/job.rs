//! Job application domain model.
//!
//! # Responsibility
//! - Define the canonical record stored in the key-value store.
//! - Define the form-side input shape and its presence checks.
//!
//! # Invariants
//! - `id` is non-empty and never reassigned to another record.
//! - `company` and `position` are stored trimmed.
//! - Optional text fields are `None` rather than empty strings.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Calendar date format used on the wire and in CLI input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stable record identifier.
///
/// Freshly issued ids are decimal epoch-millisecond strings, but any
/// non-empty string read from storage or imported is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_epoch_ms(epoch_ms: u64) -> Self {
        Self(epoch_ms.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whitespace-only ids count as empty.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Numeric value for timestamp-derived ids.
    pub fn epoch_ms(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Stage of an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

impl JobStatus {
    /// Every status in selector order.
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Applied,
        JobStatus::Interviewing,
        JobStatus::Offer,
        JobStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interviewing => "Interviewing",
            Self::Offer => "Offer",
            Self::Rejected => "Rejected",
        }
    }

    /// Case-insensitive parse of a status name.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked job application.
///
/// Serialized with camelCase names so the persisted array stays readable by
/// the browser build that shares the same storage layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: JobId,
    pub company: String,
    pub position: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub url: Option<String>,
    pub status: JobStatus,
    pub applied_date: NaiveDate,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_date_as_none"
    )]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub salary: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub contact: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub notes: Option<String>,
}

impl JobApplication {
    /// Builds a record from normalized form input under the given id.
    pub fn from_input(id: JobId, input: JobApplicationInput) -> Self {
        let input = input.normalized();
        Self {
            id,
            company: input.company,
            position: input.position,
            url: input.url,
            status: input.status,
            applied_date: input.applied_date,
            follow_up_date: input.follow_up_date,
            salary: input.salary,
            contact: input.contact,
            notes: input.notes,
        }
    }

    pub fn has_follow_up(&self) -> bool {
        self.follow_up_date.is_some()
    }

    /// Exact calendar-date match against the follow-up date.
    pub fn is_follow_up_due_on(&self, day: NaiveDate) -> bool {
        self.follow_up_date == Some(day)
    }
}

/// Form submission payload: every record field except `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobApplicationInput {
    pub company: String,
    pub position: String,
    pub url: Option<String>,
    pub status: JobStatus,
    pub applied_date: NaiveDate,
    pub follow_up_date: Option<NaiveDate>,
    pub salary: Option<String>,
    pub contact: Option<String>,
    pub notes: Option<String>,
}

impl JobApplicationInput {
    /// Creates input with the form defaults: status `Applied`, no optional fields.
    pub fn new(
        company: impl Into<String>,
        position: impl Into<String>,
        applied_date: NaiveDate,
    ) -> Self {
        Self {
            company: company.into(),
            position: position.into(),
            url: None,
            status: JobStatus::default(),
            applied_date,
            follow_up_date: None,
            salary: None,
            contact: None,
            notes: None,
        }
    }

    /// Trims text fields and folds blank optional text into `None`.
    pub fn normalized(self) -> Self {
        Self {
            company: self.company.trim().to_string(),
            position: self.position.trim().to_string(),
            url: normalize_optional(self.url),
            status: self.status,
            applied_date: self.applied_date,
            follow_up_date: self.follow_up_date,
            salary: normalize_optional(self.salary),
            contact: normalize_optional(self.contact),
            notes: normalize_optional(self.notes),
        }
    }

    /// Presence check for required text fields.
    ///
    /// # Errors
    /// - `EmptyCompany` / `EmptyPosition` when the trimmed value is empty.
    pub fn validate(&self) -> Result<(), InputValidationError> {
        if self.company.trim().is_empty() {
            return Err(InputValidationError::EmptyCompany);
        }
        if self.position.trim().is_empty() {
            return Err(InputValidationError::EmptyPosition);
        }
        Ok(())
    }
}

impl From<&JobApplication> for JobApplicationInput {
    fn from(record: &JobApplication) -> Self {
        Self {
            company: record.company.clone(),
            position: record.position.clone(),
            url: record.url.clone(),
            status: record.status,
            applied_date: record.applied_date,
            follow_up_date: record.follow_up_date,
            salary: record.salary.clone(),
            contact: record.contact.clone(),
            notes: record.notes.clone(),
        }
    }
}

/// Rejected form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputValidationError {
    EmptyCompany,
    EmptyPosition,
}

impl Display for InputValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCompany => write!(f, "company is required"),
            Self::EmptyPosition => write!(f, "position is required"),
        }
    }
}

impl Error for InputValidationError {}

/// Parses a `YYYY-MM-DD` calendar date; blank input yields `Ok(None)`.
pub fn parse_optional_date(value: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map(Some)
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_optional(raw))
}

fn blank_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_optional_date(&raw).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
