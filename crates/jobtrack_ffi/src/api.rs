//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose tracker use cases to Dart via FRB as flat, string-friendly shapes.
//! - Keep the edit target and filter on the UI side; every call opens its own
//!   tracker session over the shared database file.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported in response envelopes, never thrown.

use chrono::{Local, NaiveDate};
use jobtrack_core::db::open_db;
use jobtrack_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    parse_optional_date, ping as ping_inner, CommandOutcome, DisplayModel, JobApplicationInput,
    JobCard, JobId, JobStatus, ListView, SqliteKvStore, StatusFilter, Tracker, TrackerCommand,
    DATE_FORMAT, NOTICE_DISMISS_MS,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const TRACKER_DB_FILE_NAME: &str = "jobtrack.sqlite3";
static TRACKER_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
/// Repeated calls with the same `level + log_dir` are no-ops.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Raw form values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobForm {
    pub company: String,
    pub position: String,
    pub url: String,
    /// `Applied|Interviewing|Offer|Rejected`; empty means `Applied`.
    pub status: String,
    /// `YYYY-MM-DD`; empty means today.
    pub applied_date: String,
    /// `YYYY-MM-DD`; empty means no follow-up.
    pub follow_up_date: String,
    pub salary: String,
    pub contact: String,
    pub notes: String,
}

/// One list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCardItem {
    pub id: String,
    pub title: String,
    pub status: String,
    pub applied: String,
    pub follow_up: Option<String>,
    pub salary: Option<String>,
    pub contact: Option<String>,
    pub notes: Option<String>,
    pub url: Option<String>,
}

/// Everything the tracker screen draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerSnapshot {
    pub theme: String,
    pub theme_toggle_label: String,
    pub reminder: Option<String>,
    pub reminder_dismiss_ms: u64,
    pub form_title: String,
    pub submit_label: String,
    pub cancel_visible: bool,
    /// Earliest selectable date for the form's date pickers.
    pub min_date: String,
    /// Prefilled values while an edit is in progress.
    pub draft: Option<JobForm>,
    pub filter: String,
    pub filter_options: Vec<String>,
    pub total: u32,
    pub pending_follow_up: u32,
    pub items: Vec<JobCardItem>,
    pub empty_headline: Option<String>,
    pub empty_hint: Option<String>,
    /// Set when the snapshot could not be produced.
    pub error: Option<String>,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerActionResponse {
    pub ok: bool,
    /// Saved record id for submit calls.
    pub job_id: Option<String>,
    /// Notice text for a toast; empty when the action is silent.
    pub message: String,
    /// Toast lifetime; 0 when there is no notice.
    pub message_dismiss_ms: u64,
}

impl TrackerActionResponse {
    fn from_outcome(outcome: CommandOutcome) -> Self {
        let ok = !outcome.is_error();
        let (message, message_dismiss_ms) = match outcome.notice {
            Some(notice) => (notice.message, notice.dismiss_after_ms),
            None => (String::new(), 0),
        };
        Self {
            ok,
            job_id: outcome.saved.map(|record| record.id.to_string()),
            message,
            message_dismiss_ms,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            job_id: None,
            message: message.into(),
            message_dismiss_ms: NOTICE_DISMISS_MS,
        }
    }
}

/// Builds the screen model for `filter` (`All` or a status name).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `editing_id` switches the form to edit mode when it names a record.
/// - Unknown filter values fall back to `All`.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_snapshot(filter: String, editing_id: Option<String>) -> TrackerSnapshot {
    let filter = StatusFilter::parse(&filter).unwrap_or_default();
    let result = with_tracker(|tracker| {
        tracker.dispatch(TrackerCommand::SetFilter(filter));
        if let Some(id) = editing_id {
            tracker.dispatch(TrackerCommand::BeginEdit(JobId::from(id)));
        }
        let draft = tracker.edit_draft().map(|input| to_form(&input));
        to_snapshot(tracker.display(), draft)
    });

    match result {
        Ok(snapshot) => snapshot,
        Err(err) => TrackerSnapshot::failed(format!("tracker_snapshot failed: {err}")),
    }
}

/// Saves the form: adds a record, or updates `editing_id` when given.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_submit(form: JobForm, editing_id: Option<String>) -> TrackerActionResponse {
    let input = match to_input(&form, today()) {
        Ok(input) => input,
        Err(err) => return TrackerActionResponse::failure(err),
    };

    let result = with_tracker(|tracker| {
        if let Some(id) = editing_id {
            let begin = tracker.dispatch(TrackerCommand::BeginEdit(JobId::from(id)));
            if begin.is_error() {
                return TrackerActionResponse::from_outcome(begin);
            }
        }
        TrackerActionResponse::from_outcome(tracker.dispatch(TrackerCommand::Submit(input)))
    });

    result.unwrap_or_else(|err| {
        TrackerActionResponse::failure(format!("tracker_submit failed: {err}"))
    })
}

/// Deletes a record the user already confirmed.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_delete(id: String) -> TrackerActionResponse {
    with_tracker(|tracker| {
        TrackerActionResponse::from_outcome(tracker.dispatch(TrackerCommand::Delete {
            id: JobId::from(id),
            confirmed: true,
        }))
    })
    .unwrap_or_else(|err| TrackerActionResponse::failure(format!("tracker_delete failed: {err}")))
}

/// Flips the stored theme and returns the new value (`light|dark`).
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_toggle_theme() -> TrackerActionResponse {
    with_tracker(|tracker| {
        let outcome = tracker.dispatch(TrackerCommand::ToggleTheme);
        if outcome.is_error() {
            return TrackerActionResponse::from_outcome(outcome);
        }
        TrackerActionResponse {
            ok: true,
            job_id: None,
            message: tracker.theme().to_string(),
            message_dismiss_ms: 0,
        }
    })
    .unwrap_or_else(|err| {
        TrackerActionResponse::failure(format!("tracker_toggle_theme failed: {err}"))
    })
}

/// Today's follow-up banner text, if any record is due.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_reminder() -> Option<String> {
    with_tracker(|tracker| tracker.reminder().map(str::to_owned))
        .ok()
        .flatten()
}

impl TrackerSnapshot {
    fn failed(message: String) -> Self {
        Self {
            theme: String::new(),
            theme_toggle_label: String::new(),
            reminder: None,
            reminder_dismiss_ms: 0,
            form_title: String::new(),
            submit_label: String::new(),
            cancel_visible: false,
            min_date: String::new(),
            draft: None,
            filter: StatusFilter::All.to_string(),
            filter_options: Vec::new(),
            total: 0,
            pending_follow_up: 0,
            items: Vec::new(),
            empty_headline: None,
            empty_hint: None,
            error: Some(message),
        }
    }
}

fn to_snapshot(model: DisplayModel, draft: Option<JobForm>) -> TrackerSnapshot {
    let (items, empty_headline, empty_hint) = match model.list {
        ListView::Cards(cards) => (cards.into_iter().map(to_card_item).collect(), None, None),
        ListView::Empty(empty) => (
            Vec::new(),
            Some(empty.headline.to_string()),
            Some(empty.hint),
        ),
    };

    TrackerSnapshot {
        theme: model.theme.to_string(),
        theme_toggle_label: model.theme_toggle_label.to_string(),
        reminder_dismiss_ms: model
            .reminder
            .as_ref()
            .map_or(0, |banner| banner.dismiss_after_ms),
        reminder: model.reminder.map(|banner| banner.message),
        form_title: model.form.title.to_string(),
        submit_label: model.form.submit_label.to_string(),
        cancel_visible: model.form.cancel_visible,
        min_date: model.form.min_date.format(DATE_FORMAT).to_string(),
        draft,
        filter: model.filter.to_string(),
        filter_options: model
            .filter_options
            .iter()
            .map(ToString::to_string)
            .collect(),
        total: saturating_u32(model.stats.total),
        pending_follow_up: saturating_u32(model.stats.pending_follow_up),
        items,
        empty_headline,
        empty_hint,
        error: None,
    }
}

fn to_card_item(card: JobCard) -> JobCardItem {
    JobCardItem {
        id: card.id.to_string(),
        title: card.title,
        status: card.status.to_string(),
        applied: card.applied,
        follow_up: card.follow_up,
        salary: card.salary,
        contact: card.contact,
        notes: card.notes,
        url: card.url,
    }
}

fn to_form(input: &JobApplicationInput) -> JobForm {
    JobForm {
        company: input.company.clone(),
        position: input.position.clone(),
        url: input.url.clone().unwrap_or_default(),
        status: input.status.to_string(),
        applied_date: input.applied_date.format(DATE_FORMAT).to_string(),
        follow_up_date: input
            .follow_up_date
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        salary: input.salary.clone().unwrap_or_default(),
        contact: input.contact.clone().unwrap_or_default(),
        notes: input.notes.clone().unwrap_or_default(),
    }
}

fn to_input(form: &JobForm, today: NaiveDate) -> Result<JobApplicationInput, String> {
    let status = if form.status.trim().is_empty() {
        JobStatus::default()
    } else {
        JobStatus::parse(&form.status).ok_or_else(|| format!("unknown status `{}`", form.status))?
    };
    let applied_date = parse_optional_date(&form.applied_date)
        .map_err(|err| format!("invalid applied date: {err}"))?
        .unwrap_or(today);
    let follow_up_date = parse_optional_date(&form.follow_up_date)
        .map_err(|err| format!("invalid follow-up date: {err}"))?;

    Ok(JobApplicationInput {
        company: form.company.clone(),
        position: form.position.clone(),
        url: Some(form.url.clone()),
        status,
        applied_date,
        follow_up_date,
        salary: Some(form.salary.clone()),
        contact: Some(form.contact.clone()),
        notes: Some(form.notes.clone()),
    }
    .normalized())
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn resolve_tracker_db_path() -> PathBuf {
    TRACKER_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("JOBTRACK_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(TRACKER_DB_FILE_NAME)
        })
        .clone()
}

fn with_tracker<T>(f: impl FnOnce(&mut Tracker<SqliteKvStore<'_>>) -> T) -> Result<T, String> {
    let db_path = resolve_tracker_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("tracker DB open failed: {err}"))?;
    let mut tracker = Tracker::open(SqliteKvStore::new(&conn), today());
    Ok(f(&mut tracker))
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ping, to_input, tracker_delete, tracker_snapshot,
        tracker_submit, JobForm, NOTICE_DISMISS_MS,
    };
    use chrono::NaiveDate;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn to_input_defaults_blank_status_and_applied_date() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let form = JobForm {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            ..JobForm::default()
        };

        let input = to_input(&form, today).unwrap();
        assert_eq!(input.applied_date, today);
        assert_eq!(input.follow_up_date, None);
        assert_eq!(input.url, None);
    }

    #[test]
    fn to_input_rejects_malformed_dates() {
        let form = JobForm {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            follow_up_date: "tomorrow".to_string(),
            ..JobForm::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(to_input(&form, today).unwrap_err().contains("follow-up"));
    }

    #[test]
    fn submit_then_snapshot_lists_the_new_record() {
        let company = unique_token("ffi-company");
        let created = tracker_submit(
            JobForm {
                company: company.clone(),
                position: "Engineer".to_string(),
                status: "Offer".to_string(),
                ..JobForm::default()
            },
            None,
        );
        assert!(created.ok, "{}", created.message);
        let job_id = created.job_id.expect("submit should return job_id");

        let snapshot = tracker_snapshot("Offer".to_string(), Some(job_id.clone()));
        assert_eq!(snapshot.error, None);
        assert_eq!(snapshot.form_title, "Edit Job");
        assert_eq!(
            snapshot.draft.as_ref().map(|draft| draft.company.as_str()),
            Some(company.as_str())
        );
        assert!(snapshot.items.iter().any(|item| item.id == job_id));

        let deleted = tracker_delete(job_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.message, "Job deleted");
        assert_eq!(deleted.message_dismiss_ms, NOTICE_DISMISS_MS);
    }

    #[test]
    fn submit_rejects_blank_company() {
        let response = tracker_submit(
            JobForm {
                position: "Engineer".to_string(),
                ..JobForm::default()
            },
            None,
        );
        assert!(!response.ok);
        assert_eq!(response.message, "Company is required");
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
