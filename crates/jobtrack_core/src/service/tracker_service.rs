//! Tracker session: the explicit owner of records, edit target, filter and theme.
//!
//! # Responsibility
//! - Load session state once and evaluate the follow-up reminder at start.
//! - Apply user commands and report their result as a notice.
//!
//! # Invariants
//! - Invalid input never reaches the record store.
//! - At most one record is being edited; the target is cleared on submit,
//!   on cancel and when that record is deleted.
//! - `dispatch` never fails; every failure becomes an error notice.

use crate::model::job::{JobApplication, JobApplicationInput, JobId};
use crate::model::theme::Theme;
use crate::repo::job_repo::{JobStore, StoreError};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::theme_service::{load_theme, toggle_theme};
use crate::view::display::{project, DisplayModel, ProjectionInput};
use crate::view::filter::StatusFilter;
use crate::view::reminder::{due_today, format_reminder_message};
use chrono::NaiveDate;
use log::{debug, info, warn};

/// Auto-dismiss delay for command notices.
pub const NOTICE_DISMISS_MS: u64 = 3_000;

/// User intent routed through the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCommand {
    /// Form submission: adds, or updates the current edit target.
    Submit(JobApplicationInput),
    /// Makes `id` the edit target.
    BeginEdit(JobId),
    /// Drops the edit target without saving.
    CancelEdit,
    /// Deletes `id` once the user has confirmed.
    Delete { id: JobId, confirmed: bool },
    SetFilter(StatusFilter),
    ToggleTheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Short user-facing message produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub dismiss_after_ms: u64,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            dismiss_after_ms: NOTICE_DISMISS_MS,
        }
    }

    fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Result of one dispatched command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    pub notice: Option<Notice>,
    /// Record written by a successful submit.
    pub saved: Option<JobApplication>,
}

impl CommandOutcome {
    fn quiet() -> Self {
        Self::default()
    }

    fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            saved: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.notice.as_ref().is_some_and(Notice::is_error)
    }
}

/// One user session over a key-value store.
pub struct Tracker<S: KeyValueStore> {
    store: JobStore<S>,
    editing_id: Option<JobId>,
    filter: StatusFilter,
    theme: Theme,
    today: NaiveDate,
    reminder: Option<String>,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Loads records and theme, then evaluates the reminder for `today`.
    pub fn open(kv: S, today: NaiveDate) -> Self {
        let store = JobStore::open(kv);
        let theme = load_theme(store.kv());
        let reminder = format_reminder_message(&due_today(store.records(), today));
        info!(
            "event=session_start module=tracker status=ok records={} theme={theme} reminder={}",
            store.len(),
            reminder.is_some()
        );

        Self {
            store,
            editing_id: None,
            filter: StatusFilter::All,
            theme,
            today,
            reminder,
        }
    }

    pub fn dispatch(&mut self, command: TrackerCommand) -> CommandOutcome {
        match command {
            TrackerCommand::Submit(input) => self.submit(input),
            TrackerCommand::BeginEdit(id) => self.begin_edit(id),
            TrackerCommand::CancelEdit => {
                self.editing_id = None;
                CommandOutcome::quiet()
            }
            TrackerCommand::Delete { id, confirmed } => self.delete(id, confirmed),
            TrackerCommand::SetFilter(filter) => {
                debug!("event=filter_set module=tracker filter={filter}");
                self.filter = filter;
                CommandOutcome::quiet()
            }
            TrackerCommand::ToggleTheme => match toggle_theme(self.store.kv(), self.theme) {
                Ok(theme) => {
                    self.theme = theme;
                    CommandOutcome::quiet()
                }
                Err(err) => CommandOutcome::notice(Notice::error(format!(
                    "Could not save theme: {err}"
                ))),
            },
        }
    }

    pub fn store(&self) -> &JobStore<S> {
        &self.store
    }

    pub fn records(&self) -> &[JobApplication] {
        self.store.records()
    }

    pub fn editing_id(&self) -> Option<&JobId> {
        self.editing_id.as_ref()
    }

    pub fn edit_target(&self) -> Option<&JobApplication> {
        self.editing_id.as_ref().and_then(|id| self.store.get(id))
    }

    /// Current values of the edit target, for prefilling a form.
    pub fn edit_draft(&self) -> Option<JobApplicationInput> {
        self.edit_target().map(JobApplicationInput::from)
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Reminder computed at session start.
    pub fn reminder(&self) -> Option<&str> {
        self.reminder.as_deref()
    }

    /// Pure projection of the current session state.
    pub fn display(&self) -> DisplayModel {
        project(&ProjectionInput {
            records: self.store.records(),
            filter: self.filter,
            editing: self.edit_target(),
            reminder: self.reminder.as_deref(),
            theme: self.theme,
            today: self.today,
        })
    }

    fn submit(&mut self, input: JobApplicationInput) -> CommandOutcome {
        if let Err(err) = input.validate() {
            debug!("event=job_submit module=tracker status=invalid reason={err:?}");
            return CommandOutcome::notice(Notice::error(capitalize(&err.to_string())));
        }

        let (result, success_message) = match self.editing_id.clone() {
            Some(id) => (self.store.update(&id, input), "Job updated successfully!"),
            None => (self.store.add(input), "Job added successfully!"),
        };

        match result {
            Ok(saved) => {
                self.editing_id = None;
                CommandOutcome {
                    notice: Some(Notice::success(success_message)),
                    saved: Some(saved),
                }
            }
            Err(StoreError::NotFound(id)) => {
                warn!("event=job_submit module=tracker status=stale_edit id={id}");
                self.editing_id = None;
                CommandOutcome::notice(Notice::error("Job not found"))
            }
            Err(err) => CommandOutcome::notice(Notice::error(format!("Could not save job: {err}"))),
        }
    }

    fn begin_edit(&mut self, id: JobId) -> CommandOutcome {
        if self.store.get(&id).is_none() {
            debug!("event=job_edit module=tracker status=not_found id={id}");
            return CommandOutcome::notice(Notice::error("Job not found"));
        }
        self.editing_id = Some(id);
        CommandOutcome::quiet()
    }

    fn delete(&mut self, id: JobId, confirmed: bool) -> CommandOutcome {
        if !confirmed {
            return CommandOutcome::quiet();
        }

        match self.store.remove(&id) {
            Ok(true) => {
                if self.editing_id.as_ref() == Some(&id) {
                    self.editing_id = None;
                }
                CommandOutcome::notice(Notice::warning("Job deleted"))
            }
            Ok(false) => CommandOutcome::notice(Notice::error("Job not found")),
            Err(err) => {
                CommandOutcome::notice(Notice::error(format!("Could not delete job: {err}")))
            }
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
