//! Core domain logic for JobTrack.
//! This crate is the single source of truth for record-store invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::job::{
    parse_optional_date, InputValidationError, JobApplication, JobApplicationInput, JobId,
    JobStatus, DATE_FORMAT,
};
pub use model::theme::Theme;
pub use repo::job_repo::{load_all, JobStore, StoreError, StoreResult};
pub use repo::kv_repo::{
    KeyValueStore, KvError, KvResult, MemoryKvStore, SqliteKvStore, CORRUPT_JOBS_KEY, JOBS_KEY,
    THEME_KEY,
};
pub use service::theme_service::{load_theme, save_theme, toggle_theme};
pub use service::tracker_service::{
    CommandOutcome, Notice, NoticeLevel, Tracker, TrackerCommand, NOTICE_DISMISS_MS,
};
pub use view::display::{
    format_display_date, job_card, project, render_card_text, render_text, DisplayModel,
    EmptyState, FormState, JobCard, ListView, ProjectionInput, ReminderBanner,
};
pub use view::filter::{compute_stats, filter_by_status, JobStats, StatusFilter};
pub use view::reminder::{due_today, format_reminder_message, REMINDER_DISMISS_MS};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
