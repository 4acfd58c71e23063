//! Display model projection and plain-text rendering.
//!
//! `project` is the single place that decides what a rendering surface shows;
//! surfaces only lay the model out.

use crate::model::job::{JobApplication, JobId, JobStatus};
use crate::model::theme::Theme;
use crate::view::filter::{compute_stats, filter_by_status, JobStats, StatusFilter};
use crate::view::reminder::REMINDER_DISMISS_MS;
use chrono::NaiveDate;
use std::fmt::Write;

const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";
const DATE_NOT_SET: &str = "Not set";

/// Everything a projection reads, borrowed from the session.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput<'a> {
    pub records: &'a [JobApplication],
    pub filter: StatusFilter,
    pub editing: Option<&'a JobApplication>,
    pub reminder: Option<&'a str>,
    pub theme: Theme,
    pub today: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayModel {
    pub theme: Theme,
    pub theme_toggle_label: &'static str,
    pub reminder: Option<ReminderBanner>,
    pub form: FormState,
    pub filter: StatusFilter,
    pub filter_options: Vec<StatusFilter>,
    pub stats: JobStats,
    pub list: ListView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderBanner {
    pub message: String,
    pub dismiss_after_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub title: &'static str,
    pub submit_label: &'static str,
    pub cancel_visible: bool,
    pub editing_id: Option<JobId>,
    /// Earliest date the date pickers offer.
    pub min_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Empty(EmptyState),
    Cards(Vec<JobCard>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub headline: &'static str,
    pub hint: String,
}

/// One rendered record; optional lines are `None` when the field is unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCard {
    pub id: JobId,
    pub title: String,
    pub status: JobStatus,
    pub applied: String,
    pub follow_up: Option<String>,
    pub salary: Option<String>,
    pub contact: Option<String>,
    pub notes: Option<String>,
    pub url: Option<String>,
}

pub fn project(input: &ProjectionInput<'_>) -> DisplayModel {
    let visible = filter_by_status(input.records, input.filter);
    let list = if visible.is_empty() {
        ListView::Empty(empty_state(input.filter))
    } else {
        ListView::Cards(visible.into_iter().map(job_card).collect())
    };

    let form = match input.editing {
        Some(record) => FormState {
            title: "Edit Job",
            submit_label: "Update",
            cancel_visible: true,
            editing_id: Some(record.id.clone()),
            min_date: input.today,
        },
        None => FormState {
            title: "Add New Job",
            submit_label: "Save",
            cancel_visible: false,
            editing_id: None,
            min_date: input.today,
        },
    };

    DisplayModel {
        theme: input.theme,
        theme_toggle_label: input.theme.toggle_label(),
        reminder: input.reminder.map(|message| ReminderBanner {
            message: message.to_string(),
            dismiss_after_ms: REMINDER_DISMISS_MS,
        }),
        form,
        filter: input.filter,
        filter_options: std::iter::once(StatusFilter::All)
            .chain(JobStatus::ALL.into_iter().map(StatusFilter::Only))
            .collect(),
        stats: compute_stats(input.records),
        list,
    }
}

/// `May 1, 2024` style date, or `Not set`.
pub fn format_display_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        None => DATE_NOT_SET.to_string(),
    }
}

/// Lays a display model out as terminal text.
pub fn render_text(model: &DisplayModel) -> String {
    let mut out = String::new();

    if let Some(banner) = &model.reminder {
        let _ = writeln!(out, "{}", banner.message);
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "Total: {}  Follow-ups: {}  Filter: {}",
        model.stats.total, model.stats.pending_follow_up, model.filter
    );
    out.push('\n');

    match &model.list {
        ListView::Empty(empty) => {
            let _ = writeln!(out, "{}", empty.headline);
            let _ = writeln!(out, "{}", empty.hint);
        }
        ListView::Cards(cards) => {
            for card in cards {
                render_card(&mut out, card);
            }
        }
    }

    out
}

/// Lays out a single card, as shown for one record.
pub fn render_card_text(card: &JobCard) -> String {
    let mut out = String::new();
    render_card(&mut out, card);
    out
}

fn render_card(out: &mut String, card: &JobCard) {
    let _ = writeln!(out, "[{}] {}", card.id, card.title);
    let _ = writeln!(out, "  Status: {}", card.status);
    let _ = writeln!(out, "  Applied: {}", card.applied);
    let optional_lines = [
        ("Follow-up", &card.follow_up),
        ("Salary", &card.salary),
        ("Contact", &card.contact),
        ("Notes", &card.notes),
        ("Job Posting", &card.url),
    ];
    for (label, value) in optional_lines {
        if let Some(value) = value {
            let _ = writeln!(out, "  {label}: {value}");
        }
    }
    out.push('\n');
}

fn empty_state(filter: StatusFilter) -> EmptyState {
    let hint = match filter {
        StatusFilter::All => "Add your first job application!".to_string(),
        StatusFilter::Only(status) => format!("No jobs with status \"{status}\""),
    };
    EmptyState {
        headline: "No jobs found",
        hint,
    }
}

pub fn job_card(record: &JobApplication) -> JobCard {
    JobCard {
        id: record.id.clone(),
        title: format!("{} - {}", record.company, record.position),
        status: record.status,
        applied: format_display_date(Some(record.applied_date)),
        follow_up: record
            .follow_up_date
            .map(|date| format_display_date(Some(date))),
        salary: record.salary.clone(),
        contact: record.contact.clone(),
        notes: record.notes.clone(),
        url: record.url.clone(),
    }
}
