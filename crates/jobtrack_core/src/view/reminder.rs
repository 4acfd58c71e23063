//! Same-day follow-up reminders.
//!
//! Evaluated once per session start; a session that spans midnight is not
//! re-evaluated until the next load.

use crate::model::job::JobApplication;
use chrono::NaiveDate;

/// Banner auto-dismiss delay for display surfaces.
pub const REMINDER_DISMISS_MS: u64 = 7_000;

/// Records whose follow-up date is exactly `today`, in sequence order.
pub fn due_today(records: &[JobApplication], today: NaiveDate) -> Vec<&JobApplication> {
    records
        .iter()
        .filter(|record| record.is_follow_up_due_on(today))
        .collect()
}

/// Banner text naming each due record; `None` when nothing is due.
pub fn format_reminder_message(due: &[&JobApplication]) -> Option<String> {
    if due.is_empty() {
        return None;
    }

    let noun = if due.len() == 1 { "follow-up" } else { "follow-ups" };
    let names = due
        .iter()
        .map(|record| format!("{} ({})", record.company, record.position))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("🔔 You have {} {noun} today: {names}", due.len()))
}
