//! Status filter and list statistics.

use crate::model::job::{JobApplication, JobStatus};
use std::fmt::{Display, Formatter};

/// Selector value: every record, or one status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(JobStatus),
}

impl StatusFilter {
    const ALL_LABEL: &'static str = "All";

    /// Parses `All` or a status name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case(Self::ALL_LABEL) {
            return Some(Self::All);
        }
        JobStatus::parse(value).map(Self::Only)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => Self::ALL_LABEL,
            Self::Only(status) => status.as_str(),
        }
    }

    pub fn matches(self, record: &JobApplication) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => record.status == status,
        }
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate counts shown above the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobStats {
    /// Every record, regardless of the active filter.
    pub total: usize,
    /// Records with any follow-up date, past, present or future.
    pub pending_follow_up: usize,
}

/// Stable, non-destructive status filter.
pub fn filter_by_status(records: &[JobApplication], filter: StatusFilter) -> Vec<&JobApplication> {
    records.iter().filter(|record| filter.matches(record)).collect()
}

pub fn compute_stats(records: &[JobApplication]) -> JobStats {
    JobStats {
        total: records.len(),
        pending_follow_up: records.iter().filter(|r| r.has_follow_up()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::StatusFilter;
    use crate::model::job::JobStatus;

    #[test]
    fn parse_accepts_all_and_status_names() {
        assert_eq!(StatusFilter::parse("All"), Some(StatusFilter::All));
        assert_eq!(StatusFilter::parse("all"), Some(StatusFilter::All));
        assert_eq!(
            StatusFilter::parse("offer"),
            Some(StatusFilter::Only(JobStatus::Offer))
        );
        assert_eq!(StatusFilter::parse("Ghosted"), None);
    }
}
