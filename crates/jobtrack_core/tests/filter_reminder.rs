use chrono::NaiveDate;
use jobtrack_core::{
    compute_stats, due_today, filter_by_status, format_reminder_message, JobApplication,
    JobApplicationInput, JobId, JobStats, JobStatus, StatusFilter,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(
    id: &str,
    company: &str,
    status: JobStatus,
    follow_up: Option<NaiveDate>,
) -> JobApplication {
    let mut input = JobApplicationInput::new(company, "Engineer", day(2024, 4, 1));
    input.status = status;
    input.follow_up_date = follow_up;
    JobApplication::from_input(JobId::from(id), input)
}

fn sample() -> Vec<JobApplication> {
    vec![
        record("1", "Acme", JobStatus::Applied, None),
        record("2", "Globex", JobStatus::Interviewing, Some(day(2024, 5, 1))),
        record("3", "Initech", JobStatus::Applied, Some(day(2023, 1, 1))),
        record("4", "Umbrella", JobStatus::Rejected, Some(day(2030, 1, 1))),
    ]
}

#[test]
fn filter_all_returns_every_record_in_order() {
    let records = sample();
    let filtered = filter_by_status(&records, StatusFilter::All);

    let ids = filtered.iter().map(|r| r.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
}

#[test]
fn filter_by_status_is_stable_and_exact() {
    let records = sample();
    let applied = filter_by_status(&records, StatusFilter::Only(JobStatus::Applied));

    let ids = applied.iter().map(|r| r.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["1", "3"]);
    assert!(filter_by_status(&records, StatusFilter::Only(JobStatus::Offer)).is_empty());
    assert_eq!(records.len(), 4);
}

#[test]
fn stats_count_any_scheduled_follow_up() {
    assert_eq!(compute_stats(&[]), JobStats { total: 0, pending_follow_up: 0 });

    let stats = compute_stats(&sample());
    assert_eq!(stats.total, 4);
    assert_eq!(stats.pending_follow_up, 3);
}

#[test]
fn due_today_uses_exact_date_equality() {
    let records = vec![record("1", "Acme", JobStatus::Applied, Some(day(2024, 5, 1)))];

    assert_eq!(due_today(&records, day(2024, 5, 1)).len(), 1);
    assert!(due_today(&records, day(2024, 5, 2)).is_empty());
}

#[test]
fn single_due_record_uses_singular_phrasing() {
    let records = vec![
        record("1", "Acme", JobStatus::Applied, Some(day(2024, 5, 1))),
        record("2", "Globex", JobStatus::Applied, None),
    ];

    let due = due_today(&records, day(2024, 5, 1));
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id.as_str(), "1");

    let message = format_reminder_message(&due).unwrap();
    assert!(message.contains("1 follow-up today"));
    assert!(message.ends_with("Acme (Engineer)"));
}

#[test]
fn several_due_records_use_plural_phrasing() {
    let records = vec![
        record("1", "Acme", JobStatus::Applied, Some(day(2024, 5, 1))),
        record("2", "Globex", JobStatus::Offer, Some(day(2024, 5, 1))),
    ];

    let message = format_reminder_message(&due_today(&records, day(2024, 5, 1))).unwrap();
    assert!(message.contains("2 follow-ups today: Acme (Engineer), Globex (Engineer)"));
}

#[test]
fn nothing_due_yields_no_message() {
    assert_eq!(format_reminder_message(&[]), None);
}
