use chrono::NaiveDate;
use jobtrack_core::db::open_db_in_memory;
use jobtrack_core::{
    JobApplicationInput, JobId, JobStatus, KeyValueStore, ListView, NoticeLevel, SqliteKvStore,
    StatusFilter, Theme, Tracker, TrackerCommand, NOTICE_DISMISS_MS, THEME_KEY,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn acme() -> JobApplicationInput {
    JobApplicationInput::new("Acme", "Engineer", day(2024, 5, 1))
}

#[test]
fn submit_without_edit_target_adds_record() {
    let conn = open_db_in_memory().unwrap();
    let mut tracker = Tracker::open(SqliteKvStore::new(&conn), day(2024, 5, 1));

    let outcome = tracker.dispatch(TrackerCommand::Submit(acme()));
    let notice = outcome.notice.unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "Job added successfully!");
    assert_eq!(notice.dismiss_after_ms, NOTICE_DISMISS_MS);
    assert_eq!(tracker.records().len(), 1);
    assert_eq!(outcome.saved.unwrap().company, "Acme");
}

#[test]
fn submit_with_blank_company_is_rejected_before_the_store() {
    let conn = open_db_in_memory().unwrap();
    let mut tracker = Tracker::open(SqliteKvStore::new(&conn), day(2024, 5, 1));

    let outcome = tracker.dispatch(TrackerCommand::Submit(JobApplicationInput::new(
        " ",
        "Engineer",
        day(2024, 5, 1),
    )));
    assert!(outcome.is_error());
    assert_eq!(outcome.notice.unwrap().message, "Company is required");
    assert!(tracker.records().is_empty());
}

#[test]
fn edit_flow_updates_in_place_and_clears_target() {
    let conn = open_db_in_memory().unwrap();
    let mut tracker = Tracker::open(SqliteKvStore::new(&conn), day(2024, 5, 1));
    let id = tracker
        .dispatch(TrackerCommand::Submit(acme()))
        .saved
        .unwrap()
        .id;

    tracker.dispatch(TrackerCommand::BeginEdit(id.clone()));
    assert_eq!(tracker.editing_id(), Some(&id));
    assert_eq!(tracker.display().form.title, "Edit Job");
    assert_eq!(tracker.display().form.submit_label, "Update");

    let mut draft = tracker.edit_draft().unwrap();
    draft.status = JobStatus::Interviewing;
    let outcome = tracker.dispatch(TrackerCommand::Submit(draft));
    assert_eq!(outcome.notice.unwrap().message, "Job updated successfully!");

    assert_eq!(tracker.editing_id(), None);
    assert_eq!(tracker.records().len(), 1);
    assert_eq!(tracker.records()[0].id, id);
    assert_eq!(tracker.records()[0].status, JobStatus::Interviewing);
}

#[test]
fn begin_edit_unknown_id_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mut tracker = Tracker::open(SqliteKvStore::new(&conn), day(2024, 5, 1));

    let outcome = tracker.dispatch(TrackerCommand::BeginEdit(JobId::from("nope")));
    assert_eq!(outcome.notice.unwrap().message, "Job not found");
    assert_eq!(tracker.editing_id(), None);
}

#[test]
fn cancel_edit_returns_form_to_add_mode() {
    let conn = open_db_in_memory().unwrap();
    let mut tracker = Tracker::open(SqliteKvStore::new(&conn), day(2024, 5, 1));
    let id = tracker.dispatch(TrackerCommand::Submit(acme())).saved.unwrap().id;

    tracker.dispatch(TrackerCommand::BeginEdit(id));
    tracker.dispatch(TrackerCommand::CancelEdit);

    let form = tracker.display().form;
    assert_eq!(form.title, "Add New Job");
    assert!(!form.cancel_visible);
}

#[test]
fn delete_requires_confirmation_and_clears_matching_edit_target() {
    let conn = open_db_in_memory().unwrap();
    let mut tracker = Tracker::open(SqliteKvStore::new(&conn), day(2024, 5, 1));
    let id = tracker.dispatch(TrackerCommand::Submit(acme())).saved.unwrap().id;
    tracker.dispatch(TrackerCommand::BeginEdit(id.clone()));

    let declined = tracker.dispatch(TrackerCommand::Delete {
        id: id.clone(),
        confirmed: false,
    });
    assert_eq!(declined.notice, None);
    assert_eq!(tracker.records().len(), 1);

    let confirmed = tracker.dispatch(TrackerCommand::Delete {
        id: id.clone(),
        confirmed: true,
    });
    let notice = confirmed.notice.unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(notice.message, "Job deleted");
    assert!(tracker.records().is_empty());
    assert_eq!(tracker.editing_id(), None);

    let again = tracker.dispatch(TrackerCommand::Delete { id, confirmed: true });
    assert!(again.is_error());
}

#[test]
fn reminder_is_evaluated_once_at_open() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    {
        let mut tracker = Tracker::open(kv, day(2024, 5, 1));
        let mut due = acme();
        due.follow_up_date = Some(day(2024, 5, 2));
        tracker.dispatch(TrackerCommand::Submit(due));
        assert_eq!(tracker.reminder(), None);
    }

    let tracker = Tracker::open(kv, day(2024, 5, 2));
    let banner = tracker.display().reminder.unwrap();
    assert!(banner.message.contains("1 follow-up today: Acme (Engineer)"));
    assert_eq!(banner.dismiss_after_ms, 7_000);
}

#[test]
fn filter_changes_list_and_empty_state_names_status() {
    let conn = open_db_in_memory().unwrap();
    let mut tracker = Tracker::open(SqliteKvStore::new(&conn), day(2024, 5, 1));
    tracker.dispatch(TrackerCommand::Submit(acme()));

    tracker.dispatch(TrackerCommand::SetFilter(StatusFilter::Only(JobStatus::Offer)));
    let model = tracker.display();
    assert_eq!(model.stats.total, 1);
    match model.list {
        ListView::Empty(empty) => {
            assert_eq!(empty.headline, "No jobs found");
            assert_eq!(empty.hint, "No jobs with status \"Offer\"");
        }
        ListView::Cards(_) => panic!("offer filter should be empty"),
    }

    tracker.dispatch(TrackerCommand::SetFilter(StatusFilter::All));
    match tracker.display().list {
        ListView::Cards(cards) => {
            assert_eq!(cards.len(), 1);
            assert_eq!(cards[0].title, "Acme - Engineer");
            assert_eq!(cards[0].applied, "May 1, 2024");
            assert_eq!(cards[0].follow_up, None);
        }
        ListView::Empty(_) => panic!("all filter should list the record"),
    }
}

#[test]
fn theme_defaults_to_light_and_toggle_persists() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    let mut tracker = Tracker::open(kv, day(2024, 5, 1));
    assert_eq!(tracker.theme(), Theme::Light);
    assert_eq!(tracker.display().theme_toggle_label, "Dark Mode");

    tracker.dispatch(TrackerCommand::ToggleTheme);
    assert_eq!(tracker.theme(), Theme::Dark);
    assert_eq!(kv.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

    let reopened = Tracker::open(kv, day(2024, 5, 1));
    assert_eq!(reopened.theme(), Theme::Dark);
    assert_eq!(reopened.display().theme_toggle_label, "Light Mode");
}

#[test]
fn unrecognized_stored_theme_falls_back_to_light() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    kv.set(THEME_KEY, "sepia").unwrap();

    assert_eq!(Tracker::open(kv, day(2024, 5, 1)).theme(), Theme::Light);
}
