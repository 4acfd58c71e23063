//! Terminal front end for the job tracker.
//!
//! # Responsibility
//! - Translate arguments into tracker commands and print the display model.
//! - Exit non-zero whenever a command ends in an error notice.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use jobtrack_core::db::open_db;
use jobtrack_core::{
    default_log_level, filter_by_status, init_logging, job_card, parse_optional_date,
    render_card_text, render_text, CommandOutcome, JobApplicationInput, JobId, JobStatus,
    JobStore, KeyValueStore, SqliteKvStore, StatusFilter, Tracker, TrackerCommand,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;

const DEFAULT_DB_FILE_NAME: &str = "jobtrack.sqlite3";

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "jobtrack", version, about = "Track job applications and follow-ups")]
struct Cli {
    /// SQLite file holding tracker data
    #[arg(long, env = "JOBTRACK_DB_PATH", global = true)]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "JOBTRACK_LOG_DIR", global = true)]
    log_dir: Option<String>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Evaluate reminders and date defaults for this day (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_date)]
    today: Option<NaiveDate>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new application
    Add {
        #[command(flatten)]
        fields: JobFields,
    },
    /// Change an existing application; omitted fields keep their values
    Edit {
        id: String,
        #[command(flatten)]
        fields: JobFields,
    },
    /// Delete an application
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// List applications with stats and today's reminder
    List {
        /// All, Applied, Interviewing, Offer or Rejected
        #[arg(long, default_value = "All", value_parser = parse_filter)]
        status: StatusFilter,
        /// Print the filtered records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print every field of one application
    Show { id: String },
    /// Print today's follow-up reminder
    Remind,
    /// Show or toggle the stored theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Append records from a JSON export
    Import { file: PathBuf },
    /// Print all records as JSON
    Export,
    /// Print core version information
    Version,
}

#[derive(Subcommand)]
enum ThemeAction {
    Show,
    Toggle,
}

#[derive(Args)]
struct JobFields {
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    position: Option<String>,
    /// Link to the job posting; pass "" to clear
    #[arg(long)]
    url: Option<String>,
    #[arg(long, value_parser = parse_status)]
    status: Option<JobStatus>,
    /// Application date (YYYY-MM-DD); defaults to today on add
    #[arg(long, value_parser = parse_date)]
    applied: Option<NaiveDate>,
    /// Follow-up date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, conflicts_with = "clear_follow_up")]
    follow_up: Option<NaiveDate>,
    /// Remove the follow-up date
    #[arg(long)]
    clear_follow_up: bool,
    #[arg(long)]
    salary: Option<String>,
    #[arg(long)]
    contact: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl JobFields {
    fn apply_to(self, mut input: JobApplicationInput) -> JobApplicationInput {
        if let Some(company) = self.company {
            input.company = company;
        }
        if let Some(position) = self.position {
            input.position = position;
        }
        if let Some(status) = self.status {
            input.status = status;
        }
        if let Some(applied) = self.applied {
            input.applied_date = applied;
        }
        if self.clear_follow_up {
            input.follow_up_date = None;
        } else if let Some(follow_up) = self.follow_up {
            input.follow_up_date = Some(follow_up);
        }
        replace_if_given(&mut input.url, self.url);
        replace_if_given(&mut input.salary, self.salary);
        replace_if_given(&mut input.contact, self.contact);
        replace_if_given(&mut input.notes, self.notes);
        input
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        init_logging(level, log_dir)?;
    }

    if let Commands::Version = cli.command {
        println!("jobtrack_core ping={}", jobtrack_core::ping());
        println!("jobtrack_core version={}", jobtrack_core::core_version());
        return Ok(());
    }

    let db_path = cli
        .db
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
    let conn = open_db(&db_path)?;
    let kv = SqliteKvStore::new(&conn);
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    match cli.command {
        Commands::Import { file } => {
            let payload = std::fs::read_to_string(&file)?;
            let imported = JobStore::open(kv).import_json(&payload)?;
            println!("Imported {imported} job(s).");
            Ok(())
        }
        Commands::Export => {
            println!("{}", JobStore::open(kv).export_json()?);
            Ok(())
        }
        command => run_session(Tracker::open(kv, today), command),
    }
}

fn run_session(mut tracker: Tracker<SqliteKvStore<'_>>, command: Commands) -> CliResult<()> {
    match command {
        Commands::Add { fields } => {
            let draft = JobApplicationInput::new("", "", tracker.today());
            let outcome = tracker.dispatch(TrackerCommand::Submit(fields.apply_to(draft)));
            report(&outcome)?;
            if let Some(saved) = outcome.saved {
                println!("id={}", saved.id);
            }
        }
        Commands::Edit { id, fields } => {
            report(&tracker.dispatch(TrackerCommand::BeginEdit(JobId::from(id))))?;
            let draft = tracker
                .edit_draft()
                .ok_or("edit target vanished before submit")?;
            report(&tracker.dispatch(TrackerCommand::Submit(fields.apply_to(draft))))?;
        }
        Commands::Delete { id, yes } => {
            if !yes {
                return Err("refusing to delete without --yes".into());
            }
            report(&tracker.dispatch(TrackerCommand::Delete {
                id: JobId::from(id),
                confirmed: true,
            }))?;
        }
        Commands::List { status, json } => {
            tracker.dispatch(TrackerCommand::SetFilter(status));
            if json {
                let visible = filter_by_status(tracker.records(), status);
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else {
                print!("{}", render_text(&tracker.display()));
            }
        }
        Commands::Show { id } => print!("{}", show_record(&mut tracker, id)?),
        Commands::Remind => match tracker.reminder() {
            Some(message) => println!("{message}"),
            None => println!("No follow-ups due today."),
        },
        Commands::Theme { action } => {
            if let Some(ThemeAction::Toggle) = action {
                report(&tracker.dispatch(TrackerCommand::ToggleTheme))?;
            }
            println!("{}", tracker.theme());
        }
        Commands::Import { .. } | Commands::Export | Commands::Version => {}
    }

    info!("event=cli_command module=cli status=ok");
    Ok(())
}

fn report(outcome: &CommandOutcome) -> CliResult<()> {
    match &outcome.notice {
        Some(notice) if notice.is_error() => Err(notice.message.clone().into()),
        Some(notice) => {
            println!("{}", notice.message);
            Ok(())
        }
        None => Ok(()),
    }
}

fn show_record<S: KeyValueStore>(tracker: &mut Tracker<S>, id: String) -> CliResult<String> {
    report(&tracker.dispatch(TrackerCommand::BeginEdit(JobId::from(id))))?;
    let record = tracker
        .edit_target()
        .ok_or("show target vanished before rendering")?;
    let text = render_card_text(&job_card(record));
    tracker.dispatch(TrackerCommand::CancelEdit);
    Ok(text)
}

fn replace_if_given(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *slot = Some(value);
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    match parse_optional_date(value) {
        Ok(Some(date)) => Ok(date),
        Ok(None) => Err("date cannot be empty".to_string()),
        Err(err) => Err(format!("expected YYYY-MM-DD: {err}")),
    }
}

fn parse_status(value: &str) -> Result<JobStatus, String> {
    JobStatus::parse(value).ok_or_else(|| {
        format!("unknown status `{value}`; expected Applied|Interviewing|Offer|Rejected")
    })
}

fn parse_filter(value: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse(value).ok_or_else(|| {
        format!("unknown status `{value}`; expected All|Applied|Interviewing|Offer|Rejected")
    })
}

#[cfg(test)]
mod tests {
    use super::show_record;
    use chrono::NaiveDate;
    use jobtrack_core::{JobApplicationInput, MemoryKvStore, Tracker, TrackerCommand};

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn tracker() -> Tracker<MemoryKvStore> {
        Tracker::open(MemoryKvStore::new(), may_first())
    }

    #[test]
    fn show_prints_the_full_card() {
        let mut tracker = tracker();
        let mut input = JobApplicationInput::new("Acme", "Engineer", may_first());
        input.contact = Some("sam@acme.test".to_string());
        let saved = tracker.dispatch(TrackerCommand::Submit(input)).saved.unwrap();

        let text = show_record(&mut tracker, saved.id.to_string()).unwrap();
        assert!(text.starts_with(&format!("[{}] Acme - Engineer\n", saved.id)));
        assert!(text.contains("  Applied: May 1, 2024\n"));
        assert!(text.contains("  Contact: sam@acme.test\n"));
        assert_eq!(tracker.editing_id(), None);
    }

    #[test]
    fn show_unknown_id_is_an_error() {
        let mut tracker = tracker();
        let err = show_record(&mut tracker, "404".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "Job not found");
    }
}
