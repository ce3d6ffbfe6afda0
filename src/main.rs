/// Command-line entry point for the MindTrack analytics engine
///
/// This binary exercises every core operation against a local SQLite
/// database: logging entries, computing streaks and completion rates, and
/// awarding badges. Results are printed as JSON.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use mindtrack::{EntryId, EntryPatch, HabitTracker, NewEntry, UserId};

/// Get the default database path with robust fallback strategy
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    // Try various locations in order of preference
    let potential_paths = [
        // 1. User's home directory (preferred)
        dirs::home_dir().map(|mut p| {
            p.push(".mindtrack");
            p
        }),
        // 2. User's data directory (platform-specific)
        dirs::data_dir().map(|mut p| {
            p.push("mindtrack");
            p
        }),
        // 3. Current working directory (last resort)
        std::env::current_dir().ok().map(|mut p| {
            p.push(".mindtrack");
            p
        }),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if let Ok(()) = std::fs::create_dir_all(potential_path) {
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                let mut db_path = potential_path.clone();
                db_path.push("mindtrack.db");
                return Ok(db_path);
            }
        }
    }

    // Ultimate fallback: use a temporary directory
    let mut temp_path = std::env::temp_dir();
    temp_path.push("mindtrack");
    std::fs::create_dir_all(&temp_path)?;
    temp_path.push("mindtrack.db");

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path)
}

/// Command line arguments for MindTrack
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log a habit check-in (upserts on repeated same-day calls)
    Log {
        #[arg(long)]
        user: String,
        #[arg(long)]
        habit: String,
        /// ISO-8601 date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Status tag; defaults to "done"
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List a user's entries
    Entries {
        #[arg(long)]
        user: String,
        #[arg(long)]
        habit: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Patch an entry's status or notes
    UpdateEntry {
        #[arg(long)]
        id: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete an entry
    DeleteEntry {
        #[arg(long)]
        id: String,
    },
    /// Show streak statistics for one habit
    Streaks {
        #[arg(long)]
        user: String,
        #[arg(long)]
        habit: String,
    },
    /// Show the completion rate over a date window
    Completion {
        #[arg(long)]
        user: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Check streaks and award any newly reached milestone badges
    CheckBadges {
        #[arg(long)]
        user: String,
    },
    /// Award a custom badge
    AwardBadge {
        #[arg(long)]
        user: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List a user's badges
    Badges {
        #[arg(long)]
        user: String,
    },
}

fn parse_user(s: &str) -> Result<UserId, Box<dyn std::error::Error>> {
    Ok(UserId::from_string(s)?)
}

fn parse_date_arg(s: &str) -> Result<chrono::NaiveDate, Box<dyn std::error::Error>> {
    Ok(NewEntry::parse_date(s)?)
}

/// Turn optional --start/--end flags into an inclusive date window
///
/// Both bounds must be given together; a half-specified range is rejected
/// rather than silently ignored.
fn parse_range(
    start: Option<String>,
    end: Option<String>,
) -> Result<Option<(chrono::NaiveDate, chrono::NaiveDate)>, mindtrack::DomainError> {
    match (start, end) {
        (Some(s), Some(e)) => Ok(Some((NewEntry::parse_date(&s)?, NewEntry::parse_date(&e)?))),
        (None, None) => Ok(None),
        _ => Err(mindtrack::DomainError::Validation {
            message: "--start and --end must be given together".to_string(),
        }),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("mindtrack={}", log_level))
        .with_writer(std::io::stderr) // Send logs to stderr, not stdout
        .init();

    // Determine database path
    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let tracker = HabitTracker::new(db_path)?;

    match args.command {
        Command::Log {
            user,
            habit,
            date,
            status,
            notes,
        } => {
            let user_id = parse_user(&user)?;
            let date = match date {
                Some(s) => parse_date_arg(&s)?,
                None => chrono::Utc::now().naive_utc().date(),
            };
            let entry = tracker.log_entry(NewEntry::new(user_id, habit, date, status, notes)?)?;
            print_json(&entry)?;
        }
        Command::Entries {
            user,
            habit,
            start,
            end,
        } => {
            let user_id = parse_user(&user)?;
            let range = parse_range(start, end)?;
            let entries = tracker.list_entries(&user_id, habit.as_deref(), range)?;
            print_json(&entries)?;
        }
        Command::UpdateEntry { id, status, notes } => {
            let entry_id = EntryId::from_string(&id)?;
            let patch = EntryPatch {
                status,
                notes: notes.map(Some),
                timestamp: None,
            };
            let entry = tracker.update_entry(&entry_id, patch)?;
            print_json(&entry)?;
        }
        Command::DeleteEntry { id } => {
            let entry_id = EntryId::from_string(&id)?;
            tracker.delete_entry(&entry_id)?;
            println!("deleted {}", entry_id);
        }
        Command::Streaks { user, habit } => {
            let user_id = parse_user(&user)?;
            let summary = tracker.compute_streaks(&user_id, &habit);
            print_json(&summary)?;
        }
        Command::Completion { user, start, end } => {
            let user_id = parse_user(&user)?;
            let summary = tracker.compute_completion_rate(
                &user_id,
                parse_date_arg(&start)?,
                parse_date_arg(&end)?,
            );
            print_json(&summary)?;
        }
        Command::CheckBadges { user } => {
            let user_id = parse_user(&user)?;
            let awarded = tracker.check_and_award_streak_badges(&user_id);
            print_json(&awarded)?;
        }
        Command::AwardBadge {
            user,
            name,
            description,
        } => {
            let user_id = parse_user(&user)?;
            let badge = tracker.award_custom_badge(&user_id, &name, description)?;
            print_json(&badge)?;
        }
        Command::Badges { user } => {
            let user_id = parse_user(&user)?;
            let badges = tracker.badges(&user_id)?;
            print_json(&badges)?;
        }
    }

    Ok(())
}
