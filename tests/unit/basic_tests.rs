/// Basic unit tests to verify core functionality
use mindtrack::*;
use chrono::NaiveDate;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn test_new_entry_creation() {
    let user_id = UserId::new();
    let entry = NewEntry::new(user_id, "meditation", d(2025, 1, 5), None, None);

    assert!(entry.is_ok());
    let entry = entry.unwrap();
    assert_eq!(entry.user_id, user_id);
    assert_eq!(entry.habit_name, "meditation");
    assert_eq!(entry.status, "done");
}

#[test]
fn test_new_entry_requires_habit_name() {
    let result = NewEntry::new(UserId::new(), "", d(2025, 1, 5), None, None);
    assert!(result.is_err());
}

#[test]
fn test_streak_summary_from_done_dates() {
    let summary = StreakSummary::from_done_dates(
        UserId::new(),
        "reading",
        vec![d(2025, 1, 1), d(2025, 1, 2), d(2025, 1, 3), d(2025, 1, 5)],
    );

    assert_eq!(summary.max_streak, 3);
    assert_eq!(summary.current_streak, 1);
    assert_eq!(summary.last_done_date, Some(d(2025, 1, 5)));
    assert_eq!(summary.done_dates.len(), 4);
}

#[test]
fn test_milestone_badge_names() {
    for milestone in STREAK_MILESTONES {
        let badge = Badge::streak_milestone(UserId::new(), milestone);
        assert_eq!(badge.name, format!("{}-Day Streak", milestone));
    }
}

#[test]
fn test_storage_creation() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let storage = SqliteStore::new(temp_file.path().to_path_buf());
    assert!(storage.is_ok());
}

#[test]
fn test_tracker_creation() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let tracker = HabitTracker::new(temp_file.path().to_path_buf());
    assert!(tracker.is_ok());
}

#[test]
fn test_tracker_over_in_memory_store() {
    let store = SqliteStore::open_in_memory().expect("Failed to open in-memory store");
    let tracker = HabitTracker::with_store(store);
    let user_id = UserId::new();

    for day in 1..=3 {
        tracker
            .log_entry(NewEntry::new(user_id, "reading", d(2025, 1, day), None, None).unwrap())
            .unwrap();
    }

    let summary = tracker.compute_streaks(&user_id, "reading");
    assert_eq!(summary.current_streak, 3);
    assert_eq!(summary.max_streak, 3);
}

#[test]
fn test_analytics_engine_empty_user() {
    let store = SqliteStore::open_in_memory().expect("Failed to open in-memory store");
    let analytics = AnalyticsEngine::new();

    let summary = analytics.compute_streaks(&store, &UserId::new(), "anything");
    assert_eq!(summary.current_streak, 0);
    assert_eq!(summary.max_streak, 0);
}
