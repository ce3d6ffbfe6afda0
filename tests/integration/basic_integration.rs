/// End-to-end tests running the analytics engine and badge awarder against
/// a real SQLite database.
use mindtrack::*;
use chrono::NaiveDate;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn tracker() -> (HabitTracker, NamedTempFile) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let tracker =
        HabitTracker::new(temp_file.path().to_path_buf()).expect("Failed to create tracker");
    (tracker, temp_file)
}

fn log_done(tracker: &HabitTracker, user_id: UserId, habit: &str, date: NaiveDate) -> HabitEntry {
    tracker
        .log_entry(NewEntry::new(user_id, habit, date, None, None).unwrap())
        .unwrap()
}

#[test]
fn test_streak_with_gap_before_last_date() {
    let (tracker, _guard) = tracker();
    let user_id = UserId::new();

    for date in [d(2025, 1, 1), d(2025, 1, 2), d(2025, 1, 3), d(2025, 1, 5)] {
        log_done(&tracker, user_id, "reading", date);
    }

    let summary = tracker.compute_streaks(&user_id, "reading");
    assert_eq!(summary.max_streak, 3);
    assert_eq!(summary.current_streak, 1);
    assert_eq!(summary.last_done_date, Some(d(2025, 1, 5)));
}

#[test]
fn test_seven_day_streak_and_badges() {
    let (tracker, _guard) = tracker();
    let user_id = UserId::new();

    for day in 1..=7 {
        log_done(&tracker, user_id, "reading", d(2025, 1, day));
    }

    let summary = tracker.compute_streaks(&user_id, "reading");
    assert_eq!(summary.current_streak, 7);
    assert_eq!(summary.max_streak, 7);

    let awarded = tracker.check_and_award_streak_badges(&user_id);
    let mut names: Vec<&str> = awarded.iter().map(|b| b.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["3-Day Streak", "7-Day Streak"]);

    let held: Vec<String> = tracker
        .badges(&user_id)
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert!(held.contains(&"3-Day Streak".to_string()));
    assert!(held.contains(&"7-Day Streak".to_string()));
    assert!(!held.contains(&"14-Day Streak".to_string()));
    assert!(!held.contains(&"30-Day Streak".to_string()));
}

#[test]
fn test_completion_rate_window() {
    let (tracker, _guard) = tracker();
    let user_id = UserId::new();

    // 6 done entries and 4 skipped entries inside Jan 1-10, across habits
    for day in 1..=6 {
        log_done(&tracker, user_id, "reading", d(2025, 1, day));
    }
    for day in 7..=10 {
        tracker
            .log_entry(
                NewEntry::new(
                    user_id,
                    "exercise",
                    d(2025, 1, day),
                    Some("skipped".to_string()),
                    None,
                )
                .unwrap(),
            )
            .unwrap();
    }
    // Outside the window; must not count
    log_done(&tracker, user_id, "reading", d(2025, 1, 15));

    let summary = tracker.compute_completion_rate(&user_id, d(2025, 1, 1), d(2025, 1, 10));
    assert_eq!(summary.total_entries, 10);
    assert_eq!(summary.total_done, 6);
    assert!((summary.completion_rate - 0.6).abs() < 1e-9);
}

#[test]
fn test_empty_history() {
    let (tracker, _guard) = tracker();
    let user_id = UserId::new();

    let summary = tracker.compute_streaks(&user_id, "reading");
    assert_eq!(summary.current_streak, 0);
    assert_eq!(summary.max_streak, 0);
    assert_eq!(summary.last_done_date, None);
    assert!(summary.done_dates.is_empty());

    let completion = tracker.compute_completion_rate(&user_id, d(2025, 1, 1), d(2025, 1, 31));
    assert_eq!(completion.total_entries, 0);
    assert_eq!(completion.completion_rate, 0.0);
}

#[test]
fn test_upsert_is_idempotent() {
    let (tracker, _guard) = tracker();
    let user_id = UserId::new();

    let first = log_done(&tracker, user_id, "reading", d(2025, 1, 1));
    let second = tracker
        .log_entry(
            NewEntry::new(
                user_id,
                "reading",
                d(2025, 1, 1),
                Some("skipped".to_string()),
                Some("late edit".to_string()),
            )
            .unwrap(),
        )
        .unwrap();

    // Same identity, overwritten fields
    assert_eq!(first.id, second.id);
    assert_eq!(second.status, "skipped");
    assert_eq!(second.notes.as_deref(), Some("late edit"));

    let entries = tracker.list_entries(&user_id, Some("reading"), None).unwrap();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_duplicate_same_day_checkins_do_not_inflate_streaks() {
    let (tracker, _guard) = tracker();
    let user_id = UserId::new();

    log_done(&tracker, user_id, "reading", d(2025, 1, 1));
    log_done(&tracker, user_id, "reading", d(2025, 1, 2));
    let baseline = tracker.compute_streaks(&user_id, "reading");

    // Re-log an already-done day
    log_done(&tracker, user_id, "reading", d(2025, 1, 2));
    let after = tracker.compute_streaks(&user_id, "reading");

    assert_eq!(baseline.current_streak, after.current_streak);
    assert_eq!(baseline.max_streak, after.max_streak);
    assert_eq!(baseline.done_dates, after.done_dates);
}

#[test]
fn test_badge_check_is_idempotent() {
    let (tracker, _guard) = tracker();
    let user_id = UserId::new();

    for day in 1..=3 {
        log_done(&tracker, user_id, "reading", d(2025, 1, day));
    }

    let first = tracker.check_and_award_streak_badges(&user_id);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].name, "3-Day Streak");

    // No new entries since the last check
    let second = tracker.check_and_award_streak_badges(&user_id);
    assert!(second.is_empty());
}

#[test]
fn test_growing_streak_awards_only_new_milestone() {
    let (tracker, _guard) = tracker();
    let user_id = UserId::new();

    for day in 1..=5 {
        log_done(&tracker, user_id, "reading", d(2025, 1, day));
    }
    let first = tracker.check_and_award_streak_badges(&user_id);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].name, "3-Day Streak");

    for day in 6..=9 {
        log_done(&tracker, user_id, "reading", d(2025, 1, day));
    }
    let second = tracker.check_and_award_streak_badges(&user_id);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].name, "7-Day Streak");
}

#[test]
fn test_custom_badge_duplicate() {
    let (tracker, _guard) = tracker();
    let user_id = UserId::new();

    tracker
        .award_custom_badge(&user_id, "Early Bird", Some("First 6am session".to_string()))
        .unwrap();

    let dup = tracker.award_custom_badge(&user_id, "Early Bird", None);
    assert!(matches!(
        dup,
        Err(AppError::Badge(BadgeError::Duplicate { .. }))
    ));

    let all = tracker.badges(&user_id).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Early Bird");
}

#[test]
fn test_entry_crud_lifecycle() {
    let (tracker, _guard) = tracker();
    let user_id = UserId::new();

    let entry = log_done(&tracker, user_id, "reading", d(2025, 1, 1));

    let fetched = tracker.get_entry(&entry.id).unwrap();
    assert_eq!(fetched.habit_name, "reading");

    let patched = tracker
        .update_entry(
            &entry.id,
            EntryPatch {
                status: Some("missed".to_string()),
                notes: Some(Some("travel day".to_string())),
                timestamp: None,
            },
        )
        .unwrap();
    assert_eq!(patched.status, "missed");

    tracker.delete_entry(&entry.id).unwrap();
    let missing = tracker.get_entry(&entry.id);
    assert!(matches!(
        missing,
        Err(AppError::Storage(StorageError::EntryNotFound { .. }))
    ));
}

#[test]
fn test_streaks_isolated_per_user() {
    let (tracker, _guard) = tracker();
    let alice = UserId::new();
    let bob = UserId::new();

    for day in 1..=4 {
        log_done(&tracker, alice, "reading", d(2025, 1, day));
    }
    log_done(&tracker, bob, "reading", d(2025, 1, 1));

    assert_eq!(tracker.compute_streaks(&alice, "reading").current_streak, 4);
    assert_eq!(tracker.compute_streaks(&bob, "reading").current_streak, 1);

    // Alice's streak must not earn Bob a badge
    let bob_awards = tracker.check_and_award_streak_badges(&bob);
    assert!(bob_awards.is_empty());
}

#[test]
fn test_database_persistence() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_file.path().to_path_buf();
    let user_id = UserId::new();

    {
        let tracker = HabitTracker::new(db_path.clone()).expect("Failed to create tracker");
        for day in 1..=3 {
            log_done(&tracker, user_id, "reading", d(2025, 1, day));
        }
        tracker.check_and_award_streak_badges(&user_id);
    }

    // Reopen and verify both entries and badges survived
    let tracker = HabitTracker::new(db_path).expect("Failed to reopen tracker");
    let summary = tracker.compute_streaks(&user_id, "reading");
    assert_eq!(summary.current_streak, 3);

    let badges = tracker.badges(&user_id).unwrap();
    assert_eq!(badges.len(), 1);
    assert_eq!(badges[0].name, "3-Day Streak");
}
