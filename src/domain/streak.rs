/// Streak and completion-rate calculation
///
/// This module holds the pure analytics types: `StreakSummary` derives
/// current/longest contiguous-day streaks from a habit's done-dates, and
/// `CompletionSummary` derives a done/total ratio over a date window.
/// Both are recomputed from entries on every request and never persisted.

use serde::{Deserialize, Serialize};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;
use crate::domain::{HabitEntry, UserId};

/// Streak statistics for one (user, habit) pair
///
/// `current_streak` measures the run of consecutive days ending at the most
/// recent done-date on record, not necessarily ending today. Callers that
/// need "is the user active right now" must also check `last_done_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Which user this summary is for
    pub user_id: UserId,
    /// Which habit this summary is for
    pub habit_name: String,
    /// Consecutive days ending at the last recorded done-date
    pub current_streak: u32,
    /// Longest run of consecutive done-dates ever recorded
    pub max_streak: u32,
    /// Most recent done-date (None if the habit was never done)
    pub last_done_date: Option<NaiveDate>,
    /// All done-dates, deduplicated and ascending
    pub done_dates: Vec<NaiveDate>,
}

impl StreakSummary {
    /// Create an empty summary for a habit with no completions
    pub fn empty(user_id: UserId, habit_name: impl Into<String>) -> Self {
        Self {
            user_id,
            habit_name: habit_name.into(),
            current_streak: 0,
            max_streak: 0,
            last_done_date: None,
            done_dates: Vec::new(),
        }
    }

    /// Derive a summary from a habit's entries
    ///
    /// Only entries whose status is "done" (case-insensitive) contribute.
    /// Two entries on the same date count once, so the result is invariant
    /// to duplicate same-day check-ins.
    pub fn from_entries(
        user_id: UserId,
        habit_name: impl Into<String>,
        entries: &[HabitEntry],
    ) -> Self {
        let done_dates: BTreeSet<NaiveDate> = entries
            .iter()
            .filter(|e| e.is_done())
            .map(|e| e.date)
            .collect();

        Self::from_done_dates(user_id, habit_name, done_dates.into_iter().collect())
    }

    /// Derive a summary from an already-filtered list of done-dates
    ///
    /// Dates are deduplicated and sorted here, so any order is accepted.
    pub fn from_done_dates(
        user_id: UserId,
        habit_name: impl Into<String>,
        dates: Vec<NaiveDate>,
    ) -> Self {
        let sorted: BTreeSet<NaiveDate> = dates.into_iter().collect();
        let done_dates: Vec<NaiveDate> = sorted.into_iter().collect();

        let (current_streak, max_streak) = calculate_streaks(&done_dates);
        let last_done_date = done_dates.last().copied();

        Self {
            user_id,
            habit_name: habit_name.into(),
            current_streak,
            max_streak,
            last_done_date,
            done_dates,
        }
    }
}

/// Compute (current_streak, max_streak) from a sorted, deduplicated
/// ascending date list
///
/// A run continues while each date is exactly one day after its
/// predecessor. Any non-empty list yields streaks of at least 1; the
/// current streak is the run ending at the last date in the list.
fn calculate_streaks(dates: &[NaiveDate]) -> (u32, u32) {
    if dates.is_empty() {
        return (0, 0);
    }

    let one_day = Duration::days(1);

    // Max streak: forward scan tracking the longest run
    let mut max_streak = 1u32;
    let mut run = 1u32;
    for window in dates.windows(2) {
        if window[1] == window[0] + one_day {
            run += 1;
        } else {
            max_streak = max_streak.max(run);
            run = 1;
        }
    }
    max_streak = max_streak.max(run);

    // Current streak: walk backwards from the most recent date
    let mut current_streak = 1u32;
    for window in dates.windows(2).rev() {
        if window[1] == window[0] + one_day {
            current_streak += 1;
        } else {
            break;
        }
    }

    (current_streak, max_streak)
}

/// Completion statistics for one user over an inclusive date window
///
/// Aggregates across all of the user's habits. Days with no entries do not
/// enter the denominator; a window with zero entries reports a rate of 0.0
/// rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub user_id: UserId,
    /// Window start (inclusive)
    pub start_date: NaiveDate,
    /// Window end (inclusive)
    pub end_date: NaiveDate,
    /// Entries of any status inside the window
    pub total_entries: u32,
    /// Entries with status "done" inside the window
    pub total_done: u32,
    /// total_done / total_entries, 0.0 when the window is empty
    pub completion_rate: f64,
}

impl CompletionSummary {
    /// Derive a summary from entries already filtered to the user and window
    pub fn from_entries(
        user_id: UserId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        entries: &[HabitEntry],
    ) -> Self {
        let total_entries = entries.len() as u32;
        let total_done = entries.iter().filter(|e| e.is_done()).count() as u32;
        let completion_rate = if total_entries > 0 {
            f64::from(total_done) / f64::from(total_entries)
        } else {
            0.0
        };

        Self {
            user_id,
            start_date,
            end_date,
            total_entries,
            total_done,
            completion_rate,
        }
    }
}
