/// Analytics engine for streak and completion-rate computation
///
/// This module recomputes streak and completion summaries from the stored
/// entry history on every request. Reads degrade gracefully: a failed
/// store query is logged and treated as an empty history, so analytics
/// callers always get a well-formed (possibly zeroed) summary.

use std::collections::BTreeSet;
use chrono::NaiveDate;

use crate::domain::{CompletionSummary, HabitEntry, StreakSummary, UserId};
use crate::storage::HabitStore;

/// Analytics engine for processing habit data
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    /// Create a new analytics engine
    pub fn new() -> Self {
        Self
    }

    /// Compute streak statistics for one (user, habit) pair
    ///
    /// Only entries with status "done" (case-insensitive) count; same-day
    /// duplicates are folded into one done-date.
    pub fn compute_streaks<S: HabitStore>(
        &self,
        store: &S,
        user_id: &UserId,
        habit_name: &str,
    ) -> StreakSummary {
        let entries = self.read_entries(store, user_id, Some(habit_name), None);
        StreakSummary::from_entries(*user_id, habit_name, &entries)
    }

    /// Compute streak statistics for every habit the user has logged
    ///
    /// Returns one summary per distinct habit name, in name order. This is
    /// the streak signal the badge awarder consumes.
    pub fn compute_streaks_all<S: HabitStore>(
        &self,
        store: &S,
        user_id: &UserId,
    ) -> Vec<StreakSummary> {
        let entries = self.read_entries(store, user_id, None, None);

        let habit_names: BTreeSet<&str> =
            entries.iter().map(|e| e.habit_name.as_str()).collect();

        habit_names
            .into_iter()
            .map(|name| {
                let habit_entries: Vec<HabitEntry> = entries
                    .iter()
                    .filter(|e| e.habit_name == name)
                    .cloned()
                    .collect();
                StreakSummary::from_entries(*user_id, name, &habit_entries)
            })
            .collect()
    }

    /// Compute the completion rate over an inclusive date window
    ///
    /// Aggregates entries of every habit and status for the user; the rate
    /// is done/total, or 0.0 for an empty window.
    pub fn compute_completion_rate<S: HabitStore>(
        &self,
        store: &S,
        user_id: &UserId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> CompletionSummary {
        let entries = self.read_entries(store, user_id, None, Some((start_date, end_date)));
        CompletionSummary::from_entries(*user_id, start_date, end_date, &entries)
    }

    /// Read entries, treating storage failures as an empty history
    fn read_entries<S: HabitStore>(
        &self,
        store: &S,
        user_id: &UserId,
        habit_name: Option<&str>,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Vec<HabitEntry> {
        match store.query_entries(user_id, habit_name, range) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    "Entry query failed for user {} (habit {:?}): {}; treating as empty",
                    user_id,
                    habit_name,
                    e
                );
                Vec::new()
            }
        }
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}
