/// Public library interface for the MindTrack analytics engine
///
/// This module exports the facade type that owns the SQLite store and the
/// analytics engine, plus the public domain types used by callers and
/// tests.

use std::path::PathBuf;
use chrono::NaiveDate;
use thiserror::Error;

// Internal modules
mod analytics;
mod badges;
mod domain;
mod storage;

// Re-export public modules and types
pub use analytics::AnalyticsEngine;
pub use badges::{BadgeError, STREAK_MILESTONES};
pub use domain::*;
pub use storage::{HabitStore, SqliteStore, StorageError};

/// Errors that can occur at the application boundary
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("Badge error: {0}")]
    Badge(#[from] badges::BadgeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Habit analytics facade over a SQLite store
///
/// Owns the storage handle and analytics engine and exposes the public
/// operations: entry upsert/CRUD, streak and completion computation, and
/// badge awarding.
pub struct HabitTracker {
    store: SqliteStore,
    analytics: AnalyticsEngine,
}

impl HabitTracker {
    /// Open (or create) the database at the given path
    pub fn new(db_path: PathBuf) -> Result<Self, AppError> {
        tracing::info!("Initializing MindTrack with database: {:?}", db_path);

        let store = SqliteStore::new(db_path)?;
        let analytics = AnalyticsEngine::new();

        Ok(Self { store, analytics })
    }

    /// Build a tracker over an already-opened store (used by tests)
    pub fn with_store(store: SqliteStore) -> Self {
        Self {
            store,
            analytics: AnalyticsEngine::new(),
        }
    }

    /// Create or update the entry for (user, habit, date)
    ///
    /// Repeated same-day check-ins overwrite the existing record instead of
    /// duplicating it.
    pub fn log_entry(&self, entry: NewEntry) -> Result<HabitEntry, AppError> {
        Ok(self.store.upsert_entry(entry)?)
    }

    /// Fetch one entry by ID
    pub fn get_entry(&self, entry_id: &EntryId) -> Result<HabitEntry, AppError> {
        Ok(self.store.get_entry(entry_id)?)
    }

    /// Patch an entry's status, notes, or timestamp
    pub fn update_entry(
        &self,
        entry_id: &EntryId,
        patch: EntryPatch,
    ) -> Result<HabitEntry, AppError> {
        Ok(self.store.update_entry(entry_id, patch)?)
    }

    /// Delete an entry by ID
    pub fn delete_entry(&self, entry_id: &EntryId) -> Result<(), AppError> {
        Ok(self.store.delete_entry(entry_id)?)
    }

    /// List a user's entries, optionally narrowed to a habit and date window
    pub fn list_entries(
        &self,
        user_id: &UserId,
        habit_name: Option<&str>,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<HabitEntry>, AppError> {
        Ok(self.store.query_entries(user_id, habit_name, range)?)
    }

    /// Compute streak statistics for one (user, habit) pair
    pub fn compute_streaks(&self, user_id: &UserId, habit_name: &str) -> StreakSummary {
        self.analytics.compute_streaks(&self.store, user_id, habit_name)
    }

    /// Compute streak statistics for every habit the user has logged
    pub fn compute_streaks_all(&self, user_id: &UserId) -> Vec<StreakSummary> {
        self.analytics.compute_streaks_all(&self.store, user_id)
    }

    /// Compute the completion rate over an inclusive date window
    pub fn compute_completion_rate(
        &self,
        user_id: &UserId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> CompletionSummary {
        self.analytics
            .compute_completion_rate(&self.store, user_id, start_date, end_date)
    }

    /// Award any newly reached streak milestone badges
    pub fn check_and_award_streak_badges(&self, user_id: &UserId) -> Vec<Badge> {
        badges::check_and_award_streak_badges(&self.store, user_id)
    }

    /// Award a one-off badge; fails if the user already holds the name
    pub fn award_custom_badge(
        &self,
        user_id: &UserId,
        name: &str,
        description: Option<String>,
    ) -> Result<Badge, AppError> {
        Ok(badges::award_custom_badge(&self.store, user_id, name, description)?)
    }

    /// List a user's badges, newest first
    pub fn badges(&self, user_id: &UserId) -> Result<Vec<Badge>, AppError> {
        Ok(badges::get_user_badges(&self.store, user_id)?)
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn store(&self) -> &SqliteStore {
        &self.store
    }
}
