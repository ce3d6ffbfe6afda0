/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. It provides
/// a clean interface for storing and retrieving habit entries and badges.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use chrono::NaiveDate;
use thiserror::Error;
use crate::domain::{Badge, EntryId, EntryPatch, HabitEntry, NewEntry, UserId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit entry not found: {entry_id}")]
    EntryNotFound { entry_id: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for entries and badges
///
/// The analytics engine and badge awarder only see this trait, which keeps
/// them testable against in-memory databases and leaves room for other
/// backends.
pub trait HabitStore {
    /// Query a user's entries, ascending by date
    ///
    /// `habit_name` narrows to one habit; `range` is an inclusive date
    /// window. Both filters are optional and compose.
    fn query_entries(
        &self,
        user_id: &UserId,
        habit_name: Option<&str>,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<HabitEntry>, StorageError>;

    /// Get a single entry by ID
    fn get_entry(&self, entry_id: &EntryId) -> Result<HabitEntry, StorageError>;

    /// Insert or update an entry keyed by (user, habit name, date)
    ///
    /// When a record already exists for the natural key, its status, notes,
    /// and timestamp are overwritten in place and its identity is kept.
    /// Repeated same-day check-ins are therefore idempotent.
    fn upsert_entry(&self, entry: NewEntry) -> Result<HabitEntry, StorageError>;

    /// Patch an existing entry's mutable fields (status, notes, timestamp)
    fn update_entry(
        &self,
        entry_id: &EntryId,
        patch: EntryPatch,
    ) -> Result<HabitEntry, StorageError>;

    /// Delete an entry by ID
    fn delete_entry(&self, entry_id: &EntryId) -> Result<(), StorageError>;

    /// Check whether the user already holds a badge with this name
    fn badge_exists(&self, user_id: &UserId, name: &str) -> Result<bool, StorageError>;

    /// Insert a batch of badges in a single transaction
    ///
    /// Either every badge in the batch persists or none do. A uniqueness
    /// violation on (user_id, name) aborts the whole batch.
    fn insert_badges(&self, badges: &[Badge]) -> Result<(), StorageError>;

    /// List a user's badges, newest first
    fn list_badges(&self, user_id: &UserId) -> Result<Vec<Badge>, StorageError>;
}
