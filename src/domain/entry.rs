/// HabitEntry entity for per-day habit check-ins
///
/// An entry records that a user logged a habit on a specific calendar day,
/// with a status tag and optional notes. At most one entry exists per
/// (user, habit name, date); repeated check-ins for the same day are
/// folded into the existing record by the storage layer's upsert.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{DomainError, EntryId, UserId};

/// The status value that counts toward streaks and completion rates.
/// Comparison is case-insensitive; any other tag ("skipped", "partial", ...)
/// is kept verbatim but never treated as a completion.
pub const STATUS_DONE: &str = "done";

/// A record of a user logging a habit on a specific day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitEntry {
    /// Unique identifier for this entry
    pub id: EntryId,
    /// Which user logged this entry
    pub user_id: UserId,
    /// Free-text habit label; entries for the same habit share this name
    pub habit_name: String,
    /// Which calendar day this entry is for (no time component)
    pub date: NaiveDate,
    /// Status tag; "done" (case-insensitive) is the significant value
    pub status: String,
    /// User's notes about this check-in
    pub notes: Option<String>,
    /// When this entry was last written
    pub timestamp: DateTime<Utc>,
}

impl HabitEntry {
    /// Create an entry from existing data (used when loading from database)
    pub fn from_existing(
        id: EntryId,
        user_id: UserId,
        habit_name: String,
        date: NaiveDate,
        status: String,
        notes: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            habit_name,
            date,
            status,
            notes,
            timestamp,
        }
    }

    /// Whether this entry counts as a completion
    pub fn is_done(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_DONE)
    }
}

/// Validated input for creating or upserting a habit entry
///
/// The storage layer turns this into a new `HabitEntry`, or folds it into
/// an existing one when (user, habit name, date) already has a record.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEntry {
    pub user_id: UserId,
    pub habit_name: String,
    pub date: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
}

impl NewEntry {
    /// Build a validated entry input
    ///
    /// `habit_name` must be non-empty; `status` defaults to "done" when not
    /// given. The date may be passed as an ISO-8601 string via
    /// [`NewEntry::parse_date`].
    pub fn new(
        user_id: UserId,
        habit_name: impl Into<String>,
        date: NaiveDate,
        status: Option<String>,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        let habit_name = habit_name.into();
        if habit_name.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "habit_name is required".to_string(),
            });
        }
        Self::validate_notes(&notes)?;

        Ok(Self {
            user_id,
            habit_name,
            date,
            status: status.unwrap_or_else(|| STATUS_DONE.to_string()),
            notes,
        })
    }

    /// Parse an ISO-8601 (YYYY-MM-DD) date string
    pub fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| DomainError::InvalidDate(format!("not an ISO-8601 date: {}", s)))
    }

    fn validate_notes(notes: &Option<String>) -> Result<(), DomainError> {
        if let Some(note_text) = notes {
            if note_text.len() > 500 {
                return Err(DomainError::InvalidValue {
                    message: "Notes cannot be longer than 500 characters".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Field-level patch for an existing entry
///
/// Only status, notes, and timestamp are mutable after creation; identity
/// fields (user, habit name, date) never change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryPatch {
    pub status: Option<String>,
    pub notes: Option<Option<String>>,
    pub timestamp: Option<DateTime<Utc>>,
}
