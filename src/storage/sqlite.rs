/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habit entries and badges. It handles all SQL queries
/// and data conversion.

use std::path::PathBuf;
use rusqlite::{params, Connection, Row};
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{Badge, BadgeId, EntryId, EntryPatch, HabitEntry, NewEntry, UserId};
use crate::storage::{migrations, HabitStore, StorageError};

/// SQLite-based storage implementation
///
/// Holds a connection to the SQLite database and implements all the
/// storage operations defined in the HabitStore trait.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// Create an in-memory storage instance (used by tests)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        migrations::initialize_database(&conn)?;
        Ok(Self { conn })
    }

    /// Map a habit_entries row to a HabitEntry
    fn map_entry_row(row: &Row<'_>) -> rusqlite::Result<HabitEntry> {
        let id_str: String = row.get(0)?;
        let id = EntryId::from_string(&id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let user_id_str: String = row.get(1)?;
        let user_id = UserId::from_string(&user_id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(1, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let date_str: String = row.get(3)?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
            rusqlite::Error::InvalidColumnType(3, "Invalid date".to_string(), rusqlite::types::Type::Text)
        })?;

        let timestamp_str: String = row.get(6)?;
        let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
            .map_err(|_| {
                rusqlite::Error::InvalidColumnType(6, "Invalid datetime".to_string(), rusqlite::types::Type::Text)
            })?
            .with_timezone(&Utc);

        Ok(HabitEntry::from_existing(
            id,
            user_id,
            row.get(2)?, // habit_name
            date,
            row.get(4)?, // status
            row.get(5)?, // notes
            timestamp,
        ))
    }

    /// Map a badges row to a Badge
    fn map_badge_row(row: &Row<'_>) -> rusqlite::Result<Badge> {
        let id_str: String = row.get(0)?;
        let id = BadgeId::from_string(&id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let user_id_str: String = row.get(1)?;
        let user_id = UserId::from_string(&user_id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(1, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let awarded_at_str: String = row.get(4)?;
        let awarded_at = DateTime::parse_from_rfc3339(&awarded_at_str)
            .map_err(|_| {
                rusqlite::Error::InvalidColumnType(4, "Invalid datetime".to_string(), rusqlite::types::Type::Text)
            })?
            .with_timezone(&Utc);

        Ok(Badge::from_existing(
            id,
            user_id,
            row.get(2)?, // name
            row.get(3)?, // description
            awarded_at,
        ))
    }
}

impl HabitStore for SqliteStore {
    /// Query a user's entries, ascending by date
    fn query_entries(
        &self,
        user_id: &UserId,
        habit_name: Option<&str>,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<HabitEntry>, StorageError> {
        let mut sql = "SELECT id, user_id, habit_name, date, status, notes, timestamp
             FROM habit_entries WHERE user_id = ?1"
            .to_string();
        let mut bound: Vec<String> = vec![user_id.to_string()];

        if let Some(name) = habit_name {
            bound.push(name.to_string());
            sql.push_str(&format!(" AND habit_name = ?{}", bound.len()));
        }
        if let Some((start, end)) = range {
            bound.push(start.to_string());
            sql.push_str(&format!(" AND date >= ?{}", bound.len()));
            bound.push(end.to_string());
            sql.push_str(&format!(" AND date <= ?{}", bound.len()));
        }
        sql.push_str(" ORDER BY date ASC, timestamp ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let entry_iter =
            stmt.query_map(rusqlite::params_from_iter(bound.iter()), Self::map_entry_row)?;

        let mut entries = Vec::new();
        for entry in entry_iter {
            entries.push(entry?);
        }

        Ok(entries)
    }

    /// Get a single entry by ID
    fn get_entry(&self, entry_id: &EntryId) -> Result<HabitEntry, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, habit_name, date, status, notes, timestamp
             FROM habit_entries WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![entry_id.to_string()], Self::map_entry_row);

        match result {
            Ok(entry) => Ok(entry),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::EntryNotFound {
                entry_id: entry_id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// Insert or update an entry keyed by (user, habit name, date)
    fn upsert_entry(&self, entry: NewEntry) -> Result<HabitEntry, StorageError> {
        let now = Utc::now();

        let existing: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM habit_entries
                 WHERE user_id = ?1 AND habit_name = ?2 AND date = ?3",
                params![
                    entry.user_id.to_string(),
                    entry.habit_name,
                    entry.date.to_string()
                ],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(StorageError::Query(other)),
            })?;

        if let Some(id_str) = existing {
            // Overwrite mutable fields in place, keeping the entry's identity
            self.conn.execute(
                "UPDATE habit_entries SET status = ?2, notes = ?3, timestamp = ?4 WHERE id = ?1",
                params![id_str, entry.status, entry.notes, now.to_rfc3339()],
            )?;

            let id = EntryId::from_string(&id_str).map_err(|_| {
                StorageError::Connection(format!("Corrupt entry id in database: {}", id_str))
            })?;
            tracing::debug!(
                "Upsert updated entry {} for {}/{} on {}",
                id,
                entry.user_id,
                entry.habit_name,
                entry.date
            );
            return self.get_entry(&id);
        }

        let id = EntryId::new();
        self.conn.execute(
            "INSERT INTO habit_entries (id, user_id, habit_name, date, status, notes, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id.to_string(),
                entry.user_id.to_string(),
                entry.habit_name,
                entry.date.to_string(),
                entry.status,
                entry.notes,
                now.to_rfc3339()
            ],
        )?;

        tracing::debug!(
            "Upsert created entry {} for {}/{} on {}",
            id,
            entry.user_id,
            entry.habit_name,
            entry.date
        );

        Ok(HabitEntry::from_existing(
            id,
            entry.user_id,
            entry.habit_name,
            entry.date,
            entry.status,
            entry.notes,
            now,
        ))
    }

    /// Patch an existing entry's mutable fields
    fn update_entry(
        &self,
        entry_id: &EntryId,
        patch: EntryPatch,
    ) -> Result<HabitEntry, StorageError> {
        let mut entry = self.get_entry(entry_id)?;

        if let Some(status) = patch.status {
            entry.status = status;
        }
        if let Some(notes) = patch.notes {
            entry.notes = notes;
        }
        entry.timestamp = patch.timestamp.unwrap_or_else(Utc::now);

        let rows_affected = self.conn.execute(
            "UPDATE habit_entries SET status = ?2, notes = ?3, timestamp = ?4 WHERE id = ?1",
            params![
                entry_id.to_string(),
                entry.status,
                entry.notes,
                entry.timestamp.to_rfc3339()
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::EntryNotFound {
                entry_id: entry_id.to_string(),
            });
        }

        tracing::debug!("Updated entry: {}", entry_id);
        Ok(entry)
    }

    /// Delete an entry by ID
    fn delete_entry(&self, entry_id: &EntryId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM habit_entries WHERE id = ?1",
            params![entry_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::EntryNotFound {
                entry_id: entry_id.to_string(),
            });
        }

        tracing::debug!("Deleted entry: {}", entry_id);
        Ok(())
    }

    /// Check whether the user already holds a badge with this name
    fn badge_exists(&self, user_id: &UserId, name: &str) -> Result<bool, StorageError> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM badges WHERE user_id = ?1 AND name = ?2 LIMIT 1",
                params![user_id.to_string(), name],
                |_| Ok(()),
            )
            .map(|_| true)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(false),
                other => Err(StorageError::Query(other)),
            })?;

        tracing::debug!("badge_exists user={} name={} => {}", user_id, name, exists);
        Ok(exists)
    }

    /// Insert a batch of badges in a single transaction
    fn insert_badges(&self, badges: &[Badge]) -> Result<(), StorageError> {
        if badges.is_empty() {
            return Ok(());
        }

        let tx = self.conn.unchecked_transaction()?;
        for badge in badges {
            tx.execute(
                "INSERT INTO badges (id, user_id, name, description, awarded_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    badge.id.to_string(),
                    badge.user_id.to_string(),
                    badge.name,
                    badge.description,
                    badge.awarded_at.to_rfc3339()
                ],
            )?;
        }
        tx.commit()?;

        tracing::debug!("Inserted {} badge(s)", badges.len());
        Ok(())
    }

    /// List a user's badges, newest first
    fn list_badges(&self, user_id: &UserId) -> Result<Vec<Badge>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, description, awarded_at
             FROM badges WHERE user_id = ?1 ORDER BY awarded_at DESC, name ASC",
        )?;

        let badge_iter = stmt.query_map(params![user_id.to_string()], Self::map_badge_row)?;

        let mut badges = Vec::new();
        for badge in badge_iter {
            badges.push(badge?);
        }

        Ok(badges)
    }
}
