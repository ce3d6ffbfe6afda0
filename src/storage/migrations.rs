/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has all the required tables and indexes.

use rusqlite::Connection;
use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// It also sets up the version tracking for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    // Create version tracking table first
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .unwrap_or(0); // Default to version 0 if no version record exists

    Ok(version)
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    // Future migrations would go here:
    // if from_version < 2 {
    //     migration_v2(conn)?;
    // }

    Ok(())
}

/// Migration to version 1: Create initial tables
///
/// This creates the core tables for habit entries and badges
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    // Create habit_entries table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habit_entries (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            habit_name TEXT NOT NULL,
            date TEXT NOT NULL,
            status TEXT NOT NULL,
            notes TEXT,
            timestamp TEXT NOT NULL
        )",
        [],
    )?;

    // Create badges table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS badges (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            awarded_at TEXT NOT NULL
        )",
        [],
    )?;

    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

/// Create database indexes for version 1
fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    // Index for the most common query: a user's entries for one habit
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habit_entries_user_habit
         ON habit_entries (user_id, habit_name, date)",
        [],
    )?;

    // Index for windowed queries across all of a user's habits
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habit_entries_user_date
         ON habit_entries (user_id, date)",
        [],
    )?;

    // One entry per (user, habit, day); the upsert path relies on this
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_habit_entries_unique
         ON habit_entries (user_id, habit_name, date)",
        [],
    )?;

    // At most one badge per (user, name). Concurrent award checks that both
    // pass the existence check hit this index, aborting one batch.
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_badges_unique
         ON badges (user_id, name)",
        [],
    )?;

    tracing::info!("Created database indexes for v1");
    Ok(())
}
