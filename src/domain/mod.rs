/// Domain module containing core business logic and data types
///
/// This module defines the core entities (HabitEntry, Badge) and the pure
/// analytics types (StreakSummary, CompletionSummary) along with their
/// validation rules.

pub mod badge;
pub mod entry;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use badge::*;
pub use entry::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
