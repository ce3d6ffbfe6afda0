/// Badge entity for milestone and custom awards
///
/// A badge is an earned, durable record: created once, never updated or
/// deleted by this crate. Uniqueness of (user, name) is the central
/// invariant, backed by a unique index at the storage layer.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::domain::{BadgeId, UserId};

/// An awarded badge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    /// Unique identifier for this badge
    pub id: BadgeId,
    /// Which user earned it
    pub user_id: UserId,
    /// Badge name, unique per user
    pub name: String,
    /// Optional human-readable description
    pub description: Option<String>,
    /// When the badge was awarded
    pub awarded_at: DateTime<Utc>,
}

impl Badge {
    /// Create a new badge with a fresh identity and the current timestamp
    pub fn new(user_id: UserId, name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: BadgeId::new(),
            user_id,
            name: name.into(),
            description,
            awarded_at: Utc::now(),
        }
    }

    /// Create the canonical milestone badge for a streak length
    ///
    /// Milestone badges are always named "{m}-Day Streak"; the existence
    /// check in the awarder relies on this exact form.
    pub fn streak_milestone(user_id: UserId, milestone: u32) -> Self {
        Self::new(
            user_id,
            format!("{}-Day Streak", milestone),
            Some(format!(
                "Awarded for maintaining a {}-day streak.",
                milestone
            )),
        )
    }

    /// Create a badge from existing data (used when loading from database)
    pub fn from_existing(
        id: BadgeId,
        user_id: UserId,
        name: String,
        description: Option<String>,
        awarded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            description,
            awarded_at,
        }
    }
}
