/// Badge awarding for streak milestones and custom achievements
///
/// The awarder turns the analytics engine's streak output into durable
/// badge records. Milestone awards are idempotent per (user, name):
/// already-held badges are skipped, and all newly-qualifying badges are
/// inserted as one atomic batch so a failure never leaves a partial award.

use thiserror::Error;
use tracing::{debug, error, info};

use crate::analytics::AnalyticsEngine;
use crate::domain::{Badge, UserId};
use crate::storage::{HabitStore, StorageError};

/// Streak lengths (in days) that earn a one-time badge
pub const STREAK_MILESTONES: [u32; 4] = [3, 7, 14, 30];

/// Errors that can occur while awarding badges
#[derive(Error, Debug)]
pub enum BadgeError {
    #[error("Badge '{name}' already exists for user {user_id}")]
    Duplicate { user_id: UserId, name: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Check the user's streaks and award any newly reached milestone badges
///
/// The streak signal is the maximum current streak across every habit the
/// user has logged. For each milestone at or below it, a "{m}-Day Streak"
/// badge is awarded unless the user already holds one. Returns the badges
/// inserted by this call; a failed batch insert is logged and reported as
/// zero awards rather than a partial set.
pub fn check_and_award_streak_badges<S: HabitStore>(
    store: &S,
    user_id: &UserId,
) -> Vec<Badge> {
    let analytics = AnalyticsEngine::new();
    let current_streak = analytics
        .compute_streaks_all(store, user_id)
        .iter()
        .map(|s| s.current_streak)
        .max()
        .unwrap_or(0);

    debug!("User {} current_streak={}", user_id, current_streak);

    let mut awards = Vec::new();
    for milestone in STREAK_MILESTONES {
        if current_streak < milestone {
            continue;
        }
        let badge = Badge::streak_milestone(*user_id, milestone);
        match store.badge_exists(user_id, &badge.name) {
            Ok(true) => {
                debug!("Badge already exists: user={} name={}", user_id, badge.name);
            }
            Ok(false) => awards.push(badge),
            Err(e) => {
                error!(
                    "Existence check failed for user={} name={}: {}",
                    user_id, badge.name, e
                );
            }
        }
    }

    if awards.is_empty() {
        return Vec::new();
    }

    // All-or-nothing: either every new badge persists or none do
    if let Err(e) = store.insert_badges(&awards) {
        error!("Failed to commit awarded badges for user={}: {}", user_id, e);
        return Vec::new();
    }

    for badge in &awards {
        info!("Awarded badge user={} name={}", user_id, badge.name);
    }
    awards
}

/// Award a one-off badge with a caller-chosen name
///
/// Fails with [`BadgeError::Duplicate`] when the user already holds a badge
/// with this name; the insert itself runs in its own transaction.
pub fn award_custom_badge<S: HabitStore>(
    store: &S,
    user_id: &UserId,
    name: &str,
    description: Option<String>,
) -> Result<Badge, BadgeError> {
    if store.badge_exists(user_id, name)? {
        return Err(BadgeError::Duplicate {
            user_id: *user_id,
            name: name.to_string(),
        });
    }

    let badge = Badge::new(*user_id, name, description);
    store.insert_badges(std::slice::from_ref(&badge))?;

    info!("Awarded custom badge to user={} name={}", user_id, name);
    Ok(badge)
}

/// List all badges held by a user, newest first
pub fn get_user_badges<S: HabitStore>(
    store: &S,
    user_id: &UserId,
) -> Result<Vec<Badge>, BadgeError> {
    Ok(store.list_badges(user_id)?)
}
