//! Points ledger
//!
//! An award is one transaction: point totals, the activity row, the level
//! update with its level-up entry and milestone badges, and the achievement
//! check. Any failure rolls everything back, so there is no partial credit.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};
use tresor_common::db::{Achievement, ActivityType, UserPoints};

use crate::achievements::check_achievements;
use crate::db;
use crate::db::activities::NewActivity;
use crate::error::{Error, Result};
use crate::levels::{milestone_badge_name, LevelProgress, LevelState};

/// Longest accepted user id
pub const MAX_USER_ID_LEN: usize = 128;

/// Largest amount a single award may credit
pub const MAX_AWARD_POINTS: i64 = 1_000_000;

/// Request to credit a user for an activity
#[derive(Debug, Clone)]
pub struct AwardRequest {
    pub user_id: String,
    pub activity_type: ActivityType,
    /// Defaults to the activity type's default points
    pub points: Option<i64>,
    pub entity_id: Option<String>,
    pub details: Option<serde_json::Value>,
}

/// Everything an award changed
#[derive(Debug, Clone, Serialize)]
pub struct AwardOutcome {
    pub user_id: String,
    pub activity_type: ActivityType,
    pub points_awarded: i64,
    pub points: UserPoints,
    pub level: LevelProgress,
    pub total_xp: i64,
    pub badges_awarded: Vec<String>,
    pub achievements_unlocked: Vec<Achievement>,
}

/// Reject empty or oversized user ids
pub fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(Error::InvalidInput("user_id must not be empty".to_string()));
    }
    if user_id.len() > MAX_USER_ID_LEN {
        return Err(Error::InvalidInput(format!(
            "user_id longer than {} characters",
            MAX_USER_ID_LEN
        )));
    }
    Ok(())
}

/// Credit points to a user and apply every consequence
pub async fn award_points(pool: &SqlitePool, request: AwardRequest) -> Result<AwardOutcome> {
    validate_user_id(&request.user_id)?;

    let category = request.activity_type.category().ok_or_else(|| {
        Error::InvalidInput(format!(
            "Activity type '{}' cannot be awarded directly",
            request.activity_type.as_str()
        ))
    })?;

    let points = request
        .points
        .unwrap_or_else(|| request.activity_type.default_points());
    if points < 0 {
        return Err(Error::InvalidInput(format!(
            "points must not be negative (got {})",
            points
        )));
    }
    if points > MAX_AWARD_POINTS {
        return Err(Error::InvalidInput(format!(
            "points must not exceed {} (got {})",
            MAX_AWARD_POINTS, points
        )));
    }

    let user_id = request.user_id.as_str();
    let now = tresor_common::time::now_db_string();
    let mut tx = pool.begin().await?;

    // Running totals must stay INTEGER; SQLite would promote an overflow to REAL
    if let Some(current) = db::points::get_points(&mut *tx, user_id).await? {
        let overflows = current.total_points.checked_add(points).is_none()
            || current.category_points(category).checked_add(points).is_none();
        if overflows {
            return Err(Error::InvalidInput(format!(
                "awarding {} points would overflow the totals of '{}'",
                points, user_id
            )));
        }
    }

    let totals = db::points::add_points(&mut *tx, user_id, category, points, &now).await?;

    db::activities::insert_activity(
        &mut *tx,
        &NewActivity {
            user_id,
            activity_type: request.activity_type,
            points_earned: points,
            entity_id: request.entity_id.as_deref(),
            details: request.details.as_ref(),
        },
        &now,
    )
    .await?;

    let stored = db::levels::get_level(&mut *tx, user_id).await?;
    let (state, total_xp) = match &stored {
        Some(row) => (LevelState::from(row), row.total_xp),
        None => (LevelState::initial(), 0),
    };
    let progress = state.apply_xp(points);
    let total_xp = total_xp.saturating_add(points);
    db::levels::save_level(&mut *tx, user_id, &progress.current, total_xp, &now).await?;

    let mut badges_awarded = Vec::new();
    if progress.leveled_up() {
        // One entry per award, however many levels were crossed
        let details = serde_json::json!({
            "from_level": progress.previous.level,
            "to_level": progress.current.level,
        });
        db::activities::insert_activity(
            &mut *tx,
            &NewActivity {
                user_id,
                activity_type: ActivityType::LevelUp,
                points_earned: 0,
                entity_id: None,
                details: Some(&details),
            },
            &now,
        )
        .await?;

        for milestone in progress.milestones_reached() {
            let name = milestone_badge_name(milestone);
            if db::badges::grant_badge(
                &mut *tx,
                user_id,
                db::badges::LEVEL_MILESTONE_BADGE,
                &name,
                &now,
            )
            .await?
            {
                badges_awarded.push(name);
            }
        }
    }

    let achievements_unlocked = check_achievements(&mut *tx, user_id, &now).await?;

    tx.commit().await?;

    debug!(
        "Awarded {} {} points to {} for {}",
        points,
        category.as_str(),
        user_id,
        request.activity_type.as_str()
    );
    if progress.leveled_up() {
        info!(
            "User {} leveled up: {} -> {}",
            user_id, progress.previous.level, progress.current.level
        );
    }

    Ok(AwardOutcome {
        user_id: request.user_id.clone(),
        activity_type: request.activity_type,
        points_awarded: points,
        points: totals,
        level: progress,
        total_xp,
        badges_awarded,
        achievements_unlocked,
    })
}

/// Run the achievement checker on its own, in a transaction
pub async fn recheck_achievements(pool: &SqlitePool, user_id: &str) -> Result<Vec<Achievement>> {
    validate_user_id(user_id)?;

    let now = tresor_common::time::now_db_string();
    let mut tx = pool.begin().await?;
    let granted = check_achievements(&mut *tx, user_id, &now).await?;
    tx.commit().await?;

    Ok(granted)
}
