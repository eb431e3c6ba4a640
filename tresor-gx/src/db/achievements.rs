//! Achievement catalog reads and grants

use sqlx::SqliteConnection;
use std::collections::HashSet;
use tresor_common::db::Achievement;
use uuid::Uuid;

use crate::error::Result;

/// Achievement earned by a user, joined with its catalog entry
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EarnedAchievement {
    #[sqlx(flatten)]
    pub achievement: Achievement,
    pub earned_at: String,
}

pub async fn list_catalog(conn: &mut SqliteConnection) -> Result<Vec<Achievement>> {
    let rows = sqlx::query_as::<_, Achievement>(
        r#"
        SELECT id, achievement_type, tier, requirement, name_fr, name_en, description_fr, description_en
        FROM achievements
        ORDER BY achievement_type, tier
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

pub async fn earned_ids(conn: &mut SqliteConnection, user_id: &str) -> Result<HashSet<String>> {
    let ids: Vec<String> =
        sqlx::query_scalar("SELECT achievement_id FROM user_achievements WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await?;
    Ok(ids.into_iter().collect())
}

pub async fn list_earned(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Vec<EarnedAchievement>> {
    let rows = sqlx::query_as::<_, EarnedAchievement>(
        r#"
        SELECT a.id, a.achievement_type, a.tier, a.requirement, a.name_fr, a.name_en,
               a.description_fr, a.description_en, ua.earned_at
        FROM user_achievements ua
        JOIN achievements a ON a.id = ua.achievement_id
        WHERE ua.user_id = ?
        ORDER BY ua.earned_at, a.achievement_type, a.tier
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

/// Grant an achievement unless the user already holds it
///
/// Relies on UNIQUE(user_id, achievement_id): returns `true` only when a
/// row was inserted, so concurrent callers cannot both report a grant.
pub async fn grant_achievement(
    conn: &mut SqliteConnection,
    user_id: &str,
    achievement_id: &str,
    now: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO user_achievements (guid, user_id, achievement_id, earned_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id, achievement_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(achievement_id)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}
