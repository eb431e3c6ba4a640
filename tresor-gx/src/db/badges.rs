//! Badge grants

use sqlx::SqliteConnection;
use tresor_common::db::UserBadge;
use uuid::Uuid;

use crate::error::Result;

/// Badge type used for level milestone badges
pub const LEVEL_MILESTONE_BADGE: &str = "level_milestone";

/// Grant a badge unless the user already holds one with that name
///
/// Returns `true` only when a row was inserted.
pub async fn grant_badge(
    conn: &mut SqliteConnection,
    user_id: &str,
    badge_type: &str,
    badge_name: &str,
    now: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO user_badges (guid, user_id, badge_type, badge_name, awarded_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(user_id, badge_name) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(badge_type)
    .bind(badge_name)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn list_badges(conn: &mut SqliteConnection, user_id: &str) -> Result<Vec<UserBadge>> {
    let rows = sqlx::query_as::<_, UserBadge>(
        r#"
        SELECT guid, user_id, badge_type, badge_name, awarded_at
        FROM user_badges
        WHERE user_id = ?
        ORDER BY awarded_at, rowid
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

pub async fn count_badges(conn: &mut SqliteConnection, user_id: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_badges WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}
