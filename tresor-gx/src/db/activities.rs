//! Append-only activity log

use sqlx::SqliteConnection;
use std::collections::HashMap;
use tresor_common::db::{ActivityType, PointsCategory, UserActivity};
use uuid::Uuid;

use crate::error::Result;

/// Activity row to append
#[derive(Debug, Clone)]
pub struct NewActivity<'a> {
    pub user_id: &'a str,
    pub activity_type: ActivityType,
    pub points_earned: i64,
    pub entity_id: Option<&'a str>,
    pub details: Option<&'a serde_json::Value>,
}

pub async fn insert_activity(
    conn: &mut SqliteConnection,
    activity: &NewActivity<'_>,
    now: &str,
) -> Result<UserActivity> {
    let details = activity.details.map(|d| d.to_string());
    let row = UserActivity {
        guid: Uuid::new_v4().to_string(),
        user_id: activity.user_id.to_string(),
        activity_type: activity.activity_type.as_str().to_string(),
        category: activity
            .activity_type
            .category()
            .map(|c| c.as_str().to_string()),
        points_earned: activity.points_earned,
        entity_id: activity.entity_id.map(str::to_string),
        details,
        created_at: now.to_string(),
    };

    sqlx::query(
        r#"
        INSERT INTO user_activities
            (guid, user_id, activity_type, category, points_earned, entity_id, details, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&row.guid)
    .bind(&row.user_id)
    .bind(&row.activity_type)
    .bind(&row.category)
    .bind(row.points_earned)
    .bind(&row.entity_id)
    .bind(&row.details)
    .bind(&row.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(row)
}

/// Activities of a user, newest first
///
/// Rows written in the same millisecond keep insertion order (reversed).
pub async fn list_activities(
    conn: &mut SqliteConnection,
    user_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<UserActivity>> {
    let rows = sqlx::query_as::<_, UserActivity>(
        r#"
        SELECT guid, user_id, activity_type, category, points_earned, entity_id, details, created_at
        FROM user_activities
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

pub async fn count_activities(conn: &mut SqliteConnection, user_id: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_activities WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// Number of logged activities per points category
pub async fn category_counts(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<HashMap<PointsCategory, i64>> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT category, COUNT(*)
        FROM user_activities
        WHERE user_id = ? AND category IS NOT NULL
        GROUP BY category
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut counts = HashMap::new();
    for (category, count) in rows {
        match category.parse::<PointsCategory>() {
            Ok(category) => {
                counts.insert(category, count);
            }
            Err(_) => tracing::warn!("Ignoring activities with unknown category '{}'", category),
        }
    }
    Ok(counts)
}
