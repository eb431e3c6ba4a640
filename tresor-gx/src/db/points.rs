//! `user_points` running totals

use sqlx::SqliteConnection;
use tresor_common::db::{PointsCategory, UserPoints};

use crate::error::Result;

/// Add points to the user's total and to one category, creating the row if needed
pub async fn add_points(
    conn: &mut SqliteConnection,
    user_id: &str,
    category: PointsCategory,
    points: i64,
    now: &str,
) -> Result<UserPoints> {
    let column = category.points_column();
    let sql = format!(
        r#"
        INSERT INTO user_points (user_id, total_points, {column}, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            total_points = total_points + excluded.total_points,
            {column} = {column} + excluded.{column},
            updated_at = excluded.updated_at
        "#,
        column = column
    );

    sqlx::query(&sql)
        .bind(user_id)
        .bind(points)
        .bind(points)
        .bind(now)
        .execute(&mut *conn)
        .await?;

    Ok(get_points(conn, user_id)
        .await?
        .unwrap_or_else(|| UserPoints::empty(user_id)))
}

pub async fn get_points(conn: &mut SqliteConnection, user_id: &str) -> Result<Option<UserPoints>> {
    let points = sqlx::query_as::<_, UserPoints>(
        r#"
        SELECT user_id, total_points, contribution_points, exploration_points,
               validation_points, community_points
        FROM user_points
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(points)
}
