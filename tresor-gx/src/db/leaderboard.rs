//! Leaderboard query

use serde::Serialize;
use sqlx::SqliteConnection;
use tresor_common::csv::CsvRecord;
use tresor_common::db::PointsCategory;

use crate::error::Result;

/// One leaderboard line
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: i64,
    pub user_id: String,
    /// Profile username, or the user id when no profile exists
    pub username: String,
    pub points: i64,
    pub level: i64,
}

impl CsvRecord for LeaderboardEntry {
    fn headers() -> &'static [&'static str] {
        &["rank", "user_id", "username", "points", "level"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.rank.to_string(),
            self.user_id.clone(),
            self.username.clone(),
            self.points.to_string(),
            self.level.to_string(),
        ]
    }
}

/// Top users by points in a category, or by total points
///
/// Ties are broken by user id so the order is stable.
pub async fn get_leaderboard(
    conn: &mut SqliteConnection,
    category: Option<PointsCategory>,
    limit: i64,
) -> Result<Vec<LeaderboardEntry>> {
    let column = category.map_or("total_points", |c| c.points_column());
    let sql = format!(
        r#"
        SELECT p.user_id,
               COALESCE(pr.username, p.user_id) AS username,
               p.{column} AS points,
               COALESCE(l.level, 1) AS level
        FROM user_points p
        LEFT JOIN profiles pr ON pr.user_id = p.user_id
        LEFT JOIN user_levels l ON l.user_id = p.user_id
        ORDER BY points DESC, p.user_id ASC
        LIMIT ?
        "#,
        column = column
    );

    let rows: Vec<(String, String, i64, i64)> = sqlx::query_as(&sql)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, (user_id, username, points, level))| LeaderboardEntry {
            rank: i as i64 + 1,
            user_id,
            username,
            points,
            level,
        })
        .collect())
}
