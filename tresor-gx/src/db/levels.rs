//! `user_levels` persistence

use sqlx::SqliteConnection;
use tresor_common::db::UserLevel;

use crate::error::Result;
use crate::levels::LevelState;

pub async fn get_level(conn: &mut SqliteConnection, user_id: &str) -> Result<Option<UserLevel>> {
    let level = sqlx::query_as::<_, UserLevel>(
        "SELECT user_id, level, current_xp, next_level_xp, total_xp FROM user_levels WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(level)
}

/// Write the user's level state, creating the row on first award
pub async fn save_level(
    conn: &mut SqliteConnection,
    user_id: &str,
    state: &LevelState,
    total_xp: i64,
    now: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_levels (user_id, level, current_xp, next_level_xp, total_xp, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            level = excluded.level,
            current_xp = excluded.current_xp,
            next_level_xp = excluded.next_level_xp,
            total_xp = excluded.total_xp,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(user_id)
    .bind(state.level)
    .bind(state.xp)
    .bind(state.next_level_xp)
    .bind(total_xp)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

impl From<&UserLevel> for LevelState {
    fn from(row: &UserLevel) -> Self {
        LevelState {
            level: row.level,
            xp: row.current_xp,
            next_level_xp: row.next_level_xp,
        }
    }
}
