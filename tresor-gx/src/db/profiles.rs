//! Display profiles used by the leaderboard

use sqlx::SqliteConnection;
use tresor_common::db::Profile;

use crate::error::Result;

pub async fn upsert_profile(
    conn: &mut SqliteConnection,
    user_id: &str,
    username: &str,
    now: &str,
) -> Result<Profile> {
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, username, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            username = excluded.username,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(user_id)
    .bind(username)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let profile = sqlx::query_as::<_, Profile>(
        "SELECT user_id, username, created_at, updated_at FROM profiles WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(profile)
}

pub async fn get_username(conn: &mut SqliteConnection, user_id: &str) -> Result<Option<String>> {
    let username: Option<String> =
        sqlx::query_scalar("SELECT username FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(username)
}
