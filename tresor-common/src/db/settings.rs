//! Settings table access
//!
//! Key-value runtime settings. Values are stored as text and parsed on read.

use crate::{Error, Result};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Generic setting getter
///
/// Returns `None` when the key is missing or its value is NULL.
pub async fn get_setting<T: FromStr>(db: &SqlitePool, key: &str) -> Result<Option<T>> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(db)
            .await?;

    match value.flatten() {
        Some(s) => match s.parse::<T>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(Error::Config(format!(
                "Failed to parse setting '{}' value: {}",
                key, s
            ))),
        },
        None => Ok(None),
    }
}

/// Generic setting setter
///
/// Inserts or updates setting in database.
pub async fn set_setting<T: ToString>(db: &SqlitePool, key: &str, value: T) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at)
        VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value.to_string())
    .execute(db)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::init::create_settings_table(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_missing_setting_is_none() {
        let db = setup_test_db().await;
        let value: Option<i64> = get_setting(&db, "nope").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let db = setup_test_db().await;
        set_setting(&db, "leaderboard_default_limit", 25).await.unwrap();
        let value: Option<i64> = get_setting(&db, "leaderboard_default_limit").await.unwrap();
        assert_eq!(value, Some(25));

        set_setting(&db, "leaderboard_default_limit", 30).await.unwrap();
        let value: Option<i64> = get_setting(&db, "leaderboard_default_limit").await.unwrap();
        assert_eq!(value, Some(30));
    }

    #[tokio::test]
    async fn test_unparseable_setting_is_config_error() {
        let db = setup_test_db().await;
        set_setting(&db, "leaderboard_default_limit", "lots").await.unwrap();
        let result: Result<Option<i64>> = get_setting(&db, "leaderboard_default_limit").await;
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
