//! Request signing for mutating API calls
//!
//! Every mutating request body carries `timestamp` (Unix epoch ms) and
//! `hash` (SHA-256, 64 hex chars). The hash covers the canonical JSON of the
//! body, with `hash` replaced by 64 zeros, followed by the shared secret in
//! decimal. A shared secret of 0 disables checking.
//!
//! Framework-free: the axum middleware lives in `tresor-gx`.

use serde_json::Value;
use sha2::{Digest, Sha256};

use super::types::AuthFields;

#[cfg(feature = "sqlx")]
use sqlx::SqlitePool;

/// Settings key holding the shared secret
pub const SHARED_SECRET_KEY: &str = "api_shared_secret";

/// Oldest accepted timestamp, relative to now
pub const MAX_TIMESTAMP_AGE_MS: i64 = 30_000;

/// Furthest-future accepted timestamp, relative to now (clock drift)
pub const MAX_TIMESTAMP_SKEW_MS: i64 = 1_000;

const PLACEHOLDER_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Authentication failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiAuthError {
    /// Timestamp outside the acceptance window
    InvalidTimestamp { timestamp: i64, now: i64, reason: String },

    /// Hash does not match calculated value
    InvalidHash { provided: String, calculated: String },

    /// Body lacks `timestamp` or `hash`
    MissingFields(String),

    /// Database error loading shared secret
    DatabaseError(String),
}

impl std::fmt::Display for ApiAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiAuthError::InvalidTimestamp { reason, .. } => {
                write!(f, "Invalid timestamp: {}", reason)
            }
            ApiAuthError::InvalidHash { .. } => write!(f, "Invalid hash"),
            ApiAuthError::MissingFields(msg) => write!(f, "Missing auth fields: {}", msg),
            ApiAuthError::DatabaseError(err) => write!(f, "Database error: {}", err),
        }
    }
}

impl std::error::Error for ApiAuthError {}

/// Load the shared secret, generating one on first use
#[cfg(feature = "sqlx")]
pub async fn load_shared_secret(db: &SqlitePool) -> Result<i64, ApiAuthError> {
    let stored: Option<i64> = crate::db::settings::get_setting(db, SHARED_SECRET_KEY)
        .await
        .map_err(|e| ApiAuthError::DatabaseError(e.to_string()))?;

    match stored {
        Some(secret) => Ok(secret),
        None => initialize_shared_secret(db).await,
    }
}

/// Generate and store a random non-zero secret
#[cfg(feature = "sqlx")]
pub async fn initialize_shared_secret(db: &SqlitePool) -> Result<i64, ApiAuthError> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let secret: i64 = loop {
        let val = rng.gen::<i64>();
        if val != 0 {
            break val;
        }
    };

    crate::db::settings::set_setting(db, SHARED_SECRET_KEY, secret)
        .await
        .map_err(|e| ApiAuthError::DatabaseError(e.to_string()))?;

    tracing::info!("Generated new API shared secret");
    Ok(secret)
}

/// Check a request timestamp against the acceptance window around `now`
pub fn validate_timestamp_at(timestamp: i64, now: i64) -> Result<(), ApiAuthError> {
    let age = now
        .checked_sub(timestamp)
        .ok_or_else(|| ApiAuthError::InvalidTimestamp {
            timestamp,
            now,
            reason: "out of range".to_string(),
        })?;

    if age > MAX_TIMESTAMP_AGE_MS {
        return Err(ApiAuthError::InvalidTimestamp {
            timestamp,
            now,
            reason: format!("{}ms too old (max {}ms)", age, MAX_TIMESTAMP_AGE_MS),
        });
    }

    if age < -MAX_TIMESTAMP_SKEW_MS {
        return Err(ApiAuthError::InvalidTimestamp {
            timestamp,
            now,
            reason: format!(
                "{}ms in future (max {}ms)",
                age.unsigned_abs(),
                MAX_TIMESTAMP_SKEW_MS
            ),
        });
    }

    Ok(())
}

/// Check a request timestamp against the current clock
pub fn validate_timestamp(timestamp: i64) -> Result<(), ApiAuthError> {
    validate_timestamp_at(timestamp, crate::time::now_millis())
}

/// Canonical JSON: object keys sorted, no whitespace
///
/// # Examples
///
/// ```
/// use tresor_common::api::auth::to_canonical_json;
/// use serde_json::json;
///
/// let canonical = to_canonical_json(&json!({"z": 3, "a": [1, "x"]}));
/// assert_eq!(canonical, r#"{"a":[1,"x"],"z":3}"#);
/// ```
pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<_> = map.iter().collect();
            pairs.sort_by_key(|(k, _)| *k);
            let items: Vec<String> = pairs
                .into_iter()
                .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), to_canonical_json(v)))
                .collect();
            format!("{{{}}}", items.join(","))
        }
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        // Scalars already serialize canonically
        other => other.to_string(),
    }
}

/// Hash of a request body under the given secret
pub fn calculate_hash(body: &Value, shared_secret: i64) -> String {
    let mut value = body.clone();
    if let Some(obj) = value.as_object_mut() {
        obj.insert("hash".to_string(), Value::String(PLACEHOLDER_HASH.to_string()));
    }

    let mut hasher = Sha256::new();
    hasher.update(to_canonical_json(&value).as_bytes());
    hasher.update(shared_secret.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compare a provided hash with the one calculated from the body
pub fn validate_hash(provided: &str, body: &Value, shared_secret: i64) -> Result<(), ApiAuthError> {
    let calculated = calculate_hash(body, shared_secret);
    if !provided.eq_ignore_ascii_case(&calculated) {
        return Err(ApiAuthError::InvalidHash {
            provided: provided.to_string(),
            calculated,
        });
    }
    Ok(())
}

/// Validate both auth fields of a JSON request body
pub fn validate_body(body: &Value, shared_secret: i64) -> Result<(), ApiAuthError> {
    let fields: AuthFields = serde_json::from_value(body.clone())
        .map_err(|e| ApiAuthError::MissingFields(e.to_string()))?;

    validate_timestamp(fields.timestamp)?;
    validate_hash(&fields.hash, body, shared_secret)
}

/// Add `timestamp` and `hash` to a request body (client side)
pub fn sign_body(mut body: Value, shared_secret: i64) -> Value {
    if let Some(obj) = body.as_object_mut() {
        obj.insert("timestamp".to_string(), Value::from(crate::time::now_millis()));
    }
    let hash = calculate_hash(&body, shared_secret);
    if let Some(obj) = body.as_object_mut() {
        obj.insert("hash".to_string(), Value::String(hash));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timestamp_window() {
        let now = 1_700_000_000_000;
        assert!(validate_timestamp_at(now, now).is_ok());
        assert!(validate_timestamp_at(now - MAX_TIMESTAMP_AGE_MS, now).is_ok());
        assert!(validate_timestamp_at(now - MAX_TIMESTAMP_AGE_MS - 1, now).is_err());
        assert!(validate_timestamp_at(now + MAX_TIMESTAMP_SKEW_MS, now).is_ok());
        assert!(validate_timestamp_at(now + MAX_TIMESTAMP_SKEW_MS + 1, now).is_err());
    }

    #[test]
    fn test_canonical_json_escapes_strings() {
        let canonical = to_canonical_json(&json!({"b": "say \"hi\"\n", "a": null}));
        assert_eq!(canonical, r#"{"a":null,"b":"say \"hi\"\n"}"#);
    }

    #[test]
    fn test_hash_ignores_existing_hash_value() {
        let a = json!({"user_id": "u1", "timestamp": 1, "hash": "anything"});
        let b = json!({"user_id": "u1", "timestamp": 1, "hash": "something else"});
        assert_eq!(calculate_hash(&a, 42), calculate_hash(&b, 42));
        assert_ne!(calculate_hash(&a, 42), calculate_hash(&a, 43));
        assert_eq!(calculate_hash(&a, 42).len(), 64);
    }

    #[test]
    fn test_signed_body_validates() {
        let body = sign_body(json!({"user_id": "u1", "activity_type": "clue_solved"}), 987);
        assert!(validate_body(&body, 987).is_ok());
        assert!(matches!(
            validate_body(&body, 988),
            Err(ApiAuthError::InvalidHash { .. })
        ));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let mut body = sign_body(json!({"user_id": "u1", "points": 5}), 987);
        body["points"] = json!(5000);
        assert!(validate_body(&body, 987).is_err());
    }

    #[test]
    fn test_missing_fields_reported() {
        let err = validate_body(&json!({"user_id": "u1"}), 1).unwrap_err();
        assert!(matches!(err, ApiAuthError::MissingFields(ref msg) if msg.contains("timestamp")));

        let err = validate_body(&json!({"timestamp": 1, "hash": 7}), 1).unwrap_err();
        assert!(matches!(err, ApiAuthError::MissingFields(_)));
    }

    #[test]
    fn test_extreme_timestamps_rejected_without_overflow() {
        let now = 1_700_000_000_000;
        assert!(matches!(
            validate_timestamp_at(i64::MIN, now),
            Err(ApiAuthError::InvalidTimestamp { .. })
        ));
        assert!(matches!(
            validate_timestamp_at(i64::MAX, now),
            Err(ApiAuthError::InvalidTimestamp { .. })
        ));
        assert!(validate_timestamp_at(i64::MIN, i64::MAX).is_err());
        assert!(validate_timestamp_at(i64::MAX, i64::MIN).is_err());
    }
}
