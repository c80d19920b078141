//! Identifier generation

use chrono::Utc;
use uuid::Uuid;

/// Generate `{prefix}_{unix_millis}_{token}` where the token is a random
/// 128-bit value in lowercase hex. Callers treat the result as opaque.
pub fn generate_id(prefix: &str) -> String {
    format!("{}_{}_{}", prefix, now_millis(), Uuid::new_v4().simple())
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
