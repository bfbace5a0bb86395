//! Serialization utilities
//!
//! This module converts loosely typed JSON input into PostgresValue.

use crate::types::PostgresValue;

/// Convert a JSON value into the closest PostgresValue
pub fn json_to_postgres_value(value: &serde_json::Value) -> PostgresValue {
    match value {
        serde_json::Value::String(s) => {
            // Try to parse as RFC3339 timestamp first
            if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
                PostgresValue::Timestamp(dt.with_timezone(&chrono::Utc))
            } else {
                PostgresValue::Text(s.clone())
            }
        }
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                if i >= i32::MIN as i64 && i <= i32::MAX as i64 {
                    PostgresValue::Integer(i as i32)
                } else {
                    PostgresValue::BigInt(i)
                }
            } else if let Some(f) = n.as_f64() {
                PostgresValue::Float(f)
            } else {
                PostgresValue::Decimal(n.to_string())
            }
        }
        serde_json::Value::Bool(b) => PostgresValue::Boolean(*b),
        serde_json::Value::Null => PostgresValue::Null,
        other => PostgresValue::Json(other.clone()),
    }
}
