//! Type mapping definitions
//!
//! This module provides the parameter value type sent to PostgreSQL.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single positional parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PostgresValue {
    Text(String),
    Integer(i32),
    BigInt(i64),
    SmallInt(i16),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    Timestamp(chrono::DateTime<chrono::Utc>),
    Decimal(String), // Store as string to preserve precision
    Json(serde_json::Value),
    Null,
}

impl PostgresValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PostgresValue::Null)
    }

    /// Render the `$n` placeholder for this value.
    ///
    /// Decimals travel as text and need an explicit cast to reach a numeric column.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            PostgresValue::Decimal(_) => format!("${}::numeric", index),
            _ => format!("${}", index),
        }
    }
}

/// Convert basic Rust types to PostgresValue
impl From<String> for PostgresValue {
    fn from(val: String) -> Self {
        PostgresValue::Text(val)
    }
}

impl From<&str> for PostgresValue {
    fn from(val: &str) -> Self {
        PostgresValue::Text(val.to_string())
    }
}

impl From<i32> for PostgresValue {
    fn from(val: i32) -> Self {
        PostgresValue::Integer(val)
    }
}

impl From<i64> for PostgresValue {
    fn from(val: i64) -> Self {
        PostgresValue::BigInt(val)
    }
}

impl From<i16> for PostgresValue {
    fn from(val: i16) -> Self {
        PostgresValue::SmallInt(val)
    }
}

impl From<f64> for PostgresValue {
    fn from(val: f64) -> Self {
        PostgresValue::Float(val)
    }
}

impl From<bool> for PostgresValue {
    fn from(val: bool) -> Self {
        PostgresValue::Boolean(val)
    }
}

impl From<Uuid> for PostgresValue {
    fn from(val: Uuid) -> Self {
        PostgresValue::Uuid(val)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for PostgresValue {
    fn from(val: chrono::DateTime<chrono::Utc>) -> Self {
        PostgresValue::Timestamp(val)
    }
}

impl From<serde_json::Value> for PostgresValue {
    fn from(val: serde_json::Value) -> Self {
        PostgresValue::Json(val)
    }
}

impl<T> From<Option<T>> for PostgresValue
where
    T: Into<PostgresValue>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => PostgresValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_casts_decimal_only() {
        assert_eq!(PostgresValue::Integer(1).placeholder(3), "$3");
        assert_eq!(PostgresValue::Text("a".into()).placeholder(1), "$1");
        assert_eq!(
            PostgresValue::Decimal("10.50".into()).placeholder(2),
            "$2::numeric"
        );
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(PostgresValue::from(None::<i32>), PostgresValue::Null);
        assert_eq!(PostgresValue::from(Some("x")), PostgresValue::Text("x".into()));
        assert!(PostgresValue::from(None::<String>).is_null());
    }
}
