//! Row decoding
//!
//! Turns `PgRow`s into JSON rows, either keyed by column name or positional.

use serde_json::Value as JsonValue;
use sqlx::postgres::{PgRow, PgValueFormat, PgValueRef};
use sqlx::{Column, Decode, Postgres, Row, TypeInfo, ValueRef};
use std::fmt::Write;

use crate::numeric::PgNumericText;

/// Shape of a decoded row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowMode {
    /// `{"column": value, ...}`
    #[default]
    Object,
    /// `[value, ...]` in select-list order
    Array,
}

/// Decode a full row in the requested shape
pub fn decode_row(row: &PgRow, mode: RowMode) -> JsonValue {
    match mode {
        RowMode::Object => JsonValue::Object(
            row.columns()
                .iter()
                .map(|col| (col.name().to_string(), decode_column(row, col.ordinal())))
                .collect(),
        ),
        RowMode::Array => JsonValue::Array((0..row.len()).map(|idx| decode_column(row, idx)).collect()),
    }
}

/// Decode one column of a row into JSON
pub fn decode_column(row: &PgRow, idx: usize) -> JsonValue {
    let raw = match row.try_get_raw(idx) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Failed to read column {}: {}", idx, e);
            return JsonValue::Null;
        }
    };
    if raw.is_null() {
        return JsonValue::Null;
    }

    let type_name = raw.type_info().name().to_ascii_uppercase();
    let decoded = match type_name.as_str() {
        "BOOL" => decode::<bool>(raw).map(JsonValue::Bool),
        "INT2" => decode::<i16>(raw).map(JsonValue::from),
        "INT4" => decode::<i32>(raw).map(JsonValue::from),
        "INT8" => decode::<i64>(raw).map(JsonValue::from),
        "FLOAT4" => decode::<f32>(raw).map(|v| float_to_json(v as f64)),
        "FLOAT8" => decode::<f64>(raw).map(float_to_json),
        "UUID" => decode::<uuid::Uuid>(raw).map(|v| JsonValue::String(v.to_string())),
        "JSON" | "JSONB" => decode::<JsonValue>(raw),
        "TIMESTAMPTZ" => decode::<chrono::DateTime<chrono::Utc>>(raw)
            .map(|v| JsonValue::String(v.to_rfc3339())),
        "TIMESTAMP" => decode::<chrono::NaiveDateTime>(raw)
            .map(|v| JsonValue::String(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string())),
        "DATE" => decode::<chrono::NaiveDate>(raw).map(|v| JsonValue::String(v.to_string())),
        "TIME" => decode::<chrono::NaiveTime>(raw).map(|v| JsonValue::String(v.to_string())),
        "INT2[]" => decode::<Vec<i16>>(raw).map(JsonValue::from),
        "INT4[]" => decode::<Vec<i32>>(raw).map(JsonValue::from),
        "INT8[]" => decode::<Vec<i64>>(raw).map(JsonValue::from),
        "FLOAT8[]" => decode::<Vec<f64>>(raw).map(|v| JsonValue::Array(v.into_iter().map(float_to_json).collect())),
        "BOOL[]" => decode::<Vec<bool>>(raw).map(JsonValue::from),
        "TEXT[]" | "VARCHAR[]" => decode::<Vec<String>>(raw).map(JsonValue::from),
        "FLOAT4[]" => decode::<Vec<f32>>(raw)
            .map(|v| JsonValue::Array(v.into_iter().map(|f| float_to_json(f as f64)).collect())),
        "UUID[]" => decode::<Vec<uuid::Uuid>>(raw)
            .map(|v| JsonValue::Array(v.into_iter().map(|u| JsonValue::String(u.to_string())).collect())),
        "TIMESTAMPTZ[]" => decode::<Vec<chrono::DateTime<chrono::Utc>>>(raw)
            .map(|v| JsonValue::Array(v.into_iter().map(|t| JsonValue::String(t.to_rfc3339())).collect())),
        "NUMERIC" => decode::<PgNumericText>(raw).map(|n| JsonValue::String(n.0)),
        "NUMERIC[]" => decode::<Vec<PgNumericText>>(raw)
            .map(|v| JsonValue::Array(v.into_iter().map(|n| JsonValue::String(n.0)).collect())),
        // PostGIS values come back as EWKB; hex matches the server's text output
        "BYTEA" | "GEOMETRY" | "GEOGRAPHY" => raw_hex(&raw),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" | "CITEXT" | "UNKNOWN" => {
            raw.as_str().map(|s| JsonValue::String(s.to_string())).ok()
        }
        // Binary bytes of an unknown type are not text
        _ if matches!(raw.format(), PgValueFormat::Text) => {
            raw.as_str().map(|s| JsonValue::String(s.to_string())).ok()
        }
        _ => None,
    };

    decoded.unwrap_or_else(|| {
        tracing::debug!("Column {} of type {} could not be decoded", idx, type_name);
        JsonValue::Null
    })
}

fn decode<'r, T>(raw: PgValueRef<'r>) -> Option<T>
where
    T: Decode<'r, Postgres>,
{
    T::decode(raw).ok()
}

fn float_to_json(v: f64) -> JsonValue {
    serde_json::Number::from_f64(v)
        .map(JsonValue::Number)
        .unwrap_or_else(|| JsonValue::String(v.to_string()))
}

fn raw_hex(raw: &PgValueRef<'_>) -> Option<JsonValue> {
    match raw.format() {
        PgValueFormat::Binary => raw.as_bytes().ok().map(|bytes| JsonValue::String(to_hex(bytes))),
        PgValueFormat::Text => raw
            .as_str()
            .ok()
            .map(|s| JsonValue::String(s.trim_start_matches("\\x").to_ascii_lowercase())),
    }
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[0x01, 0x01, 0x00, 0x00, 0x20, 0xe6]), "0101000020e6");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn test_non_finite_float_becomes_string() {
        assert_eq!(float_to_json(1.5), serde_json::json!(1.5));
        assert_eq!(float_to_json(f64::NAN), JsonValue::String("NaN".into()));
    }

    #[test]
    fn test_numeric_decodes_to_exact_string() {
        assert_eq!(
            crate::numeric::numeric_to_string(&[0, 2, 0, 0, 0, 0, 0, 2, 0, 12, 0x13, 0x88]).unwrap(),
            "12.50"
        );
    }

    #[test]
    fn test_default_row_mode_is_object() {
        assert_eq!(RowMode::default(), RowMode::Object);
    }
}
