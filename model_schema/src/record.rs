//! Data records
//!
//! A [`DataRecord`] maps column names to [`FieldValue`]s. Each value variant lines up
//! with a [`ColumnType`], so statement building dispatches on a `(type, value)` match
//! instead of sniffing shapes at runtime.

use crate::column::{ColumnSpec, ColumnType};
use crate::errors::BuildError;
use crate::geo::{Coordinate, GeoInput};
use crate::model::ModelDescriptor;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use type_mapping::{json_to_postgres_value, PostgresValue};

/// A value for one column
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Scalar(PostgresValue),
    IntArray(Vec<i64>),
    StringArray(Vec<String>),
    GeoPoint(GeoInput),
    GeoPolyline(Vec<GeoInput>),
}

impl FieldValue {
    /// Missing for defaulting purposes
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null | FieldValue::Scalar(PostgresValue::Null))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Scalar(_) => "scalar",
            FieldValue::IntArray(_) => "int[]",
            FieldValue::StringArray(_) => "string[]",
            FieldValue::GeoPoint(_) => "geo_point",
            FieldValue::GeoPolyline(_) => "geo_polyline",
        }
    }

    /// Coerce loosely typed JSON into the variant a column of `column_type` takes
    pub fn from_json(
        column_type: ColumnType,
        value: &JsonValue,
        table: &str,
        column: &str,
    ) -> Result<Self, BuildError> {
        if value.is_null() {
            return Ok(FieldValue::Null);
        }

        match column_type {
            ColumnType::Scalar | ColumnType::Timestamp | ColumnType::Foreign => {
                Ok(FieldValue::Scalar(json_to_postgres_value(value)))
            }
            ColumnType::IntArray => {
                let items = json_array(value)
                    .ok_or_else(|| BuildError::mismatch(table, column, column_type, json_kind(value)))?;
                items
                    .iter()
                    .map(|item| match item {
                        JsonValue::Number(n) => n.as_i64(),
                        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()
                    .map(FieldValue::IntArray)
                    .ok_or_else(|| BuildError::mismatch(table, column, column_type, "mixed array"))
            }
            ColumnType::StringArray => {
                let items = json_array(value)
                    .ok_or_else(|| BuildError::mismatch(table, column, column_type, json_kind(value)))?;
                items
                    .iter()
                    .map(|item| match item {
                        JsonValue::String(s) => Some(s.clone()),
                        JsonValue::Number(n) => Some(n.to_string()),
                        JsonValue::Bool(b) => Some(b.to_string()),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()
                    .map(FieldValue::StringArray)
                    .ok_or_else(|| BuildError::mismatch(table, column, column_type, "mixed array"))
            }
            ColumnType::GeoPoint => {
                if json_array(value).is_some_and(|items| items.is_empty()) {
                    return Ok(FieldValue::Null);
                }
                geo_from_json(value, table, column).map(FieldValue::GeoPoint)
            }
            ColumnType::GeoPolyline => {
                let items = json_array(value)
                    .ok_or_else(|| BuildError::mismatch(table, column, column_type, json_kind(value)))?;
                items
                    .iter()
                    .map(|item| geo_from_json(item, table, column))
                    .collect::<Result<Vec<_>, _>>()
                    .map(FieldValue::GeoPolyline)
            }
        }
    }
}

fn json_array(value: &JsonValue) -> Option<&Vec<JsonValue>> {
    match value {
        JsonValue::Array(items) => Some(items),
        _ => None,
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn json_coordinate(value: Option<&JsonValue>) -> Coordinate {
    match value {
        Some(JsonValue::Number(n)) => Coordinate::Number(n.as_f64().unwrap_or(f64::NAN)),
        Some(JsonValue::String(s)) => Coordinate::Text(s.clone()),
        Some(other) => Coordinate::Text(other.to_string()),
        None => Coordinate::Text(String::new()),
    }
}

/// Accepts `[lat, lng]` or `{"lat": .., "lng": ..}`. Bad coordinates are caught later
/// with the rest of the geo validation, only a wrong shape fails here.
fn geo_from_json(value: &JsonValue, table: &str, column: &str) -> Result<GeoInput, BuildError> {
    match value {
        JsonValue::Array(items) if items.len() == 2 => Ok(GeoInput {
            lat: json_coordinate(items.first()),
            lng: json_coordinate(items.get(1)),
        }),
        JsonValue::Object(map) => Ok(GeoInput {
            lat: json_coordinate(map.get("lat")),
            lng: json_coordinate(map.get("lng")),
        }),
        other => Err(BuildError::invalid_geo(table, column, other.to_string())),
    }
}

macro_rules! scalar_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Scalar(PostgresValue::from(value))
                }
            }
        )*
    };
}

scalar_from!(
    String,
    &str,
    i16,
    i32,
    i64,
    f64,
    bool,
    uuid::Uuid,
    chrono::DateTime<chrono::Utc>,
    PostgresValue
);

impl From<Vec<i64>> for FieldValue {
    fn from(value: Vec<i64>) -> Self {
        FieldValue::IntArray(value)
    }
}

impl From<Vec<i32>> for FieldValue {
    fn from(value: Vec<i32>) -> Self {
        FieldValue::IntArray(value.into_iter().map(i64::from).collect())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::StringArray(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::StringArray(value.into_iter().map(str::to_string).collect())
    }
}

impl From<GeoInput> for FieldValue {
    fn from(value: GeoInput) -> Self {
        FieldValue::GeoPoint(value)
    }
}

impl From<(f64, f64)> for FieldValue {
    fn from(value: (f64, f64)) -> Self {
        FieldValue::GeoPoint(value.into())
    }
}

impl From<Vec<GeoInput>> for FieldValue {
    fn from(value: Vec<GeoInput>) -> Self {
        FieldValue::GeoPolyline(value)
    }
}

impl From<Vec<(f64, f64)>> for FieldValue {
    fn from(value: Vec<(f64, f64)>) -> Self {
        FieldValue::GeoPolyline(value.into_iter().map(GeoInput::from).collect())
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Column name to value mapping for one row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataRecord {
    values: HashMap<String, FieldValue>,
}

impl DataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn set(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.values.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<FieldValue> {
        self.values.remove(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a record from a JSON object, coercing each value to its column's type.
    ///
    /// Keys the model does not describe are kept as scalars, so a row read back from the
    /// database can be passed straight to an update with its id.
    pub fn from_json(model: &ModelDescriptor, value: &JsonValue) -> Result<Self, BuildError> {
        let table = model.table_name();
        let object = match value {
            JsonValue::Object(object) => object,
            other => {
                return Err(BuildError::mismatch(table, "*", ColumnType::Scalar, json_kind(other)))
            }
        };

        let mut record = DataRecord::new();
        for (column, item) in object {
            let column_type = model
                .get(column)
                .map(|spec: &ColumnSpec| spec.column_type)
                .unwrap_or(ColumnType::Scalar);
            record.insert(
                column.clone(),
                FieldValue::from_json(column_type, item, table, column)?,
            );
        }
        Ok(record)
    }
}

impl<K, V> FromIterator<(K, V)> for DataRecord
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = DataRecord::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}
