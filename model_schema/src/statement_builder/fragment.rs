//! Per-type value rendering

use super::{Resolved, StatementBuilder};
use crate::column::{ColumnSpec, ColumnType};
use crate::errors::BuildError;
use crate::geo::{self, LatLng};
use crate::record::FieldValue;
use type_mapping::PostgresValue;

const SQL_NULL: &str = "null";
const SQL_NOW: &str = "now()";

impl StatementBuilder {
    /// Render one resolved value as SQL, pushing any parameters it needs
    pub(crate) fn render(
        &self,
        table: &str,
        column: &str,
        spec: &ColumnSpec,
        resolved: Resolved<'_>,
        params: &mut Vec<PostgresValue>,
    ) -> Result<String, BuildError> {
        let value = match resolved {
            Resolved::Now if spec.column_type.accepts_now() => return Ok(SQL_NOW.to_string()),
            Resolved::Now => {
                return Err(BuildError::InvalidDefault {
                    table: table.to_string(),
                    column: column.to_string(),
                    column_type: spec.column_type,
                })
            }
            Resolved::Value(value) => value,
        };

        // Typed parameters can clash with the column type when null, an untyped literal cannot
        if value.is_null() {
            return Ok(SQL_NULL.to_string());
        }

        match (spec.column_type, value.as_ref()) {
            (ColumnType::Scalar | ColumnType::Timestamp, FieldValue::Scalar(scalar)) => {
                params.push(scalar.clone());
                Ok(cast_placeholder(spec, scalar, params.len()))
            }
            (ColumnType::IntArray, FieldValue::IntArray(items)) => Ok(array_sql(
                items.iter().map(|item| PostgresValue::BigInt(*item)),
                "int",
                params,
            )),
            (ColumnType::StringArray, FieldValue::StringArray(items)) => Ok(array_sql(
                items.iter().map(|item| PostgresValue::Text(item.clone())),
                "text",
                params,
            )),
            (ColumnType::GeoPoint, FieldValue::GeoPoint(input)) => {
                let point = LatLng::from_input(input, self.reject_zero_coordinates)
                    .ok_or_else(|| BuildError::invalid_geo(table, column, input.to_string()))?;
                Ok(geo::point_sql(point, self.srid_for(spec)))
            }
            (ColumnType::GeoPolyline, FieldValue::GeoPolyline(inputs)) => {
                let points = inputs
                    .iter()
                    .map(|input| {
                        LatLng::from_input(input, self.reject_zero_coordinates)
                            .ok_or_else(|| BuildError::invalid_geo(table, column, input.to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if points.is_empty() {
                    Ok(SQL_NULL.to_string())
                } else {
                    Ok(geo::polyline_sql(&points, self.srid_for(spec)))
                }
            }
            (expected, found) => Err(BuildError::mismatch(table, column, expected, found.kind())),
        }
    }
}

/// Placeholder for a scalar, casting text input to the column's declared type
pub(crate) fn cast_placeholder(spec: &ColumnSpec, value: &PostgresValue, index: usize) -> String {
    let mut placeholder = value.placeholder(index);
    if let PostgresValue::Text(_) = value {
        let cast = match spec.column_type {
            ColumnType::Timestamp => Some("timestamptz"),
            _ => spec.sql_type.as_deref(),
        };
        if let Some(cast) = cast {
            placeholder.push_str("::");
            placeholder.push_str(cast);
        }
    }
    placeholder
}

/// `ARRAY[$i,$j,...]::<elem>[]`, or `null` for an empty array
fn array_sql(
    items: impl Iterator<Item = PostgresValue>,
    element_type: &str,
    params: &mut Vec<PostgresValue>,
) -> String {
    let placeholders: Vec<String> = items
        .map(|item| {
            params.push(item);
            format!("${}", params.len())
        })
        .collect();

    if placeholders.is_empty() {
        SQL_NULL.to_string()
    } else {
        format!("ARRAY[{}]::{}[]", placeholders.join(","), element_type)
    }
}
