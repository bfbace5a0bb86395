//! Column descriptors
//!
//! A [`ColumnSpec`] states how one column takes part in generated INSERT and UPDATE
//! statements: its type, whether it is required, skipped, or defaulted.

use serde::Deserialize;
use std::fmt;

/// Column type as far as statement synthesis is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ColumnType {
    /// Bound as a single positional parameter (`int`, `string`, and anything unrecognized)
    Scalar,
    /// Scalar that may default to `now()`
    Timestamp,
    /// `int[]`
    IntArray,
    /// `string[]`
    StringArray,
    /// `[lat, lng]` stored as a PostGIS point
    GeoPoint,
    /// Sequence of `[lat, lng]` stored as a PostGIS line
    GeoPolyline,
    /// Relation placeholder, never written
    Foreign,
}

impl ColumnType {
    /// Parse a schema type string. Unknown strings are scalars.
    pub fn parse(type_name: &str) -> Self {
        match type_name.trim().to_ascii_lowercase().as_str() {
            "timestamp" => ColumnType::Timestamp,
            // "array" is an older spelling of int[]
            "int[]" | "array" => ColumnType::IntArray,
            "string[]" => ColumnType::StringArray,
            "geo_point" => ColumnType::GeoPoint,
            "geo_polyline" => ColumnType::GeoPolyline,
            "foreign" => ColumnType::Foreign,
            _ => ColumnType::Scalar,
        }
    }

    /// Whether the `now()` default sentinel makes sense for this type
    pub fn accepts_now(&self) -> bool {
        matches!(self, ColumnType::Scalar | ColumnType::Timestamp)
    }
}

impl From<String> for ColumnType {
    fn from(value: String) -> Self {
        ColumnType::parse(&value)
    }
}

impl From<&str> for ColumnType {
    fn from(value: &str) -> Self {
        ColumnType::parse(value)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Scalar => "scalar",
            ColumnType::Timestamp => "timestamp",
            ColumnType::IntArray => "int[]",
            ColumnType::StringArray => "string[]",
            ColumnType::GeoPoint => "geo_point",
            ColumnType::GeoPolyline => "geo_polyline",
            ColumnType::Foreign => "foreign",
        };
        f.write_str(name)
    }
}

/// Value substituted when a record carries nothing for a column
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum ColumnDefault {
    /// The SQL current-time call, written `"now()"` in a schema
    Now,
    /// A literal value, coerced to the column type when used
    Value(serde_json::Value),
}

impl From<serde_json::Value> for ColumnDefault {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) if s.trim().eq_ignore_ascii_case("now()") => {
                ColumnDefault::Now
            }
            other => ColumnDefault::Value(other),
        }
    }
}

/// Description of a single column
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawColumnSpec")]
pub struct ColumnSpec {
    pub column_type: ColumnType,
    /// Declared SQL type of a scalar column, used to cast text input (`int`, `numeric`, `uuid`)
    pub sql_type: Option<String>,
    pub not_null: bool,
    pub no_insert: bool,
    pub no_update: bool,
    pub default: Option<ColumnDefault>,
    pub srid: Option<i32>,
}

/// Schema form of a column, before the type string is split into kind and SQL type
#[derive(Deserialize)]
struct RawColumnSpec {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    not_null: bool,
    #[serde(default)]
    no_insert: bool,
    #[serde(default)]
    no_update: bool,
    #[serde(default)]
    default: Option<ColumnDefault>,
    #[serde(default)]
    srid: Option<i32>,
}

impl From<RawColumnSpec> for ColumnSpec {
    fn from(raw: RawColumnSpec) -> Self {
        let mut spec = ColumnSpec::declared(&raw.type_name);
        spec.not_null = raw.not_null;
        spec.no_insert = raw.no_insert;
        spec.no_update = raw.no_update;
        spec.default = raw.default;
        spec.srid = raw.srid;
        spec
    }
}

/// SQL type a text value should be cast to for a scalar column declared as `type_name`.
///
/// `string` is the schema's name for text and needs no cast. Names with characters
/// outside a type name's alphabet are ignored, since the result is spliced into SQL.
fn scalar_cast(type_name: &str) -> Option<String> {
    let name = type_name.trim().to_ascii_lowercase();
    let text_like = matches!(name.as_str(), "string" | "text" | "varchar" | "char");
    let well_formed = name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ' ' | '(' | ')' | ',' | '.'));
    (!text_like && well_formed).then_some(name)
}

impl ColumnSpec {
    pub fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            sql_type: None,
            not_null: false,
            no_insert: false,
            no_update: false,
            default: None,
            srid: None,
        }
    }

    /// Column declared with a schema type string (`int`, `geo_point`, `numeric`, ...)
    pub fn declared(type_name: &str) -> Self {
        let column_type = ColumnType::parse(type_name);
        let mut spec = Self::new(column_type);
        if column_type == ColumnType::Scalar {
            spec.sql_type = scalar_cast(type_name);
        }
        spec
    }

    pub fn int() -> Self {
        Self::declared("int")
    }

    pub fn string() -> Self {
        Self::new(ColumnType::Scalar)
    }

    pub fn timestamp() -> Self {
        Self::new(ColumnType::Timestamp)
    }

    pub fn int_array() -> Self {
        Self::new(ColumnType::IntArray)
    }

    pub fn string_array() -> Self {
        Self::new(ColumnType::StringArray)
    }

    pub fn geo_point() -> Self {
        Self::new(ColumnType::GeoPoint)
    }

    pub fn geo_polyline() -> Self {
        Self::new(ColumnType::GeoPolyline)
    }

    pub fn foreign() -> Self {
        Self::new(ColumnType::Foreign)
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn no_insert(mut self) -> Self {
        self.no_insert = true;
        self
    }

    pub fn no_update(mut self) -> Self {
        self.no_update = true;
        self
    }

    /// Never written by generated statements (e.g. serial ids, server-side timestamps)
    pub fn readonly(self) -> Self {
        self.no_insert().no_update()
    }

    pub fn default_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default = Some(ColumnDefault::from(value.into()));
        self
    }

    pub fn default_now(mut self) -> Self {
        self.default = Some(ColumnDefault::Now);
        self
    }

    /// Override the SQL type text input is cast to
    pub fn sql_type(mut self, sql_type: &str) -> Self {
        self.sql_type = scalar_cast(sql_type);
        self
    }

    pub fn srid(mut self, srid: i32) -> Self {
        self.srid = Some(srid);
        self
    }

    /// Whether a missing value must fail the build
    pub(crate) fn is_required(&self) -> bool {
        self.not_null && self.default.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_type_strings() {
        assert_eq!(ColumnType::parse("int"), ColumnType::Scalar);
        assert_eq!(ColumnType::parse("string"), ColumnType::Scalar);
        assert_eq!(ColumnType::parse("timestamp"), ColumnType::Timestamp);
        assert_eq!(ColumnType::parse("int[]"), ColumnType::IntArray);
        assert_eq!(ColumnType::parse("array"), ColumnType::IntArray);
        assert_eq!(ColumnType::parse("string[]"), ColumnType::StringArray);
        assert_eq!(ColumnType::parse("geo_point"), ColumnType::GeoPoint);
        assert_eq!(ColumnType::parse("geo_polyline"), ColumnType::GeoPolyline);
        assert_eq!(ColumnType::parse("FOREIGN"), ColumnType::Foreign);
        assert_eq!(ColumnType::parse("jsonb"), ColumnType::Scalar);
    }

    #[test]
    fn test_now_sentinel_is_case_insensitive() {
        assert_eq!(ColumnDefault::from(json!("NOW()")), ColumnDefault::Now);
        assert_eq!(ColumnDefault::from(json!("now()")), ColumnDefault::Now);
        assert_eq!(
            ColumnDefault::from(json!("now")),
            ColumnDefault::Value(json!("now"))
        );
    }

    #[test]
    fn test_deserialize_column_spec() {
        let spec: ColumnSpec = serde_json::from_value(json!({
            "type": "timestamp",
            "no_insert": true,
            "default": "now()"
        }))
        .unwrap();

        assert_eq!(spec.column_type, ColumnType::Timestamp);
        assert!(spec.no_insert);
        assert!(!spec.no_update);
        assert_eq!(spec.default, Some(ColumnDefault::Now));
        assert_eq!(spec.srid, None);
    }

    #[test]
    fn test_null_default_is_no_default() {
        let spec: ColumnSpec =
            serde_json::from_value(json!({"type": "int", "not_null": true, "default": null}))
                .unwrap();
        assert_eq!(spec.default, None);
        assert!(spec.is_required());
    }

    #[test]
    fn test_fluent_spec() {
        let spec = ColumnSpec::geo_point().not_null().srid(3857);
        assert_eq!(spec.column_type, ColumnType::GeoPoint);
        assert!(spec.not_null);
        assert_eq!(spec.srid, Some(3857));

        let spec = ColumnSpec::int().readonly();
        assert!(spec.no_insert && spec.no_update);
    }

    #[test]
    fn test_declared_scalar_type_is_kept() {
        let spec: ColumnSpec = serde_json::from_value(json!({"type": "Numeric"})).unwrap();
        assert_eq!(spec.column_type, ColumnType::Scalar);
        assert_eq!(spec.sql_type.as_deref(), Some("numeric"));

        assert_eq!(ColumnSpec::int().sql_type.as_deref(), Some("int"));
        assert_eq!(ColumnSpec::declared("varchar(32)").sql_type.as_deref(), Some("varchar(32)"));
        assert_eq!(ColumnSpec::declared("double precision").sql_type.as_deref(), Some("double precision"));
        assert_eq!(ColumnSpec::string().sql_type, None);
        assert_eq!(ColumnSpec::declared("text").sql_type, None);
        assert_eq!(ColumnSpec::declared("timestamp").sql_type, None);
        assert_eq!(ColumnSpec::declared("int[]").sql_type, None);
    }

    #[test]
    fn test_unsafe_type_name_gets_no_cast() {
        assert_eq!(ColumnSpec::declared("int; DROP TABLE t").sql_type, None);
        assert_eq!(ColumnSpec::declared("int--").sql_type, None);
        assert_eq!(ColumnSpec::string().sql_type("1int").sql_type, None);
        assert_eq!(ColumnSpec::string().sql_type("uuid").sql_type.as_deref(), Some("uuid"));
    }
}
