//! Model descriptors
//!
//! A model names a table and lists its columns in declaration order. That order is
//! the order columns appear in generated statements.

use crate::column::ColumnSpec;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Declarative description of a table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelDescriptor {
    table_name: String,
    #[serde(deserialize_with = "ordered_columns")]
    columns: Vec<(String, ColumnSpec)>,
}

impl ModelDescriptor {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
        }
    }

    /// Append a column. Redeclaring a name replaces the spec but keeps its position.
    pub fn column(mut self, name: impl Into<String>, spec: ColumnSpec) -> Self {
        let name = name.into();
        match self.columns.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = spec,
            None => self.columns.push((name, spec)),
        }
        self
    }

    /// Parse a model from its JSON-like schema form
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Columns in declaration order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnSpec)> {
        self.columns.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, spec)| spec)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Collect a JSON object into a list, keeping the document's key order
fn ordered_columns<'de, D>(deserializer: D) -> Result<Vec<(String, ColumnSpec)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ColumnsVisitor;

    impl<'de> Visitor<'de> for ColumnsVisitor {
        type Value = Vec<(String, ColumnSpec)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of column name to column spec")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut columns: Vec<(String, ColumnSpec)> =
                Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, spec)) = map.next_entry::<String, ColumnSpec>()? {
                if columns.iter().any(|(existing, _)| *existing == name) {
                    return Err(de::Error::custom(format!("duplicate column `{}`", name)));
                }
                columns.push((name, spec));
            }
            Ok(columns)
        }
    }

    deserializer.deserialize_map(ColumnsVisitor)
}
