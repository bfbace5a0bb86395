//! Statement builder
//!
//! Synthesizes parameterized INSERT and UPDATE statements from a [`ModelDescriptor`]
//! and a [`DataRecord`]. Both statements share one column walk:
//!
//! 1. columns are visited in declaration order;
//! 2. `foreign` columns, and columns flagged `no_insert`/`no_update` for the operation
//!    at hand, are skipped;
//! 3. a missing value falls back to the column default, or fails the build when the
//!    column is `not_null` without one;
//! 4. the value is rendered into an SQL fragment, appending parameters as needed.

mod fragment;
mod insert;
mod update;

#[cfg(test)]
mod tests;

use crate::column::{ColumnDefault, ColumnSpec, ColumnType};
use crate::errors::BuildError;
use crate::model::ModelDescriptor;
use crate::record::{DataRecord, FieldValue};
use crate::validation::{ValidatedColumnName, ValidatedTableName};
use std::borrow::Cow;

/// Spatial reference applied when a geo column declares none
pub const DEFAULT_SRID: i32 = 4326;

/// Options for [`StatementBuilder::build_insert`]
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOptions {
    /// Overrides the model's table name
    pub table_name: Option<String>,
    pub id_column: String,
    /// Append `RETURNING <id_column>`
    pub return_id: bool,
}

impl Default for InsertOptions {
    fn default() -> Self {
        Self {
            table_name: None,
            id_column: "id".to_string(),
            return_id: true,
        }
    }
}

impl InsertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn id_column(mut self, id_column: impl Into<String>) -> Self {
        self.id_column = id_column.into();
        self
    }

    pub fn return_id(mut self, return_id: bool) -> Self {
        self.return_id = return_id;
        self
    }
}

/// Options for [`StatementBuilder::build_update`]
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOptions {
    /// Overrides the model's table name
    pub table_name: Option<String>,
    pub id_column: String,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            table_name: None,
            id_column: "id".to_string(),
        }
    }
}

impl UpdateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn id_column(mut self, id_column: impl Into<String>) -> Self {
        self.id_column = id_column.into();
        self
    }
}

/// Which write a column walk is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteKind {
    Insert,
    Update,
}

/// A column value after defaulting
#[derive(Debug)]
pub(crate) enum Resolved<'a> {
    Value(Cow<'a, FieldValue>),
    Now,
}

/// One emitted column: its name and the SQL standing in for its value
#[derive(Debug)]
pub(crate) struct ColumnFragment<'m> {
    pub column: &'m str,
    pub sql: String,
}

/// Builds INSERT/UPDATE statements under a fixed geo policy
#[derive(Debug, Clone, PartialEq)]
pub struct StatementBuilder {
    default_srid: i32,
    reject_zero_coordinates: bool,
}

impl Default for StatementBuilder {
    fn default() -> Self {
        Self {
            default_srid: DEFAULT_SRID,
            reject_zero_coordinates: false,
        }
    }
}

impl StatementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_srid(mut self, srid: i32) -> Self {
        self.default_srid = srid;
        self
    }

    /// Treat a zero latitude or longitude as invalid, like a falsy check would
    pub fn reject_zero_coordinates(mut self, reject: bool) -> Self {
        self.reject_zero_coordinates = reject;
        self
    }

    pub fn default_srid(&self) -> i32 {
        self.default_srid
    }

    pub(crate) fn srid_for(&self, spec: &ColumnSpec) -> i32 {
        spec.srid.unwrap_or(self.default_srid)
    }

    /// Walk the model for one write kind, rendering every emitted column
    pub(crate) fn column_fragments<'m>(
        &self,
        table: &str,
        model: &'m ModelDescriptor,
        data: &DataRecord,
        kind: WriteKind,
        params: &mut Vec<type_mapping::PostgresValue>,
    ) -> Result<Vec<ColumnFragment<'m>>, BuildError> {
        let mut fragments = Vec::with_capacity(model.len());

        for (column, spec) in model.columns() {
            if spec.column_type == ColumnType::Foreign {
                continue;
            }
            let skipped = match kind {
                WriteKind::Insert => spec.no_insert,
                WriteKind::Update => spec.no_update,
            };
            if skipped {
                continue;
            }

            ValidatedColumnName::new(column)?;
            let resolved = resolve_value(table, column, spec, data)?;
            let sql = self.render(table, column, spec, resolved, params)?;
            fragments.push(ColumnFragment { column, sql });
        }

        Ok(fragments)
    }
}

/// Pick the table name the statement targets
pub(crate) fn target_table<'a>(
    model: &'a ModelDescriptor,
    table_name: Option<&'a str>,
) -> Result<&'a str, BuildError> {
    let table = table_name.unwrap_or_else(|| model.table_name());
    ValidatedTableName::new(table)?;
    Ok(table)
}

/// Present value, else the default, else an error for required columns
fn resolve_value<'a>(
    table: &str,
    column: &str,
    spec: &'a ColumnSpec,
    data: &'a DataRecord,
) -> Result<Resolved<'a>, BuildError> {
    if let Some(value) = data.get(column).filter(|value| !value.is_null()) {
        return Ok(Resolved::Value(Cow::Borrowed(value)));
    }

    if spec.is_required() {
        return Err(BuildError::MissingRequired {
            table: table.to_string(),
            column: column.to_string(),
        });
    }

    match &spec.default {
        None => Ok(Resolved::Value(Cow::Owned(FieldValue::Null))),
        Some(ColumnDefault::Now) => Ok(Resolved::Now),
        Some(ColumnDefault::Value(default)) => {
            FieldValue::from_json(spec.column_type, default, table, column)
                .map(|value| Resolved::Value(Cow::Owned(value)))
        }
    }
}
