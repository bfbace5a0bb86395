use crate::column::ColumnType;
use crate::validation::ValidationError;
use thiserror::Error;

/// Failures detected while turning a model and a record into SQL.
///
/// All of these are raised before any connection is touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("{table}:{column} is required")]
    MissingRequired { table: String, column: String },

    #[error("Invalid geo value: {input} at [{table}:{column}]")]
    InvalidGeo {
        table: String,
        column: String,
        input: String,
    },

    #[error("{table}:{column} expects a {expected} value, got {found}")]
    TypeMismatch {
        table: String,
        column: String,
        expected: ColumnType,
        found: &'static str,
    },

    #[error("{table}:{column} cannot default to now() as a {column_type} column")]
    InvalidDefault {
        table: String,
        column: String,
        column_type: ColumnType,
    },

    #[error("{table}:{column} is missing, cannot identify the row to update")]
    MissingId { table: String, column: String },

    #[error("Nothing to update in {table}")]
    NothingToUpdate { table: String },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] ValidationError),
}

impl BuildError {
    pub(crate) fn mismatch(table: &str, column: &str, expected: ColumnType, found: &'static str) -> Self {
        BuildError::TypeMismatch {
            table: table.to_string(),
            column: column.to_string(),
            expected,
            found,
        }
    }

    pub(crate) fn invalid_geo(table: &str, column: &str, input: impl Into<String>) -> Self {
        BuildError::InvalidGeo {
            table: table.to_string(),
            column: column.to_string(),
            input: input.into(),
        }
    }
}
