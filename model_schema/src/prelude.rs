//! Convenience re-exports for common model-schema usage

pub use crate::column::{ColumnDefault, ColumnSpec, ColumnType};
pub use crate::errors::BuildError;
pub use crate::geo::{Coordinate, GeoInput};
pub use crate::model::ModelDescriptor;
pub use crate::record::{DataRecord, FieldValue};
pub use crate::statement::Statement;
pub use crate::statement_builder::{InsertOptions, StatementBuilder, UpdateOptions};
pub use crate::validation::ValidationError;

pub use type_mapping::{PostgresValue, RowMode};
