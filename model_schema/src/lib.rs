//! Model Schema - declarative table descriptions and statement synthesis for SchemaHaus
//!
//! This crate is free of any database connection: it turns a [`ModelDescriptor`] and a
//! [`DataRecord`] into a parameterized [`Statement`] ready for execution.

pub mod column;
pub mod errors;
pub mod geo;
pub mod model;
pub mod prelude;
pub mod record;
pub mod statement;
pub mod statement_builder;
pub mod validation;

pub use column::{ColumnDefault, ColumnSpec, ColumnType};
pub use errors::BuildError;
pub use geo::{Coordinate, GeoInput};
pub use model::ModelDescriptor;
pub use record::{DataRecord, FieldValue};
pub use statement::Statement;
pub use statement_builder::{InsertOptions, StatementBuilder, UpdateOptions};
pub use validation::{ValidatedColumnName, ValidatedTableName, ValidationError};

pub use type_mapping::{PostgresValue, RowMode};
