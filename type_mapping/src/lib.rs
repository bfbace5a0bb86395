//! Unified type mapping between Rust values and PostgreSQL
//! This crate provides the mapping logic used across the schemahaus ecosystem:
//! bindable parameter values, JSON conversion, and row decoding.

pub mod bind;
pub mod decode;
pub mod numeric;
pub mod serialize;
pub mod types;

pub use bind::bind_value;
pub use decode::{decode_row, RowMode};
pub use numeric::PgNumericText;
pub use serialize::json_to_postgres_value;
pub use types::PostgresValue;
