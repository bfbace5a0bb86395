//! Convenience re-exports for common SchemaHaus usage
//!
//! # Example
//!
//! ```rust
//! use schemahaus::prelude::*;
//!
//! let model = ModelDescriptor::new("places").column("name", ColumnSpec::string().not_null());
//! let statement = StatementBuilder::new()
//!     .build_insert(&model, &DataRecord::new().set("name", "Tokyo"), &InsertOptions::default())
//!     .unwrap();
//! assert_eq!(statement.text, "INSERT INTO places (name) VALUES ($1) RETURNING id");
//! ```

// Core SchemaHaus components
pub use crate::connection::{Client, ClientScope, ConnectionManager};
pub use crate::core::SchemaHaus;
pub use crate::errors::HausError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, StatementConfig};

// Models, records and statements
pub use model_schema::prelude::*;

// Common external dependencies
pub use anyhow;
pub use sqlx;
pub use tokio;

// Commonly used sqlx types
pub use sqlx::{PgPool, Postgres};
