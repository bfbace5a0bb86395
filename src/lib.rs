//! # SchemaHaus
//!
//! A schema-driven PostgreSQL data-access layer: describe a table's columns once, and
//! SchemaHaus synthesizes parameterized INSERT/UPDATE statements (arrays and PostGIS
//! geometry included), runs them on pooled connections, and wraps single writes in
//! their own transaction when the caller does not supply one.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schemahaus::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new(
//!         "localhost".to_string(), 5432, "schemahaus".to_string(),
//!         "postgres".to_string(), "password".to_string(),
//!         1, 5, 30, 600, 3600,
//!     );
//!     let haus = SchemaHaus::new(config).await?;
//!
//!     let model = ModelDescriptor::from_json(json!({
//!         "table_name": "places",
//!         "columns": {
//!             "id": {"type": "int", "no_insert": true, "no_update": true},
//!             "name": {"type": "string", "not_null": true},
//!             "location": {"type": "geo_point"},
//!             "created_at": {"type": "timestamp", "default": "now()", "no_update": true}
//!         }
//!     }))?;
//!
//!     let data = DataRecord::new()
//!         .set("name", "Tokyo")
//!         .set("location", (35.68, 139.76));
//!     let id = haus.insert(&model, &data, None, &InsertOptions::default()).await?;
//!
//!     let id = id.and_then(|id| id.as_i64()).unwrap_or_default();
//!     let row = haus
//!         .first(&Statement::new("SELECT * FROM places WHERE id = $1").bind(id), None)
//!         .await?;
//!     println!("{:?}", row);
//!
//!     Ok(())
//! }
//! ```

/// Conditional trace logging for parameter dumps
/// This macro only compiles in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod connection;
pub mod core;
pub mod errors;
pub mod executor;
pub mod prelude;
pub mod write;

// Re-export the main public types for convenience
pub use connection::{Client, ClientScope, ConnectionManager};
pub use core::SchemaHaus;
pub use errors::HausError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, StatementConfig};

// Re-export internal crates used by the public API
pub use model_schema;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use sqlx;
