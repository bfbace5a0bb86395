//! Error types for the SchemaHaus crate
//!
//! This module contains all error types that can be returned by SchemaHaus operations.

use config::ConfigError;
use model_schema::BuildError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HausError {
    /// The statement could not be built. Nothing was sent to the database.
    #[error("Validation error: {0}")]
    Validation(#[from] BuildError),

    /// Transaction control used against a client in the wrong state
    #[error("Client error: {0}")]
    Client(String),

    #[error("Connection pool error: {0}")]
    Pool(#[source] sqlx::Error),

    #[error("Database error during {context}: {source}")]
    Driver {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl HausError {
    pub(crate) fn driver(context: impl Into<String>, source: sqlx::Error) -> Self {
        HausError::Driver {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn client(message: impl Into<String>) -> Self {
        HausError::Client(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, HausError::Validation(_))
    }
}
