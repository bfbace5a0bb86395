//! Core SchemaHaus functionality
//!
//! This module contains the main SchemaHaus handle: the connection pool, the
//! connection manager built on it, and the statement builder used for writes.

use sqlx::PgPool;
use std::time::Duration;
use tracing::debug;

use crate::connection::ConnectionManager;
use crate::errors::HausError;
use config::{AppConfig, DatabaseConfig, StatementConfig};
use model_schema::StatementBuilder;

/// Entry point for schema-driven reads and writes against one database
#[derive(Clone, Debug)]
pub struct SchemaHaus {
    connections: ConnectionManager,
    builder: StatementBuilder,
}

impl SchemaHaus {
    /// Create new SchemaHaus with database connection
    pub async fn new(config: DatabaseConfig) -> Result<Self, HausError> {
        let pool = connect(&config).await?;
        Ok(Self::from_pool(pool))
    }

    /// Create SchemaHaus from a full application config, statement policy included
    pub async fn with_config(config: &AppConfig) -> Result<Self, HausError> {
        let pool = connect(&config.database).await?;
        Ok(Self::from_pool(pool).with_builder(builder_from(&config.statements)))
    }

    /// Wrap an existing pool with the default statement policy
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            connections: ConnectionManager::new(pool),
            builder: StatementBuilder::default(),
        }
    }

    pub fn with_builder(mut self, builder: StatementBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        self.connections.pool()
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    pub fn builder(&self) -> &StatementBuilder {
        &self.builder
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), HausError> {
        sqlx::query("SELECT 1")
            .fetch_one(self.pool())
            .await
            .map_err(|e| HausError::driver("health check", e))?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to come back
    pub async fn close(&self) {
        self.pool().close().await;
        debug!("connection pool closed");
    }
}

async fn connect(config: &DatabaseConfig) -> Result<PgPool, HausError> {
    config.validate()?;
    let connection_string = config.connection_string();

    let mut pool_options = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

    // Set max lifetime if specified
    if config.max_lifetime_seconds > 0 {
        pool_options = pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
    }

    let pool = pool_options
        .connect(&connection_string)
        .await
        .map_err(HausError::Pool)?;
    debug!(
        host = %config.host,
        database = %config.database,
        max_connections = config.max_connections,
        "connection pool ready"
    );
    Ok(pool)
}

fn builder_from(config: &StatementConfig) -> StatementBuilder {
    StatementBuilder::new()
        .with_default_srid(config.default_srid)
        .reject_zero_coordinates(config.reject_zero_coordinates)
}
