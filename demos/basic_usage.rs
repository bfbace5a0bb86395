//! # Basic Usage Example
//!
//! Insert a record described by a JSON model, read it back through a cursor,
//! change it and write it back.
//!
//! Reads `schemahaus.toml` (or the file named by `SCHEMAHAUS_CONFIG`) when present,
//! otherwise connects to a local `schemahaus` database.
//!
//! Run with `RUST_LOG=debug` to see statements and transaction steps.

use anyhow::Context;
use schemahaus::prelude::*;
use serde_json::json;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let started = Instant::now();

    let haus = match AppConfig::load() {
        Ok(config) => SchemaHaus::with_config(&config).await?,
        Err(e) => {
            println!("No config loaded ({}), using local defaults", e);
            let config = DatabaseConfig::new(
                "localhost".to_string(),
                5432,
                "schemahaus".to_string(),
                "postgres".to_string(),
                "password".to_string(),
                1,    // min_connections
                5,    // max_connections
                30,   // connection_timeout_seconds
                600,  // idle_timeout_seconds
                3600, // max_lifetime_seconds
            );
            SchemaHaus::new(config).await?
        }
    };

    haus.query(
        &Statement::new(
            "CREATE TABLE IF NOT EXISTS test (
                id serial PRIMARY KEY,
                created_at timestamptz NOT NULL DEFAULT now(),
                updated_at timestamptz,
                value text
            )",
        ),
        None,
    )
    .await?;

    let model = ModelDescriptor::from_json(json!({
        "table_name": "test",
        "columns": {
            "id": {"type": "int", "no_insert": true, "no_update": true},
            "created_at": {"type": "timestamp", "no_insert": true, "no_update": true},
            "updated_at": {"type": "timestamp", "no_insert": true, "default": "now()"},
            "value": {"type": "string"}
        }
    }))?;

    let data = DataRecord::new().set("value", "hoge");
    let id = haus
        .insert(&model, &data, None, &InsertOptions::default())
        .await?
        .and_then(|id| id.as_i64())
        .context("insert returned no id")?;
    println!("Inserted id: {}", id);

    let row = haus
        .first(
            &Statement::new("SELECT * FROM test WHERE id = $1").bind(id),
            None,
        )
        .await?
        .context("inserted row not found")?;
    println!("Read back: {}", row);

    let mut record = DataRecord::from_json(&model, &row)?;
    record.insert("value", "fuga");
    haus.update(&model, &record, None, &UpdateOptions::default())
        .await?;

    let value = haus
        .one(
            &Statement::new("SELECT value FROM test WHERE id = $1").bind(id),
            None,
        )
        .await?;
    println!("Updated value: {:?}", value);

    haus.close().await;
    println!("Access time: {:?}", started.elapsed());

    Ok(())
}
