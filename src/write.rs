//! Model-driven writes
//!
//! `insert` and `update` build their statement first, so a validation failure never
//! touches the pool. Without a caller-supplied client the write runs in its own
//! transaction: acquire, begin, execute, then commit or roll back, then release.

use model_schema::{DataRecord, InsertOptions, ModelDescriptor, Statement, UpdateOptions};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::connection::{Client, ClientScope};
use crate::core::SchemaHaus;
use crate::errors::HausError;
use crate::executor::fetch_all;

impl SchemaHaus {
    /// Insert one record, returning the generated id when `options.return_id` is set.
    ///
    /// A self-managed transaction is committed before the id is returned.
    pub async fn insert(
        &self,
        model: &ModelDescriptor,
        data: &DataRecord,
        client: Option<&mut Client>,
        options: &InsertOptions,
    ) -> Result<Option<JsonValue>, HausError> {
        let statement = self.builder().build_insert(model, data, options)?;
        debug!(table = model.table_name(), sql = %statement.text, "insert");

        let rows = self.write(statement, client).await?;
        if !options.return_id {
            return Ok(None);
        }
        Ok(rows.into_iter().next().and_then(|row| match row {
            JsonValue::Array(columns) => columns.into_iter().next(),
            _ => None,
        }))
    }

    /// Update the row whose id column matches the record's id value
    pub async fn update(
        &self,
        model: &ModelDescriptor,
        data: &DataRecord,
        client: Option<&mut Client>,
        options: &UpdateOptions,
    ) -> Result<(), HausError> {
        let statement = self.builder().build_update(model, data, options)?;
        debug!(table = model.table_name(), sql = %statement.text, "update");

        self.write(statement, client).await?;
        Ok(())
    }

    async fn write(
        &self,
        statement: Statement,
        client: Option<&mut Client>,
    ) -> Result<Vec<JsonValue>, HausError> {
        let mut scope = ClientScope::open(self.connections(), client, true).await?;
        let outcome = fetch_all(scope.client().connection(), &statement).await;
        scope.finish(self.connections(), outcome).await
    }
}
