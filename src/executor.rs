//! Statement execution
//!
//! `query` returns every row, `first` reads a single row through a server-side cursor,
//! and `one` reduces that row to its first column. All three run on a caller-supplied
//! client when given one and otherwise on a connection held just for the call.

use model_schema::{RowMode, Statement};
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgConnection, Postgres};
use tracing::{debug, warn};
use type_mapping::{bind_value, decode_row};
use uuid::Uuid;

use crate::connection::{Client, ClientScope, ConnectionManager};
use crate::core::SchemaHaus;
use crate::errors::HausError;

/// Longest statement prefix quoted in error contexts
const CONTEXT_SQL_LEN: usize = 80;

impl SchemaHaus {
    /// Execute a statement and decode all of its rows
    pub async fn query(
        &self,
        statement: &Statement,
        client: Option<&mut Client>,
    ) -> Result<Vec<JsonValue>, HausError> {
        let mut scope = ClientScope::open(self.connections(), client, false).await?;
        let outcome = fetch_all(scope.client().connection(), statement).await;
        scope.finish(self.connections(), outcome).await
    }

    /// First row of a statement, or `None` when it yields no rows.
    ///
    /// The row is read through a cursor so the rest of the result set is never
    /// materialized.
    pub async fn first(
        &self,
        statement: &Statement,
        client: Option<&mut Client>,
    ) -> Result<Option<JsonValue>, HausError> {
        let mut scope = ClientScope::open(self.connections(), client, false).await?;
        let outcome = fetch_first(self.connections(), scope.client(), statement).await;
        scope.finish(self.connections(), outcome).await
    }

    /// First column of the first row, or `None` for no row or a SQL null
    pub async fn one(
        &self,
        statement: &Statement,
        client: Option<&mut Client>,
    ) -> Result<Option<JsonValue>, HausError> {
        let statement = statement.clone().row_mode(RowMode::Array);
        let row = self.first(&statement, client).await?;
        Ok(row.and_then(first_column))
    }
}

/// Positional `sqlx` query with every statement value bound in order
pub(crate) fn bind_all<'q>(
    text: &'q str,
    values: &'q [type_mapping::PostgresValue],
) -> Query<'q, Postgres, PgArguments> {
    values
        .iter()
        .fold(sqlx::query(text), |query, value| bind_value(query, value))
}

pub(crate) async fn fetch_all(
    conn: &mut PgConnection,
    statement: &Statement,
) -> Result<Vec<JsonValue>, HausError> {
    debug!(sql = %statement.text, params = statement.values.len(), "executing statement");
    crate::trace_log!(params = ?statement.values, "statement parameters");

    let rows: Vec<PgRow> = bind_all(&statement.text, &statement.values)
        .fetch_all(conn)
        .await
        .map_err(|e| HausError::driver(context(statement), e))?;

    Ok(rows
        .iter()
        .map(|row| decode_row(row, statement.row_mode))
        .collect())
}

/// Cursors only live inside a transaction, so one is opened here when the client has none
async fn fetch_first(
    manager: &ConnectionManager,
    client: &mut Client,
    statement: &Statement,
) -> Result<Option<JsonValue>, HausError> {
    let wrap = !client.in_transaction();
    if wrap {
        manager.begin(client).await?;
    }

    let outcome = read_cursor(client.connection(), statement).await;

    if wrap {
        match &outcome {
            Ok(_) => manager.commit(client).await?,
            Err(_) => {
                if let Err(e) = manager.rollback(client).await {
                    warn!(error = %e, "rollback after cursor failure did not complete");
                }
            }
        }
    }
    outcome
}

async fn read_cursor(
    conn: &mut PgConnection,
    statement: &Statement,
) -> Result<Option<JsonValue>, HausError> {
    let cursor = format!("schemahaus_cursor_{}", Uuid::new_v4().simple());
    let declare = format!("DECLARE {} NO SCROLL CURSOR FOR {}", cursor, statement.text);
    debug!(cursor = %cursor, sql = %statement.text, "opening cursor");
    crate::trace_log!(params = ?statement.values, "cursor parameters");

    bind_all(&declare, &statement.values)
        .persistent(false)
        .execute(&mut *conn)
        .await
        .map_err(|e| HausError::driver(context(statement), e))?;

    let fetch = format!("FETCH 1 FROM {}", cursor);
    let row = sqlx::query(&fetch)
        .persistent(false)
        .fetch_optional(&mut *conn)
        .await;

    // Close even when the fetch failed; an aborted transaction rejects it anyway
    let close = format!("CLOSE {}", cursor);
    let closed = sqlx::raw_sql(&close).execute(&mut *conn).await;

    let row = row.map_err(|e| HausError::driver("cursor fetch", e))?;
    if let Err(e) = closed {
        return Err(HausError::driver("cursor close", e));
    }

    Ok(row.map(|row| decode_row(&row, statement.row_mode)))
}

fn first_column(row: JsonValue) -> Option<JsonValue> {
    match row {
        JsonValue::Array(columns) => columns.into_iter().next().filter(|value| !value.is_null()),
        _ => None,
    }
}

/// Error context naming the statement, shortened for long SQL
pub(crate) fn context(statement: &Statement) -> String {
    let text = statement.text.trim();
    match text.char_indices().nth(CONTEXT_SQL_LEN) {
        Some((cut, _)) => format!("`{}...`", &text[..cut]),
        None => format!("`{}`", text),
    }
}
