//! Parameter binding onto sqlx queries.

use crate::types::PostgresValue;
use sqlx::postgres::PgArguments;
use sqlx::types::Json;
use sqlx::Postgres;

/// Bind a parameter to a PostgreSQL query.
pub fn bind_value<'q>(
    query: sqlx::query::Query<'q, Postgres, PgArguments>,
    value: &'q PostgresValue,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match value {
        PostgresValue::Null => query.bind(None::<String>),
        PostgresValue::Text(v) => query.bind(v.as_str()),
        PostgresValue::Integer(v) => query.bind(*v),
        PostgresValue::BigInt(v) => query.bind(*v),
        PostgresValue::SmallInt(v) => query.bind(*v),
        PostgresValue::Float(v) => query.bind(*v),
        PostgresValue::Boolean(v) => query.bind(*v),
        PostgresValue::Uuid(v) => query.bind(*v),
        PostgresValue::Timestamp(v) => query.bind(*v),
        // Cast to numeric happens in the placeholder
        PostgresValue::Decimal(v) => query.bind(v.as_str()),
        PostgresValue::Json(v) => query.bind(Json(v)),
    }
}
