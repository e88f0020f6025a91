//! PostgreSQL [`DatabaseClient`] over tokio-postgres and a deadpool pool.

use crate::client::DatabaseClient;
use crate::config::DatabaseConfig;
use crate::error::{RelError, RelResult};
use crate::row::Row;
use crate::value::Value;
use bytes::BytesMut;
use chrono::{DateTime, NaiveDateTime, Utc};
use deadpool_postgres::Pool;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type};

/// Runs statements on connections taken from a `deadpool_postgres::Pool`.
///
/// Each [`query`](DatabaseClient::query) call checks out one connection and
/// returns it when done, so a `PostgresClient` can be shared freely. For
/// several statements on one connection (e.g. inside a transaction) use the
/// [`DatabaseClient`] impls on `tokio_postgres::Client` and
/// `tokio_postgres::Transaction` instead.
#[derive(Clone)]
pub struct PostgresClient {
    pool: Pool,
}

impl PostgresClient {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Build a pool from `config` (no TLS) and wrap it.
    pub fn from_config(config: &DatabaseConfig) -> RelResult<Self> {
        crate::pool::create_pool_from_config(config).map(Self::new)
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

impl std::fmt::Debug for PostgresClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("PostgresClient")
            .field("max_size", &status.max_size)
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}

impl DatabaseClient for PostgresClient {
    async fn query(&self, sql: &str, params: &[Value]) -> RelResult<Vec<Row>> {
        let client = self.pool.get().await?;
        let rows = tokio_postgres::Client::query(&client, sql, &bind(params)).await?;
        convert_rows(&rows)
    }
}

impl DatabaseClient for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[Value]) -> RelResult<Vec<Row>> {
        let rows = tokio_postgres::Client::query(self, sql, &bind(params)).await?;
        convert_rows(&rows)
    }
}

impl DatabaseClient for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[Value]) -> RelResult<Vec<Row>> {
        let rows = tokio_postgres::Transaction::query(self, sql, &bind(params)).await?;
        convert_rows(&rows)
    }
}

fn bind(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

// ─── Value <-> wire ─────────────────────────────────────────────────────────

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => b.to_sql_checked(ty, out),
            Value::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql_checked(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql_checked(ty, out),
                Type::FLOAT4 => (*i as f32).to_sql_checked(ty, out),
                Type::FLOAT8 => (*i as f64).to_sql_checked(ty, out),
                Type::NUMERIC => Decimal::from(*i).to_sql_checked(ty, out),
                _ => i.to_sql_checked(ty, out),
            },
            Value::Float(f) => match *ty {
                Type::FLOAT4 => (*f as f32).to_sql_checked(ty, out),
                Type::NUMERIC => Decimal::try_from(*f)?.to_sql_checked(ty, out),
                _ => f.to_sql_checked(ty, out),
            },
            Value::Decimal(d) => match *ty {
                Type::FLOAT4 | Type::FLOAT8 => d
                    .to_f64()
                    .ok_or("decimal out of range for float")?
                    .to_sql_checked(ty, out),
                _ => d.to_sql_checked(ty, out),
            },
            Value::Uuid(u) => match *ty {
                Type::TEXT | Type::VARCHAR | Type::BPCHAR => u.to_string().to_sql_checked(ty, out),
                _ => u.to_sql_checked(ty, out),
            },
            Value::Timestamp(t) => match *ty {
                Type::TIMESTAMP => t.naive_utc().to_sql_checked(ty, out),
                _ => t.to_sql_checked(ty, out),
            },
            Value::Text(s) => match *ty {
                // Text ids bound to uuid columns.
                Type::UUID => uuid::Uuid::parse_str(s)?.to_sql_checked(ty, out),
                Type::NUMERIC => s.parse::<Decimal>()?.to_sql_checked(ty, out),
                _ => s.to_sql_checked(ty, out),
            },
            Value::Json(j) => j.to_sql_checked(ty, out),
        }
    }

    // Per-variant checks happen in `to_sql` through the inner `to_sql_checked`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

fn convert_rows(rows: &[tokio_postgres::Row]) -> RelResult<Vec<Row>> {
    rows.iter().map(convert_row).collect()
}

fn convert_row(row: &tokio_postgres::Row) -> RelResult<Row> {
    let mut out = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = cell(row, idx, column.type_())
            .map_err(|e| RelError::decode(column.name(), e))?;
        out.push(column.name(), value);
    }
    Ok(out)
}

fn cell(row: &tokio_postgres::Row, idx: usize, ty: &Type) -> Result<Value, String> {
    fn get<'a, T>(row: &'a tokio_postgres::Row, idx: usize) -> Result<Value, String>
    where
        T: tokio_postgres::types::FromSql<'a>,
        Option<T>: Into<Value>,
    {
        row.try_get::<_, Option<T>>(idx)
            .map(Into::into)
            .map_err(|e| e.to_string())
    }

    match *ty {
        Type::BOOL => get::<bool>(row, idx),
        Type::INT2 => get::<i16>(row, idx),
        Type::INT4 => get::<i32>(row, idx),
        Type::INT8 => get::<i64>(row, idx),
        Type::FLOAT4 => get::<f32>(row, idx),
        Type::FLOAT8 => get::<f64>(row, idx),
        Type::NUMERIC => get::<Decimal>(row, idx),
        Type::UUID => get::<uuid::Uuid>(row, idx),
        Type::TIMESTAMPTZ => get::<DateTime<Utc>>(row, idx),
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(idx)
            .map(|t| t.map(|t| t.and_utc()).into())
            .map_err(|e| e.to_string()),
        Type::JSON | Type::JSONB => get::<serde_json::Value>(row, idx),
        _ => get::<String>(row, idx)
            .map_err(|_| format!("unsupported column type '{ty}'; cast it to text in the query")),
    }
}
