//! MySQL [`DatabaseClient`] over an sqlx pool.

use crate::client::DatabaseClient;
use crate::config::DatabaseConfig;
use crate::dialect::Dialect;
use crate::error::{RelError, RelResult};
use crate::row::Row;
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::{
    MySql, MySqlArguments, MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow,
    MySqlSslMode,
};
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::{Column as _, Row as _, TypeInfo as _};

/// Runs statements on connections taken from a `sqlx::MySqlPool`.
///
/// Pools built here connect lazily: the first [`query`](DatabaseClient::query)
/// opens the first connection.
#[derive(Clone)]
pub struct MySqlClient {
    pool: MySqlPool,
}

impl MySqlClient {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Build a lazily connecting pool from `config`.
    ///
    /// Must be called inside a tokio runtime.
    pub fn from_config(config: &DatabaseConfig) -> RelResult<Self> {
        let options = connect_options(config)?;
        let max = u32::try_from(config.max_pool_size)
            .map_err(|_| RelError::config("max_pool_size does not fit a u32"))?;
        let pool = MySqlPoolOptions::new()
            .max_connections(max)
            .connect_lazy_with(options);
        Ok(Self::new(pool))
    }

    /// Build a lazily connecting pool from a `mysql://` URL.
    pub fn from_url(database_url: &str, max_size: u32) -> RelResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_size)
            .connect_lazy(database_url)
            .map_err(|e| RelError::Connection(e.to_string()))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

impl std::fmt::Debug for MySqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlClient")
            .field("max_size", &self.pool.options().get_max_connections())
            .field("size", &self.pool.size())
            .field("idle", &self.pool.num_idle())
            .finish()
    }
}

impl DatabaseClient for MySqlClient {
    async fn query(&self, sql: &str, params: &[Value]) -> RelResult<Vec<Row>> {
        let query = params
            .iter()
            .map(param)
            .fold(sqlx::query(sql), bind);
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(convert_row).collect()
    }
}

/// Translate a validated [`DatabaseConfig`] into driver settings.
pub fn connect_options(config: &DatabaseConfig) -> RelResult<MySqlConnectOptions> {
    if config.dialect != Dialect::MySql {
        return Err(RelError::config(format!(
            "cannot open a mysql pool for dialect '{}'",
            config.dialect
        )));
    }
    config.validate()?;

    let mut options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.effective_port())
        .username(&config.user)
        .database(&config.database)
        .ssl_mode(if config.ssl {
            MySqlSslMode::Required
        } else {
            MySqlSslMode::Preferred
        });
    if let Some(password) = &config.password {
        options = options.password(password);
    }
    Ok(options)
}

// ─── Value <-> wire ─────────────────────────────────────────────────────────

/// Owned bind parameter in a shape the MySQL protocol encodes directly.
#[derive(Debug, Clone, PartialEq)]
enum Param {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
}

fn param(value: &Value) -> Param {
    match value {
        Value::Null => Param::Null,
        Value::Bool(b) => Param::Bool(*b),
        Value::Int(i) => Param::Int(*i),
        Value::Float(f) => Param::Float(*f),
        Value::Decimal(d) => Param::Decimal(*d),
        // Ids live in char(36) columns.
        Value::Uuid(u) => Param::Text(u.hyphenated().to_string()),
        Value::Timestamp(t) => Param::Timestamp(*t),
        Value::Text(s) => Param::Text(s.clone()),
        Value::Json(j) => Param::Json(j.clone()),
    }
}

fn bind<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    param: Param,
) -> Query<'q, MySql, MySqlArguments> {
    match param {
        Param::Null => query.bind(None::<String>),
        Param::Bool(b) => query.bind(b),
        Param::Int(i) => query.bind(i),
        Param::Float(f) => query.bind(f),
        Param::Decimal(d) => query.bind(d),
        Param::Text(s) => query.bind(s),
        Param::Timestamp(t) => query.bind(t),
        Param::Json(j) => query.bind(Json(j)),
    }
}

/// How a result column is read, keyed on the server's type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Null,
    Bool,
    Int,
    Unsigned,
    Float,
    Double,
    Decimal,
    DateTime,
    Timestamp,
    Date,
    Json,
    Text,
    Unsupported,
}

fn column_kind(type_name: &str) -> Kind {
    let name = type_name.to_ascii_uppercase();
    if name.ends_with(" UNSIGNED") {
        return Kind::Unsigned;
    }
    match name.as_str() {
        "NULL" => Kind::Null,
        "BOOLEAN" => Kind::Bool,
        // COUNT(*) and friends report BIGINT.
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => Kind::Int,
        "FLOAT" => Kind::Float,
        "DOUBLE" => Kind::Double,
        "DECIMAL" => Kind::Decimal,
        "DATETIME" => Kind::DateTime,
        "TIMESTAMP" => Kind::Timestamp,
        "DATE" => Kind::Date,
        "JSON" => Kind::Json,
        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
            Kind::Text
        }
        _ => Kind::Unsupported,
    }
}

fn convert_row(row: &MySqlRow) -> RelResult<Row> {
    let mut out = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let type_name = column.type_info().name();
        let value = cell(row, idx, column_kind(type_name))
            .map_err(|e| match e {
                CellError::Driver(e) => RelError::decode(column.name(), e),
                CellError::Unsupported => RelError::decode(
                    column.name(),
                    format!("unsupported column type '{type_name}'; cast it to char in the query"),
                ),
            })?;
        out.push(column.name(), value);
    }
    Ok(out)
}

enum CellError {
    Driver(String),
    Unsupported,
}

impl From<sqlx::Error> for CellError {
    fn from(err: sqlx::Error) -> Self {
        Self::Driver(err.to_string())
    }
}

fn cell(row: &MySqlRow, idx: usize, kind: Kind) -> Result<Value, CellError> {
    fn get<'r, T>(row: &'r MySqlRow, idx: usize) -> Result<Value, CellError>
    where
        T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
        Option<T>: Into<Value>,
    {
        Ok(row.try_get::<Option<T>, _>(idx)?.into())
    }

    match kind {
        Kind::Null => Ok(Value::Null),
        Kind::Bool => get::<bool>(row, idx),
        Kind::Int => get::<i64>(row, idx),
        Kind::Unsigned => unsigned(row.try_get::<Option<u64>, _>(idx)?),
        Kind::Float => get::<f32>(row, idx),
        Kind::Double => get::<f64>(row, idx),
        Kind::Decimal => get::<Decimal>(row, idx),
        Kind::DateTime => Ok(row
            .try_get::<Option<NaiveDateTime>, _>(idx)?
            .map(|t| t.and_utc())
            .into()),
        Kind::Timestamp => get::<DateTime<Utc>>(row, idx),
        Kind::Date => Ok(row
            .try_get::<Option<NaiveDate>, _>(idx)?
            .map(|d| d.to_string())
            .into()),
        Kind::Json => Ok(row
            .try_get::<Option<Json<serde_json::Value>>, _>(idx)?
            .map(|j| j.0)
            .into()),
        Kind::Text => get::<String>(row, idx),
        Kind::Unsupported => Err(CellError::Unsupported),
    }
}

fn unsigned(value: Option<u64>) -> Result<Value, CellError> {
    match value {
        None => Ok(Value::Null),
        Some(v) => i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| CellError::Driver(format!("unsigned value {v} overflows i64"))),
    }
}
