//! Error types for relsql

use thiserror::Error;

/// Result type alias for relsql operations
pub type RelResult<T> = Result<T, RelError>;

/// Error types for statement building, schema synthesis and execution
#[derive(Debug, Error)]
pub enum RelError {
    /// Structurally invalid argument (empty column list, missing delete criteria, ...)
    #[error("Argument error: {0}")]
    Argument(String),

    /// Inconsistent table schema description
    #[error("Schema error: {0}")]
    Schema(String),

    /// The database client rejected a statement
    #[error("Database query execution error: {0}")]
    QueryExecution(String),

    /// Invalid configuration (unknown dialect tag, missing connection settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Driver-level query error
    #[cfg(feature = "pool")]
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// MySQL driver error
    #[cfg(feature = "mysql")]
    #[error("MySQL error: {0}")]
    MySql(#[from] sqlx::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl RelError {
    /// Create an argument error
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Wrap any client failure, keeping only its message.
    pub(crate) fn query_execution(source: &RelError) -> Self {
        match source {
            // Already wrapped once (e.g. a client that itself drives a builder).
            Self::QueryExecution(message) => Self::QueryExecution(message.clone()),
            other => Self::QueryExecution(other.to_string()),
        }
    }

    /// Check if this is an argument error
    pub fn is_argument(&self) -> bool {
        matches!(self, Self::Argument(_))
    }

    /// Check if this is a schema error
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    /// Check if this is a query execution error
    pub fn is_query_execution(&self) -> bool {
        matches!(self, Self::QueryExecution(_))
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for RelError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
