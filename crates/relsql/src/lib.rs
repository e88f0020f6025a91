//! # relsql
//!
//! Dialect-aware SQL statement builder and schema DDL synthesizer for
//! PostgreSQL and MySQL.
//!
//! ## Features
//!
//! - **Statement builder**: chainable SELECT / INSERT / UPDATE / DELETE with
//!   positional parameters that always line up with their placeholders
//! - **Record operations**: find / save / update / delete in one call
//! - **Schema synthesis**: `CREATE TABLE`, foreign keys and many-to-many join
//!   tables from a table description (in code or JSON)
//! - **Index DDL**: per-column plain and unique indexes
//! - **Pluggable client**: anything implementing [`DatabaseClient`]; a pooled
//!   PostgreSQL client ships behind the `pool` feature and a MySQL client
//!   behind `mysql`
//!
//! ## Statement builder
//!
//! ```ignore
//! use relsql::{ColumnValues, Criteria, Dialect, StatementBuilder};
//!
//! let mut assets = StatementBuilder::new("Asset", &client, Dialect::Postgres)?;
//!
//! // SELECT "assetId", "name" FROM "Asset" WHERE "assetType" = $1
//! let rows = assets
//!     .select(["assetId", "name"])
//!     .filter(&Criteria::new().eq("assetType", "Shares"))
//!     .execute()
//!     .await?;
//!
//! // UPDATE "Asset" SET "name" = $1 WHERE "assetId" = $2
//! assets
//!     .update()
//!     .set(&ColumnValues::new().with("name", "ACME Corp"))?
//!     .filter(&Criteria::new().eq("assetId", id))
//!     .execute()
//!     .await?;
//! ```
//!
//! ## Schema synthesis
//!
//! ```ignore
//! use relsql::{ColumnDefinition, Dialect, TableSchema, synthesize_schema_batch};
//!
//! let currency = TableSchema::new("Currency")
//!     .column("currencyCode", ColumnDefinition::new("varchar").length(3).primary_key());
//! let asset = TableSchema::new("Asset")
//!     .column("assetId", ColumnDefinition::new("uuid").primary_key())
//!     .column("currencyCode", ColumnDefinition::new("varchar").length(3))
//!     .many_to_one("currencyCode", "Currency");
//!
//! let report = synthesize_schema_batch(&[currency, asset], &client, Dialect::Postgres).await?;
//! ```
//!
//! ## Feature flags
//!
//! - `pool` (default): [`PostgresClient`] and pool helpers over
//!   `deadpool-postgres` / `tokio-postgres`
//! - `mysql`: [`MySqlClient`] over an `sqlx` MySQL pool
//! - `tracing` (default): `debug`/`info`/`warn` events under the
//!   `relsql.sql` and `relsql.schema` targets

pub mod builder;
pub mod client;
pub mod condition;
pub mod config;
pub mod dialect;
pub mod error;
pub mod index;
pub mod records;
pub mod row;
pub mod schema;
pub mod value;

#[cfg(feature = "mysql")]
pub mod mysql_client;
#[cfg(feature = "pool")]
pub mod pg_client;
#[cfg(feature = "pool")]
pub mod pool;

#[cfg(test)]
pub(crate) mod mock;

pub use builder::StatementBuilder;
pub use client::DatabaseClient;
pub use condition::{Condition, Criteria};
pub use config::DatabaseConfig;
pub use dialect::Dialect;
pub use error::{RelError, RelResult};
pub use index::{
    create_index, create_index_sql, create_unique_index, create_unique_index_sql, drop_index,
    drop_index_sql,
};
pub use records::Records;
pub use row::{FromValue, Row};
pub use schema::{
    BatchOptions, BatchReport, ColumnDefinition, Columns, ForeignKeyRef, OnExisting, OneOrMany,
    RelationDescriptor, Relations, SchemaDocument, TableSchema, create_table_sql,
    relation_statements, schema_batch_sql, synthesize_schema_batch, synthesize_schema_batch_with,
    table_exists,
};
pub use value::{ColumnValues, Value};

#[cfg(feature = "mysql")]
pub use mysql_client::MySqlClient;
#[cfg(feature = "pool")]
pub use pg_client::PostgresClient;
#[cfg(feature = "pool")]
pub use pool::{
    create_pool, create_pool_from_config, create_pool_from_config_with_tls,
    create_pool_with_config, create_pool_with_manager_config, create_pool_with_tls,
};

// Re-export the driver crates so callers can name pool and TLS types.
#[cfg(feature = "pool")]
pub use deadpool_postgres;
#[cfg(feature = "pool")]
pub use tokio_postgres;
#[cfg(feature = "mysql")]
pub use sqlx;

pub use rust_decimal::Decimal;
