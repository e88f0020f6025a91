//! Index DDL.
//!
//! Index names are derived from the table and column: `<table>_<column>_idx`
//! for plain indexes and `<table>_<column>_uniq` for unique ones. Every column
//! gets its own single-column index.

use crate::client::DatabaseClient;
use crate::dialect::Dialect;
use crate::error::{RelError, RelResult};

/// One `CREATE INDEX` statement per column.
pub fn create_index_sql<S: AsRef<str>>(table: &str, columns: &[S], dialect: Dialect) -> Vec<String> {
    index_statements("CREATE INDEX", "idx", table, columns, dialect)
}

/// One `CREATE UNIQUE INDEX` statement per column.
pub fn create_unique_index_sql<S: AsRef<str>>(
    table: &str,
    columns: &[S],
    dialect: Dialect,
) -> Vec<String> {
    index_statements("CREATE UNIQUE INDEX", "uniq", table, columns, dialect)
}

/// `DROP INDEX` for `index`.
///
/// MySQL indexes live on their table, so the table name is only rendered
/// there; postgres uses `IF EXISTS` instead.
pub fn drop_index_sql(table: &str, index: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::Postgres => format!("DROP INDEX IF EXISTS {};", dialect.quote_ident(index)),
        Dialect::MySql => format!(
            "DROP INDEX {} ON {};",
            dialect.quote_ident(index),
            dialect.quote_ident(table)
        ),
    }
}

fn index_statements<S: AsRef<str>>(
    verb: &str,
    suffix: &str,
    table: &str,
    columns: &[S],
    dialect: Dialect,
) -> Vec<String> {
    columns
        .iter()
        .map(|column| {
            let column = column.as_ref();
            format!(
                "{verb} {} ON {} ({});",
                dialect.quote_ident(&format!("{table}_{column}_{suffix}")),
                dialect.quote_ident(table),
                dialect.quote_ident(column)
            )
        })
        .collect()
}

/// Create a plain index on each of `columns`. No columns, no statement.
pub async fn create_index<C, S>(
    client: &C,
    dialect: Dialect,
    table: &str,
    columns: &[S],
) -> RelResult<()>
where
    C: DatabaseClient,
    S: AsRef<str>,
{
    run_all(client, create_index_sql(table, columns, dialect)).await
}

/// Create a unique index on each of `columns`. No columns, no statement.
pub async fn create_unique_index<C, S>(
    client: &C,
    dialect: Dialect,
    table: &str,
    columns: &[S],
) -> RelResult<()>
where
    C: DatabaseClient,
    S: AsRef<str>,
{
    run_all(client, create_unique_index_sql(table, columns, dialect)).await
}

pub async fn drop_index<C: DatabaseClient>(
    client: &C,
    dialect: Dialect,
    table: &str,
    index: &str,
) -> RelResult<()> {
    run_all(client, vec![drop_index_sql(table, index, dialect)]).await
}

async fn run_all<C: DatabaseClient>(client: &C, statements: Vec<String>) -> RelResult<()> {
    for sql in statements {
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "relsql.schema", sql = %sql, "index");
        client
            .query(&sql, &[])
            .await
            .map_err(|e| RelError::query_execution(&e))?;
    }
    Ok(())
}
