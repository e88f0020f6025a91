//! Batch orchestration: create the tables of a batch, then their relations.

use super::{TableSchema, create_table_sql, relation_statements};
use crate::client::DatabaseClient;
use crate::dialect::Dialect;
use crate::error::{RelError, RelResult};
use std::collections::HashSet;

/// What the create phase does when a table of the batch already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnExisting {
    /// Stop the create phase: later tables are neither probed nor created.
    #[default]
    AbortCreatePhase,
    /// Skip only the existing table and keep going.
    SkipTable,
}

/// Options for [`synthesize_schema_batch_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    pub on_existing: OnExisting,
}

impl BatchOptions {
    pub fn on_existing(mut self, on_existing: OnExisting) -> Self {
        self.on_existing = on_existing;
        self
    }
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Tables created, in order.
    pub created: Vec<String>,
    /// Tables found to already exist.
    pub existing: Vec<String>,
    /// Tables never probed because the create phase was aborted.
    pub not_probed: Vec<String>,
    /// Number of relation statements executed.
    pub relation_statements: usize,
}

struct TablePlan<'a> {
    table: &'a str,
    create: String,
    relations: Vec<String>,
}

fn plan(schemas: &[TableSchema], dialect: Dialect) -> RelResult<Vec<TablePlan<'_>>> {
    let mut seen = HashSet::new();
    for schema in schemas {
        if !seen.insert(schema.table_name.as_str()) {
            return Err(RelError::schema(format!(
                "table '{}' appears more than once in the batch",
                schema.table_name
            )));
        }
    }

    schemas
        .iter()
        .map(|schema| {
            Ok(TablePlan {
                table: &schema.table_name,
                create: create_table_sql(schema, dialect)?,
                relations: relation_statements(schema, schemas, dialect)?,
            })
        })
        .collect()
}

/// All DDL of a batch without touching a database: every CREATE TABLE in
/// batch order, followed by every relation statement.
pub fn schema_batch_sql(schemas: &[TableSchema], dialect: Dialect) -> RelResult<Vec<String>> {
    let plans = plan(schemas, dialect)?;
    let mut out: Vec<String> = plans.iter().map(|p| p.create.clone()).collect();
    out.extend(plans.into_iter().flat_map(|p| p.relations));
    Ok(out)
}

/// Create a batch of tables with the default options.
///
/// See [`synthesize_schema_batch_with`].
pub async fn synthesize_schema_batch<C: DatabaseClient>(
    schemas: &[TableSchema],
    client: &C,
    dialect: Dialect,
) -> RelResult<BatchReport> {
    synthesize_schema_batch_with(schemas, client, dialect, BatchOptions::default()).await
}

/// Create a batch of tables, then add their relations.
///
/// 1. All DDL is synthesized first; a [`RelError::Schema`] aborts before any
///    statement is sent.
/// 2. Create phase: each table is probed in order and created if absent. With
///    [`OnExisting::AbortCreatePhase`] (the default) the first existing table
///    ends the create phase for the rest of the batch.
/// 3. Relation phase: the relation statements of every schema run in order.
///
/// Statements run one at a time with no transaction of their own; a failure
/// leaves earlier statements applied. Pass a transaction-backed client for
/// atomicity.
pub async fn synthesize_schema_batch_with<C: DatabaseClient>(
    schemas: &[TableSchema],
    client: &C,
    dialect: Dialect,
    options: BatchOptions,
) -> RelResult<BatchReport> {
    let plans = plan(schemas, dialect)?;
    let mut report = BatchReport::default();

    for (i, p) in plans.iter().enumerate() {
        if table_exists(client, dialect, p.table).await? {
            report.existing.push(p.table.to_string());
            match options.on_existing {
                OnExisting::AbortCreatePhase => {
                    report
                        .not_probed
                        .extend(plans[i + 1..].iter().map(|p| p.table.to_string()));
                    #[cfg(feature = "tracing")]
                    tracing::info!(
                        target: "relsql.schema",
                        table = p.table,
                        skipped = report.not_probed.len(),
                        "table exists, create phase aborted"
                    );
                    break;
                }
                OnExisting::SkipTable => {
                    #[cfg(feature = "tracing")]
                    tracing::info!(target: "relsql.schema", table = p.table, "table exists, skipped");
                    continue;
                }
            }
        }

        run(client, &p.create).await?;
        #[cfg(feature = "tracing")]
        tracing::info!(target: "relsql.schema", table = p.table, "table created");
        report.created.push(p.table.to_string());
    }

    for p in &plans {
        for statement in &p.relations {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "relsql.schema", table = p.table, sql = %statement, "relation");
            run(client, statement).await?;
            report.relation_statements += 1;
        }
    }

    Ok(report)
}

/// Probe the catalog for `table` using the dialect's existence query.
pub async fn table_exists<C: DatabaseClient>(
    client: &C,
    dialect: Dialect,
    table: &str,
) -> RelResult<bool> {
    let (sql, params) = dialect.table_exists_probe(table);
    let rows = client
        .query(&sql, &params)
        .await
        .map_err(|e| RelError::query_execution(&e))?;
    dialect.probe_result(&rows)
}

async fn run<C: DatabaseClient>(client: &C, sql: &str) -> RelResult<()> {
    client
        .query(sql, &[])
        .await
        .map(drop)
        .map_err(|e| RelError::query_execution(&e))
}
