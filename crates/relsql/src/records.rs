//! Single-table CRUD helpers composed over a [`StatementBuilder`].

use crate::builder::StatementBuilder;
use crate::client::DatabaseClient;
use crate::condition::Criteria;
use crate::dialect::Dialect;
use crate::error::{RelError, RelResult};
use crate::row::Row;
use crate::value::ColumnValues;

/// Common record operations for one table.
///
/// Owns a [`StatementBuilder`] and drives it through one statement per call.
/// Errors from the builder (argument errors, wrapped execution errors) are
/// returned unchanged.
///
/// # Example
/// ```ignore
/// let mut assets = Records::new("Asset", &client, Dialect::Postgres)?;
///
/// assets.save_record(&ColumnValues::new().with("name", "ACME")).await?;
/// let rows = assets
///     .find_record(&Criteria::new().eq("name", "ACME"), None)
///     .await?;
/// ```
#[derive(Debug)]
pub struct Records<C> {
    builder: StatementBuilder<C>,
}

impl<C> Records<C> {
    pub fn new(table: impl Into<String>, client: C, dialect: Dialect) -> RelResult<Self> {
        Ok(Self {
            builder: StatementBuilder::new(table, client, dialect)?,
        })
    }

    /// Wrap an existing builder.
    pub fn from_builder(builder: StatementBuilder<C>) -> Self {
        Self { builder }
    }

    pub fn builder(&self) -> &StatementBuilder<C> {
        &self.builder
    }

    /// Builder access for statements the helpers don't cover.
    pub fn builder_mut(&mut self) -> &mut StatementBuilder<C> {
        &mut self.builder
    }

    pub fn into_builder(self) -> StatementBuilder<C> {
        self.builder
    }
}

impl<C: DatabaseClient> Records<C> {
    /// `SELECT <fields|*> FROM <table> [WHERE ...]`.
    ///
    /// The WHERE clause is only added when `criteria` is non-empty.
    pub async fn find_record(
        &mut self,
        criteria: &Criteria,
        select_fields: Option<&[&str]>,
    ) -> RelResult<Vec<Row>> {
        self.builder.select(select_fields.unwrap_or_default());
        if !criteria.is_empty() {
            self.builder.filter(criteria);
        }
        self.builder.execute().await
    }

    /// `INSERT INTO <table> (<data columns>) VALUES (<data values>)`.
    pub async fn save_record(&mut self, data: &ColumnValues) -> RelResult<Vec<Row>> {
        // Validate before touching the builder so a failure leaves it empty.
        if data.is_empty() {
            return Err(RelError::argument("Columns should be a non-empty array"));
        }
        self.builder
            .insert()
            .columns(data.columns())?
            .values(data.values().cloned())?
            .execute()
            .await
    }

    /// `UPDATE <table> SET ... WHERE ...`.
    ///
    /// Unlike [`delete_record`](Records::delete_record), empty `criteria` are
    /// accepted and update **every row** of the table.
    pub async fn update_record(
        &mut self,
        criteria: &Criteria,
        data: &ColumnValues,
    ) -> RelResult<Vec<Row>> {
        if data.is_empty() {
            return Err(RelError::argument("SET requires at least one assignment"));
        }
        self.builder
            .update()
            .set(data)?
            .filter(criteria)
            .execute()
            .await
    }

    /// `DELETE FROM <table> WHERE ...`.
    ///
    /// Returns [`RelError::Argument`] without contacting the database if
    /// `criteria` is empty.
    pub async fn delete_record(&mut self, criteria: &Criteria) -> RelResult<Vec<Row>> {
        if criteria.is_empty() {
            return Err(RelError::argument("Delete operation requires criteria."));
        }
        self.builder.delete().filter(criteria).execute().await
    }
}
