//! Chainable statement builder.
//!
//! [`StatementBuilder`] accumulates one SELECT / INSERT / UPDATE / DELETE
//! statement for a fixed table and dialect, together with its bound values.
//! The Nth placeholder written into the text always binds to the Nth value.
//!
//! # Example
//!
//! ```ignore
//! use relsql::{Criteria, Dialect, StatementBuilder};
//!
//! let mut users = StatementBuilder::new("users", &client, Dialect::Postgres)?;
//!
//! let rows = users
//!     .select(["id", "email"])
//!     .filter(&Criteria::new().eq("status", "active"))
//!     .execute()
//!     .await?;
//!
//! users
//!     .insert()
//!     .columns(["email", "status"])?
//!     .values(["alice@example.com", "active"])?
//!     .execute()
//!     .await?;
//! ```
//!
//! Clauses are not checked for order: calling `filter` before `select` is
//! accepted and only fails at the database as a syntax error.

use crate::client::DatabaseClient;
use crate::condition::Criteria;
use crate::dialect::Dialect;
use crate::error::{RelError, RelResult};
use crate::row::Row;
use crate::value::{ColumnValues, Value};
use std::fmt;

/// Stateful builder for a single statement at a time.
///
/// Every verb except [`execute`](StatementBuilder::execute) appends to the
/// in-progress statement and returns the builder for chaining. `execute`
/// sends the statement and resets the builder, so one instance can build many
/// statements in sequence. It is not synchronized: drive one instance from
/// one flow at a time.
#[must_use]
pub struct StatementBuilder<C> {
    table: String,
    dialect: Dialect,
    client: C,
    parts: Vec<String>,
    params: Vec<Value>,
}

impl<C> StatementBuilder<C> {
    /// Create a builder for `table`.
    ///
    /// Returns [`RelError::Argument`] if `table` is empty.
    pub fn new(table: impl Into<String>, client: C, dialect: Dialect) -> RelResult<Self> {
        let table = table.into();
        if table.is_empty() {
            return Err(RelError::argument("Table name must be a non-empty string"));
        }
        Ok(Self {
            table,
            dialect,
            client,
            parts: Vec::new(),
            params: Vec::new(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Append `SELECT <fields> FROM <table>`. No fields selects `*`.
    pub fn select<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cols = self.quote_list(fields);
        let cols = if cols.is_empty() { "*".to_string() } else { cols };
        let table = self.dialect.quote_ident(&self.table);
        self.parts.push(format!("SELECT {cols} FROM {table}"));
        self
    }

    /// Append `SELECT * FROM <table>`.
    pub fn select_all(&mut self) -> &mut Self {
        self.select(std::iter::empty::<&str>())
    }

    /// Append ` WHERE <col> <op> <placeholder> AND ...`.
    ///
    /// Placeholder numbering continues after any values already bound (e.g. by
    /// [`set`](StatementBuilder::set)). Empty criteria leave the statement
    /// unchanged. Operators of [`Condition::Operator`](crate::Condition) are
    /// inserted verbatim.
    #[doc(alias = "where")]
    pub fn filter(&mut self, criteria: &Criteria) -> &mut Self {
        if criteria.is_empty() {
            return self;
        }

        let base = self.params.len();
        let mut clauses = Vec::with_capacity(criteria.len());
        for (i, (column, condition)) in criteria.iter().enumerate() {
            clauses.push(format!(
                "{} {} {}",
                self.dialect.quote_ident(column),
                condition.op(),
                self.dialect.placeholder(base + i)
            ));
        }
        self.parts.push(format!(" WHERE {}", clauses.join(" AND ")));
        self.params
            .extend(criteria.iter().map(|(_, c)| c.value().clone()));
        self
    }

    /// Append the `INSERT` keyword. Follow with [`columns`](StatementBuilder::columns).
    pub fn insert(&mut self) -> &mut Self {
        self.parts.push("INSERT".to_string());
        self
    }

    /// Append ` INTO <table> (<columns>)`.
    ///
    /// Returns [`RelError::Argument`] if `columns` is empty.
    #[doc(alias = "into")]
    pub fn columns<I, S>(&mut self, columns: I) -> RelResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cols = self.quote_list(columns);
        if cols.is_empty() {
            return Err(RelError::argument("Columns should be a non-empty array"));
        }
        let table = self.dialect.quote_ident(&self.table);
        self.parts.push(format!(" INTO {table} ({cols})"));
        Ok(self)
    }

    /// Append ` VALUES (<placeholders>)` and bind `values`.
    ///
    /// Placeholders are numbered from the first position regardless of values
    /// bound earlier: `columns`/`values` is expected to open an INSERT.
    /// Returns [`RelError::Argument`] if `values` is empty.
    pub fn values<I, V>(&mut self, values: I) -> RelResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(RelError::argument("Values should be a non-empty array"));
        }
        let placeholders: Vec<String> = (0..values.len())
            .map(|i| self.dialect.placeholder(i))
            .collect();
        self.parts
            .push(format!(" VALUES ({})", placeholders.join(", ")));
        self.params.extend(values);
        Ok(self)
    }

    /// Append `UPDATE <table>`. Follow with [`set`](StatementBuilder::set).
    pub fn update(&mut self) -> &mut Self {
        let table = self.dialect.quote_ident(&self.table);
        self.parts.push(format!("UPDATE {table}"));
        self
    }

    /// Append ` SET <col> = <placeholder>, ...` and bind the assigned values.
    ///
    /// Returns [`RelError::Argument`] if `assignments` is empty.
    pub fn set(&mut self, assignments: &ColumnValues) -> RelResult<&mut Self> {
        if assignments.is_empty() {
            return Err(RelError::argument("SET requires at least one assignment"));
        }
        let base = self.params.len();
        let clauses: Vec<String> = assignments
            .columns()
            .enumerate()
            .map(|(i, column)| {
                format!(
                    "{} = {}",
                    self.dialect.quote_ident(column),
                    self.dialect.placeholder(base + i)
                )
            })
            .collect();
        self.parts.push(format!(" SET {}", clauses.join(", ")));
        self.params.extend(assignments.values().cloned());
        Ok(self)
    }

    /// Append `DELETE FROM <table>`.
    pub fn delete(&mut self) -> &mut Self {
        let table = self.dialect.quote_ident(&self.table);
        self.parts.push(format!("DELETE FROM {table}"));
        self
    }

    /// Drop the in-progress statement and its bound values.
    pub fn clear_query(&mut self) {
        self.parts.clear();
        self.params.clear();
    }

    /// The statement text accumulated so far.
    pub fn to_sql(&self) -> String {
        self.parts.concat()
    }

    /// Values bound so far, in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Whether no statement is in progress.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty() && self.params.is_empty()
    }

    fn quote_list<I, S>(&self, names: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|n| self.dialect.quote_ident(n.as_ref()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<C: DatabaseClient> StatementBuilder<C> {
    /// Send the accumulated statement to the client and reset the builder.
    ///
    /// The builder is empty afterwards whether the client succeeds or fails
    /// (and also if the returned future is dropped before completion). Client
    /// failures are wrapped into [`RelError::QueryExecution`]; the statement is
    /// not kept, so a retry has to rebuild it.
    pub async fn execute(&mut self) -> RelResult<Vec<Row>> {
        let sql = self.parts.concat();
        let params = std::mem::take(&mut self.params);
        self.parts.clear();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "relsql.sql",
            dialect = %self.dialect,
            table = %self.table,
            param_count = params.len(),
            sql = %sql,
            "execute"
        );

        match self.client.query(&sql, &params).await {
            Ok(rows) => Ok(rows),
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    target: "relsql.sql",
                    table = %self.table,
                    error = %err,
                    "statement failed"
                );
                Err(RelError::query_execution(&err))
            }
        }
    }
}

impl<C> fmt::Debug for StatementBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementBuilder")
            .field("table", &self.table)
            .field("dialect", &self.dialect)
            .field("sql", &self.to_sql())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
