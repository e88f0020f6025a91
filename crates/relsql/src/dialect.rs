//! Dialect policy: identifier quoting, placeholder syntax and catalog probes.
//!
//! Every identifier that ends up in generated SQL goes through
//! [`Dialect::quote_ident`]. Embedded quote characters are **not** escaped, so
//! identifiers must come from trusted schema descriptions, never from end users.

use crate::error::{RelError, RelResult};
use crate::row::Row;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dialect {
    Postgres,
    MySql,
}

impl Dialect {
    /// Canonical dialect tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
        }
    }

    /// Quote a table or column name: `"name"` (postgres) or `` `name` `` (mysql).
    pub fn quote_ident(self, name: &str) -> String {
        let q = match self {
            Dialect::Postgres => '"',
            Dialect::MySql => '`',
        };
        let mut out = String::with_capacity(name.len() + 2);
        out.push(q);
        out.push_str(name);
        out.push(q);
        out
    }

    /// Placeholder for the zero-based bound value `index`.
    ///
    /// Postgres placeholders are numbered (`$1`, `$2`, ...). MySQL placeholders
    /// are ordinal: every one is `?` and binds to the next value in order.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", index + 1),
            Dialect::MySql => "?".to_string(),
        }
    }

    /// Single-quoted string literal with embedded `'` doubled.
    pub fn string_literal(self, s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    /// Column type for the surrogate id columns of a join table.
    pub fn id_column_type(self) -> &'static str {
        match self {
            Dialect::Postgres => "uuid",
            Dialect::MySql => "VARCHAR(36)",
        }
    }

    /// Catalog query answering whether `table` exists.
    ///
    /// Postgres returns one boolean column `exists` (scoped to schema `public`);
    /// MySQL returns one integer column `count` for the current database.
    /// Interpret the rows with [`Dialect::probe_result`].
    pub fn table_exists_probe(self, table: &str) -> (String, Vec<Value>) {
        let sql = match self {
            Dialect::Postgres => "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
                 WHERE table_schema = 'public' AND table_name = $1) AS \"exists\""
                .to_string(),
            Dialect::MySql => "SELECT COUNT(*) AS `count` FROM information_schema.tables \
                 WHERE table_schema = DATABASE() AND table_name = ?"
                .to_string(),
        };
        (sql, vec![Value::Text(table.to_string())])
    }

    /// Interpret the rows returned by [`Dialect::table_exists_probe`].
    pub fn probe_result(self, rows: &[Row]) -> RelResult<bool> {
        let column = match self {
            Dialect::Postgres => "exists",
            Dialect::MySql => "count",
        };
        let row = rows
            .first()
            .ok_or_else(|| RelError::decode(column, "probe returned no rows"))?;
        match self {
            Dialect::Postgres => row.try_get::<bool>(column),
            Dialect::MySql => row.try_get::<i64>(column).map(|n| n > 0),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = RelError;

    /// Parse a dialect tag. Unknown tags are a configuration error.
    fn from_str(s: &str) -> RelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySql),
            other => Err(RelError::config(format!(
                "unsupported dialect '{other}' (expected 'postgres' or 'mysql')"
            ))),
        }
    }
}

impl TryFrom<String> for Dialect {
    type Error = RelError;

    fn try_from(s: String) -> RelResult<Self> {
        s.parse()
    }
}

impl From<Dialect> for String {
    fn from(d: Dialect) -> Self {
        d.as_str().to_string()
    }
}
