//! CREATE TABLE synthesis.

use super::{ColumnDefinition, TableSchema};
use crate::dialect::Dialect;
use crate::error::{RelError, RelResult};

/// Render `CREATE TABLE` for `schema`.
///
/// Columns keep declaration order. Each column renders as
/// `<name> <type>[(length)][ PRIMARY KEY][ UNIQUE][ NOT NULL][ CHECK (...)]`;
/// inline foreign keys are appended after all columns.
///
/// Fails with [`RelError::Schema`] for an empty table name, a table without
/// columns, a column without a type, a zero length, or an empty enum list.
pub fn create_table_sql(schema: &TableSchema, dialect: Dialect) -> RelResult<String> {
    if schema.table_name.is_empty() {
        return Err(RelError::schema("tableName must be a non-empty string"));
    }
    if schema.columns.is_empty() {
        return Err(RelError::schema(format!(
            "table '{}' declares no columns",
            schema.table_name
        )));
    }

    let mut definitions = Vec::with_capacity(schema.columns.len());
    let mut foreign_keys = Vec::new();

    for (name, column) in schema.columns.iter() {
        definitions.push(column_sql(&schema.table_name, name, column, dialect)?);

        if let Some(fk) = &column.foreign_key {
            foreign_keys.push(format!(
                "FOREIGN KEY ({}) REFERENCES {}({})",
                dialect.quote_ident(name),
                dialect.quote_ident(&fk.table),
                dialect.quote_ident(&fk.column)
            ));
        }
    }
    definitions.extend(foreign_keys);

    Ok(format!(
        "CREATE TABLE {} ({});",
        dialect.quote_ident(&schema.table_name),
        definitions.join(", ")
    ))
}

fn column_sql(
    table: &str,
    name: &str,
    column: &ColumnDefinition,
    dialect: Dialect,
) -> RelResult<String> {
    let ty = column.ty.trim();
    if ty.is_empty() {
        return Err(RelError::schema(format!(
            "column '{table}.{name}' lacks a type"
        )));
    }
    let ty = ty.to_lowercase();

    let mut sql = format!("{} {}", dialect.quote_ident(name), ty);

    if let Some(length) = column.length {
        if length == 0 {
            return Err(RelError::schema(format!(
                "column '{table}.{name}' has a zero length"
            )));
        }
        if ty != "uuid" {
            sql.push_str(&format!("({length})"));
        }
    }

    if column.primary_key {
        sql.push_str(" PRIMARY KEY");
    }
    if column.unique {
        sql.push_str(" UNIQUE");
    }
    if column.not_null {
        sql.push_str(" NOT NULL");
    }

    if let Some(values) = &column.enum_values {
        if values.is_empty() {
            return Err(RelError::schema(format!(
                "column '{table}.{name}' has an empty enum"
            )));
        }
        let allowed: Vec<String> = values.iter().map(|v| dialect.string_literal(v)).collect();
        sql.push_str(&format!(
            " CHECK ({} IN ({}))",
            dialect.quote_ident(name),
            allowed.join(", ")
        ));
    }

    Ok(sql)
}
