//! Table schema descriptions and DDL synthesis.
//!
//! A [`TableSchema`] describes one table: ordered columns with their
//! constraints, plus optional relations to other tables of the same batch.
//! Schemas are read-only inputs; synthesis never mutates them.
//!
//! They can be built in code or read from the JSON description format:
//!
//! ```json
//! {
//!   "Table": {
//!     "tableName": "Asset",
//!     "columns": {
//!       "assetId": { "type": "uuid", "primaryKey": true },
//!       "currencyCode": { "type": "varchar", "length": 3, "notNull": true }
//!     },
//!     "relations": {
//!       "ManyToOne": { "relatedEntity": "Currency", "foreignKey": "currencyCode" }
//!     }
//!   }
//! }
//! ```
//!
//! - [`create_table_sql`] renders `CREATE TABLE`.
//! - [`relation_statements`] renders the `ALTER TABLE` / join-table DDL of the
//!   relations.
//! - [`synthesize_schema_batch`] creates a batch of tables through a
//!   [`DatabaseClient`](crate::DatabaseClient).

mod batch;
mod ddl;
mod relations;


pub use batch::{
    BatchOptions, BatchReport, OnExisting, schema_batch_sql, synthesize_schema_batch,
    synthesize_schema_batch_with, table_exists,
};
pub use ddl::create_table_sql;
pub use relations::relation_statements;

use crate::error::{RelError, RelResult};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Inline foreign key of a column: `REFERENCES <table>(<column>)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    pub table: String,
    pub column: String,
}

/// One column of a [`TableSchema`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    /// SQL type, rendered lowercased. Required; an empty type is a schema error.
    #[serde(rename = "type", default)]
    pub ty: String,
    /// `(length)` suffix. Ignored for `uuid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub not_null: bool,
    /// Allowed values, rendered as a `CHECK (... IN (...))` constraint.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKeyRef>,
}

impl ColumnDefinition {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            ..Self::default()
        }
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Restrict the column to `values`.
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Inline `FOREIGN KEY (<this column>) REFERENCES <table>(<column>)`.
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some(ForeignKeyRef {
            table: table.into(),
            column: column.into(),
        });
        self
    }
}

/// Columns in declaration order.
///
/// Deserializes from a JSON object and keeps the object's key order, which is
/// the column order of the generated DDL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns(Vec<(String, ColumnDefinition)>);

impl Columns {
    pub fn push(&mut self, name: impl Into<String>, column: ColumnDefinition) {
        self.0.push((name.into(), column));
    }

    pub fn get(&self, name: &str) -> Option<&ColumnDefinition> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnDefinition)> {
        self.0.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Columns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, column) in &self.0 {
            map.serialize_entry(name, column)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Columns {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ColumnsVisitor;

        impl<'de> Visitor<'de> for ColumnsVisitor {
            type Value = Columns;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column name to column definition")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Columns, A::Error> {
                let mut columns = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, column)) =
                    access.next_entry::<String, ColumnDefinition>()?
                {
                    if columns.iter().any(|(n, _)| n == &name) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate column '{name}'"
                        )));
                    }
                    columns.push((name, column));
                }
                Ok(Columns(columns))
            }
        }

        deserializer.deserialize_map(ColumnsVisitor)
    }
}

/// `{ foreignKey, relatedEntity }` pair describing a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDescriptor {
    pub foreign_key: String,
    pub related_entity: String,
}

impl RelationDescriptor {
    pub fn new(foreign_key: impl Into<String>, related_entity: impl Into<String>) -> Self {
        Self {
            foreign_key: foreign_key.into(),
            related_entity: related_entity.into(),
        }
    }
}

/// A single descriptor or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(one) => std::slice::from_ref(one),
            OneOrMany::Many(many) => many,
        }
    }

    fn push(self, item: T) -> Self {
        let mut items = match self {
            OneOrMany::One(one) => vec![one],
            OneOrMany::Many(many) => many,
        };
        items.push(item);
        OneOrMany::Many(items)
    }
}

/// Relations of a table to other tables of the same batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Relations {
    #[serde(rename = "ManyToOne", default, skip_serializing_if = "Option::is_none")]
    pub many_to_one: Option<OneOrMany<RelationDescriptor>>,
    #[serde(rename = "OneToMany", default, skip_serializing_if = "Option::is_none")]
    pub one_to_many: Option<OneOrMany<RelationDescriptor>>,
    #[serde(rename = "OneToOne", default, skip_serializing_if = "Option::is_none")]
    pub one_to_one: Option<OneOrMany<RelationDescriptor>>,
    /// Always a single descriptor.
    #[serde(rename = "ManyToMany", default, skip_serializing_if = "Option::is_none")]
    pub many_to_many: Option<RelationDescriptor>,
}

impl Relations {
    pub fn is_empty(&self) -> bool {
        self.many_to_one.is_none()
            && self.one_to_many.is_none()
            && self.one_to_one.is_none()
            && self.many_to_many.is_none()
    }
}

/// Description of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub table_name: String,
    pub columns: Columns,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<Relations>,
}

impl TableSchema {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Self::default()
        }
    }

    /// Append a column; declaration order is DDL order.
    pub fn column(mut self, name: impl Into<String>, column: ColumnDefinition) -> Self {
        self.columns.push(name, column);
        self
    }

    pub fn many_to_one(mut self, foreign_key: &str, related_entity: &str) -> Self {
        let rel = self.relations.get_or_insert_with(Relations::default);
        rel.many_to_one = append(rel.many_to_one.take(), foreign_key, related_entity);
        self
    }

    pub fn one_to_many(mut self, foreign_key: &str, related_entity: &str) -> Self {
        let rel = self.relations.get_or_insert_with(Relations::default);
        rel.one_to_many = append(rel.one_to_many.take(), foreign_key, related_entity);
        self
    }

    pub fn one_to_one(mut self, foreign_key: &str, related_entity: &str) -> Self {
        let rel = self.relations.get_or_insert_with(Relations::default);
        rel.one_to_one = append(rel.one_to_one.take(), foreign_key, related_entity);
        self
    }

    /// Set the (single) many-to-many relation, replacing any previous one.
    pub fn many_to_many(mut self, foreign_key: &str, related_entity: &str) -> Self {
        let rel = self.relations.get_or_insert_with(Relations::default);
        rel.many_to_many = Some(RelationDescriptor::new(foreign_key, related_entity));
        self
    }

    /// Name of the first column declared as primary key.
    pub fn primary_key_column(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, c)| c.primary_key)
            .map(|(name, _)| name)
    }

    /// Whether the schema declares at least one relation.
    pub fn has_relations(&self) -> bool {
        self.relations.as_ref().is_some_and(|r| !r.is_empty())
    }

    /// Parse the `{ "Table": { ... } }` JSON description format.
    pub fn from_json(json: &str) -> RelResult<Self> {
        serde_json::from_str::<SchemaDocument>(json)
            .map(|doc| doc.table)
            .map_err(|e| RelError::schema(format!("invalid schema description: {e}")))
    }

    /// Parse an already-decoded JSON value in the description format.
    pub fn from_json_value(value: serde_json::Value) -> RelResult<Self> {
        serde_json::from_value::<SchemaDocument>(value)
            .map(|doc| doc.table)
            .map_err(|e| RelError::schema(format!("invalid schema description: {e}")))
    }
}

fn append(
    existing: Option<OneOrMany<RelationDescriptor>>,
    foreign_key: &str,
    related_entity: &str,
) -> Option<OneOrMany<RelationDescriptor>> {
    let item = RelationDescriptor::new(foreign_key, related_entity);
    Some(match existing {
        None => OneOrMany::One(item),
        Some(existing) => existing.push(item),
    })
}

/// Top-level wrapper of the description format: `{ "Table": TableSchema }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(rename = "Table")]
    pub table: TableSchema,
}
