//! Relation DDL: foreign keys between batch tables and many-to-many join tables.
//!
//! For ManyToOne, OneToMany and OneToOne the referenced column is assumed to
//! carry the same name as the foreign key column on both sides.

use super::{OneOrMany, RelationDescriptor, TableSchema};
use crate::dialect::Dialect;
use crate::error::{RelError, RelResult};

/// Render the relation statements of `schema`.
///
/// `batch` is the full set of schemas synthesized together; a ManyToMany
/// relation needs its related schema (and that schema's primary key) from it.
/// Statements come in a fixed order: ManyToOne, OneToMany, OneToOne, then
/// ManyToMany, each list in declaration order.
pub fn relation_statements(
    schema: &TableSchema,
    batch: &[TableSchema],
    dialect: Dialect,
) -> RelResult<Vec<String>> {
    let Some(relations) = &schema.relations else {
        return Ok(Vec::new());
    };

    let table = &schema.table_name;
    let q = |name: &str| dialect.quote_ident(name);
    let mut statements = Vec::new();

    for rel in descriptors(&relations.many_to_one) {
        check_descriptor(table, "ManyToOne", rel)?;
        let fk = q(&rel.foreign_key);
        statements.push(format!(
            "ALTER TABLE {} ADD FOREIGN KEY ({fk}) REFERENCES {}({fk});",
            q(table),
            q(&rel.related_entity)
        ));
    }

    for rel in descriptors(&relations.one_to_many) {
        check_descriptor(table, "OneToMany", rel)?;
        let fk = q(&rel.foreign_key);
        statements.push(format!(
            "ALTER TABLE {} ADD FOREIGN KEY ({fk}) REFERENCES {}({fk});",
            q(&rel.related_entity),
            q(table)
        ));
    }

    for rel in descriptors(&relations.one_to_one) {
        check_descriptor(table, "OneToOne", rel)?;
        let fk = q(&rel.foreign_key);
        statements.push(format!(
            "ALTER TABLE {} ADD UNIQUE ({fk}), ADD FOREIGN KEY ({fk}) REFERENCES {}({fk});",
            q(table),
            q(&rel.related_entity)
        ));
    }

    if let Some(rel) = &relations.many_to_many {
        check_descriptor(table, "ManyToMany", rel)?;
        statements.push(join_table_sql(schema, rel, batch, dialect)?);
    }

    Ok(statements)
}

fn descriptors(rel: &Option<OneOrMany<RelationDescriptor>>) -> &[RelationDescriptor] {
    rel.as_ref().map(OneOrMany::as_slice).unwrap_or_default()
}

fn check_descriptor(table: &str, kind: &str, rel: &RelationDescriptor) -> RelResult<()> {
    if rel.foreign_key.is_empty() || rel.related_entity.is_empty() {
        return Err(RelError::schema(format!(
            "{kind} relation of '{table}' needs both foreignKey and relatedEntity"
        )));
    }
    Ok(())
}

/// `CREATE TABLE <table>_<related>` with one surrogate id column per side, a
/// composite primary key over both, and a foreign key per side.
fn join_table_sql(
    schema: &TableSchema,
    rel: &RelationDescriptor,
    batch: &[TableSchema],
    dialect: Dialect,
) -> RelResult<String> {
    let table = &schema.table_name;
    let related_name = &rel.related_entity;

    if related_name == table {
        return Err(RelError::schema(format!(
            "ManyToMany relation of '{table}' references itself; join columns would collide"
        )));
    }

    let related = batch
        .iter()
        .find(|s| &s.table_name == related_name)
        .ok_or_else(|| {
            RelError::schema(format!(
                "ManyToMany relation of '{table}' references '{related_name}', which is not part of this batch"
            ))
        })?;
    let related_pk = related.primary_key_column().ok_or_else(|| {
        RelError::schema(format!(
            "ManyToMany relation of '{table}' needs a primary key on '{related_name}'"
        ))
    })?;

    let q = |name: &str| dialect.quote_ident(name);
    let join = q(&format!("{table}_{related_name}"));
    let left = q(&format!("{table}_id"));
    let right = q(&format!("{related_name}_id"));
    let id_type = dialect.id_column_type();

    Ok(format!(
        "CREATE TABLE {join} ({left} {id_type}, {right} {id_type}, \
         PRIMARY KEY ({left}, {right}), \
         FOREIGN KEY ({left}) REFERENCES {}({}), \
         FOREIGN KEY ({right}) REFERENCES {}({}));",
        q(table),
        q(&rel.foreign_key),
        q(related_name),
        q(related_pk)
    ))
}
