//! SQL statement generation
//!
//! Pure functions of a `ColumnSchema` (and, for DML, a record's values).
//! Unmapped fields never appear in any generated statement.
//!
//! Values are embedded as literals: numbers unquoted, text and date/time
//! single-quoted with embedded quotes doubled. Text containing NUL is emitted
//! as `CAST(X'..' AS TEXT)` since SQLite's tokenizer stops at a NUL. This is
//! not a substitute for bound parameters.

use crate::errors::{OrmError, Result};
use crate::model::{ColumnSchema, FieldDescriptor, Record, Value, DATETIME_FORMAT};

/// Catalog probe for a table by name
pub fn table_exists_probe(table: &str) -> String {
    format!(
        "SELECT name FROM sqlite_master WHERE type='table' AND name={}",
        quote(table)
    )
}

/// `CREATE TABLE` with one column per stored field, in schema order
pub fn create_table(schema: &ColumnSchema) -> Result<String> {
    let columns: Vec<String> = schema
        .columns()
        .filter_map(|field| {
            field.kind.sql_type().map(|sql_type| {
                if field.is_identity {
                    format!("{} {} PRIMARY KEY AUTOINCREMENT", field.name, sql_type)
                } else {
                    format!("{} {}", field.name, sql_type)
                }
            })
        })
        .collect();

    if columns.is_empty() {
        return Err(OrmError::EmptySchema {
            table: schema.table().to_string(),
        });
    }

    Ok(format!(
        "CREATE TABLE {} ({})",
        schema.table(),
        columns.join(", ")
    ))
}

/// Every stored column of every row
pub fn select_all(schema: &ColumnSchema) -> String {
    format!(
        "SELECT {} FROM {}",
        column_list(schema.columns()),
        schema.table()
    )
}

/// Insert of a new record; the identity column is left to the store
pub fn insert<R: Record>(schema: &ColumnSchema, record: &R) -> Result<String> {
    let fields: Vec<&FieldDescriptor> = schema.value_columns().collect();
    if fields.is_empty() {
        return Ok(format!("INSERT INTO {} DEFAULT VALUES", schema.table()));
    }

    let values = fields
        .iter()
        .map(|field| literal(schema, field, record.field_value(field)))
        .collect::<Result<Vec<_>>>()?;

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.table(),
        column_list(fields.iter().copied()),
        values.join(", ")
    ))
}

/// Update of every non-identity stored column, keyed on the identity
pub fn update<R: Record>(schema: &ColumnSchema, record: &R) -> Result<String> {
    let identity = schema.identity();
    let mut assignments = schema
        .value_columns()
        .map(|field| {
            literal(schema, field, record.field_value(field))
                .map(|literal| format!("{} = {}", field.name, literal))
        })
        .collect::<Result<Vec<_>>>()?;

    if assignments.is_empty() {
        assignments.push(format!("{} = {}", identity.name, record.id()));
    }

    Ok(format!(
        "UPDATE {} SET {} WHERE {} = {}",
        schema.table(),
        assignments.join(", "),
        identity.name,
        record.id()
    ))
}

/// Highest identity in the table.
///
/// Only names the row just inserted while no other session inserts into the
/// same table concurrently.
pub fn identity_read_back(schema: &ColumnSchema) -> String {
    let identity = schema.identity().name;
    format!(
        "SELECT {} FROM {} ORDER BY {} DESC LIMIT 1",
        identity,
        schema.table(),
        identity
    )
}

fn column_list<'a>(fields: impl Iterator<Item = &'a FieldDescriptor>) -> String {
    fields.map(|f| f.name).collect::<Vec<_>>().join(", ")
}

fn literal(schema: &ColumnSchema, field: &FieldDescriptor, value: Value) -> Result<String> {
    let unrepresentable = |reason: String| OrmError::UnrepresentableValue {
        table: schema.table().to_string(),
        field: field.name.to_string(),
        reason,
    };

    match value.conform(field.kind).map_err(unrepresentable)? {
        Value::Null => Ok("NULL".to_string()),
        Value::Integer(v) => Ok(v.to_string()),
        Value::Real(v) if v.is_finite() => Ok(format!("{:?}", v)),
        Value::Real(v) => Err(unrepresentable(format!("non-finite real {}", v))),
        Value::Text(s) => Ok(text_literal(&s)),
        Value::DateTime(dt) => Ok(quote(&dt.format(DATETIME_FORMAT).to_string())),
    }
}

fn text_literal(s: &str) -> String {
    if s.contains('\0') {
        format!("CAST(X'{}' AS TEXT)", hex::encode_upper(s.as_bytes()))
    } else {
        quote(s)
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
