//! Schema introspection
//!
//! Turns a record type's static field table into a validated `ColumnSchema`
//! and answers whether its table exists yet.

use crate::connection::StoreConnection;
use crate::errors::{OrmError, Result};
use crate::model::{ColumnSchema, FieldDescriptor, FieldKind, Record};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

/// Derive the column schema of a record type
pub fn derive_schema<R: Record>() -> Result<ColumnSchema> {
    derive_schema_from(R::TABLE, R::fields())
}

/// Derive a column schema from a table name and a field table.
///
/// Opted-out fields are dropped. Fails when no field is persisted, when the
/// number of identity fields is not exactly one, or when the identity is not
/// a persisted integer.
pub fn derive_schema_from(table: &'static str, fields: &[FieldDescriptor]) -> Result<ColumnSchema> {
    if let Some(field) = fields.iter().find(|f| f.is_identity && !f.persisted) {
        return Err(OrmError::InvalidIdentity {
            table: table.to_string(),
            field: field.name.to_string(),
        });
    }

    let persisted: Vec<FieldDescriptor> = fields.iter().copied().filter(|f| f.persisted).collect();
    if persisted.is_empty() {
        return Err(OrmError::NoPersistedFields {
            table: table.to_string(),
        });
    }

    let identities: Vec<usize> = persisted
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_identity)
        .map(|(i, _)| i)
        .collect();

    let identity = match identities.as_slice() {
        [] => {
            return Err(OrmError::MissingIdentity {
                table: table.to_string(),
            })
        }
        [single] => *single,
        many => {
            return Err(OrmError::MultipleIdentities {
                table: table.to_string(),
                fields: many.iter().map(|&i| persisted[i].name.to_string()).collect(),
            })
        }
    };

    if persisted[identity].kind != FieldKind::Integer {
        return Err(OrmError::InvalidIdentity {
            table: table.to_string(),
            field: persisted[identity].name.to_string(),
        });
    }

    Ok(ColumnSchema::new(table, persisted, identity))
}

static SCHEMA_CACHE: OnceLock<RwLock<HashMap<TypeId, Arc<ColumnSchema>>>> = OnceLock::new();

/// Cached schema of a record type.
///
/// Derived on first use and kept for the life of the process; schemas are
/// never invalidated. Derivation failures are not cached.
pub fn schema_for<R: Record>() -> Result<Arc<ColumnSchema>> {
    let cache = SCHEMA_CACHE.get_or_init(|| RwLock::new(HashMap::new()));
    let key = TypeId::of::<R>();

    if let Some(schema) = cache.read().ok().and_then(|map| map.get(&key).cloned()) {
        return Ok(schema);
    }

    let schema = Arc::new(derive_schema::<R>()?);
    tracing::debug!(table = R::TABLE, columns = schema.len(), "schema derived");

    match cache.write() {
        Ok(mut map) => Ok(map.entry(key).or_insert(schema).clone()),
        // A poisoned cache still leaves derivation usable
        Err(_) => Ok(schema),
    }
}

/// Whether the schema's table exists in the store's catalog
pub fn table_exists<C: StoreConnection + ?Sized>(conn: &C, schema: &ColumnSchema) -> Result<bool> {
    conn.table_exists(schema.table())
}
