//! SQLite implementation of the store capability

use crate::errors::{from_rusqlite, Result};
use litorm_core::model::{Row, Value};
use litorm_core::statements::table_exists_probe;
use litorm_core::{OrmError, StoreConnection};
use rusqlite::types::ValueRef;
use rusqlite::Connection;

/// A rusqlite connection exposed as a `StoreConnection`
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open an unconfigured in-memory store
    pub fn open_in_memory() -> Result<Self> {
        crate::db::open_in_memory().map(Self::new)
    }

    /// Borrow the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl StoreConnection for SqliteStore {
    fn execute(&self, sql: &str) -> Result<usize> {
        self.conn.execute(sql, []).map_err(from_rusqlite)
    }

    fn query(&self, sql: &str) -> Result<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql).map_err(from_rusqlite)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query([]).map_err(from_rusqlite)?;
        let mut result = Vec::new();
        while let Some(row) = rows.next().map_err(from_rusqlite)? {
            let mut out = Row::new();
            for (index, column) in columns.iter().enumerate() {
                let value = row.get_ref(index).map_err(from_rusqlite)?;
                out.push(column.clone(), to_value(column, value)?);
            }
            result.push(out);
        }
        Ok(result)
    }

    fn begin(&self) -> Result<()> {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(from_rusqlite)
    }

    fn commit(&self) -> Result<()> {
        self.conn
            .execute_batch("COMMIT TRANSACTION")
            .map_err(from_rusqlite)
    }

    fn rollback(&self) -> Result<()> {
        self.conn
            .execute_batch("ROLLBACK TRANSACTION")
            .map_err(from_rusqlite)
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(!self.query(&table_exists_probe(table))?.is_empty())
    }

    fn last_insert_id(&self) -> Result<Option<i64>> {
        match self.conn.last_insert_rowid() {
            0 => Ok(None),
            id => Ok(Some(id)),
        }
    }
}

fn to_value(column: &str, value: ValueRef<'_>) -> Result<Value> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(v) => Ok(Value::Integer(v)),
        ValueRef::Real(v) => Ok(Value::Real(v)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|text| Value::Text(text.to_string()))
            .map_err(|e| OrmError::Persistence {
                message: format!("column {} holds text that is not valid UTF-8: {}", column, e),
            }),
        ValueRef::Blob(_) => Err(OrmError::Persistence {
            message: format!("column {} holds a blob, which has no field kind", column),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_returns_column_keyed_rows() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .execute("CREATE TABLE t (a INTEGER, b TEXT, c REAL)")
            .unwrap();
        store
            .execute("INSERT INTO t (a, b, c) VALUES (1, 'x', NULL)")
            .unwrap();

        let rows = store.query("SELECT a, b, c FROM t").unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("a"), Some(&Value::Integer(1)));
        assert_eq!(rows[0].get("b"), Some(&Value::Text("x".to_string())));
        assert_eq!(rows[0].get("c"), Some(&Value::Null));
    }

    #[test]
    fn test_table_exists_uses_catalog() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(!store.table_exists("t").unwrap());

        store.execute("CREATE TABLE t (a INTEGER)").unwrap();
        assert!(store.table_exists("t").unwrap());
        assert!(!store.table_exists("T2").unwrap());
    }

    #[test]
    fn test_last_insert_id_none_before_insert() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.last_insert_id().unwrap(), None);

        store.execute("CREATE TABLE t (a INTEGER)").unwrap();
        store.execute("INSERT INTO t (a) VALUES (5)").unwrap();
        assert_eq!(store.last_insert_id().unwrap(), Some(1));
    }

    #[test]
    fn test_rollback_discards_changes() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.execute("CREATE TABLE t (a INTEGER)").unwrap();

        store.begin().unwrap();
        store.execute("INSERT INTO t (a) VALUES (5)").unwrap();
        store.rollback().unwrap();

        assert!(store.query("SELECT a FROM t").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_utf8_text_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store
            .query("SELECT CAST(X'41FF42' AS TEXT) AS name")
            .unwrap_err();
        assert_eq!(err.kind(), litorm_core::ExErrorKind::Persistence);
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_blob_columns_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.query("SELECT x'00ff' AS data").unwrap_err();
        assert_eq!(err.kind(), litorm_core::ExErrorKind::Persistence);
    }
}
