//! Store capability consumed by the mapping engine
//!
//! The engine never opens or configures a database itself. Anything that can
//! run SQL text, mark transaction boundaries and answer catalog lookups can
//! back it; `litorm-store` provides the SQLite implementation.

use crate::errors::Result;
use crate::model::Row;

/// Blocking SQL execution capability
///
/// Driver failures are reported as `OrmError::Persistence`; the commit path
/// re-tags them as commit errors.
pub trait StoreConnection {
    /// Run a statement, returning the number of affected rows
    fn execute(&self, sql: &str) -> Result<usize>;

    /// Run a query, returning every row keyed by column name
    fn query(&self, sql: &str) -> Result<Vec<Row>>;

    fn begin(&self) -> Result<()>;

    fn commit(&self) -> Result<()>;

    fn rollback(&self) -> Result<()>;

    /// Catalog lookup: does a table with this exact name exist?
    fn table_exists(&self, table: &str) -> Result<bool>;

    /// Identity the store assigned to the most recent insert on this
    /// connection, `None` if it has not inserted anything.
    fn last_insert_id(&self) -> Result<Option<i64>>;
}

impl<C: StoreConnection + ?Sized> StoreConnection for &C {
    fn execute(&self, sql: &str) -> Result<usize> {
        (**self).execute(sql)
    }

    fn query(&self, sql: &str) -> Result<Vec<Row>> {
        (**self).query(sql)
    }

    fn begin(&self) -> Result<()> {
        (**self).begin()
    }

    fn commit(&self) -> Result<()> {
        (**self).commit()
    }

    fn rollback(&self) -> Result<()> {
        (**self).rollback()
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        (**self).table_exists(table)
    }

    fn last_insert_id(&self) -> Result<Option<i64>> {
        (**self).last_insert_id()
    }
}
