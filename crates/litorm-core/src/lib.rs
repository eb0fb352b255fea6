//! litorm core - record mapping, dirty checking and batch commit
//!
//! This crate maps record types onto relational tables:
//! - Static field descriptors and schema derivation with a process-wide cache
//! - SQL statement generation (create, select-all, insert, update)
//! - Content snapshots for dirty checking
//! - Transactional batch commit that inserts new records and updates dirty ones
//!
//! The store itself is abstracted behind `StoreConnection`; `litorm-store`
//! implements it for SQLite.

pub mod commit;
pub mod connection;
pub mod errors;
pub mod introspect;
pub mod logging_facility;
pub mod model;
pub mod repo;
pub mod snapshot;
pub mod statements;

// Re-export commonly used types
pub use commit::{commit_batch, CommitOptions, CommitSummary, IdentityReadBack};
pub use connection::StoreConnection;
pub use errors::{ExError, ExErrorKind, OrmError, Result};
pub use introspect::{derive_schema, schema_for, table_exists};
pub use model::{ColumnSchema, FieldDescriptor, FieldKind, Record, RecordMeta, Row, Value};
pub use snapshot::{compute_snapshot, is_dirty, Snapshot};
