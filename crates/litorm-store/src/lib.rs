//! litorm store - SQLite backing for the mapping engine
//!
//! Provides:
//! - `SqliteStore`, the `StoreConnection` implementation over rusqlite
//! - Connection opening and pragma configuration
//! - TOML store configuration

pub mod config;
pub mod db;
pub mod errors;
pub mod sqlite;

// Re-export key types
pub use config::{JournalMode, ReadBackSetting, StoreConfig};
pub use errors::Result;
pub use sqlite::SqliteStore;
