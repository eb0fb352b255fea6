//! Error helpers for litorm-store
//!
//! Driver and configuration failures are expressed as core `OrmError`s.

use litorm_core::errors::OrmError;

/// Result type alias using OrmError
pub type Result<T> = std::result::Result<T, OrmError>;

/// Create a persistence error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> OrmError {
    OrmError::Persistence {
        message: err.to_string(),
    }
}

/// Create a configuration error
pub fn config_error(reason: impl Into<String>) -> OrmError {
    OrmError::Config {
        reason: reason.into(),
    }
}

/// Create an IO error while reading configuration
pub fn io_error(operation: &str, err: std::io::Error) -> OrmError {
    config_error(format!("{}: {}", operation, err))
}
