//! Store configuration
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! path = "people.db"
//! journal_mode = "wal"
//! foreign_keys = true
//! busy_timeout_ms = 5000
//! identity_read_back = "last_insert_rowid"
//! ```

use crate::errors::{config_error, io_error, Result};
use litorm_core::{CommitOptions, IdentityReadBack};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// SQLite journal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalMode {
    Delete,
    #[default]
    Wal,
    Memory,
}

impl JournalMode {
    pub fn as_pragma(&self) -> &'static str {
        match self {
            JournalMode::Delete => "DELETE",
            JournalMode::Wal => "WAL",
            JournalMode::Memory => "MEMORY",
        }
    }
}

/// Identity read-back strategy as spelled in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadBackSetting {
    #[default]
    LastInsertRowid,
    MaxIdentity,
}

impl From<ReadBackSetting> for IdentityReadBack {
    fn from(setting: ReadBackSetting) -> Self {
        match setting {
            ReadBackSetting::LastInsertRowid => IdentityReadBack::LastInsertRowId,
            ReadBackSetting::MaxIdentity => IdentityReadBack::MaxIdentity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Database file; `None` opens an in-memory database
    pub path: Option<PathBuf>,
    pub journal_mode: JournalMode,
    pub foreign_keys: bool,
    pub busy_timeout_ms: u64,
    pub identity_read_back: ReadBackSetting,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            journal_mode: JournalMode::default(),
            foreign_keys: true,
            busy_timeout_ms: 5_000,
            identity_read_back: ReadBackSetting::default(),
        }
    }
}

impl StoreConfig {
    /// Configuration for a database file with default settings
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| config_error(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| io_error(&format!("read {}", path.display()), e))?;
        Self::from_toml_str(&text)
    }

    /// Commit options implied by this configuration
    pub fn commit_options(&self) -> CommitOptions {
        CommitOptions {
            identity_read_back: self.identity_read_back.into(),
        }
    }
}
