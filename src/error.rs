use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing file for a table is missing or unreadable
    #[error("Table '{table}' unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        table: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file exists but a row does not decode
    #[error("Table '{table}' is corrupt: {message}")]
    CorruptTable { table: &'static str, message: String },

    /// Existing identifier does not follow the prefix + integer convention
    #[error("Malformed identifier '{id}' in table '{table}' (expected prefix '{prefix}')")]
    MalformedIdentifier {
        table: &'static str,
        id: String,
        prefix: &'static str,
    },

    /// No record with the given key
    #[error("No record '{key}' in table '{table}'")]
    KeyNotFound { table: &'static str, key: String },

    /// Required user input missing or out of range
    #[error("Invalid input: {0}")]
    ValidationFailure(String),

    /// Whole-table rewrite failed
    #[error("Failed to persist table '{table}': {message}")]
    PersistFailed { table: &'static str, message: String },
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::ValidationFailure(message.into())
    }

    pub fn key_not_found(table: &'static str, key: impl Into<String>) -> Self {
        StoreError::KeyNotFound {
            table,
            key: key.into(),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
