//! # Store Errors
//!
//! Common error type shared by the store actor, its client and every repository.

/// Errors that can occur while talking to a store.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error("Store closed")]
    Closed,
    #[error("Store dropped response channel")]
    Dropped,
    #[error("Unique constraint violated: {0}")]
    Conflict(String),
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(code, message)
                if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::Conflict(message.unwrap_or_else(|| code.to_string()))
            }
            other => StoreError::Storage(other.to_string()),
        }
    }
}
