//! Error types for process startup and shutdown.

use resource_store::StoreError;
use thiserror::Error;

/// Errors that stop a service from starting or shutting down cleanly.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The database could not be opened or its schema applied.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Binding or serving the HTTP listener failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The upstream HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// The store thread panicked or was cancelled.
    #[error("Store task failed: {0}")]
    StoreTask(String),
}
