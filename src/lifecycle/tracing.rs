//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the `tracing` subscriber used by every run mode.
//!
//! The format is compact and hides the module prefix (`with_target(false)`); the
//! structured fields (`resource`, `service`, `id`, ...) carry the context instead.
//! Levels come from `RUST_LOG`:
//!
//! ```bash
//! # Startup, creates, saves and deletes
//! RUST_LOG=info record-services user
//!
//! # Every store call, with full drafts and records
//! RUST_LOG=debug record-services user
//! ```
//!
//! With `RUST_LOG=info` a user create looks like:
//!
//! ```text
//! INFO create: Created service="user-service" id=1
//! INFO Created resource="User" id=1
//! ```
//!
//! Controller operations run inside a span named after the operation, so every line a
//! request produces is prefixed with it.

/// Installs the global subscriber. Later calls are no-ops, so tests may call it freely.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
