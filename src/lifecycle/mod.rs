//! Process orchestration: starting store actors, wiring controllers, shutting down.

pub mod service;
pub mod tracing;

pub use self::service::ResourceService;
pub use self::tracing::setup_tracing;
