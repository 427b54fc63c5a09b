//! # User Service
//!
//! User records on `/api/users`. Email is unique: creating a user whose email is already
//! taken, or changing a user's email to one another user has, answers 409. The lookup
//! before insert is [`UserQuery::ByEmail`](crate::model::UserQuery::ByEmail), issued by the
//! controller through the entity's uniqueness probe.

pub mod entity;
pub mod routes;

pub use routes::router;

use crate::config::StoreSettings;
use crate::error::ServiceError;
use crate::lifecycle::ResourceService;
use crate::metrics::ServiceMetrics;
use crate::model::User;
use resource_store::SqliteRepository;

pub const SERVICE_NAME: &str = "user-service";

pub fn metrics() -> ServiceMetrics {
    ServiceMetrics::new("user_requests", "users_created")
}

/// Opens the user table and starts its store.
pub fn start(settings: &StoreSettings) -> Result<ResourceService<User>, ServiceError> {
    let repository = match &settings.database {
        Some(path) => SqliteRepository::<User>::open(path)?,
        None => SqliteRepository::<User>::in_memory()?,
    };
    Ok(ResourceService::start(
        SERVICE_NAME,
        repository,
        settings.buffer,
        metrics(),
    ))
}
