//! # Product Service
//!
//! Product records on `/api/products`, with a name search. Products carry no uniqueness
//! rule.

pub mod entity;
pub mod routes;

pub use routes::router;

use crate::config::StoreSettings;
use crate::error::ServiceError;
use crate::lifecycle::ResourceService;
use crate::metrics::ServiceMetrics;
use crate::model::Product;
use resource_store::SqliteRepository;

pub const SERVICE_NAME: &str = "product-service";

pub fn metrics() -> ServiceMetrics {
    ServiceMetrics::new("product_requests", "products_created")
}

/// Opens the product table and starts its store.
pub fn start(settings: &StoreSettings) -> Result<ResourceService<Product>, ServiceError> {
    let repository = match &settings.database {
        Some(path) => SqliteRepository::<Product>::open(path)?,
        None => SqliteRepository::<Product>::in_memory()?,
    };
    Ok(ResourceService::start(
        SERVICE_NAME,
        repository,
        settings.buffer,
        metrics(),
    ))
}
