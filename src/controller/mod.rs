//! # Resource Controller
//!
//! [`ResourceController<T>`] holds the request logic shared by every record service. It is
//! constructed explicitly from a service name, a [`StoreClient`] and the service's
//! [`ServiceMetrics`]; nothing is looked up at runtime.
//!
//! Every operation except [`health`](ResourceController::health) counts one request
//! before touching the store, whatever the outcome. A create counts as created only after
//! the store has confirmed the insert.
//!
//! Inserts guarded by [`ResourceEntity::uniqueness_probe`] are check-then-act: the probe
//! query and the insert are two separate store calls, so two concurrent creates can both
//! pass the probe. The loser then hits the storage constraint, which surfaces as
//! [`StoreError::Conflict`] and is answered exactly like a failed probe.

pub mod reply;
pub mod routes;

pub use reply::{ApiError, Health, Reply};
pub use routes::resource_router;

use crate::metrics::ServiceMetrics;
use resource_store::{ResourceEntity, StoreClient, StoreError};
use tracing::{info, instrument, warn};

pub struct ResourceController<T: ResourceEntity> {
    service: &'static str,
    store: StoreClient<T>,
    metrics: ServiceMetrics,
}

impl<T: ResourceEntity> ResourceController<T> {
    pub fn new(service: &'static str, store: StoreClient<T>, metrics: ServiceMetrics) -> Self {
        Self {
            service,
            store,
            metrics,
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    pub fn store(&self) -> &StoreClient<T> {
        &self.store
    }

    /// Liveness. Not counted as a request.
    pub fn health(&self) -> Health {
        Health {
            status: "UP",
            service: self.service,
        }
    }

    #[instrument(skip(self), fields(service = self.service))]
    pub async fn list(&self) -> Result<Reply<Vec<T>>, ApiError> {
        self.metrics.record_request();
        let records = self.store.find_all().await?;
        Ok(Reply::Ok(records))
    }

    #[instrument(skip(self), fields(service = self.service))]
    pub async fn get(&self, id: T::Id) -> Result<Reply<T>, ApiError> {
        self.metrics.record_request();
        Ok(match self.store.find_by_id(id).await? {
            Some(record) => Reply::Ok(record),
            None => Reply::NotFound,
        })
    }

    #[instrument(skip(self), fields(service = self.service))]
    pub async fn create(&self, draft: T::Draft) -> Result<Reply<T>, ApiError> {
        self.metrics.record_request();

        if let Some(probe) = T::uniqueness_probe(&draft) {
            if let Some(existing) = self.store.find_first(probe).await? {
                info!(existing = %existing.id(), "Create rejected, duplicate");
                return Ok(Reply::Conflict);
            }
        }

        match self.store.insert(draft).await {
            Ok(record) => {
                self.metrics.record_created();
                info!(id = %record.id(), "Created");
                Ok(Reply::Created(record))
            }
            Err(StoreError::Conflict(reason)) => {
                warn!(%reason, "Create lost a uniqueness race");
                Ok(Reply::Conflict)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self), fields(service = self.service))]
    pub async fn update(&self, id: T::Id, draft: T::Draft) -> Result<Reply<T>, ApiError> {
        self.metrics.record_request();

        let Some(stored) = self.store.find_by_id(id).await? else {
            return Ok(Reply::NotFound);
        };

        match self.store.save(stored.revise(draft)).await {
            Ok(record) => Ok(Reply::Ok(record)),
            Err(StoreError::Conflict(reason)) => {
                info!(%reason, "Update rejected, duplicate");
                Ok(Reply::Conflict)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self), fields(service = self.service))]
    pub async fn delete(&self, id: T::Id) -> Result<Reply<()>, ApiError> {
        self.metrics.record_request();

        let Some(stored) = self.store.find_by_id(id).await? else {
            return Ok(Reply::NotFound);
        };
        self.store.delete(stored).await?;
        Ok(Reply::Deleted)
    }
}
