use crate::controller::ResourceController;
use crate::error::ServiceError;
use crate::metrics::ServiceMetrics;
use resource_store::{Repository, ResourceEntity, StoreActor};
use std::sync::Arc;
use tracing::{error, info};

/// A running record service: its store actor and the controller in front of it.
///
/// # Example
///
/// ```ignore
/// let service = ResourceService::start("user-service", repository, 32, metrics);
/// let app = user_service::router(service.controller());
/// axum::serve(listener, app).await?;
/// service.shutdown().await?;
/// ```
pub struct ResourceService<T: ResourceEntity> {
    controller: Arc<ResourceController<T>>,
    handle: tokio::task::JoinHandle<()>,
}

impl<T: ResourceEntity> ResourceService<T> {
    /// Spawns the store actor on a blocking thread and builds the controller.
    ///
    /// `buffer` is the capacity of the store request channel.
    pub fn start(
        service: &'static str,
        repository: impl Repository<T>,
        buffer: usize,
        metrics: ServiceMetrics,
    ) -> Self {
        let (actor, store) = StoreActor::new(repository, buffer);
        let handle = tokio::task::spawn_blocking(move || actor.run());
        info!(service, buffer, "Service started");

        Self {
            controller: Arc::new(ResourceController::new(service, store, metrics)),
            handle,
        }
    }

    pub fn controller(&self) -> Arc<ResourceController<T>> {
        self.controller.clone()
    }

    /// Stops the store actor and waits for it.
    ///
    /// The actor exits once the last store client is gone, so every router built from
    /// [`controller`](Self::controller) must be dropped first.
    pub async fn shutdown(self) -> Result<(), ServiceError> {
        let service = self.controller.service();
        info!(service, "Shutting down");

        drop(self.controller);

        if let Err(e) = self.handle.await {
            error!(service, error = %e, "Store task failed");
            return Err(ServiceError::StoreTask(e.to_string()));
        }

        info!(service, "Shutdown complete");
        Ok(())
    }
}
