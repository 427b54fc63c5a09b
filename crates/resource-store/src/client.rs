//! # Store Client
//!
//! This module defines the generic client for communicating with a store actor.

use crate::entity::ResourceEntity;
use crate::error::StoreError;
use crate::message::StoreRequest;
use tokio::sync::{mpsc, oneshot};

/// ## StoreClient
///
/// The `StoreClient<T>` provides a type-safe, async API for interacting with a `StoreActor<T>`.
/// It forwards repository calls over a Tokio mpsc channel and returns results via oneshot
/// channels.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Async API** – every method resolves to `Result<…, StoreError>`.
/// * **Generic** – works with any entity that implements `ResourceEntity`.
pub struct StoreClient<T: ResourceEntity> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: ResourceEntity> Clone for StoreClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ResourceEntity> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        request: impl FnOnce(oneshot::Sender<Result<R, StoreError>>) -> StoreRequest<T>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(request(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }

    pub async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        self.call(|respond_to| StoreRequest::FindAll { respond_to })
            .await
    }

    pub async fn find_by_id(&self, id: T::Id) -> Result<Option<T>, StoreError> {
        self.call(|respond_to| StoreRequest::FindById { id, respond_to })
            .await
    }

    pub async fn query(&self, query: T::Query) -> Result<Vec<T>, StoreError> {
        self.call(|respond_to| StoreRequest::Query { query, respond_to })
            .await
    }

    /// First record matching `query`, for queries that identify at most one record.
    pub async fn find_first(&self, query: T::Query) -> Result<Option<T>, StoreError> {
        Ok(self.query(query).await?.into_iter().next())
    }

    pub async fn insert(&self, draft: T::Draft) -> Result<T, StoreError> {
        self.call(|respond_to| StoreRequest::Insert { draft, respond_to })
            .await
    }

    pub async fn save(&self, entity: T) -> Result<T, StoreError> {
        self.call(|respond_to| StoreRequest::Save { entity, respond_to })
            .await
    }

    pub async fn delete(&self, entity: T) -> Result<(), StoreError> {
        self.call(|respond_to| StoreRequest::Delete { entity, respond_to })
            .await
    }
}
