//! # Store Messages
//!
//! This module defines the generic message types used for communication between
//! the `StoreClient` and `StoreActor`.

use crate::entity::ResourceEntity;
use crate::error::StoreError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store actor.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Request sent to a store actor.
///
/// The variants mirror the [`Repository`](crate::Repository) contract one to one, so a
/// client call is exactly one repository call on the actor's thread.
#[derive(Debug)]
pub enum StoreRequest<T: ResourceEntity> {
    FindAll {
        respond_to: Response<Vec<T>>,
    },
    FindById {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Query {
        query: T::Query,
        respond_to: Response<Vec<T>>,
    },
    Insert {
        draft: T::Draft,
        respond_to: Response<T>,
    },
    Save {
        entity: T,
        respond_to: Response<T>,
    },
    Delete {
        entity: T,
        respond_to: Response<()>,
    },
}
