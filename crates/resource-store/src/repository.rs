//! # Repository Trait
//!
//! The synchronous persistence contract a [`StoreActor`](crate::StoreActor) drives.
//! Implementations are owned by exactly one actor, so they take `&mut self` and need
//! not be `Sync`.

use crate::entity::ResourceEntity;
use crate::error::StoreError;

/// Persistence operations over a single record type.
pub trait Repository<T: ResourceEntity>: Send + 'static {
    /// Every stored record, in a stable order for a given storage state.
    fn find_all(&mut self) -> Result<Vec<T>, StoreError>;

    /// The record with `id`, if present.
    fn find_by_id(&mut self, id: T::Id) -> Result<Option<T>, StoreError>;

    /// Records matching a resource-specific query.
    fn query(&mut self, query: &T::Query) -> Result<Vec<T>, StoreError>;

    /// Persists a new record, assigning a fresh id and any store-owned fields.
    fn insert(&mut self, draft: T::Draft) -> Result<T, StoreError>;

    /// Persists `entity` under its own id, overwriting whatever is stored there.
    fn save(&mut self, entity: T) -> Result<T, StoreError>;

    /// Removes `entity`. Removing an absent record is a no-op.
    fn delete(&mut self, entity: &T) -> Result<(), StoreError>;
}
