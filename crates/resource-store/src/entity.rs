//! # ResourceEntity Trait
//!
//! The `ResourceEntity` trait is the contract every record type (Product, User, …) implements
//! to be managed by the generic [`StoreActor`](crate::StoreActor). It names the identifier,
//! the client-writable draft, and the resource-specific query type, and provides the two pieces
//! of domain logic the generic layers need: how an update is applied and which query guards
//! an insert against duplicates.
//!
//! # Provided Methods (Hooks)
//! - [`ResourceEntity::uniqueness_probe`]
//!
//! The default implementation returns `None`, meaning the resource has no uniqueness rule.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record type must implement to be managed by a `StoreActor`.
///
/// We use associated types so that a `User` store only accepts a `UserDraft`
/// and a `UserQuery`; sending a `ProductDraft` to it does not compile.
pub trait ResourceEntity: Clone + Debug + Send + Sync + 'static {
    /// The unique identifier assigned by the store.
    type Id: Copy + Eq + Hash + Display + Debug + Send + Sync + 'static;

    /// The client-writable fields (DTO). Read-only fields such as the id are not part of it.
    type Draft: Debug + Send + Sync + 'static;

    /// Resource-specific finder (e.g. name substring, exact email).
    type Query: Debug + Send + Sync + 'static;

    /// The identifier of this persisted record.
    fn id(&self) -> Self::Id;

    /// Builds the updated record from `self` and the incoming draft.
    ///
    /// Every mutable field is taken from `draft`; the id and any store-assigned
    /// fields are carried over from `self`.
    fn revise(&self, draft: Self::Draft) -> Self;

    /// Query that must come back empty before `draft` may be inserted.
    fn uniqueness_probe(_draft: &Self::Draft) -> Option<Self::Query> {
        None
    }
}
