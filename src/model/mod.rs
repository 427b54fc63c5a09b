//! Record types exposed by the services, plus their drafts and queries.
//!
//! The [`ResourceEntity`](resource_store::ResourceEntity) implementations live next to the
//! service that owns each type ([`crate::product_service`], [`crate::user_service`]).

pub mod product;
pub mod user;

pub use product::*;
pub use user::*;
