use crate::controller::{resource_router, ResourceController};
use crate::model::User;
use axum::Router;
use std::sync::Arc;

/// `/api/users` CRUD and `/metrics`.
pub fn router(controller: Arc<ResourceController<User>>) -> Router {
    resource_router("users", controller)
}
