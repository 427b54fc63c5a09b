use super::{ApiError, Health, ResourceController, Reply};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use resource_store::ResourceEntity;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

type Controller<T> = State<Arc<ResourceController<T>>>;

/// CRUD routes for one resource under `/api/{resource}`, plus `/metrics`.
///
/// A path id that does not parse as `T::Id` and a body that does not decode as a draft are
/// both rejected by the extractors before the controller runs.
pub fn resource_router<T>(resource: &str, controller: Arc<ResourceController<T>>) -> Router
where
    T: ResourceEntity + Serialize,
    T::Id: DeserializeOwned,
    T::Draft: DeserializeOwned,
{
    let collection = format!("/api/{resource}");
    Router::new()
        .route(&collection, get(list::<T>).post(create::<T>))
        .route(&format!("{collection}/health"), get(health::<T>))
        .route(
            &format!("{collection}/{{id}}"),
            get(find::<T>).put(update::<T>).delete(remove::<T>),
        )
        .route("/metrics", get(metrics::<T>))
        .with_state(controller)
}

async fn health<T: ResourceEntity>(State(controller): Controller<T>) -> Json<Health> {
    Json(controller.health())
}

async fn metrics<T: ResourceEntity>(State(controller): Controller<T>) -> Response {
    controller.metrics().render()
}

async fn list<T>(State(controller): Controller<T>) -> Result<Reply<Vec<T>>, ApiError>
where
    T: ResourceEntity + Serialize,
{
    controller.list().await
}

async fn find<T>(
    State(controller): Controller<T>,
    Path(id): Path<T::Id>,
) -> Result<Reply<T>, ApiError>
where
    T: ResourceEntity + Serialize,
    T::Id: DeserializeOwned,
{
    controller.get(id).await
}

async fn create<T>(
    State(controller): Controller<T>,
    Json(draft): Json<T::Draft>,
) -> Result<Reply<T>, ApiError>
where
    T: ResourceEntity + Serialize,
    T::Draft: DeserializeOwned,
{
    controller.create(draft).await
}

async fn update<T>(
    State(controller): Controller<T>,
    Path(id): Path<T::Id>,
    Json(draft): Json<T::Draft>,
) -> Result<Reply<T>, ApiError>
where
    T: ResourceEntity + Serialize,
    T::Id: DeserializeOwned,
    T::Draft: DeserializeOwned,
{
    controller.update(id, draft).await
}

async fn remove<T>(
    State(controller): Controller<T>,
    Path(id): Path<T::Id>,
) -> Result<Reply<()>, ApiError>
where
    T: ResourceEntity,
    T::Id: DeserializeOwned,
{
    controller.delete(id).await
}
