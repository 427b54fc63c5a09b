use crate::controller::{resource_router, ApiError, ResourceController, Reply};
use crate::model::{Product, ProductQuery};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub name: String,
}

impl ResourceController<Product> {
    /// Products whose name contains `name`, ignoring case.
    #[instrument(skip(self), fields(service = self.service()))]
    pub async fn search(&self, name: String) -> Result<Reply<Vec<Product>>, ApiError> {
        self.metrics().record_request();
        let hits = self.store().query(ProductQuery::NameContains(name)).await?;
        Ok(Reply::Ok(hits))
    }
}

/// `/api/products` CRUD, `/api/products/search?name=` and `/metrics`.
pub fn router(controller: Arc<ResourceController<Product>>) -> Router {
    let search_route = Router::new()
        .route("/api/products/search", get(search))
        .with_state(controller.clone());
    resource_router("products", controller).merge(search_route)
}

async fn search(
    State(controller): State<Arc<ResourceController<Product>>>,
    Query(params): Query<SearchParams>,
) -> Result<Reply<Vec<Product>>, ApiError> {
    controller.search(params.name).await
}
