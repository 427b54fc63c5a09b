//! # API Gateway
//!
//! A single entry point in front of the user and product services. Most routes forward
//! the request unchanged and relay the upstream JSON; the dashboard route aggregates both
//! services. Upstream failures are translated by [`GatewayError`].
//!
//! Record ids in paths must be integers. They are parsed here so that nothing but the id
//! itself is spliced into the upstream URL; anything else is answered 400 without an
//! upstream call.
//!
//! Every request, including unmatched ones, is counted and timed by the `track`
//! middleware under its matched route template.

pub mod proxy;

pub use proxy::{GatewayError, Upstream, UpstreamFailure};

use crate::config::GatewaySettings;
use crate::error::ServiceError;
use crate::metrics::{GatewayMetrics, HttpLabels};
use axum::extract::{MatchedPath, Path, RawQuery, Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub const SERVICE_NAME: &str = "api-gateway";

pub struct Gateway {
    users: Upstream,
    products: Upstream,
    metrics: GatewayMetrics,
}

impl Gateway {
    pub fn new(settings: &GatewaySettings) -> Result<Self, ServiceError> {
        let users = Upstream::new("User Service", &settings.user_service_url, settings.timeout)?;
        let products = Upstream::new(
            "Product Service",
            &settings.product_service_url,
            settings.timeout,
        )?;
        info!(
            users = %settings.user_service_url,
            products = %settings.product_service_url,
            timeout_ms = settings.timeout.as_millis() as u64,
            "Gateway configured"
        );
        Ok(Self {
            users,
            products,
            metrics: GatewayMetrics::new(),
        })
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }
}

type Shared = State<Arc<Gateway>>;

pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/users/{id}/dashboard", get(dashboard))
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/search", get(search_products))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            gateway.metrics.clone(),
            track,
        ))
        .with_state(gateway)
}

/// Records count and latency for every request.
async fn track(State(metrics): State<GatewayMetrics>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let start = Instant::now();
    let response = next.run(request).await;

    let labels = HttpLabels {
        method,
        route,
        status: response.status().as_u16().to_string(),
    };
    metrics.observe(labels, start.elapsed());
    response
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "UP",
        "service": SERVICE_NAME,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

async fn metrics(State(gateway): Shared) -> Response {
    gateway.metrics.render()
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}

// --- users ---

async fn list_users(State(gateway): Shared) -> Result<Json<Value>, GatewayError> {
    let users = gateway
        .users
        .call(Method::GET, "/api/users", None, None)
        .await?;
    Ok(Json(users))
}

async fn get_user(
    State(gateway): Shared,
    Path(id): Path<i64>,
) -> Result<Json<Value>, GatewayError> {
    let user = gateway
        .users
        .call(Method::GET, &format!("/api/users/{id}"), None, None)
        .await?;
    Ok(Json(user))
}

async fn create_user(
    State(gateway): Shared,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, GatewayError> {
    let user = gateway
        .users
        .call(Method::POST, "/api/users", None, Some(&body))
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(gateway): Shared,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, GatewayError> {
    let user = gateway
        .users
        .call(Method::PUT, &format!("/api/users/{id}"), None, Some(&body))
        .await?;
    Ok(Json(user))
}

async fn delete_user(
    State(gateway): Shared,
    Path(id): Path<i64>,
) -> Result<StatusCode, GatewayError> {
    gateway
        .users
        .call(Method::DELETE, &format!("/api/users/{id}"), None, None)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The user plus the size of the product catalog, fetched concurrently.
async fn dashboard(
    State(gateway): Shared,
    Path(id): Path<i64>,
) -> Result<Json<Value>, GatewayError> {
    let user_path = format!("/api/users/{id}");
    let (user, products) = tokio::try_join!(
        gateway.users.call(Method::GET, &user_path, None, None),
        gateway.products.call(Method::GET, "/api/products", None, None),
    )
    .map_err(|e| e.under("Aggregation"))?;

    let total_products = products
        .as_array()
        .map(Vec::len)
        .ok_or_else(|| GatewayError {
            service: "Aggregation",
            failure: UpstreamFailure::Other("product list is not an array".into()),
        })?;

    Ok(Json(json!({
        "user": user,
        "totalProducts": total_products,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })))
}

// --- products ---

async fn list_products(State(gateway): Shared) -> Result<Json<Value>, GatewayError> {
    let products = gateway
        .products
        .call(Method::GET, "/api/products", None, None)
        .await?;
    Ok(Json(products))
}

async fn search_products(
    State(gateway): Shared,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, GatewayError> {
    let products = gateway
        .products
        .call(Method::GET, "/api/products/search", query.as_deref(), None)
        .await?;
    Ok(Json(products))
}

async fn get_product(
    State(gateway): Shared,
    Path(id): Path<i64>,
) -> Result<Json<Value>, GatewayError> {
    let product = gateway
        .products
        .call(Method::GET, &format!("/api/products/{id}"), None, None)
        .await?;
    Ok(Json(product))
}

async fn create_product(
    State(gateway): Shared,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, GatewayError> {
    let product = gateway
        .products
        .call(Method::POST, "/api/products", None, Some(&body))
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(gateway): Shared,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, GatewayError> {
    let product = gateway
        .products
        .call(Method::PUT, &format!("/api/products/{id}"), None, Some(&body))
        .await?;
    Ok(Json(product))
}

async fn delete_product(
    State(gateway): Shared,
    Path(id): Path<i64>,
) -> Result<StatusCode, GatewayError> {
    gateway
        .products
        .call(Method::DELETE, &format!("/api/products/{id}"), None, None)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
