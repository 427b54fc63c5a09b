use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use resource_store::StoreError;
use serde::Serialize;
use tracing::error;

/// Outcome of a controller operation that reached the store.
///
/// The non-success variants answer with an empty body.
#[derive(Debug, PartialEq)]
pub enum Reply<B> {
    /// 200 with `B` as JSON.
    Ok(B),
    /// 201 with `B` as JSON.
    Created(B),
    /// 200, empty body.
    Deleted,
    /// 404, empty body.
    NotFound,
    /// 409, empty body.
    Conflict,
}

impl<B: Serialize> IntoResponse for Reply<B> {
    fn into_response(self) -> Response {
        match self {
            Reply::Ok(body) => (StatusCode::OK, Json(body)).into_response(),
            Reply::Created(body) => (StatusCode::CREATED, Json(body)).into_response(),
            Reply::Deleted => StatusCode::OK.into_response(),
            Reply::NotFound => StatusCode::NOT_FOUND.into_response(),
            Reply::Conflict => StatusCode::CONFLICT.into_response(),
        }
    }
}

/// Body of `GET /api/{resource}/health`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
}

/// Failures the controller does not translate into a [`Reply`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
