//! Upstream calls and their failure mapping.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Why an upstream call failed.
#[derive(Debug, Error)]
pub enum UpstreamFailure {
    /// The upstream answered with a non-success status.
    #[error("Request failed with status code {}", .status.as_u16())]
    Status {
        status: StatusCode,
        /// `message` field of the upstream's JSON body, when it had one.
        message: Option<String>,
    },
    /// No answer: connection refused, reset or timed out.
    #[error("Service is not responding")]
    Unavailable(#[source] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for UpstreamFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() || e.is_request() {
            UpstreamFailure::Unavailable(e)
        } else {
            UpstreamFailure::Other(e.to_string())
        }
    }
}

/// An upstream failure attributed to a named service.
#[derive(Debug, Error)]
#[error("{service} error: {failure}")]
pub struct GatewayError {
    pub service: &'static str,
    #[source]
    pub failure: UpstreamFailure,
}

impl GatewayError {
    /// Re-attributes the failure, e.g. to an aggregation that made several calls.
    pub fn under(self, service: &'static str) -> Self {
        Self { service, ..self }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        warn!(service = self.service, error = %self.failure, "Upstream call failed");
        let service = self.service;
        match self.failure {
            UpstreamFailure::Status { status, message } => {
                let message = message.unwrap_or_else(|| {
                    format!("Request failed with status code {}", status.as_u16())
                });
                let body = json!({
                    "error": format!("{service} error"),
                    "message": message,
                    "status": status.as_u16(),
                });
                (status, Json(body)).into_response()
            }
            UpstreamFailure::Unavailable(_) => {
                let body = json!({
                    "error": format!("{service} unavailable"),
                    "message": "Service is not responding",
                });
                (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
            }
            UpstreamFailure::Other(message) => {
                let body = json!({ "error": "Gateway error", "message": message });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

/// One backing service reachable over HTTP.
#[derive(Debug, Clone)]
pub struct Upstream {
    name: &'static str,
    base_url: String,
    http: reqwest::Client,
}

impl Upstream {
    pub fn new(
        name: &'static str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            name,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Sends `method path?query` with an optional JSON body and decodes the JSON answer.
    ///
    /// An empty success body decodes as `Value::Null`.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Value, GatewayError> {
        self.send(method, path, query, body)
            .await
            .map_err(|failure| GatewayError {
                service: self.name,
                failure,
            })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Value, UpstreamFailure> {
        let mut url = format!("{}{path}", self.base_url);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        debug!(upstream = self.name, %method, %url, "Forwarding");

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|v| v.get("message")?.as_str().map(str::to_owned));
            return Err(UpstreamFailure::Status { status, message });
        }
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| UpstreamFailure::Other(e.to_string()))
    }
}
