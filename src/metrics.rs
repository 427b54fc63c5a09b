//! # Metrics
//!
//! Process-wide counters, registered once at startup in a `prometheus_client` registry and
//! exposed at `GET /metrics` in OpenMetrics text format.
//!
//! `prometheus_client` appends `_total` to counter names when encoding, so a counter
//! registered as `product_requests` is scraped as `product_requests_total`.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use prometheus_client::encoding::{text::encode, EncodeLabelSet};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

pub const OPENMETRICS_CONTENT_TYPE: &str =
    "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// The request and creation counters of one record service.
///
/// Cloning is cheap and every clone increments the same counters.
#[derive(Clone)]
pub struct ServiceMetrics {
    registry: Arc<Registry>,
    requests: Counter,
    created: Counter,
}

impl ServiceMetrics {
    /// Registers both counters in a fresh registry.
    ///
    /// `requests` and `created` are the counter names without the `_total` suffix.
    pub fn new(requests: &str, created: &str) -> Self {
        let mut registry = Registry::default();

        let requests_counter = Counter::default();
        registry.register(
            requests,
            "Requests handled by the resource endpoints",
            requests_counter.clone(),
        );

        let created_counter = Counter::default();
        registry.register(
            created,
            "Records successfully created",
            created_counter.clone(),
        );

        Self {
            registry: Arc::new(registry),
            requests: requests_counter,
            created: created_counter,
        }
    }

    pub fn record_request(&self) {
        self.requests.inc();
    }

    pub fn record_created(&self) {
        self.created.inc();
    }

    pub fn requests(&self) -> u64 {
        self.requests.get()
    }

    pub fn created(&self) -> u64 {
        self.created.get()
    }

    pub fn render(&self) -> Response {
        render(&self.registry)
    }
}

/// Labels for gateway request metrics.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct HttpLabels {
    pub method: String,
    /// Matched route template (e.g. `/api/users/{id}`), or the raw path when nothing matched.
    pub route: String,
    pub status: String,
}

/// Request count and latency of the API gateway, by method, route and status.
#[derive(Clone)]
pub struct GatewayMetrics {
    registry: Arc<Registry>,
    requests: Family<HttpLabels, Counter>,
    duration: Family<HttpLabels, Histogram>,
}

impl Default for GatewayMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayMetrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let requests = Family::<HttpLabels, Counter>::default();
        registry.register(
            "gateway_http_requests",
            "Total number of HTTP requests",
            requests.clone(),
        );

        let duration = Family::<HttpLabels, Histogram>::new_with_constructor(|| {
            // 5ms .. ~10s
            Histogram::new(exponential_buckets(0.005, 2.0, 12))
        });
        registry.register(
            "gateway_http_request_duration_seconds",
            "Duration of HTTP requests in seconds",
            duration.clone(),
        );

        Self {
            registry: Arc::new(registry),
            requests,
            duration,
        }
    }

    pub fn observe(&self, labels: HttpLabels, elapsed: Duration) {
        self.duration
            .get_or_create(&labels)
            .observe(elapsed.as_secs_f64());
        self.requests.get_or_create(&labels).inc();
    }

    /// Requests recorded so far for one label set.
    pub fn requests(&self, labels: &HttpLabels) -> u64 {
        self.requests.get_or_create(labels).get()
    }

    pub fn render(&self) -> Response {
        render(&self.registry)
    }
}

/// Encodes `registry` as an OpenMetrics response.
fn render(registry: &Registry) -> Response {
    let mut buffer = String::new();
    match encode(&mut buffer, registry) {
        Ok(()) => ([(header::CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)], buffer).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn counters_only_go_up() {
        let metrics = ServiceMetrics::new("widget_requests", "widgets_created");
        let clone = metrics.clone();

        metrics.record_request();
        clone.record_request();
        clone.record_created();

        assert_eq!(metrics.requests(), 2);
        assert_eq!(metrics.created(), 1);
    }

    #[tokio::test]
    async fn service_counters_are_encoded_with_total_suffix() {
        let metrics = ServiceMetrics::new("widget_requests", "widgets_created");
        metrics.record_request();

        let response = metrics.render();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            OPENMETRICS_CONTENT_TYPE
        );
        let text = body_text(response).await;
        assert!(text.contains("widget_requests_total 1"), "{text}");
        assert!(text.contains("widgets_created_total 0"), "{text}");
    }

    #[tokio::test]
    async fn gateway_families_carry_labels() {
        let metrics = GatewayMetrics::new();
        let labels = HttpLabels {
            method: "GET".into(),
            route: "/api/users/{id}".into(),
            status: "200".into(),
        };
        metrics.observe(labels.clone(), Duration::from_millis(12));
        metrics.observe(labels.clone(), Duration::from_millis(30));

        assert_eq!(metrics.requests(&labels), 2);
        let text = body_text(metrics.render()).await;
        assert!(text.contains("gateway_http_requests_total"));
        assert!(text.contains("gateway_http_request_duration_seconds_bucket"));
        assert!(text.contains("route=\"/api/users/{id}\""));
    }
}
