//! # Prometheus Metrics
//!
//! Request metrics recorded by middleware, plus a download counter bumped by
//! the artifact handler. Each [`ApiMetrics`] owns its own registry, so tests
//! and multiple app instances never share counters.
//!
//! The `path` label is the matched route template (`/packages/{package_name}/{filename}`),
//! never the raw URI, which keeps label cardinality bounded no matter what
//! clients request.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::core::Collector;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Label used for requests that matched no route.
const UNMATCHED_PATH: &str = "<unmatched>";

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    artifact_downloads_total: IntCounterVec,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics")
            .field("requests", &self.requests())
            .field("downloads", &self.downloads())
            .finish()
    }
}

impl ApiMetrics {
    /// Create a new metrics instance with a fresh Prometheus registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("syrepo_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "syrepo_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
            &["method", "path"],
        )
        .expect("metric can be created");

        let artifact_downloads_total = IntCounterVec::new(
            Opts::new(
                "syrepo_artifact_downloads_total",
                "Artifacts served, by content kind",
            ),
            &["kind"],
        )
        .expect("metric can be created");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(artifact_downloads_total.clone()))
            .expect("metric can be registered");

        Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                artifact_downloads_total,
            }),
        }
    }

    /// Total request count across all labels.
    pub fn requests(&self) -> u64 {
        sum_counters(&self.inner.http_requests_total)
    }

    /// Total artifacts served across all kinds.
    pub fn downloads(&self) -> u64 {
        sum_counters(&self.inner.artifact_downloads_total)
    }

    /// Record a served artifact of the given content kind.
    pub fn record_download(&self, kind: &str) {
        self.inner
            .artifact_downloads_total
            .with_label_values(&[kind])
            .inc();
    }

    fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Gather all metrics and encode to Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| format!("failed to encode metrics: {e}"))?;
        String::from_utf8(buffer).map_err(|e| format!("metrics encoding produced invalid UTF-8: {e}"))
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn sum_counters(counter: &IntCounterVec) -> u64 {
    counter
        .collect()
        .iter()
        .flat_map(|mf| mf.get_metric())
        .map(|m| m.get_counter().get_value() as u64)
        .sum()
}

/// Middleware that records HTTP request metrics.
///
/// Reads [`ApiMetrics`] from request extensions; a request without it
/// passes through unrecorded.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.record_request(
            &method,
            &path,
            response.status().as_u16(),
            start.elapsed().as_secs_f64(),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_starts_at_zero() {
        let m = ApiMetrics::new();
        assert_eq!(m.requests(), 0);
        assert_eq!(m.downloads(), 0);
    }

    #[test]
    fn requests_increment() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/packages.json", 200, 0.01);
        m.record_request("GET", "/packages/{package_name}/{filename}", 404, 0.002);
        assert_eq!(m.requests(), 2);
    }

    #[test]
    fn downloads_by_kind() {
        let m = ApiMetrics::new();
        m.record_download("binary_artifact");
        m.record_download("binary_artifact");
        m.record_download("manifest_fragment");
        assert_eq!(m.downloads(), 3);
        let output = m.gather_and_encode().unwrap();
        assert!(output.contains(r#"syrepo_artifact_downloads_total{kind="binary_artifact"} 2"#));
    }

    #[test]
    fn clone_shares_underlying_counters() {
        let m = ApiMetrics::new();
        let clone = m.clone();
        m.record_request("GET", "/health", 200, 0.001);
        assert_eq!(clone.requests(), 1);
    }

    #[test]
    fn instances_do_not_share_registries() {
        let a = ApiMetrics::new();
        let b = ApiMetrics::new();
        a.record_download("unknown");
        assert_eq!(b.downloads(), 0);
    }

    #[test]
    fn gather_and_encode_produces_text() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/", 200, 0.01);
        let output = m.gather_and_encode().unwrap();
        assert!(output.contains("syrepo_http_requests_total"));
        assert!(output.contains("syrepo_http_request_duration_seconds"));
    }
}
