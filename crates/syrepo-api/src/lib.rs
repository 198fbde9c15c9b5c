//! # syrepo-api: HTTP Service for the SystemOS Package Repository
//!
//! Binds the [`RepositoryService`](syrepo_core::RepositoryService)
//! operations to Axum routes.
//!
//! ## API Surface
//!
//! | Route | Module | Operation |
//! |-------|--------|-----------|
//! | `GET /` | [`routes::repository`] | repository info |
//! | `GET /packages.json` | [`routes::repository`] | catalog listing |
//! | `GET /packages/{package_name}/{filename}` | [`routes::artifacts`] | artifact download |
//! | `GET /health` | [`routes::repository`] | health |
//! | `GET /metrics` | this module | Prometheus scrape (when enabled) |
//! | `GET /openapi.json` | [`openapi`] | OpenAPI document |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → CORS → Compression → SecurityHeaders → Handler
//! ```

pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::{Extensions, HeaderMap, StatusCode, Version};
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tower_http::compression::predicate::{DefaultPredicate, NotForContentType, Predicate};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{AppError, ErrorBody};
pub use state::{AppConfig, AppState};

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(routes::repository::router())
        .merge(routes::artifacts::router())
        .merge(openapi::router());

    if state.metrics.is_some() {
        router = router.route("/metrics", axum::routing::get(prometheus_metrics));
    }

    let router = router.fallback(endpoint_not_found);
    let mut router = middleware::security_headers::apply(router)
        .layer(CompressionLayer::new().compress_when(compression_predicate()))
        .layer(CorsLayer::permissive());

    if let Some(metrics) = &state.metrics {
        router = router
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(axum::Extension(metrics.clone()));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Which responses the compression layer may encode.
///
/// Binary artifacts are already packed, and partial responses must keep
/// their byte offsets and `Content-Length`.
fn compression_predicate() -> impl Predicate {
    DefaultPredicate::new()
        .and(NotForContentType::const_new("application/octet-stream"))
        .and(
            |status: StatusCode, _: Version, _: &HeaderMap, _: &Extensions| {
                status != StatusCode::PARTIAL_CONTENT
            },
        )
}

/// Fallback for unknown routes.
async fn endpoint_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("NOT_FOUND", "Endpoint not found")),
    )
        .into_response()
}

/// GET /metrics: Prometheus metrics scrape endpoint.
async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let Some(metrics) = &state.metrics else {
        return endpoint_not_found().await;
    };
    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}
