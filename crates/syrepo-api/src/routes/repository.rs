//! # Repository Routes
//!
//! Routes:
//! - `GET /`: repository info and endpoint list
//! - `GET /packages.json`: catalog manifest
//! - `GET /health`: liveness and uptime

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use syrepo_core::{HealthReport, RepositoryInfo, RepositoryManifest};

use crate::error::{AppError, ErrorBody};
use crate::routes::run_blocking;
use crate::state::AppState;

/// Build the repository router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_info))
        .route("/packages.json", get(get_catalog))
        .route("/health", get(get_health))
}

/// GET /: Describe the repository server.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Repository server info", body = RepositoryInfo),
    ),
    tag = "repository"
)]
pub async fn get_info(State(state): State<AppState>) -> Json<RepositoryInfo> {
    Json(state.service.get_info())
}

/// GET /packages.json: The package catalog.
///
/// Read from disk on every request. A missing manifest yields the empty
/// bootstrap catalog.
#[utoipa::path(
    get,
    path = "/packages.json",
    responses(
        (status = 200, description = "Catalog manifest", body = RepositoryManifest),
        (status = 500, description = "Manifest unreadable or malformed", body = ErrorBody),
    ),
    tag = "repository"
)]
pub async fn get_catalog(
    State(state): State<AppState>,
) -> Result<Json<RepositoryManifest>, AppError> {
    let service = state.service.clone();
    let manifest = run_blocking(move || service.get_catalog()).await?;
    Ok(Json(manifest))
}

/// GET /health: Liveness probe with uptime.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is healthy", body = HealthReport),
    ),
    tag = "health"
)]
pub async fn get_health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.service.get_health())
}
