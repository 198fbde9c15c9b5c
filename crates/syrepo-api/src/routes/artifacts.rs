//! # Artifact Download Routes
//!
//! Routes:
//! - GET /packages/{package_name}/{filename}: Download an artifact file
//!
//! Both path segments are validated by the store before any file is
//! opened. The bytes are streamed by `tower_http::services::ServeFile`,
//! which supplies `Content-Length`, `Last-Modified`, byte ranges and
//! conditional requests. Content headers come from the resolved
//! [`ContentKind`](syrepo_core::ContentKind):
//!
//! | Kind | Content-Type | Content-Disposition |
//! |------|--------------|---------------------|
//! | binary artifact (`.syos`) | `application/octet-stream` | `attachment; filename="…"` |
//! | manifest fragment (`.syfo`) | `application/json` | none |
//! | unknown | `application/octet-stream` | none |

use axum::body::Body;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Request, State};
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use syrepo_core::ResolvedArtifact;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::{AppError, ErrorBody};
use crate::routes::run_blocking;
use crate::state::AppState;

/// Build the artifact router.
pub fn router() -> Router<AppState> {
    Router::new().route("/packages/{package_name}/{filename}", get(download_artifact))
}

/// GET /packages/{package_name}/{filename}: Download an artifact.
#[utoipa::path(
    get,
    path = "/packages/{package_name}/{filename}",
    params(
        ("package_name" = String, Path, description = "Package directory name"),
        ("filename" = String, Path, description = "Artifact file name"),
    ),
    responses(
        (status = 200, description = "Artifact bytes"),
        (status = 206, description = "Requested byte range of the artifact"),
        (status = 304, description = "Artifact unchanged since If-Modified-Since"),
        (status = 400, description = "Unsafe or malformed path segment", body = ErrorBody),
        (status = 404, description = "Artifact does not exist", body = ErrorBody),
        (status = 416, description = "Requested range not satisfiable"),
        (status = 500, description = "Artifact could not be read", body = ErrorBody),
    ),
    tag = "artifacts"
)]
pub async fn download_artifact(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    request: Request,
) -> Result<Response, AppError> {
    let Path((package_name, filename)) =
        path.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
    let service = state.service.clone();
    let resolved = run_blocking(move || service.get_artifact(&package_name, &filename)).await?;

    let mut response = ServeFile::new(&resolved.path)
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {})
        .map(Body::new);
    match response.status() {
        // Removed by a publisher between resolution and open.
        StatusCode::NOT_FOUND => {
            return Err(AppError::NotFound(format!("artifact {}", resolved.artifact)));
        }
        StatusCode::INTERNAL_SERVER_ERROR => {
            return Err(AppError::Internal(format!(
                "failed to read artifact {}",
                resolved.artifact
            )));
        }
        _ => {}
    }

    if response.status().is_success() {
        if let Some(metrics) = &state.metrics {
            metrics.record_download(resolved.kind.as_str());
        }
        tracing::info!(
            artifact = %resolved.artifact,
            kind = %resolved.kind,
            status = response.status().as_u16(),
            size = resolved.size,
            "serving artifact"
        );
    }

    response.headers_mut().extend(artifact_headers(&resolved)?);
    Ok(response)
}

fn artifact_headers(resolved: &ResolvedArtifact) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(resolved.kind.content_type()),
    );
    if resolved.kind.is_attachment() {
        // The filename passed the segment allow-list, so it needs no quoting.
        let disposition = format!("attachment; filename=\"{}\"", resolved.artifact.filename);
        let value = HeaderValue::from_str(&disposition)
            .map_err(|e| AppError::Internal(format!("invalid Content-Disposition: {e}")))?;
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(headers)
}
