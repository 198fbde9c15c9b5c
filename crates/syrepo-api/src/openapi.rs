//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the repository API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SystemOS Package Repository API",
        version = "1.0.0",
        description = "Serves the SystemOS package catalog and package artifact files.\n\nThe catalog at `/packages.json` lists installable packages; artifacts are downloaded from `/packages/{package_name}/{filename}`. No authentication.",
        license(name = "AGPL-3.0-or-later")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server"),
    ),
    paths(
        crate::routes::repository::get_info,
        crate::routes::repository::get_catalog,
        crate::routes::repository::get_health,
        crate::routes::artifacts::download_artifact,
    ),
    components(schemas(
        syrepo_core::RepositoryInfo,
        syrepo_core::RepositoryManifest,
        syrepo_core::RepositoryMetadata,
        syrepo_core::HealthReport,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "repository", description = "Repository info and package catalog"),
        (name = "artifacts", description = "Package artifact downloads"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_all_paths() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = spec["paths"].as_object().unwrap();
        for p in ["/", "/packages.json", "/health", "/packages/{package_name}/{filename}"] {
            assert!(paths.contains_key(p), "missing path {p}");
        }
    }

    #[test]
    fn spec_includes_manifest_schema() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schema = &spec["components"]["schemas"]["RepositoryManifest"];
        assert!(schema["properties"].get("lastUpdated").is_some());
        assert!(schema["properties"].get("packages").is_some());
    }
}
