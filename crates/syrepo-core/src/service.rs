//! # Repository Service
//!
//! Request/response contracts over [`RepositoryStore`], independent of any
//! transport. Each operation is a plain synchronous call returning either a
//! payload or a [`ServiceError`]; the HTTP layer only renders the result.
//!
//! | Operation | Result | Errors |
//! |-----------|--------|--------|
//! | [`get_info`](RepositoryService::get_info) | [`RepositoryInfo`] | none |
//! | [`get_catalog`](RepositoryService::get_catalog) | [`RepositoryManifest`] | `Internal` |
//! | [`get_artifact`](RepositoryService::get_artifact) | [`ResolvedArtifact`] | `InvalidRequest`, `NotFound`, `Internal` |
//! | [`get_health`](RepositoryService::get_health) | [`HealthReport`] | none |

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::artifact::ResolvedArtifact;
use crate::error::{ServiceError, StoreError};
use crate::manifest::RepositoryManifest;
use crate::store::RepositoryStore;

/// Static description of the server, returned by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RepositoryInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
    /// Human-readable description.
    pub description: String,
    /// Endpoint name → route template.
    pub endpoints: BTreeMap<String, String>,
}

/// Liveness report, returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthReport {
    /// Always `"healthy"` while the process can answer.
    pub status: String,
    /// Time the report was produced.
    pub timestamp: DateTime<Utc>,
    /// Seconds since the service started.
    pub uptime: f64,
}

/// Transport-agnostic repository operations.
#[derive(Debug)]
pub struct RepositoryService {
    store: RepositoryStore,
    started_at: Instant,
}

impl RepositoryService {
    /// Wrap a store. Uptime is measured from this call.
    pub fn new(store: RepositoryStore) -> Self {
        Self {
            store,
            started_at: Instant::now(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &RepositoryStore {
        &self.store
    }

    /// Describe the server and its endpoints.
    pub fn get_info(&self) -> RepositoryInfo {
        let endpoints = [
            ("packages", "/packages.json"),
            ("download", "/packages/:packageName/:filename"),
            ("health", "/health"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        RepositoryInfo {
            name: "SystemOS Package Repository".to_string(),
            version: "1.0.0".to_string(),
            description: "SystemOS package repository server".to_string(),
            endpoints,
        }
    }

    /// The current catalog, read fresh from disk.
    ///
    /// A missing manifest yields the same empty catalog `initialize` would
    /// have written, stamped with the current time.
    pub fn get_catalog(&self) -> Result<RepositoryManifest, ServiceError> {
        match self.store.read_catalog() {
            Ok(manifest) => Ok(manifest),
            Err(StoreError::NotFound(_)) => {
                tracing::warn!(
                    repo_root = %self.store.config().repo_root().display(),
                    "repository manifest missing; serving empty catalog"
                );
                Ok(RepositoryManifest::empty(self.store.config(), Utc::now()))
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to read repository catalog");
                Err(e.into())
            }
        }
    }

    /// Resolve a downloadable artifact.
    ///
    /// `InvalidRequest` and `NotFound` reach the caller unchanged.
    pub fn get_artifact(
        &self,
        package_name: &str,
        filename: &str,
    ) -> Result<ResolvedArtifact, ServiceError> {
        self.store
            .resolve_artifact(package_name, filename)
            .map_err(|e| {
                match &e {
                    StoreError::InvalidRequest(_) => {
                        tracing::warn!(error = %e, "rejected artifact request")
                    }
                    StoreError::NotFound(_) => tracing::debug!(error = %e, "artifact not found"),
                    _ => tracing::error!(error = %e, "failed to resolve artifact"),
                }
                ServiceError::from(e)
            })
    }

    /// Report liveness and uptime.
    pub fn get_health(&self) -> HealthReport {
        HealthReport {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            uptime: self.started_at.elapsed().as_secs_f64(),
        }
    }
}
