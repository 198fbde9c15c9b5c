//! # API Route Modules
//!
//! - `repository`: repository info, catalog listing, health.
//! - `artifacts`: artifact download.
//!
//! Handlers hold no logic of their own: they call one
//! [`RepositoryService`](syrepo_core::RepositoryService) operation and
//! render the result.

pub mod artifacts;
pub mod repository;

use syrepo_core::ServiceError;

use crate::error::AppError;

/// Run a blocking service call off the async runtime.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {e}")))?
        .map_err(AppError::from)
}
