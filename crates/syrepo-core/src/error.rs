//! # Error Types
//!
//! Two layers, both `thiserror`-derived:
//!
//! - [`StoreError`]: raised by the store with the specific failure kind.
//! - [`ServiceError`]: the external contract of the service. Client-facing
//!   kinds pass through unchanged; everything else collapses into `Internal`.
//!
//! Messages of `InvalidRequest` and `NotFound` are shown to clients and
//! never contain filesystem paths. `CorruptState` and `Io` carry the path
//! for operator logs only.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a [`RepositoryStore`](crate::RepositoryStore) operation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Malformed or unsafe input. The caller's fault; not retried.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Referenced entity is absent. May appear later.
    #[error("not found: {0}")]
    NotFound(String),

    /// The manifest exists but does not parse as the catalog schema.
    /// Must be repaired out-of-band.
    #[error("corrupt repository state at {path}: {source}")]
    CorruptState {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem error. Safe to retry.
    #[error("I/O failure at {path}: {source}")]
    Io {
        /// Path the operation was acting on.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure of a [`RepositoryService`](crate::RepositoryService) operation.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed or unsafe input.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Referenced entity is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other failure. The message is for logs, not for clients.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidRequest(msg) => Self::InvalidRequest(msg),
            StoreError::NotFound(msg) => Self::NotFound(msg),
            other @ (StoreError::CorruptState { .. } | StoreError::Io { .. }) => {
                Self::Internal(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_kinds_pass_through() {
        let err = ServiceError::from(StoreError::InvalidRequest("bad segment".into()));
        assert!(matches!(err, ServiceError::InvalidRequest(ref m) if m == "bad segment"));

        let err = ServiceError::from(StoreError::NotFound("artifact a/b".into()));
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "artifact a/b"));
    }

    #[test]
    fn io_becomes_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ServiceError::from(StoreError::io("/srv/repo/manifest.json", io));
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn corrupt_state_becomes_internal() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ServiceError::from(StoreError::CorruptState {
            path: PathBuf::from("manifest.json"),
            source: parse,
        });
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ServiceError::InvalidRequest(String::new()).code(), "INVALID_REQUEST");
        assert_eq!(ServiceError::NotFound(String::new()).code(), "NOT_FOUND");
        assert_eq!(ServiceError::Internal(String::new()).code(), "INTERNAL_ERROR");
    }
}
