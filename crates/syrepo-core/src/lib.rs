//! # syrepo-core: Repository State for the SystemOS Package Repository
//!
//! Owns the persistent state of a package repository and the operations
//! that read it. The HTTP layer (`syrepo-api`) and the operator CLI
//! (`syrepo-cli`) are thin bindings over the types exported here.
//!
//! ## On-Disk Layout
//!
//! ```text
//! <repo_root>/
//!   manifest.json          catalog manifest
//!   packages/
//!     <package_name>/
//!       <filename>.syos    binary artifact
//!       <filename>.syfo    per-package manifest fragment
//! ```
//!
//! ## Components
//!
//! - [`RepositoryStore`]: the only code that touches the filesystem.
//!   Bootstraps empty repositories, reads the catalog, resolves artifacts.
//! - [`RepositoryService`]: request/response contracts over the store,
//!   independent of any transport.
//!
//! ## Crate Policy
//!
//! - No dependency on any HTTP framework.
//! - All artifact paths are built by [`ArtifactRef::path_in`]; untrusted
//!   path segments are validated into [`PathSegment`] before any I/O.
//! - No `.unwrap()` outside tests.

pub mod artifact;
pub mod config;
pub mod error;
pub mod manifest;
pub mod service;
pub mod store;

pub use artifact::{ArtifactRef, ContentKind, PathSegment, ResolvedArtifact, MAX_SEGMENT_LEN};
pub use config::RepositoryConfig;
pub use error::{ServiceError, StoreError};
pub use manifest::{RepositoryManifest, RepositoryMetadata};
pub use service::{HealthReport, RepositoryInfo, RepositoryService};
pub use store::{InitOutcome, RepositoryStore};
