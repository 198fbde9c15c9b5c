//! # syrepo-cli: Repository Operator CLI
//!
//! Offline operations on a repository directory, sharing the exact code
//! paths the server uses.
//!
//! ## Subcommands
//!
//! - `init`: bootstrap directories and the default manifest
//! - `catalog`: print the catalog as the server would serve it
//! - `resolve`: validate and locate an artifact
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers take parsed args and a
//!   writer so they can be tested without a process.
//! - Handlers delegate to `syrepo-core` and hold no repository logic.

pub mod catalog;
pub mod init;
pub mod resolve;

use std::path::Path;

use syrepo_core::{RepositoryConfig, RepositoryService, RepositoryStore};

/// Base URL used when the caller does not supply one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Build a service over the repository at `repo_root` without touching disk.
pub fn open_service(repo_root: &Path, base_url: &str) -> RepositoryService {
    RepositoryService::new(RepositoryStore::new(RepositoryConfig::new(
        repo_root, base_url,
    )))
}
