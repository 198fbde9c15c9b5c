//! # Repository Configuration
//!
//! Filesystem locations and bootstrap metadata for a repository. Built
//! once at process start and moved into [`RepositoryStore`](crate::RepositoryStore);
//! the paths are never relocated afterwards.

use std::path::{Path, PathBuf};

/// File name of the catalog manifest inside the repository root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Directory holding the artifact tree inside the repository root.
pub const ARTIFACT_DIR: &str = "packages";

/// Location and default metadata of a package repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    repo_root: PathBuf,
    /// Repository name written into a bootstrapped manifest.
    pub name: String,
    /// Repository version written into a bootstrapped manifest.
    pub version: String,
    /// Public base URL clients use to reach this repository.
    pub base_url: String,
    /// Human-readable repository description.
    pub description: String,
    /// Optional maintainer contact.
    pub maintainer: Option<String>,
}

impl RepositoryConfig {
    /// Configuration for the official repository rooted at `repo_root`,
    /// advertised at `base_url`.
    pub fn new(repo_root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            repo_root: repo_root.into(),
            name: "SystemOS Official Repository".to_string(),
            version: "1.0.0".to_string(),
            base_url: base_url.into(),
            description: "Official SystemOS package repository".to_string(),
            maintainer: Some("SystemOS Development Team".to_string()),
        }
    }

    /// Root directory of the repository.
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Root of the artifact tree (`<repo_root>/packages`).
    pub fn artifact_root(&self) -> PathBuf {
        self.repo_root.join(ARTIFACT_DIR)
    }

    /// Path of the catalog manifest (`<repo_root>/manifest.json`).
    pub fn manifest_path(&self) -> PathBuf {
        self.repo_root.join(MANIFEST_FILE)
    }
}
