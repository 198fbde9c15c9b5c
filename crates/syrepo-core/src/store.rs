//! # Repository Store
//!
//! The sole abstraction over the repository's on-disk state. Every
//! filesystem access of the server goes through [`RepositoryStore`].
//!
//! ## Concurrency
//!
//! After [`initialize()`](RepositoryStore::initialize) the store only reads,
//! and holds no mutable in-memory state, so one instance can be shared
//! across request tasks. The directory tree may be edited by an external
//! publisher at any time; a missing or half-written manifest surfaces as
//! `NotFound` or `CorruptState`, never a panic.

use std::fs;
use std::io::{ErrorKind, Write};

use chrono::Utc;

use crate::artifact::{ArtifactRef, ResolvedArtifact};
use crate::config::RepositoryConfig;
use crate::error::StoreError;
use crate::manifest::RepositoryManifest;

/// What [`RepositoryStore::initialize`] found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// No manifest existed; a default one was written.
    Created,
    /// A manifest was already present and left untouched.
    AlreadyPresent,
}

/// Filesystem-backed repository state.
#[derive(Debug, Clone)]
pub struct RepositoryStore {
    config: RepositoryConfig,
}

impl RepositoryStore {
    /// Wrap a configuration. Performs no I/O; call
    /// [`initialize()`](Self::initialize) before serving requests.
    pub fn new(config: RepositoryConfig) -> Self {
        Self { config }
    }

    /// The configuration this store was built with.
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Ensure the repository directories and manifest exist.
    ///
    /// Creates `<repo_root>` and `<repo_root>/packages` (with parents) and,
    /// if no manifest exists, writes [`RepositoryManifest::empty`].
    /// An existing manifest is never rewritten, whether or not it parses,
    /// so repeated calls leave the file byte-identical.
    pub fn initialize(&self) -> Result<InitOutcome, StoreError> {
        let repo_root = self.config.repo_root();
        fs::create_dir_all(repo_root).map_err(|e| StoreError::io(repo_root, e))?;
        let artifact_root = self.config.artifact_root();
        fs::create_dir_all(&artifact_root).map_err(|e| StoreError::io(&artifact_root, e))?;

        let path = self.config.manifest_path();
        let manifest = RepositoryManifest::empty(&self.config, Utc::now());
        let text = manifest
            .to_pretty_json()
            .map_err(|e| StoreError::io(&path, e.into()))?;

        // create_new fails with AlreadyExists instead of clobbering a
        // manifest that appeared between startup checks.
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!(path = %path.display(), "repository manifest already present");
                return Ok(InitOutcome::AlreadyPresent);
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        let written = file
            .write_all(text.as_bytes())
            .and_then(|()| file.sync_all());
        drop(file);
        if let Err(e) = written {
            // Leave no truncated manifest behind.
            let _ = fs::remove_file(&path);
            return Err(StoreError::io(&path, e));
        }

        tracing::info!(
            repo_root = %repo_root.display(),
            "bootstrapped empty repository manifest"
        );
        Ok(InitOutcome::Created)
    }

    /// Read and parse the catalog manifest from disk.
    ///
    /// The file is read on every call; nothing is cached.
    pub fn read_catalog(&self) -> Result<RepositoryManifest, StoreError> {
        let path = self.config.manifest_path();
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound("repository manifest".to_string()));
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        RepositoryManifest::from_slice(&bytes).map_err(|source| StoreError::CorruptState {
            path,
            source,
        })
    }

    /// Validate an artifact request and locate the file.
    ///
    /// Inputs are validated before any filesystem access; see
    /// [`crate::artifact`] for the rules. A path that exists but is not a
    /// regular file is reported as `NotFound`.
    pub fn resolve_artifact(
        &self,
        package_name: &str,
        filename: &str,
    ) -> Result<ResolvedArtifact, StoreError> {
        let artifact = ArtifactRef::parse(package_name, filename)?;
        let path = artifact.path_in(&self.config.artifact_root());
        let not_found = || StoreError::NotFound(format!("artifact {artifact}"));

        let meta = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
            // The package segment names a plain file (ENOTDIR).
            Err(_) if !path.parent().is_some_and(|p| p.is_dir()) => return Err(not_found()),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        if !meta.is_file() {
            return Err(not_found());
        }

        tracing::debug!(artifact = %artifact, size = meta.len(), "resolved artifact");
        Ok(ResolvedArtifact {
            kind: artifact.content_kind(),
            size: meta.len(),
            path,
            artifact,
        })
    }
}
