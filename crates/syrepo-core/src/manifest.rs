//! # Catalog Manifest
//!
//! The JSON document at `<repo_root>/manifest.json`:
//!
//! ```json
//! {
//!   "repository": { "name": "...", "version": "...", "url": "...", "description": "..." },
//!   "packages": [ ... ],
//!   "lastUpdated": "2026-01-01T00:00:00.000Z"
//! }
//! ```
//!
//! Package entries are opaque to the server and round-trip verbatim, in
//! stored order.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::RepositoryConfig;

/// Descriptive metadata of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RepositoryMetadata {
    /// Display name.
    pub name: String,
    /// Repository format/content version.
    pub version: String,
    /// Base URL clients download from.
    pub url: String,
    /// Human-readable description.
    pub description: String,
    /// Maintainer contact, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<String>,
}

/// The catalog root: repository metadata plus the ordered package list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RepositoryManifest {
    /// Repository metadata.
    pub repository: RepositoryMetadata,
    /// Package entries, in stored order.
    #[schema(value_type = Vec<Object>)]
    pub packages: Vec<serde_json::Value>,
    /// When the manifest was last written.
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

impl RepositoryManifest {
    /// The manifest of an empty repository, stamped with `now`.
    ///
    /// Used both to bootstrap a new repository and to synthesize a catalog
    /// when the manifest is missing, so the two are structurally identical.
    pub fn empty(config: &RepositoryConfig, now: DateTime<Utc>) -> Self {
        Self {
            repository: RepositoryMetadata {
                name: config.name.clone(),
                version: config.version.clone(),
                url: config.base_url.clone(),
                description: config.description.clone(),
                maintainer: config.maintainer.clone(),
            },
            packages: Vec::new(),
            last_updated: now.trunc_subsecs(3),
        }
    }

    /// Parse a manifest from raw file contents.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Render the manifest as it is stored on disk (two-space indented JSON).
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
