//! # catalog: Print the Catalog
//!
//! Prints the catalog exactly as `GET /packages.json` would return it,
//! including the empty fallback when the manifest is missing.

use std::io::Write;
use std::path::Path;

use clap::Args;

use crate::{open_service, DEFAULT_BASE_URL};

/// Arguments for `syrepo catalog`.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Base URL shown when the manifest is missing and a default catalog
    /// is printed.
    #[arg(long, env = "SYREPO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Print only the number of packages.
    #[arg(long)]
    pub count: bool,
}

/// Run `syrepo catalog`.
pub fn run_catalog(
    args: &CatalogArgs,
    repo_root: &Path,
    out: &mut impl Write,
) -> anyhow::Result<u8> {
    let manifest = open_service(repo_root, &args.base_url).get_catalog()?;
    if args.count {
        writeln!(out, "{}", manifest.packages.len())?;
    } else {
        writeln!(out, "{}", manifest.to_pretty_json()?)?;
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(count: bool) -> CatalogArgs {
        CatalogArgs {
            base_url: DEFAULT_BASE_URL.to_string(),
            count,
        }
    }

    #[test]
    fn prints_missing_catalog_as_default() {
        let tmp = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        run_catalog(&args(false), tmp.path(), &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["packages"], serde_json::json!([]));
        assert_eq!(json["repository"]["url"], DEFAULT_BASE_URL);
    }

    #[test]
    fn missing_catalog_uses_configured_base_url() {
        let tmp = tempfile::tempdir().unwrap();
        let args = CatalogArgs {
            base_url: "https://packages.example.org".to_string(),
            count: false,
        };
        let mut out = Vec::new();
        run_catalog(&args, tmp.path(), &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["repository"]["url"], "https://packages.example.org");
    }

    #[test]
    fn counts_packages() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("manifest.json"),
            r#"{"repository": {"name": "r", "version": "1", "url": "u", "description": "d"},
                "packages": [{"name": "a"}, {"name": "b"}],
                "lastUpdated": "2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        let mut out = Vec::new();
        run_catalog(&args(true), tmp.path(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2\n");
    }

    #[test]
    fn corrupt_catalog_fails() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("manifest.json"), "nope").unwrap();
        let mut out = Vec::new();
        assert!(run_catalog(&args(false), tmp.path(), &mut out).is_err());
    }
}
