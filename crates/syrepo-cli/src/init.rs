//! # init: Bootstrap a Repository
//!
//! Creates the repository root, the `packages/` tree and a default
//! manifest. Safe to run against an existing repository.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use clap::Args;
use syrepo_core::{InitOutcome, RepositoryConfig, RepositoryStore};

use crate::DEFAULT_BASE_URL;

/// Arguments for `syrepo init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Base URL written into a newly created manifest.
    #[arg(long, env = "SYREPO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

/// Run `syrepo init`.
pub fn run_init(args: &InitArgs, repo_root: &Path, out: &mut impl Write) -> anyhow::Result<u8> {
    let store = RepositoryStore::new(RepositoryConfig::new(repo_root, args.base_url.as_str()));
    let outcome = store
        .initialize()
        .with_context(|| format!("failed to initialize {}", repo_root.display()))?;

    match outcome {
        InitOutcome::Created => writeln!(out, "initialized repository at {}", repo_root.display())?,
        InitOutcome::AlreadyPresent => writeln!(
            out,
            "repository at {} already initialized; manifest left unchanged",
            repo_root.display()
        )?,
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_then_reinit() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("repo");
        let args = InitArgs {
            base_url: "https://packages.example.org".into(),
        };

        let mut out = Vec::new();
        assert_eq!(run_init(&args, &root, &mut out).unwrap(), 0);
        assert!(String::from_utf8(out).unwrap().starts_with("initialized"));
        let text = std::fs::read_to_string(root.join("manifest.json")).unwrap();
        assert!(text.contains("https://packages.example.org"));

        let mut out = Vec::new();
        run_init(&args, &root, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("already initialized"));
    }
}
