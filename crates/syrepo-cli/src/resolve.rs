//! # resolve: Locate an Artifact
//!
//! Applies the same validation and lookup as
//! `GET /packages/{package_name}/{filename}` and prints where the file is.

use std::io::Write;
use std::path::Path;

use clap::Args;

use crate::{open_service, DEFAULT_BASE_URL};

/// Arguments for `syrepo resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Package directory name.
    pub package_name: String,
    /// Artifact file name.
    pub filename: String,
}

/// Run `syrepo resolve`.
pub fn run_resolve(
    args: &ResolveArgs,
    repo_root: &Path,
    out: &mut impl Write,
) -> anyhow::Result<u8> {
    let resolved = open_service(repo_root, DEFAULT_BASE_URL)
        .get_artifact(&args.package_name, &args.filename)?;
    writeln!(out, "path: {}", resolved.path.display())?;
    writeln!(out, "kind: {}", resolved.kind)?;
    writeln!(out, "content-type: {}", resolved.kind.content_type())?;
    writeln!(out, "size: {}", resolved.size)?;
    Ok(0)
}
