//! # syrepo CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers in
//! the library crate.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use syrepo_cli::catalog::{run_catalog, CatalogArgs};
use syrepo_cli::init::{run_init, InitArgs};
use syrepo_cli::resolve::{run_resolve, ResolveArgs};

/// SystemOS package repository tool.
///
/// Bootstraps a repository directory, prints its catalog, and checks where
/// an artifact would be served from.
#[derive(Parser, Debug)]
#[command(name = "syrepo", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Repository root directory (holds manifest.json and packages/).
    #[arg(long, env = "SYREPO_ROOT", default_value = "repository", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the repository layout and a default manifest.
    Init(InitArgs),

    /// Print the package catalog.
    Catalog(CatalogArgs),

    /// Validate an artifact path and show where it resolves.
    Resolve(ResolveArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(repo_root = %cli.root.display(), "using repository root");

    let mut stdout = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::Init(args) => run_init(args, &cli.root, &mut stdout),
        Commands::Catalog(args) => run_catalog(args, &cli.root, &mut stdout),
        Commands::Resolve(args) => run_resolve(args, &cli.root, &mut stdout),
    };

    ExitCode::from(exit_status(result))
}

/// Map a handler result to the process exit code. Errors are reported
/// once, through tracing, on stderr.
fn exit_status(result: anyhow::Result<u8>) -> u8 {
    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_init_with_base_url() {
        let cli = Cli::try_parse_from([
            "syrepo",
            "--root",
            "/srv/repo",
            "init",
            "--base-url",
            "https://packages.example.org",
        ])
        .unwrap();
        assert_eq!(cli.root, PathBuf::from("/srv/repo"));
        if let Commands::Init(args) = cli.command {
            assert_eq!(args.base_url, "https://packages.example.org");
        } else {
            panic!("expected init");
        }
    }

    #[test]
    fn cli_parse_init_default_base_url() {
        let cli = Cli::try_parse_from(["syrepo", "init"]).unwrap();
        if let Commands::Init(args) = cli.command {
            assert_eq!(args.base_url, syrepo_cli::DEFAULT_BASE_URL);
        } else {
            panic!("expected init");
        }
    }

    #[test]
    fn cli_parse_global_root_after_subcommand() {
        let cli = Cli::try_parse_from(["syrepo", "catalog", "--root", "r", "--count"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("r"));
        assert!(matches!(
            cli.command,
            Commands::Catalog(CatalogArgs { count: true, .. })
        ));
    }

    #[test]
    fn cli_parse_catalog_base_url() {
        let cli = Cli::try_parse_from([
            "syrepo",
            "catalog",
            "--base-url",
            "https://packages.example.org",
        ])
        .unwrap();
        if let Commands::Catalog(args) = cli.command {
            assert_eq!(args.base_url, "https://packages.example.org");
            assert!(!args.count);
        } else {
            panic!("expected catalog");
        }
    }

    #[test]
    fn cli_parse_resolve() {
        let cli = Cli::try_parse_from(["syrepo", "-vv", "resolve", "pkg-a", "tool.syos"]).unwrap();
        assert_eq!(cli.verbose, 2);
        if let Commands::Resolve(args) = cli.command {
            assert_eq!(args.package_name, "pkg-a");
            assert_eq!(args.filename, "tool.syos");
        } else {
            panic!("expected resolve");
        }
    }

    #[test]
    fn exit_status_maps_results() {
        assert_eq!(exit_status(Ok(0)), 0);
        assert_eq!(exit_status(Ok(3)), 3);
        assert_eq!(
            exit_status(Err(anyhow::anyhow!("not found: artifact pkg-a/x.syos"))),
            1
        );
    }

    #[test]
    fn cli_parse_resolve_requires_both_segments() {
        assert!(Cli::try_parse_from(["syrepo", "resolve", "pkg-a"]).is_err());
    }
}
