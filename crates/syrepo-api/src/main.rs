//! # syrepo-server Entry Point
//!
//! Parses configuration, initializes tracing, bootstraps the repository on
//! disk, then serves the API until Ctrl-C or SIGTERM.

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use syrepo_core::InitOutcome;
use tracing_subscriber::EnvFilter;

use syrepo_api::{AppConfig, AppState};

/// SystemOS package repository server.
///
/// Serves the package catalog at `/packages.json` and artifact files under
/// `/packages/{package_name}/{filename}`.
#[derive(Parser, Debug)]
#[command(name = "syrepo-server", version, about)]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "SYREPO_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Repository root directory (holds manifest.json and packages/).
    #[arg(long, env = "SYREPO_ROOT", default_value = "repository")]
    repo_root: PathBuf,

    /// Public base URL advertised in a bootstrapped catalog.
    /// Defaults to http://localhost:{port}.
    #[arg(long, env = "SYREPO_BASE_URL")]
    base_url: Option<String>,

    /// Log output format.
    #[arg(long, env = "SYREPO_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Record request metrics and serve them at /metrics.
    #[arg(
        long,
        env = "SYREPO_METRICS",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    metrics: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl Cli {
    fn into_config(self) -> AppConfig {
        AppConfig {
            host: self.host,
            port: self.port,
            repo_root: self.repo_root,
            base_url: self.base_url,
            metrics_enabled: self.metrics,
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);
    let config = cli.into_config();

    let (state, outcome) = AppState::bootstrap(config.clone()).with_context(|| {
        format!(
            "failed to initialize repository at {}",
            config.repo_root.display()
        )
    })?;
    if outcome == InitOutcome::Created {
        tracing::info!("created new empty repository");
    }

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let base_url = config.base_url();
    tracing::info!(%addr, "SystemOS repository server listening");
    tracing::info!(repo_root = %config.repo_root.display(), "repository path");
    tracing::info!("packages list: {base_url}/packages.json");
    tracing::info!("health check: {base_url}/health");

    axum::serve(listener, syrepo_api::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
