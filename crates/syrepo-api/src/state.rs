//! # Application State
//!
//! Process configuration and the shared state handed to every handler.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use syrepo_core::{InitOutcome, RepositoryConfig, RepositoryService, RepositoryStore, StoreError};

use crate::middleware::metrics::ApiMetrics;

/// Server configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address to bind.
    pub host: IpAddr,
    /// Port to bind.
    pub port: u16,
    /// Repository root directory.
    pub repo_root: PathBuf,
    /// Public base URL. Defaults to `http://localhost:{port}`.
    pub base_url: Option<String>,
    /// Whether to record and expose Prometheus metrics.
    pub metrics_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            repo_root: PathBuf::from("repository"),
            base_url: None,
            metrics_enabled: true,
        }
    }
}

impl AppConfig {
    /// The socket address to listen on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The base URL advertised in the catalog.
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    /// Repository configuration derived from this server configuration.
    pub fn repository_config(&self) -> RepositoryConfig {
        RepositoryConfig::new(self.repo_root.clone(), self.base_url())
    }
}

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Repository operations.
    pub service: Arc<RepositoryService>,
    /// Request metrics, when enabled.
    pub metrics: Option<ApiMetrics>,
    /// The configuration the server was started with.
    pub config: AppConfig,
}

impl AppState {
    /// Bootstrap the repository on disk and build the state.
    ///
    /// Must complete before the listener accepts connections.
    pub fn bootstrap(config: AppConfig) -> Result<(Self, InitOutcome), StoreError> {
        let store = RepositoryStore::new(config.repository_config());
        let outcome = store.initialize()?;
        let metrics = config.metrics_enabled.then(ApiMetrics::new);
        let state = Self {
            service: Arc::new(RepositoryService::new(store)),
            metrics,
            config,
        };
        Ok((state, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_url_follows_port() {
        let cfg = AppConfig {
            port: 8081,
            ..AppConfig::default()
        };
        assert_eq!(cfg.base_url(), "http://localhost:8081");
        assert_eq!(cfg.repository_config().base_url, "http://localhost:8081");
    }

    #[test]
    fn explicit_base_url_wins() {
        let cfg = AppConfig {
            base_url: Some("https://repo.example.org".into()),
            ..AppConfig::default()
        };
        assert_eq!(cfg.base_url(), "https://repo.example.org");
    }

    #[test]
    fn bootstrap_initializes_repository() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = AppConfig {
            repo_root: tmp.path().join("repository"),
            metrics_enabled: false,
            ..AppConfig::default()
        };
        let (state, outcome) = AppState::bootstrap(cfg).unwrap();
        assert_eq!(outcome, InitOutcome::Created);
        assert!(state.metrics.is_none());
        assert!(tmp.path().join("repository/manifest.json").is_file());
    }
}
