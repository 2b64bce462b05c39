//! ServerBuilder for fluent API to build HTTP servers

use super::host::ServerHost;
use super::router::build_router;
use crate::config::ApiConfig;
use crate::core::store::CatalogStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder wiring a catalog store and a configuration into a router
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryCatalog::from_json_file("catalog.json")?)
///     .with_config(ApiConfig::from_yaml_file("config.yaml")?)
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn CatalogStore>>,
    config: ApiConfig,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            store: None,
            config: ApiConfig::default(),
        }
    }

    /// Set the catalog store (required)
    pub fn with_store(self, store: impl CatalogStore + 'static) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    /// Set an already shared catalog store
    pub fn with_shared_store(mut self, store: Arc<dyn CatalogStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the host holding the shared state
    pub fn build_host(&self) -> Result<ServerHost> {
        let store = self
            .store
            .clone()
            .ok_or_else(|| anyhow::anyhow!("CatalogStore is required. Call .with_store()"))?;

        let host = ServerHost::new(store, self.config.clone())?;
        tracing::debug!(backend = host.backend_name(), "built server host");
        Ok(host)
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        let host = Arc::new(self.build_host()?);
        Ok(build_router(host))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `server.bind` from the configuration and stops on SIGTERM or
    /// Ctrl+C once in-flight requests complete.
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind.clone();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryCatalog;

    #[test]
    fn test_new_creates_empty_builder() {
        let builder = ServerBuilder::new();
        assert!(builder.store.is_none());
        assert_eq!(builder.config, ApiConfig::default());
    }

    #[test]
    fn test_build_host_without_store_fails() {
        let result = ServerBuilder::new().build_host();
        let err_msg = format!("{}", result.err().expect("should be Err"));
        assert!(
            err_msg.contains("CatalogStore is required"),
            "error should mention the store: {}",
            err_msg
        );
    }

    #[test]
    fn test_build_host_uses_config() {
        let mut config = ApiConfig::default();
        config.random.collection = "muslim".to_string();

        let host = ServerBuilder::new()
            .with_store(InMemoryCatalog::default())
            .with_config(config)
            .build_host()
            .expect("build_host should succeed");
        assert_eq!(host.resolver.random_collection(), "muslim");
    }

    #[test]
    fn test_invalid_config_fails_build() {
        let mut config = ApiConfig::default();
        config.auth.header = "not a header".to_string();

        let result = ServerBuilder::new()
            .with_store(InMemoryCatalog::default())
            .with_config(config)
            .build();
        assert!(result.is_err());
    }
}
