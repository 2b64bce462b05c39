//! Server host holding the shared application state
//!
//! The host is built once at startup and shared by every handler behind an
//! `Arc`. Nothing in it is mutated after construction.

use crate::config::{ApiConfig, ConfigError};
use crate::core::auth::SharedSecretGate;
use crate::core::resolver::Resolver;
use crate::core::store::CatalogStore;
use std::sync::Arc;

/// Host context containing all server state
///
/// # Example
///
/// ```rust,ignore
/// let host = ServerHost::new(Arc::new(InMemoryCatalog::default()), ApiConfig::default())?;
/// let app = build_routes(Arc::new(host));
/// ```
pub struct ServerHost {
    /// Validated configuration
    pub config: Arc<ApiConfig>,

    /// Endpoint-level resolution over the catalog store
    pub resolver: Arc<Resolver>,

    /// Shared-secret gate applied to every route except `/`
    pub gate: Arc<SharedSecretGate>,
}

impl ServerHost {
    /// Build the host from a store and a configuration
    ///
    /// Fails if the configuration does not validate.
    pub fn new(store: Arc<dyn CatalogStore>, config: ApiConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        for warning in config.warnings() {
            tracing::warn!("{}", warning);
        }

        let gate = SharedSecretGate::from_config(&config.auth)?;
        let resolver = Resolver::new(store, config.random.collection.clone());

        Ok(Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            gate: Arc::new(gate),
        })
    }

    /// Backend name of the underlying store
    pub fn backend_name(&self) -> &'static str {
        self.resolver.store().backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryCatalog;

    #[test]
    fn test_new_wires_config_into_resolver_and_gate() {
        let mut config = ApiConfig::default();
        config.random.collection = "bukhari".to_string();
        config.auth.debug = true;

        let host = ServerHost::new(Arc::new(InMemoryCatalog::default()), config).unwrap();
        assert_eq!(host.resolver.random_collection(), "bukhari");
        assert!(host.gate.is_debug());
        assert_eq!(host.backend_name(), "in-memory");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ApiConfig::default();
        config.auth.header = "bad header".to_string();

        let result = ServerHost::new(Arc::new(InMemoryCatalog::default()), config);
        assert!(matches!(result, Err(ConfigError::InvalidHeader(_))));
    }
}
