//! Configuration loading and management
//!
//! Configuration is read from YAML, then selectively overridden from the
//! environment. Every field has a default, so an empty document is a valid
//! configuration.
//!
//! ```yaml
//! server:
//!   bind: "0.0.0.0:5000"
//! auth:
//!   header: "x-aws-secret"
//!   secret: "change-me"
//!   debug: false
//! random:
//!   collection: "riyadussalihin"
//! storage:
//!   dataset: "data/catalog.json"
//! ```

use axum::http::HeaderName;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_SECRET_HEADER: &str = "x-aws-secret";
pub const DEFAULT_RANDOM_COLLECTION: &str = "riyadussalihin";

pub const ENV_BIND: &str = "HADITH_API_BIND";
pub const ENV_SECRET: &str = "HADITH_API_SECRET";
pub const ENV_SECRET_HEADER: &str = "HADITH_API_SECRET_HEADER";
pub const ENV_DEBUG: &str = "HADITH_API_DEBUG";
pub const ENV_RANDOM_COLLECTION: &str = "HADITH_API_RANDOM_COLLECTION";
pub const ENV_DATASET: &str = "HADITH_API_DATASET";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("'{0}' is not a valid HTTP header name")]
    InvalidHeader(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Shared-secret gate settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Request header carrying the secret
    pub header: String,

    /// Expected secret. With no secret and debug off every gated request is rejected.
    pub secret: Option<String>,

    /// Disable the gate entirely
    pub debug: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header: DEFAULT_SECRET_HEADER.to_string(),
            secret: None,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    /// Collection the random endpoint draws from
    pub collection: String,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_RANDOM_COLLECTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON dataset loaded into the in-memory catalog
    pub dataset: Option<PathBuf>,

    /// MySQL connection URL, used when built with the `mysql` feature
    pub database_url: Option<String>,
}

/// Complete configuration of the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub random: RandomConfig,
    pub storage: StorageConfig,
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

impl ApiConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply overrides from environment-style key/value pairs
    ///
    /// Unknown keys are ignored. Pass `std::env::vars()` in production.
    pub fn with_env_overrides<I, K, V>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let key = key.as_ref();
            match key {
                ENV_BIND => self.server.bind = value.into(),
                ENV_SECRET => self.auth.secret = Some(value.into()),
                ENV_SECRET_HEADER => self.auth.header = value.into(),
                ENV_DEBUG => self.auth.debug = parse_flag(key, &value.into())?,
                ENV_RANDOM_COLLECTION => self.random.collection = value.into(),
                ENV_DATASET => self.storage.dataset = Some(PathBuf::from(value.into())),
                ENV_DATABASE_URL => self.storage.database_url = Some(value.into()),
                _ => {}
            }
        }
        Ok(self)
    }

    /// Check the configuration for values the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::Empty("server.bind"));
        }
        if self.random.collection.trim().is_empty() {
            return Err(ConfigError::Empty("random.collection"));
        }
        self.secret_header()?;
        Ok(())
    }

    /// Settings that are valid but probably not what the operator wants
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if !self.auth.debug && self.auth.secret.is_none() {
            warnings.push("no shared secret configured, every gated request will be rejected");
        }
        warnings
    }

    /// Parsed name of the shared-secret header
    pub fn secret_header(&self) -> Result<HeaderName, ConfigError> {
        HeaderName::from_bytes(self.auth.header.as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(self.auth.header.clone()))
    }
}
