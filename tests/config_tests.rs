//! Tests for configuration loading
//!
//! These tests verify that:
//! - YAML files load with defaults for every missing field
//! - Environment overrides take precedence over the file
//! - A loaded configuration drives the server as expected

use axum_test::TestServer;
use hadith_api::config::{ApiConfig, ConfigError};
use hadith_api::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(yaml.as_bytes()).expect("write config");
    file
}

#[test]
fn test_load_full_config_file() {
    let file = write_config(
        r#"
server:
  bind: "127.0.0.1:8000"
auth:
  header: "x-api-key"
  secret: "abc"
  debug: false
random:
  collection: "muslim"
storage:
  dataset: "/srv/catalog.json"
  database_url: "mysql://reader@localhost/hadithdb"
"#,
    );

    let config = ApiConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.server.bind, "127.0.0.1:8000");
    assert_eq!(config.auth.header, "x-api-key");
    assert_eq!(config.auth.secret.as_deref(), Some("abc"));
    assert_eq!(config.random.collection, "muslim");
    assert_eq!(config.storage.dataset, Some(PathBuf::from("/srv/catalog.json")));
    assert_eq!(
        config.storage.database_url.as_deref(),
        Some("mysql://reader@localhost/hadithdb")
    );
    config.validate().unwrap();
}

#[test]
fn test_missing_file_is_io_error() {
    let err = ApiConfig::from_yaml_file("/nonexistent/hadith-api.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/hadith-api.yaml"));
}

#[test]
fn test_env_overrides_file_values() {
    let file = write_config("auth:\n  secret: \"from-file\"\n");

    let config = ApiConfig::from_yaml_file(file.path())
        .unwrap()
        .with_env_overrides([
            ("HADITH_API_SECRET", "from-env"),
            ("HADITH_API_RANDOM_COLLECTION", "bukhari"),
            ("DATABASE_URL", "mysql://localhost/db"),
        ])
        .unwrap();

    assert_eq!(config.auth.secret.as_deref(), Some("from-env"));
    assert_eq!(config.random.collection, "bukhari");
    assert_eq!(config.storage.database_url.as_deref(), Some("mysql://localhost/db"));
}

#[tokio::test]
async fn test_config_file_drives_server() {
    let file = write_config(
        r#"
auth:
  debug: true
random:
  collection: "bukhari"
"#,
    );
    let config = ApiConfig::from_yaml_file(file.path()).unwrap();

    let catalog = InMemoryCatalog::from_json_str(include_str!("fixtures/catalog.json")).unwrap();
    let app = ServerBuilder::new()
        .with_store(catalog)
        .with_config(config)
        .build()
        .expect("Failed to build app");
    let server = TestServer::try_new(app).expect("Failed to create test server");

    let response = server.get("/v1/hadiths/random").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["collection"], "bukhari");
}

#[test]
fn test_dataset_file_loads_into_catalog() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(include_str!("fixtures/catalog.json").as_bytes())
        .unwrap();

    let catalog = InMemoryCatalog::from_json_file(file.path()).unwrap();
    assert_eq!(catalog.backend_name(), "in-memory");
}
