//! # hadith-api
//!
//! A read-only HTTP API over a catalog of hadith collections, their books,
//! chapters and narrations.
//!
//! ## Features
//!
//! - **Uniform pagination**: every list endpoint returns the same
//!   `{data, total, limit, previous, next}` envelope
//! - **Identifier resolution**: printed book numbers are normalized to the
//!   internal ordinal where the schema requires it, and narrations resolve by
//!   either of their two URNs
//! - **Catalog export**: the collection catalog as a CSV attachment or an
//!   inline PDF document
//! - **Pluggable storage**: an immutable in-memory catalog loaded from JSON,
//!   or MySQL behind the `mysql` feature
//! - **Shared-secret gate**: a configurable header checked on every route
//!   except the welcome page
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hadith_api::prelude::*;
//!
//! let catalog = InMemoryCatalog::from_json_file("catalog.json")?;
//! let config = ApiConfig::from_yaml_file("config.yaml")?;
//!
//! ServerBuilder::new()
//!     .with_store(catalog)
//!     .with_config(config)
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod export;
pub mod logging;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Resources ===
    pub use crate::core::entity::{
        Book, BookFilter, Chapter, ChapterFilter, ChapterNumber, Collection, CollectionFilter,
        Hadith, HadithFilter, Resource,
    };

    // === Resolution ===
    pub use crate::core::{
        error::{ApiError, ApiResult, StorageError},
        query::{Page, PageParams, PageRequest, Window},
        resolver::{Resolver, paginate, single},
        store::{CatalogStore, EntitySource},
    };

    // === Export ===
    pub use crate::export::{CatalogDocument, ExportArtifact, ExportError, ExportRow};

    // === Storage ===
    pub use crate::storage::InMemoryCatalog;
    #[cfg(feature = "mysql")]
    pub use crate::storage::MysqlCatalog;

    // === Config ===
    pub use crate::config::{ApiConfig, ConfigError};

    // === Server ===
    pub use crate::core::auth::SharedSecretGate;
    pub use crate::server::{ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
