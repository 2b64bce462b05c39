//! Core module containing the resource model, storage traits and resolution logic

pub mod auth;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod query;
pub mod resolver;
pub mod store;

pub use auth::{GateDecision, SharedSecretGate, require_shared_secret};
pub use entity::{
    Book, BookFilter, Chapter, ChapterFilter, ChapterNumber, Collection, CollectionFilter, Hadith,
    HadithFilter, Resource,
};
pub use error::{ApiError, ApiResult, StorageError};
pub use extractors::ApiPath;
pub use query::{Page, PageParams, PageRequest, Window};
pub use resolver::Resolver;
pub use store::{CatalogStore, EntitySource};
