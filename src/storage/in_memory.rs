//! In-memory implementation of the catalog store for testing and development

use crate::core::entity::{Book, Chapter, Collection, Hadith, Resource};
use crate::core::error::StorageError;
use crate::core::query::Window;
use crate::core::store::{CatalogStore, EntitySource};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

const BACKEND: &str = "in-memory";

/// Immutable rows of one resource kind, kept in canonical order
#[derive(Debug, Clone)]
struct Table<E> {
    rows: Arc<Vec<E>>,
}

impl<E: Resource> Table<E> {
    fn new(mut rows: Vec<E>) -> Self {
        rows.sort_by(|a, b| a.canonical_cmp(b));
        Self {
            rows: Arc::new(rows),
        }
    }

    fn count(&self, filter: &E::Filter) -> u64 {
        self.rows.iter().filter(|row| row.matches(filter)).count() as u64
    }

    fn fetch(&self, filter: &E::Filter, window: Window) -> Vec<E> {
        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);

        self.rows
            .iter()
            .filter(|row| row.matches(filter))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }
}

impl<E: Resource> Default for Table<E> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Serialized form of a whole catalog, as read from a JSON dataset file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub collections: Vec<Collection>,
    pub books: Vec<Book>,
    pub chapters: Vec<Chapter>,
    pub hadiths: Vec<Hadith>,
}

/// In-memory catalog store
///
/// Rows are sorted once at construction and never mutated afterwards, so
/// reads need no locking and clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    collections: Table<Collection>,
    books: Table<Book>,
    chapters: Table<Chapter>,
    hadiths: Table<Hadith>,
}

impl InMemoryCatalog {
    /// Create a catalog from its four tables
    pub fn new(
        collections: Vec<Collection>,
        books: Vec<Book>,
        chapters: Vec<Chapter>,
        hadiths: Vec<Hadith>,
    ) -> Self {
        Self {
            collections: Table::new(collections),
            books: Table::new(books),
            chapters: Table::new(chapters),
            hadiths: Table::new(hadiths),
        }
    }

    /// Create a catalog from a dataset
    pub fn from_dataset(dataset: Dataset) -> Self {
        Self::new(
            dataset.collections,
            dataset.books,
            dataset.chapters,
            dataset.hadiths,
        )
    }

    /// Load a catalog from a JSON dataset string
    pub fn from_json_str(json: &str) -> Result<Self, StorageError> {
        let dataset: Dataset =
            serde_json::from_str(json).map_err(|e| StorageError::IntegrityError {
                message: format!("invalid dataset: {}", e),
            })?;
        Ok(Self::from_dataset(dataset))
    }

    /// Load a catalog from a JSON dataset file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| StorageError::ConnectionError {
                backend: BACKEND.to_string(),
                message: format!("{}: {}", path.display(), e),
            })?;
        Self::from_json_str(&content)
    }
}

/// Implement `EntitySource<$entity>` by delegating to the `$table` field
macro_rules! delegate_entity_source {
    ($entity:ty, $table:ident) => {
        #[async_trait]
        impl EntitySource<$entity> for InMemoryCatalog {
            async fn count(
                &self,
                filter: &<$entity as Resource>::Filter,
            ) -> Result<u64, StorageError> {
                Ok(self.$table.count(filter))
            }

            async fn fetch(
                &self,
                filter: &<$entity as Resource>::Filter,
                window: Window,
            ) -> Result<Vec<$entity>, StorageError> {
                Ok(self.$table.fetch(filter, window))
            }
        }
    };
}

delegate_entity_source!(Collection, collections);
delegate_entity_source!(Book, books);
delegate_entity_source!(Chapter, chapters);
delegate_entity_source!(Hadith, hadiths);

impl CatalogStore for InMemoryCatalog {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{BookFilter, CollectionFilter, HadithFilter};

    #[tokio::test]
    async fn test_rows_are_sorted_on_load() {
        let catalog = fixtures::sample_catalog();
        let rows = EntitySource::<Collection>::fetch(&catalog, &CollectionFilter::all(), Window::new(0, 10))
            .await
            .unwrap();

        let ids: Vec<i64> = rows.iter().map(|c| c.collection_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_count_applies_filter() {
        let catalog = fixtures::sample_catalog();
        let published = EntitySource::<Book>::count(&catalog, &BookFilter::published_in("bukhari"))
            .await
            .unwrap();
        assert_eq!(published, 3);

        let riyad = EntitySource::<Hadith>::count(
            &catalog,
            &HadithFilter::InCollection("riyadussalihin".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(riyad, 3);
    }

    #[tokio::test]
    async fn test_fetch_window() {
        let catalog = fixtures::sample_catalog();
        let rows = EntitySource::<Collection>::fetch(&catalog, &CollectionFilter::all(), Window::new(3, 10))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "abudawud");

        let rows = EntitySource::<Collection>::fetch(&catalog, &CollectionFilter::all(), Window::new(50, 10))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_invalid_dataset_is_integrity_error() {
        let err = InMemoryCatalog::from_json_str("{\"collections\": 5}").unwrap_err();
        assert!(matches!(err, StorageError::IntegrityError { .. }));
    }

    #[test]
    fn test_missing_dataset_file() {
        let err = InMemoryCatalog::from_json_file("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, StorageError::ConnectionError { .. }));
    }

    #[test]
    fn test_partial_dataset_defaults_to_empty_tables() {
        let catalog = InMemoryCatalog::from_json_str("{}").unwrap();
        assert_eq!(catalog.backend_name(), "in-memory");
    }
}
