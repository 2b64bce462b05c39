//! Storage traits for filtered, ordered, windowed queries

use crate::core::entity::{Book, Chapter, Collection, Hadith, Resource};
use crate::core::error::StorageError;
use crate::core::query::Window;
use async_trait::async_trait;

/// Read-only data source for one resource kind
///
/// Implementations must return rows in the kind's canonical order
/// ([`Resource::canonical_cmp`]) so that page boundaries are stable across
/// repeated calls. Any connection a call needs is acquired inside the call
/// and released before it returns, on every exit path.
#[async_trait]
pub trait EntitySource<E: Resource>: Send + Sync {
    /// Count every record matching the filter
    async fn count(&self, filter: &E::Filter) -> Result<u64, StorageError>;

    /// Fetch the records matching the filter inside the window, in canonical order
    async fn fetch(&self, filter: &E::Filter, window: Window) -> Result<Vec<E>, StorageError>;
}

/// A data source covering the whole catalog
pub trait CatalogStore:
    EntitySource<Collection> + EntitySource<Book> + EntitySource<Chapter> + EntitySource<Hadith>
{
    /// Backend name for logs
    fn backend_name(&self) -> &'static str;
}
