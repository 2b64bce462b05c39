//! Resource resolution: pagination, single-record lookup and identifier mapping
//!
//! [`paginate`] and [`single`] are the two generic wrappers every endpoint goes
//! through. [`Resolver`] builds the per-endpoint filters on top of them,
//! including the two book-referencing paths:
//! - chapters reference books by ordinal id, so the printed book number is
//!   normalized first ([`Resolver::book_ordinal`])
//! - hadiths reference books by printed number, which is used as-is

use crate::core::entity::{
    Book, BookFilter, Chapter, ChapterFilter, ChapterNumber, Collection, CollectionFilter, Hadith,
    HadithFilter, Resource,
};
use crate::core::error::{ApiError, ApiResult};
use crate::core::query::{Page, PageRequest, Window};
use crate::core::store::{CatalogStore, EntitySource};
use rand::Rng;
use std::sync::Arc;

/// Run a filtered query through the pagination contract
///
/// `total` always reflects the whole filtered set; a page past the end is an
/// empty page, not an error.
pub async fn paginate<E, S>(source: &S, filter: &E::Filter, request: PageRequest) -> ApiResult<Page<E>>
where
    E: Resource,
    S: EntitySource<E> + ?Sized,
{
    let total = source.count(filter).await?;
    let window = request.window();

    let data = if window.offset >= total {
        Vec::new()
    } else {
        source.fetch(filter, window).await?
    };

    Ok(Page::new(data, total, request))
}

/// Resolve a filtered query to exactly one record
///
/// Zero matches is [`ApiError::NotFound`]. A second match means the filter is
/// not selective enough and yields [`ApiError::Ambiguous`] rather than an
/// arbitrary row.
pub async fn single<E, S>(source: &S, filter: &E::Filter, key: &str) -> ApiResult<E>
where
    E: Resource,
    S: EntitySource<E> + ?Sized,
{
    let mut rows = source.fetch(filter, Window::new(0, 2)).await?;

    match rows.len() {
        0 => Err(ApiError::not_found(E::resource_name(), key)),
        1 => rows
            .pop()
            .ok_or_else(|| ApiError::not_found(E::resource_name(), key)),
        _ => {
            tracing::warn!(resource = E::resource_name(), key, ?filter, "identifier matches several records");
            Err(ApiError::Ambiguous {
                resource: E::resource_name(),
                key: key.to_string(),
            })
        }
    }
}

/// Uniform index into `0..total`; `total` must be non-zero
fn pick_offset(total: u64) -> u64 {
    rand::thread_rng().gen_range(0..total)
}

/// Endpoint-level resolution over a catalog store
pub struct Resolver {
    store: Arc<dyn CatalogStore>,
    random_collection: String,
}

impl Resolver {
    /// Create a resolver drawing random hadiths from `random_collection`
    pub fn new(store: Arc<dyn CatalogStore>, random_collection: impl Into<String>) -> Self {
        Self {
            store,
            random_collection: random_collection.into(),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    /// Collection the random endpoint draws from
    pub fn random_collection(&self) -> &str {
        &self.random_collection
    }

    // === Collections ===

    pub async fn collections(&self, request: PageRequest) -> ApiResult<Page<Collection>> {
        paginate::<Collection, _>(self.store(), &CollectionFilter::all(), request).await
    }

    pub async fn collection(&self, name: &str) -> ApiResult<Collection> {
        single::<Collection, _>(self.store(), &CollectionFilter::by_name(name), name).await
    }

    // === Books ===

    /// Published books of a collection, ordered by absolute ordinal
    pub async fn books(&self, collection: &str, request: PageRequest) -> ApiResult<Page<Book>> {
        paginate::<Book, _>(self.store(), &BookFilter::published_in(collection), request).await
    }

    /// Map a printed book number onto the book's ordinal id
    ///
    /// This is a lookup against the collection's books, not a parse. Unknown
    /// numbers fail here, before any query depending on the ordinal runs.
    pub async fn book_ordinal(&self, collection: &str, book_number: &str) -> ApiResult<i64> {
        let filter = BookFilter::by_number(collection, book_number);
        let book = single::<Book, _>(self.store(), &filter, book_number).await?;

        tracing::debug!(collection, book_number, ordinal = book.our_book_id, "normalized book number");
        Ok(book.our_book_id)
    }

    pub async fn book(&self, collection: &str, book_number: &str) -> ApiResult<Book> {
        let ordinal = self.book_ordinal(collection, book_number).await?;
        let filter = BookFilter::published_by_ordinal(collection, ordinal);
        single::<Book, _>(self.store(), &filter, book_number).await
    }

    // === Chapters ===

    pub async fn chapters(
        &self,
        collection: &str,
        book_number: &str,
        request: PageRequest,
    ) -> ApiResult<Page<Chapter>> {
        let ordinal = self.book_ordinal(collection, book_number).await?;
        paginate::<Chapter, _>(self.store(), &ChapterFilter::in_book(collection, ordinal), request).await
    }

    pub async fn chapter(
        &self,
        collection: &str,
        book_number: &str,
        chapter_id: ChapterNumber,
    ) -> ApiResult<Chapter> {
        let ordinal = self.book_ordinal(collection, book_number).await?;
        let filter = ChapterFilter::by_id(collection, ordinal, chapter_id);
        single::<Chapter, _>(self.store(), &filter, &chapter_id.to_string()).await
    }

    // === Hadiths ===

    /// Hadiths of a book, addressed by printed book number
    pub async fn book_hadiths(
        &self,
        collection: &str,
        book_number: &str,
        request: PageRequest,
    ) -> ApiResult<Page<Hadith>> {
        let filter = HadithFilter::InBook {
            collection: collection.to_string(),
            book_number: book_number.to_string(),
        };
        paginate::<Hadith, _>(self.store(), &filter, request).await
    }

    pub async fn collection_hadith(&self, collection: &str, hadith_number: &str) -> ApiResult<Hadith> {
        let filter = HadithFilter::ByNumber {
            collection: collection.to_string(),
            hadith_number: hadith_number.to_string(),
        };
        single::<Hadith, _>(self.store(), &filter, hadith_number).await
    }

    /// Hadith whose arabic or english URN equals `urn`
    pub async fn hadith_by_urn(&self, urn: i64) -> ApiResult<Hadith> {
        single::<Hadith, _>(self.store(), &HadithFilter::ByUrn(urn), &urn.to_string()).await
    }

    /// A hadith drawn uniformly from the random collection
    pub async fn random_hadith(&self) -> ApiResult<Hadith> {
        let filter = HadithFilter::InCollection(self.random_collection.clone());
        let total = EntitySource::<Hadith>::count(self.store(), &filter).await?;
        if total == 0 {
            return Err(ApiError::not_found("collection", &self.random_collection));
        }

        let offset = pick_offset(total);
        tracing::debug!(collection = %self.random_collection, offset, total, "picked random hadith");

        EntitySource::<Hadith>::fetch(self.store(), &filter, Window::new(offset, 1))
            .await?
            .pop()
            .ok_or_else(|| ApiError::not_found("hadith", offset))
    }
}
