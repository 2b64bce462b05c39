//! Entity catalog: the four read-only resource kinds served by the API
//!
//! Every kind implements [`Resource`], which ties together:
//! - the serialized projection (via `serde::Serialize`)
//! - the filter type used to query it
//! - its canonical total order, used for pagination and export
//!
//! The projection is total: fields are never conditionally omitted, optional
//! values serialize as `null`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Book status value marking a book as published
pub const PUBLISHED_STATUS: i32 = 4;

/// A read-only resource kind exposed by the API
pub trait Resource: Serialize + Clone + Send + Sync + 'static {
    /// Filter understood by storage backends for this kind
    type Filter: fmt::Debug + Send + Sync;

    /// Singular resource name used in errors and logs (e.g., "book")
    fn resource_name() -> &'static str;

    /// Whether this record satisfies the filter
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Canonical total order of this kind
    fn canonical_cmp(&self, other: &Self) -> Ordering;
}

/// Implement [`Resource`] for an entity exposing `sort_key()` and `matches_filter()`
macro_rules! impl_resource {
    ($type:ident, $name:literal, $filter:ty) => {
        impl Resource for $type {
            type Filter = $filter;

            fn resource_name() -> &'static str {
                $name
            }

            fn matches(&self, filter: &Self::Filter) -> bool {
                self.matches_filter(filter)
            }

            fn canonical_cmp(&self, other: &Self) -> Ordering {
                self.sort_key().cmp(&other.sort_key())
            }
        }
    };
}

// =============================================================================
// Collection
// =============================================================================

/// Top-level named corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "collectionID")]
    pub collection_id: i64,

    /// Unique slug (e.g., "bukhari")
    pub name: String,

    pub title: String,

    pub description: String,
}

/// Filter over collections
#[derive(Debug, Clone, Default)]
pub struct CollectionFilter {
    pub name: Option<String>,
}

impl CollectionFilter {
    /// Every collection
    pub fn all() -> Self {
        Self::default()
    }

    /// The collection with the given slug
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl Collection {
    fn sort_key(&self) -> (i64, &str) {
        (self.collection_id, &self.name)
    }

    fn matches_filter(&self, filter: &CollectionFilter) -> bool {
        filter.name.as_deref().is_none_or(|name| self.name == name)
    }
}

impl_resource!(Collection, "collection", CollectionFilter);

// =============================================================================
// Book
// =============================================================================

/// A subdivision of a collection
///
/// Books carry two numbering schemes: the internal ordinal `ourBookID`
/// (signed, only its magnitude orders books) and the printed `bookNumber`
/// used by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub collection: String,

    #[serde(rename = "bookNumber")]
    pub book_number: String,

    #[serde(rename = "ourBookID")]
    pub our_book_id: i64,

    #[serde(rename = "englishName")]
    pub english_name: String,

    #[serde(rename = "arabicName")]
    pub arabic_name: String,

    /// Visibility flag, never serialized
    #[serde(skip_serializing, default)]
    pub status: i32,
}

impl Book {
    pub fn is_published(&self) -> bool {
        self.status == PUBLISHED_STATUS
    }

    fn sort_key(&self) -> (u64, i64, &str) {
        (self.our_book_id.unsigned_abs(), self.our_book_id, &self.book_number)
    }

    fn matches_filter(&self, filter: &BookFilter) -> bool {
        self.collection == filter.collection
            && (!filter.published_only || self.is_published())
            && filter.ordinal.is_none_or(|id| self.our_book_id == id)
            && filter
                .book_number
                .as_deref()
                .is_none_or(|number| self.book_number == number)
    }
}

/// Filter over books of one collection
#[derive(Debug, Clone)]
pub struct BookFilter {
    pub collection: String,
    pub published_only: bool,
    pub ordinal: Option<i64>,
    pub book_number: Option<String>,
}

impl BookFilter {
    /// Published books of a collection
    pub fn published_in(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            published_only: true,
            ordinal: None,
            book_number: None,
        }
    }

    /// Any book of a collection carrying the printed number, regardless of status
    pub fn by_number(collection: impl Into<String>, book_number: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            published_only: false,
            ordinal: None,
            book_number: Some(book_number.into()),
        }
    }

    /// The published book of a collection with the given ordinal
    pub fn published_by_ordinal(collection: impl Into<String>, ordinal: i64) -> Self {
        Self {
            collection: collection.into(),
            published_only: true,
            ordinal: Some(ordinal),
            book_number: None,
        }
    }
}

impl_resource!(Book, "book", BookFilter);

// =============================================================================
// Chapter
// =============================================================================

/// Possibly fractional chapter number (e.g., 3.5 for a sub-chapter)
///
/// Always finite and never negative zero, so it carries a total order that
/// agrees with numeric equality.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ChapterNumber(f64);

impl ChapterNumber {
    /// Wrap a finite value; NaN and infinities are rejected, `-0` becomes `0`
    pub fn new(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Some(Self(if value == 0.0 { 0.0 } else { value }))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for ChapterNumber {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ChapterNumber {}

impl PartialOrd for ChapterNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChapterNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Error returned when a chapter number is not a finite decimal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidChapterNumber;

impl fmt::Display for InvalidChapterNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chapter number must be a finite decimal")
    }
}

impl std::error::Error for InvalidChapterNumber {}

impl TryFrom<f64> for ChapterNumber {
    type Error = InvalidChapterNumber;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidChapterNumber)
    }
}

impl From<ChapterNumber> for f64 {
    fn from(number: ChapterNumber) -> Self {
        number.0
    }
}

impl FromStr for ChapterNumber {
    type Err = InvalidChapterNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "inf" and "NaN" parse as f64, `new` rejects them
        s.trim()
            .parse::<f64>()
            .ok()
            .and_then(Self::new)
            .ok_or(InvalidChapterNumber)
    }
}

impl fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A subdivision of a book, attached to it through the book ordinal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub collection: String,

    /// Ordinal id of the owning book (`Book::our_book_id`)
    #[serde(rename = "arabicBookID")]
    pub arabic_book_id: i64,

    #[serde(rename = "chapterId")]
    pub chapter_id: ChapterNumber,

    #[serde(rename = "englishTitle")]
    pub english_title: String,

    #[serde(rename = "arabicTitle")]
    pub arabic_title: String,
}

impl Chapter {
    fn sort_key(&self) -> (ChapterNumber, i64, &str, &str) {
        (
            self.chapter_id,
            self.arabic_book_id,
            &self.english_title,
            &self.arabic_title,
        )
    }

    fn matches_filter(&self, filter: &ChapterFilter) -> bool {
        self.collection == filter.collection
            && self.arabic_book_id == filter.book_ordinal
            && filter.chapter.is_none_or(|id| self.chapter_id == id)
    }
}

/// Filter over the chapters of one book
#[derive(Debug, Clone)]
pub struct ChapterFilter {
    pub collection: String,
    pub book_ordinal: i64,
    pub chapter: Option<ChapterNumber>,
}

impl ChapterFilter {
    pub fn in_book(collection: impl Into<String>, book_ordinal: i64) -> Self {
        Self {
            collection: collection.into(),
            book_ordinal,
            chapter: None,
        }
    }

    pub fn by_id(collection: impl Into<String>, book_ordinal: i64, chapter: ChapterNumber) -> Self {
        Self {
            collection: collection.into(),
            book_ordinal,
            chapter: Some(chapter),
        }
    }
}

impl_resource!(Chapter, "chapter", ChapterFilter);

// =============================================================================
// Hadith
// =============================================================================

/// Leaf narration record
///
/// Unlike [`Chapter`], a hadith references its book by the *printed* book
/// number. It is globally addressable by either of two independent URNs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hadith {
    pub collection: String,

    #[serde(rename = "bookNumber")]
    pub book_number: String,

    #[serde(rename = "hadithNumber")]
    pub hadith_number: String,

    #[serde(rename = "chapterId")]
    pub chapter_id: Option<ChapterNumber>,

    #[serde(rename = "arabicURN")]
    pub arabic_urn: i64,

    #[serde(rename = "englishURN")]
    pub english_urn: i64,

    #[serde(rename = "englishText")]
    pub english_text: String,

    #[serde(rename = "arabicText")]
    pub arabic_text: String,
}

impl Hadith {
    fn sort_key(&self) -> (i64, i64) {
        (self.english_urn, self.arabic_urn)
    }

    fn matches_filter(&self, filter: &HadithFilter) -> bool {
        match filter {
            HadithFilter::InBook {
                collection,
                book_number,
            } => &self.collection == collection && &self.book_number == book_number,
            HadithFilter::ByNumber {
                collection,
                hadith_number,
            } => &self.collection == collection && &self.hadith_number == hadith_number,
            HadithFilter::ByUrn(urn) => self.arabic_urn == *urn || self.english_urn == *urn,
            HadithFilter::InCollection(collection) => &self.collection == collection,
        }
    }
}

/// Filter over hadiths
#[derive(Debug, Clone)]
pub enum HadithFilter {
    /// Hadiths of a book, addressed by printed book number
    InBook {
        collection: String,
        book_number: String,
    },

    /// A hadith by its collection-scoped number
    ByNumber {
        collection: String,
        hadith_number: String,
    },

    /// Either URN scheme equals the value
    ByUrn(i64),

    /// Every hadith of a collection
    InCollection(String),
}

impl_resource!(Hadith, "hadith", HadithFilter);

#[cfg(test)]
mod tests {
    use super::*;

    fn book(number: &str, ordinal: i64, status: i32) -> Book {
        Book {
            collection: "bukhari".to_string(),
            book_number: number.to_string(),
            our_book_id: ordinal,
            english_name: format!("Book {}", number),
            arabic_name: String::new(),
            status,
        }
    }

    #[test]
    fn test_book_order_uses_absolute_ordinal() {
        let mut books = vec![book("3", 3, 4), book("intro", -1, 4), book("2", 2, 4)];
        books.sort_by(|a, b| a.canonical_cmp(b));

        let ordinals: Vec<i64> = books.iter().map(|b| b.our_book_id).collect();
        assert_eq!(ordinals, vec![-1, 2, 3]);
    }

    #[test]
    fn test_book_order_breaks_ties_on_signed_ordinal() {
        let mut books = vec![book("b", 1, 4), book("a", -1, 4)];
        books.sort_by(|a, b| a.canonical_cmp(b));
        assert_eq!(books[0].our_book_id, -1);
    }

    #[test]
    fn test_book_filter_published_only() {
        let draft = book("5", 5, 1);
        assert!(!draft.matches(&BookFilter::published_in("bukhari")));
        assert!(draft.matches(&BookFilter::by_number("bukhari", "5")));
        assert!(!draft.matches(&BookFilter::by_number("muslim", "5")));
    }

    #[test]
    fn test_book_status_not_serialized() {
        let value = serde_json::to_value(book("1", 1, 4)).unwrap();
        assert!(value.get("status").is_none());
        assert_eq!(value["ourBookID"], 1);
        assert_eq!(value["bookNumber"], "1");
    }

    fn chapter(english_title: &str, id: f64) -> Chapter {
        Chapter {
            collection: "bukhari".to_string(),
            arabic_book_id: 1,
            chapter_id: ChapterNumber::new(id).unwrap(),
            english_title: english_title.to_string(),
            arabic_title: String::new(),
        }
    }

    #[test]
    fn test_chapter_number_parsing() {
        assert_eq!("3.5".parse::<ChapterNumber>().unwrap().value(), 3.5);
        assert_eq!(" 7 ".parse::<ChapterNumber>().unwrap().value(), 7.0);
        assert!("abc".parse::<ChapterNumber>().is_err());
        assert!("NaN".parse::<ChapterNumber>().is_err());
        assert!("inf".parse::<ChapterNumber>().is_err());
    }

    #[test]
    fn test_chapter_number_orders_fractions() {
        let mut ids: Vec<ChapterNumber> = ["10", "3.5", "3", "4"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        ids.sort();
        let values: Vec<f64> = ids.iter().map(|id| id.value()).collect();
        assert_eq!(values, vec![3.0, 3.5, 4.0, 10.0]);
    }

    #[test]
    fn test_negative_zero_chapter_equals_zero() {
        let negative: ChapterNumber = "-0".parse().unwrap();
        let zero = ChapterNumber::new(0.0).unwrap();
        assert_eq!(negative, zero);
        assert!(negative.value().is_sign_positive());

        let deserialized: ChapterNumber = serde_json::from_str("-0.0").unwrap();
        assert_eq!(deserialized, zero);
        assert!(serde_json::from_str::<ChapterNumber>("1e999").is_err());

        let intro = chapter("Intro", 0.0);
        assert!(intro.matches(&ChapterFilter::by_id("bukhari", 1, negative)));
    }

    #[test]
    fn test_duplicate_chapter_ids_order_by_title() {
        let mut chapters = vec![chapter("Zakat", 2.0), chapter("Fasting", 2.0), chapter("Prayer", 1.0)];
        chapters.sort_by(|a, b| a.canonical_cmp(b));

        let titles: Vec<&str> = chapters.iter().map(|c| c.english_title.as_str()).collect();
        assert_eq!(titles, vec!["Prayer", "Fasting", "Zakat"]);
    }

    #[test]
    fn test_hadith_urn_filter_matches_either_scheme() {
        let hadith = Hadith {
            collection: "bukhari".to_string(),
            book_number: "1".to_string(),
            hadith_number: "1".to_string(),
            chapter_id: None,
            arabic_urn: 100010,
            english_urn: 10,
            english_text: String::new(),
            arabic_text: String::new(),
        };
        assert!(hadith.matches(&HadithFilter::ByUrn(100010)));
        assert!(hadith.matches(&HadithFilter::ByUrn(10)));
        assert!(!hadith.matches(&HadithFilter::ByUrn(11)));
    }

    #[test]
    fn test_hadith_projection_is_total() {
        let hadith = Hadith {
            collection: "muslim".to_string(),
            book_number: "2".to_string(),
            hadith_number: "7a".to_string(),
            chapter_id: None,
            arabic_urn: 1,
            english_urn: 2,
            english_text: "text".to_string(),
            arabic_text: String::new(),
        };
        let value = serde_json::to_value(hadith).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 8);
        assert!(object["chapterId"].is_null());
    }
}
