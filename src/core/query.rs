//! Query parameters and pagination utilities

use crate::core::error::{ApiError, ApiResult};
use serde::Serialize;

/// Page size used when the caller does not ask for one
pub const DEFAULT_LIMIT: u64 = 50;

/// Hard cap on the page size; larger requests are clamped, not rejected
pub const MAX_LIMIT: u64 = 100;

/// Raw pagination parameters as they appear in the query string
///
/// Values are kept as text so that malformed input is reported with the
/// API error envelope. Extracted straight from the request (see
/// [`extractors`](crate::core::extractors)); a repeated key keeps its first
/// value and unknown keys are ignored.
///
/// # Example
/// ```rust,ignore
/// pub async fn list_items(params: PageParams) -> ApiResult<Json<Page<Item>>> {
///     let request = PageRequest::try_from(&params)?;
///     // ...
/// }
///
/// // Usage:
/// GET /items?page=2&limit=10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    /// Page number (starts at 1)
    pub page: Option<String>,

    /// Number of items per page
    pub limit: Option<String>,
}

impl PageParams {
    /// Read `page` and `limit` from a raw, still percent-encoded query string
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

/// Validated pagination request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Build a request, coercing `page` to at least 1 and `limit` into `1..=MAX_LIMIT`
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.max(1) as u64,
            limit: (limit.max(1) as u64).min(MAX_LIMIT),
        }
    }

    /// Get page number (at least 1)
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Get the effective limit
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Storage window covering this page
    pub fn window(&self) -> Window {
        Window {
            offset: (self.page - 1).saturating_mul(self.limit),
            limit: self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_LIMIT as i64)
    }
}

impl TryFrom<&PageParams> for PageRequest {
    type Error = ApiError;

    fn try_from(params: &PageParams) -> ApiResult<Self> {
        let page = parse_param("page", params.page.as_deref())?.unwrap_or(1);
        let limit = parse_param("limit", params.limit.as_deref())?.unwrap_or(DEFAULT_LIMIT as i64);
        Ok(Self::new(page, limit))
    }
}

fn parse_param(name: &str, raw: Option<&str>) -> ApiResult<Option<i64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| ApiError::BadRequest {
            parameter: name.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Offset/limit slice handed to storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

impl Window {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }
}

/// Paginated response envelope
///
/// Serializes as `{data, total, limit, previous, next}`; the cursors are page
/// numbers and are `null` when there is no such page.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Total number of items across all pages (after filters)
    pub total: u64,

    /// Effective page size
    pub limit: u64,

    /// Previous page number
    pub previous: Option<u64>,

    /// Next page number
    pub next: Option<u64>,
}

impl<T> Page<T> {
    /// Assemble a page from the fetched items and the filtered total
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        let limit = request.limit();
        let page = request.page();
        let last_page = total.div_ceil(limit);
        let end = page.saturating_mul(limit);

        Self {
            data,
            total,
            limit,
            previous: (page > 1 && last_page > 0).then(|| (page - 1).min(last_page)),
            next: (end < total).then_some(page + 1),
        }
    }
}
