//! Request extractors that report failures with the API error envelope
//!
//! axum's own [`Path`] and `Query` rejections answer with plain text. The
//! handlers use these instead so every malformed request is an [`ApiError`].

use crate::core::error::ApiError;
use crate::core::query::PageParams;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use std::convert::Infallible;

/// [`Path`] with [`ApiError`] as its rejection
///
/// A segment that is not valid UTF-8 after percent-decoding becomes
/// [`ApiError::InvalidPath`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

impl<S> FromRequestParts<S> for PageParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .uri
            .query()
            .map(PageParams::from_query)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    async fn page_params(uri: &str) -> PageParams {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        PageParams::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_page_params_without_query() {
        assert_eq!(page_params("/v1/collections").await, PageParams::default());
    }

    #[tokio::test]
    async fn test_page_params_first_value_wins() {
        let params = page_params("/v1/collections?page=1&page=2").await;
        assert_eq!(params.page.as_deref(), Some("1"));
        assert_eq!(params.limit, None);
    }

    #[tokio::test]
    async fn test_path_rejection_becomes_api_error() {
        // no matched route, so there are no path parameters to read
        let (mut parts, _) = Request::builder()
            .uri("/v1/collections/bukhari")
            .body(())
            .unwrap()
            .into_parts();
        let err = ApiPath::<String>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(matches!(err, ApiError::InvalidPath { .. }));
    }
}
