//! Route table of the HTTP surface
//!
//! All routes are GET only:
//! - GET / - welcome page, not gated
//! - GET /v1/collections[/{collection}]
//! - GET /v1/collections/{collection}/books[/{book_number}]
//! - GET /v1/collections/{collection}/books/{book_number}/hadiths
//! - GET /v1/collections/{collection}/books/{book_number}/chapters[/{chapter_id}]
//! - GET /v1/collections/{collection}/hadiths/{hadith_number}
//! - GET /v1/hadiths/{urn} and /v1/hadiths/random
//! - GET /v1/collections/export/{csv,pdf}
//!
//! Static segments (`random`, `export`) take priority over parameters.

use super::handlers::{
    export_csv, export_pdf, get_book, get_chapter, get_collection, get_collection_hadith,
    get_hadith_by_urn, get_random_hadith, home, list_book_hadiths, list_books, list_chapters,
    list_collections, method_not_allowed, route_not_found,
};
use super::host::ServerHost;
use crate::core::auth::require_shared_secret;
use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the catalog routes without any layers
pub fn build_api_routes(host: Arc<ServerHost>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/v1/collections", get(list_collections))
        .route("/v1/collections/export/csv", get(export_csv))
        .route("/v1/collections/export/pdf", get(export_pdf))
        .route("/v1/collections/{collection}", get(get_collection))
        .route("/v1/collections/{collection}/books", get(list_books))
        .route(
            "/v1/collections/{collection}/books/{book_number}",
            get(get_book),
        )
        .route(
            "/v1/collections/{collection}/books/{book_number}/hadiths",
            get(list_book_hadiths),
        )
        .route(
            "/v1/collections/{collection}/books/{book_number}/chapters",
            get(list_chapters),
        )
        .route(
            "/v1/collections/{collection}/books/{book_number}/chapters/{chapter_id}",
            get(get_chapter),
        )
        .route(
            "/v1/collections/{collection}/hadiths/{hadith_number}",
            get(get_collection_hadith),
        )
        .route("/v1/hadiths/random", get(get_random_hadith))
        .route("/v1/hadiths/{urn}", get(get_hadith_by_urn))
        .with_state(host)
}

/// Build the complete application router
///
/// Unknown paths and wrong methods answer with the error envelope. The
/// shared-secret gate runs before routing errors are produced, so a request
/// without the secret gets a 401 whatever its path.
pub fn build_router(host: Arc<ServerHost>) -> Router {
    let gate = host.gate.clone();

    build_api_routes(host)
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn_with_state(gate, require_shared_secret))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::storage::in_memory::fixtures;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app(debug: bool) -> Router {
        let mut config = ApiConfig::default();
        config.auth.secret = Some("s3cret".to_string());
        config.auth.debug = debug;
        let host = ServerHost::new(Arc::new(fixtures::sample_catalog()), config).unwrap();
        build_router(Arc::new(host))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("x-aws-secret", "s3cret")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_random_route_is_not_captured_by_urn() {
        let response = app(false).oneshot(get("/v1/hadiths/random")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_export_route_is_not_captured_by_collection() {
        let response = app(false)
            .oneshot(get("/v1/collections/export/csv"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_gate_applies_to_unknown_routes() {
        let request = Request::builder()
            .uri("/v2/nothing")
            .body(Body::empty())
            .unwrap();
        let response = app(false).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app(false).oneshot(get("/v2/nothing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_debug_mode_skips_gate() {
        let request = Request::builder()
            .uri("/v1/collections")
            .body(Body::empty())
            .unwrap();
        let response = app(true).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
