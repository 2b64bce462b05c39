//! HTTP handlers for the catalog endpoints
//!
//! Handlers only parse path and query parameters; every lookup goes through
//! the [`Resolver`](crate::core::resolver::Resolver) held by the host.

use crate::core::entity::{Book, Chapter, ChapterNumber, Collection, Hadith};
use crate::core::error::{ApiError, ApiResult};
use crate::core::extractors::ApiPath;
use crate::core::query::{Page, PageParams, PageRequest};
use crate::export::{self, ExportArtifact};
use crate::server::host::ServerHost;
use axum::Json;
use axum::extract::State;
use axum::http::Uri;
use axum::response::Html;
use std::str::FromStr;
use std::sync::Arc;

pub const WELCOME_PAGE: &str = "<h1>Welcome to sunnah.com API.</h1>";

type HostState = State<Arc<ServerHost>>;

fn page_request(params: &PageParams) -> ApiResult<PageRequest> {
    PageRequest::try_from(params)
}

fn parse_param<T: FromStr>(parameter: &str, value: &str) -> ApiResult<T> {
    value.parse().map_err(|_| ApiError::BadRequest {
        parameter: parameter.to_string(),
        value: value.to_string(),
    })
}

pub async fn home() -> Html<&'static str> {
    Html(WELCOME_PAGE)
}

// === Collections ===

pub async fn list_collections(
    State(host): HostState,
    params: PageParams,
) -> ApiResult<Json<Page<Collection>>> {
    let request = page_request(&params)?;
    Ok(Json(host.resolver.collections(request).await?))
}

pub async fn get_collection(
    State(host): HostState,
    ApiPath(collection): ApiPath<String>,
) -> ApiResult<Json<Collection>> {
    Ok(Json(host.resolver.collection(&collection).await?))
}

// === Books ===

pub async fn list_books(
    State(host): HostState,
    ApiPath(collection): ApiPath<String>,
    params: PageParams,
) -> ApiResult<Json<Page<Book>>> {
    let request = page_request(&params)?;
    Ok(Json(host.resolver.books(&collection, request).await?))
}

pub async fn get_book(
    State(host): HostState,
    ApiPath((collection, book_number)): ApiPath<(String, String)>,
) -> ApiResult<Json<Book>> {
    Ok(Json(host.resolver.book(&collection, &book_number).await?))
}

// === Chapters ===

pub async fn list_chapters(
    State(host): HostState,
    ApiPath((collection, book_number)): ApiPath<(String, String)>,
    params: PageParams,
) -> ApiResult<Json<Page<Chapter>>> {
    let request = page_request(&params)?;
    Ok(Json(
        host.resolver
            .chapters(&collection, &book_number, request)
            .await?,
    ))
}

pub async fn get_chapter(
    State(host): HostState,
    ApiPath((collection, book_number, chapter_id)): ApiPath<(String, String, String)>,
) -> ApiResult<Json<Chapter>> {
    let chapter_id: ChapterNumber = parse_param("chapter_id", &chapter_id)?;
    Ok(Json(
        host.resolver
            .chapter(&collection, &book_number, chapter_id)
            .await?,
    ))
}

// === Hadiths ===

pub async fn list_book_hadiths(
    State(host): HostState,
    ApiPath((collection, book_number)): ApiPath<(String, String)>,
    params: PageParams,
) -> ApiResult<Json<Page<Hadith>>> {
    let request = page_request(&params)?;
    Ok(Json(
        host.resolver
            .book_hadiths(&collection, &book_number, request)
            .await?,
    ))
}

pub async fn get_collection_hadith(
    State(host): HostState,
    ApiPath((collection, hadith_number)): ApiPath<(String, String)>,
) -> ApiResult<Json<Hadith>> {
    Ok(Json(
        host.resolver
            .collection_hadith(&collection, &hadith_number)
            .await?,
    ))
}

pub async fn get_hadith_by_urn(
    State(host): HostState,
    ApiPath(urn): ApiPath<String>,
) -> ApiResult<Json<Hadith>> {
    let urn: i64 = parse_param("urn", &urn)?;
    Ok(Json(host.resolver.hadith_by_urn(urn).await?))
}

pub async fn get_random_hadith(State(host): HostState) -> ApiResult<Json<Hadith>> {
    Ok(Json(host.resolver.random_hadith().await?))
}

// === Export ===

pub async fn export_csv(State(host): HostState) -> ApiResult<ExportArtifact> {
    let rows = export::load_catalog(host.resolver.store()).await?;
    Ok(export::render_csv(&rows)?)
}

pub async fn export_pdf(State(host): HostState) -> ApiResult<ExportArtifact> {
    let rows = export::load_catalog(host.resolver.store()).await?;
    Ok(export::render_pdf(&rows)?)
}

// === Fallbacks ===

pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        path: uri.path().to_string(),
    }
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param_rejects_non_numeric() {
        let err = parse_param::<i64>("urn", "abc").unwrap_err();
        assert!(matches!(
            err,
            ApiError::BadRequest { ref parameter, ref value } if parameter == "urn" && value == "abc"
        ));
    }

    #[test]
    fn test_parse_param_accepts_decimal_chapter() {
        let chapter: ChapterNumber = parse_param("chapter_id", "1.5").unwrap();
        assert_eq!(chapter.value(), 1.5);
    }
}
