//! Bulk export of the collection catalog
//!
//! Both exports are views of one canonical export query: [`load_catalog`]
//! reads every collection in catalog order and projects it onto
//! [`ExportRow`]. The CSV and PDF renderers only differ in encoding.

pub mod csv;
mod font;
pub mod pdf;

use crate::core::entity::{Collection, CollectionFilter};
use crate::core::error::ApiResult;
use crate::core::query::Window;
use crate::core::store::{CatalogStore, EntitySource};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub use self::csv::render_csv;
pub use self::pdf::{CatalogDocument, render_pdf};

/// Errors raised while rendering an export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV rendering failed: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("CSV buffer could not be finalized: {0}")]
    CsvBuffer(String),

    #[error("PDF rendering failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("font {name} could not be loaded: {message}")]
    Font { name: &'static str, message: String },

    #[error("PDF output could not be written: {0}")]
    Io(#[from] std::io::Error),
}

/// Sub-projection of [`Collection`] shared by both exports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub collection_id: i64,
    pub name: String,
    pub description: String,
}

impl From<Collection> for ExportRow {
    fn from(collection: Collection) -> Self {
        Self {
            collection_id: collection.collection_id,
            name: collection.name,
            description: collection.description,
        }
    }
}

/// Load every collection in catalog order
///
/// No pagination and no filtering: the whole set is read in one query sized
/// by a preceding count.
pub async fn load_catalog(store: &dyn CatalogStore) -> ApiResult<Vec<ExportRow>> {
    let filter = CollectionFilter::all();
    let total = EntitySource::<Collection>::count(store, &filter).await?;
    let collections = EntitySource::<Collection>::fetch(store, &filter, Window::new(0, total)).await?;

    tracing::debug!(rows = collections.len(), backend = store.backend_name(), "loaded export catalog");
    Ok(collections.into_iter().map(ExportRow::from).collect())
}

/// How the client should present an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Attachment,
    Inline,
}

/// A fully rendered export, ready to be returned as a response
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub disposition: Disposition,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// `Content-Disposition` header value
    pub fn content_disposition(&self) -> String {
        let kind = match self.disposition {
            Disposition::Attachment => "attachment",
            Disposition::Inline => "inline",
        };
        format!("{}; filename={}", kind, self.filename)
    }
}

impl IntoResponse for ExportArtifact {
    fn into_response(self) -> Response {
        let disposition = self.content_disposition();
        (
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}
