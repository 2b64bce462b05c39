//! Typed error handling for the API
//!
//! Every failure a handler can produce is an [`ApiError`]. Each variant maps
//! to an HTTP status and is rendered with the same envelope:
//!
//! ```json
//! {"error": {"details": "book '999' not found", "code": 404}}
//! ```
//!
//! # Error Categories
//!
//! - Client errors: [`ApiError::Unauthorized`], [`ApiError::NotFound`],
//!   [`ApiError::BadRequest`], [`ApiError::InvalidPath`],
//!   [`ApiError::Ambiguous`], routing errors
//! - Server errors: [`ApiError::Storage`] and [`ApiError::Export`]. Their
//!   details are logged but never sent to the caller.

use crate::export::ExportError;
use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type of the API
#[derive(Debug)]
pub enum ApiError {
    /// Missing or incorrect shared secret
    Unauthorized,

    /// The resolver found no record for the identifier
    NotFound {
        resource: &'static str,
        key: String,
    },

    /// The identifier matched more than one record
    Ambiguous {
        resource: &'static str,
        key: String,
    },

    /// Malformed numeric path or query parameter
    BadRequest {
        parameter: String,
        value: String,
    },

    /// Path segment the router matched but could not decode
    InvalidPath {
        details: String,
    },

    /// No route for the requested path
    RouteNotFound {
        path: String,
    },

    /// Route exists but not for this method
    MethodNotAllowed,

    /// Storage backend failure
    Storage(StorageError),

    /// Export rendering failure
    Export(ExportError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => {
                write!(f, "Missing or incorrect shared secret")
            }
            ApiError::NotFound { resource, key } => {
                write!(f, "{} '{}' not found", resource, key)
            }
            ApiError::Ambiguous { resource, key } => {
                write!(f, "{} '{}' matches more than one record", resource, key)
            }
            ApiError::BadRequest { parameter, value } => {
                write!(f, "Invalid value '{}' for parameter '{}'", value, parameter)
            }
            ApiError::InvalidPath { details } => write!(f, "{}", details),
            ApiError::RouteNotFound { path } => {
                write!(f, "No resource at '{}'", path)
            }
            ApiError::MethodNotAllowed => {
                write!(f, "Method not allowed")
            }
            ApiError::Storage(e) => write!(f, "{}", e),
            ApiError::Export(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Storage(e) => Some(e),
            ApiError::Export(e) => Some(e),
            _ => None,
        }
    }
}

/// Body of the error envelope
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable description
    pub details: String,
    /// HTTP status code, repeated in the body
    pub code: u16,
}

/// Error envelope: `{"error": {...}}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl ApiError {
    /// Shorthand for a not-found outcome of resource kind `resource`
    pub fn not_found(resource: &'static str, key: impl fmt::Display) -> Self {
        ApiError::NotFound {
            resource,
            key: key.to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Ambiguous { .. } => StatusCode::CONFLICT,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidPath { .. } => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Ambiguous { .. } => "AMBIGUOUS_IDENTIFIER",
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::InvalidPath { .. } => "BAD_REQUEST",
            ApiError::RouteNotFound { .. } => "ROUTE_NOT_FOUND",
            ApiError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ApiError::Storage(e) => e.error_code(),
            ApiError::Export(_) => "EXPORT_ERROR",
        }
    }

    /// Whether the failure is on our side
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Convert to the error envelope
    ///
    /// Server errors get a generic message so backend detail never leaks.
    pub fn to_response(&self) -> ErrorResponse {
        let details = if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        ErrorResponse {
            error: ErrorBody {
                details,
                code: self.status_code().as_u16(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }

        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug)]
pub enum StorageError {
    /// Connection error
    ConnectionError {
        backend: String,
        message: String,
    },

    /// Query execution error
    QueryError {
        backend: String,
        message: String,
    },

    /// Stored data could not be mapped onto an entity
    IntegrityError {
        message: String,
    },

    /// Backend not available
    Unavailable {
        backend: String,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StorageError::QueryError { backend, message } => {
                write!(f, "{} query error: {}", backend, message)
            }
            StorageError::IntegrityError { message } => {
                write!(f, "Data integrity error: {}", message)
            }
            StorageError::Unavailable { backend } => {
                write!(f, "Storage backend '{}' is unavailable", backend)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::ConnectionError { .. } => "STORAGE_CONNECTION_ERROR",
            StorageError::QueryError { .. } => "STORAGE_QUERY_ERROR",
            StorageError::IntegrityError { .. } => "STORAGE_INTEGRITY_ERROR",
            StorageError::Unavailable { .. } => "STORAGE_UNAVAILABLE",
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidPath {
            details: rejection.body_text(),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::Export(err)
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
