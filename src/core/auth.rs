//! Shared-secret gate for the HTTP surface
//!
//! Every request except the welcome page must carry the configured secret in
//! a fixed header. Debug mode turns the gate off. Without a configured secret
//! the gate rejects everything it guards.

use crate::config::{AuthConfig, ConfigError};
use crate::core::error::ApiError;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// Paths served without the shared secret
pub const UNGATED_PATHS: &[&str] = &["/"];

/// Outcome of checking a request against the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Debug mode or an ungated path
    Bypass,
    /// Header present and equal to the secret
    Granted,
    /// Header missing or wrong, or no secret configured
    Denied,
}

impl GateDecision {
    pub fn is_allowed(self) -> bool {
        !matches!(self, GateDecision::Denied)
    }
}

/// Shared-secret check, built once from configuration
#[derive(Debug, Clone)]
pub struct SharedSecretGate {
    header: HeaderName,
    secret: Option<String>,
    debug: bool,
}

impl SharedSecretGate {
    pub fn new(header: HeaderName, secret: Option<String>, debug: bool) -> Self {
        Self {
            header,
            secret,
            debug,
        }
    }

    /// Build the gate from the `auth` configuration section
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        let header = HeaderName::from_bytes(config.header.as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(config.header.clone()))?;
        Ok(Self::new(header, config.secret.clone(), config.debug))
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Decide whether a request to `path` with `headers` may proceed
    pub fn check(&self, path: &str, headers: &HeaderMap) -> GateDecision {
        if self.debug || UNGATED_PATHS.contains(&path) {
            return GateDecision::Bypass;
        }

        let Some(secret) = &self.secret else {
            return GateDecision::Denied;
        };

        match headers.get(&self.header) {
            Some(value) if value.as_bytes() == secret.as_bytes() => GateDecision::Granted,
            _ => GateDecision::Denied,
        }
    }
}

/// Middleware rejecting requests that fail the gate with a 401 envelope
///
/// Install with `axum::middleware::from_fn_with_state`.
pub async fn require_shared_secret(
    State(gate): State<Arc<SharedSecretGate>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    match gate.check(&path, request.headers()) {
        GateDecision::Denied => {
            tracing::debug!(path = %path, "rejected request without valid shared secret");
            ApiError::Unauthorized.into_response()
        }
        _ => next.run(request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn gate(secret: Option<&str>, debug: bool) -> SharedSecretGate {
        SharedSecretGate::new(
            HeaderName::from_static("x-aws-secret"),
            secret.map(str::to_string),
            debug,
        )
    }

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-aws-secret", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_correct_secret_is_granted() {
        let decision = gate(Some("s3cret"), false).check("/v1/collections", &headers("s3cret"));
        assert_eq!(decision, GateDecision::Granted);
    }

    #[test]
    fn test_wrong_or_missing_secret_is_denied() {
        let gate = gate(Some("s3cret"), false);
        assert_eq!(gate.check("/v1/collections", &headers("nope")), GateDecision::Denied);
        assert_eq!(gate.check("/v1/collections", &HeaderMap::new()), GateDecision::Denied);
    }

    #[test]
    fn test_root_is_never_gated() {
        assert_eq!(gate(Some("s3cret"), false).check("/", &HeaderMap::new()), GateDecision::Bypass);
        assert_eq!(gate(None, false).check("/", &HeaderMap::new()), GateDecision::Bypass);
    }

    #[test]
    fn test_debug_disables_gate() {
        let decision = gate(None, true).check("/v1/hadiths/random", &HeaderMap::new());
        assert!(decision.is_allowed());
    }

    #[test]
    fn test_no_secret_fails_closed() {
        // even an empty header value must not match a missing secret
        let decision = gate(None, false).check("/v1/collections", &headers(""));
        assert_eq!(decision, GateDecision::Denied);
    }

    #[test]
    fn test_from_config() {
        let config = AuthConfig {
            header: "X-Api-Key".to_string(),
            secret: Some("k".to_string()),
            debug: false,
        };
        let gate = SharedSecretGate::from_config(&config).unwrap();
        assert_eq!(gate.header().as_str(), "x-api-key");
        assert!(!gate.is_debug());
    }
}
