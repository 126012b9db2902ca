//! Client error types

use portal_core::SessionError;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Body of a non-2xx response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    /// Structured `detail` field, when the backend sent one
    pub detail: Option<String>,
    pub body: String,
}

impl ErrorResponse {
    pub fn new(status: u16, body: String) -> Self {
        Self {
            status,
            detail: extract_detail(&body),
            body,
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.detail, self.body.is_empty()) {
            (Some(detail), _) => f.write_str(detail),
            (None, false) => f.write_str(&self.body),
            (None, true) => write!(f, "HTTP {}", self.status),
        }
    }
}

/// Pull the human-readable `detail` out of an error body.
///
/// Validation failures carry a list of `{loc, msg, type}` entries; their
/// messages are joined.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Bad request or failed validation
    #[error("Bad request: {0}")]
    BadRequest(ErrorResponse),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(ErrorResponse),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(ErrorResponse),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(ErrorResponse),

    /// Server returned any other error status
    #[error("Server error {status}: {0}", status = .0.status)]
    ServerError(ErrorResponse),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The session could not be persisted or cleared
    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),
}

impl ClientError {
    /// Create error from HTTP status code and raw response body
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        let response = ErrorResponse::new(status.as_u16(), body);
        match status.as_u16() {
            400 | 422 => Self::BadRequest(response),
            401 => Self::AuthenticationFailed(response),
            403 => Self::Forbidden(response),
            404 => Self::NotFound(response),
            _ => Self::ServerError(response),
        }
    }

    /// The error response, for failures the server reported
    pub fn response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::BadRequest(r)
            | Self::AuthenticationFailed(r)
            | Self::Forbidden(r)
            | Self::NotFound(r)
            | Self::ServerError(r) => Some(r),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    /// Server-provided `detail` message
    pub fn detail(&self) -> Option<&str> {
        self.response().and_then(|r| r.detail.as_deref())
    }

    /// Whether the server rejected the credentials (HTTP 401)
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }
}
