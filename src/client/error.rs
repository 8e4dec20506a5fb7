//! Normalized errors for backend requests.
//!
//! Every failure leaving the client manager is classified into one
//! [`ApiError`] variant; raw transport errors never cross this boundary.

use thiserror::Error;

/// Context carried by every normalized request error.
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    /// Backend key the request targeted.
    pub backend: String,
    /// Full URL of the attempted request.
    pub url: String,
    /// HTTP method as sent.
    pub method: String,
    /// Request correlation id, also sent as `X-Request-Id`.
    pub request_id: String,
    /// Display form of the underlying transport error, when one exists.
    pub original: Option<String>,
}

/// Errors surfaced by the backend client manager.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The key names no live client: unknown, or disabled in configuration.
    #[error("Backend '{backend}' is not configured")]
    NotConfigured { backend: String },

    /// Could not reach the backend at all.
    #[error("Connection to backend '{}' failed: {}", .details.backend, .source)]
    ConnectionRefused {
        details: ErrorDetails,
        #[source]
        source: reqwest::Error,
    },

    /// The backend did not answer within its configured timeout.
    #[error("Request to backend '{}' timed out after {}ms", .details.backend, .timeout_ms)]
    Timeout {
        details: ErrorDetails,
        timeout_ms: u64,
    },

    /// HTTP 401; the stored token for this backend has been evicted.
    #[error("Backend '{}' rejected credentials (401)", .details.backend)]
    Unauthorized { details: ErrorDetails },

    /// Any other non-2xx response.
    #[error("Backend '{}' returned HTTP {}", .details.backend, .status)]
    Http {
        details: ErrorDetails,
        status: u16,
        /// Response body, when it could be read.
        body: Option<String>,
    },

    /// The response body was not valid JSON for the expected type.
    #[error("Failed to decode response from backend '{}': {}", .details.backend, .source)]
    Decode {
        details: ErrorDetails,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// HTTP status associated with the error, when one applies.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Stable machine-readable code for UI state selection.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotConfigured { .. } => "not_configured",
            ApiError::ConnectionRefused { .. } => "connection_refused",
            ApiError::Timeout { .. } => "timeout",
            ApiError::Unauthorized { .. } => "unauthorized",
            ApiError::Http { .. } => "http_error",
            ApiError::Decode { .. } => "decode_error",
        }
    }

    /// Request context, absent only for `NotConfigured` (nothing was sent).
    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            ApiError::NotConfigured { .. } => None,
            ApiError::ConnectionRefused { details, .. }
            | ApiError::Timeout { details, .. }
            | ApiError::Unauthorized { details }
            | ApiError::Http { details, .. }
            | ApiError::Decode { details, .. } => Some(details),
        }
    }
}
