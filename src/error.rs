//! Error types and handling.

use thiserror::Error;

/// Errors produced by the salon API client.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP transport failed (connection refused, DNS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Access token missing or rejected (HTTP 401).
    #[error("Authentication failed: token missing or expired")]
    Authentication,

    /// Requested resource does not exist (HTTP 404).
    #[error("Not found")]
    NotFound,

    /// Too many requests (HTTP 429).
    #[error("Rate limit exceeded{}", retry_hint(.retry_after))]
    RateLimited {
        /// Seconds until the next request is allowed, from `Retry-After`.
        retry_after: Option<u64>,
    },

    /// Upstream server error (HTTP 5xx).
    #[error("Server error: HTTP {status}")]
    Server { status: u16 },

    /// Any other non-success status.
    #[error("API error: HTTP {status}")]
    Api { status: u16 },

    /// Response body did not match the expected schema.
    #[error("Decode error: {0}")]
    Decode(String),
}

fn retry_hint(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(secs) => format!(" (retry after {secs}s)"),
        None => String::new(),
    }
}

/// Errors produced by the login flow.
#[derive(Error, Debug)]
pub enum LoginError {
    /// Bad username/password (local gate mismatch or upstream 404).
    #[error("Invalid credentials or bad input")]
    InvalidCredentials,

    /// Upstream returned a status other than 201/404.
    #[error("Unexpected error: HTTP {0}")]
    Unexpected(u16),

    /// Could not reach the upstream API.
    #[error("Error connecting to server: {0}")]
    Connection(String),

    /// The configured credential environment variable is not set.
    #[error("Environment variable {0} is not set")]
    MissingCredential(String),

    /// Login succeeded but the response body was malformed.
    #[error("Malformed login response: {0}")]
    Decode(String),
}

/// Result type alias for ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create a decode error with message
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Whether this error came from HTTP status classification
    /// rather than transport or decode failure.
    pub fn is_status_error(&self) -> bool {
        matches!(
            self,
            Self::Authentication | Self::NotFound | Self::RateLimited { .. } | Self::Server { .. } | Self::Api { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_message_includes_hint() {
        let err = ApiError::RateLimited { retry_after: Some(30) };
        assert_eq!(err.to_string(), "Rate limit exceeded (retry after 30s)");

        let err = ApiError::RateLimited { retry_after: None };
        assert_eq!(err.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn test_status_error_classification() {
        assert!(ApiError::Authentication.is_status_error());
        assert!(ApiError::Server { status: 503 }.is_status_error());
        assert!(!ApiError::Decode("bad".into()).is_status_error());
    }
}
