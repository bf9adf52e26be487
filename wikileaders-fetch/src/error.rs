//! Fetch error types.

use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for API and page fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// The server answered with a status the caller cannot use.
    #[error("{endpoint} returned HTTP {status}")]
    UnexpectedStatus {
        /// Endpoint or page URL.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// The API refused the caller's identity. Retrying cannot help.
    #[error("Access to {endpoint} is forbidden")]
    Forbidden {
        /// Endpoint that answered 403.
        endpoint: String,
    },

    /// The retry policy (or the operator) declined to try again.
    #[error("Gave up on {operation} after {attempts} attempt(s): {reason}")]
    Aborted {
        /// Operation that was being retried.
        operation: String,
        /// Attempts made.
        attempts: u32,
        /// Last failure.
        reason: String,
    },

    /// URL could not be parsed or joined.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetchError {
    /// Returns true for errors that must terminate the run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Forbidden { .. } | Self::Aborted { .. })
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// Transport error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Connection could not be established.
    #[error("Connection failed: {0}")]
    Connection(String),
}

impl HttpError {
    /// Determines if the request is worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Self::Connection(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(FetchError::Forbidden { endpoint: "check".into() }.is_fatal());
        assert!(
            FetchError::Aborted {
                operation: "cookie".into(),
                attempts: 3,
                reason: "HTTP 404".into(),
            }
            .is_fatal()
        );
        assert!(
            !FetchError::UnexpectedStatus {
                endpoint: "https://w/x".into(),
                status: 404,
            }
            .is_fatal()
        );
        assert!(!FetchError::Http(HttpError::Connection("reset".into())).is_fatal());
    }

    #[test]
    fn test_transient_classification() {
        assert!(HttpError::Connection("refused".into()).is_transient());
        assert!(!FetchError::Http(HttpError::Connection("refused".into())).is_fatal());
    }
}
