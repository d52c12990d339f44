//! Client error types.

use std::time::Duration;

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A request was rejected locally before anything was sent.
    #[error("Invalid request: {field} {reason}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Server returned a non-2xx response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error code from the server, when the body carried one.
        code: Option<String>,
        /// Server message, or the raw response body when it was not parseable.
        message: String,
    },

    /// Transport failure (connect, timeout, IO while talking to the server).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a local file for upload failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polling for indexing completion gave up.
    #[error("Timed out after {waited:?} waiting for indexing to finish")]
    Timeout {
        /// How long the caller waited.
        waited: Duration,
    },
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Api { status: 401 | 403, .. })
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::Api { status: 429, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }

    /// Check if the server rejected the request itself (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if (400..500).contains(status))
    }

    /// Check if the request was rejected before sending.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Check if this is a network-level failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_))
    }

    /// Whether resending the same request could succeed.
    ///
    /// The client never retries on its own; this only classifies the failure.
    pub fn is_retryable(&self) -> bool {
        self.is_transport() || self.is_rate_limited() || self.is_server_error()
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by the knowledge API.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

/// Build an [`Error::Api`] from a failed response's status and body.
pub(crate) fn api_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => Error::Api {
            status,
            code: err.code,
            message: err.message,
        },
        Err(_) => {
            let body = body.trim();
            Error::Api {
                status,
                code: None,
                message: if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.to_string()
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_json_body() {
        let err = api_error(
            400,
            r#"{"code":"invalid_param","message":"doc_language is required","status":400}"#,
        );
        match err {
            Error::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code.as_deref(), Some("invalid_param"));
                assert_eq!(message, "doc_language is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_keeps_raw_body() {
        let err = api_error(502, "<html>Bad Gateway</html>\n");
        match err {
            Error::Api { code, message, .. } => {
                assert!(code.is_none());
                assert_eq!(message, "<html>Bad Gateway</html>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_empty_body() {
        let err = api_error(500, "");
        assert_eq!(err.to_string(), "API error (500): HTTP 500");
    }

    #[test]
    fn test_classification() {
        assert!(api_error(404, "").is_not_found());
        assert!(api_error(401, "").is_auth_error());
        assert!(api_error(429, "").is_rate_limited());
        assert!(api_error(429, "").is_retryable());
        assert!(api_error(503, "").is_retryable());
        assert!(api_error(400, "").is_client_error());
        assert!(!api_error(400, "").is_retryable());

        let err = Error::validation("name", "must not be empty");
        assert!(err.is_validation());
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Invalid request: name must not be empty");
    }
}
