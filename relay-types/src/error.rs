//! Error types for chatrelay.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while encoding or decoding protocol bodies.
#[derive(Debug, Error)]
pub enum WireError {
    /// JSON serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// JSON deserialization failed
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),
}

/// Category of a failed request, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed post body or cursor.
    InvalidInput,
    /// Too many posts from this client.
    RateLimited,
    /// Unknown endpoint.
    NotFound,
    /// Anything the caller cannot fix.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidInput => "invalid_input",
            Self::RateLimited => "rate_limited",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// JSON body returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error category.
    pub error: ErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl ErrorBody {
    /// Create an error body.
    pub fn new(error: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::InvalidInput).unwrap();
        assert_eq!(json, "\"invalid_input\"");
        assert_eq!(ErrorKind::RateLimited.to_string(), "rate_limited");
    }

    #[test]
    fn error_body_roundtrip() {
        let body = ErrorBody::new(ErrorKind::NotFound, "no such endpoint");
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"not_found","message":"no such endpoint"}"#);
        let parsed: ErrorBody = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, body);
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WireError>();
    }
}
