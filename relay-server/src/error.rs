//! Error types for chatrelay-server.

use relay_types::ErrorKind;

/// Main error type for relay server operations.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Request rejected by the sync service.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced to callers of the post and fetch actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Malformed post body or cursor.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Why the input was rejected.
        reason: String,
    },

    /// Post quota exceeded for this client.
    #[error("rate limit exceeded: {reason}")]
    RateLimited {
        /// Which limit was hit.
        reason: String,
    },
}

impl ServiceError {
    /// Shorthand for an [`ServiceError::InvalidInput`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// The wire category for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
        }
    }
}

impl From<crate::limits::RateLimitError> for ServiceError {
    fn from(err: crate::limits::RateLimitError) -> Self {
        Self::RateLimited {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Result type alias for sync service operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::RateLimitError;

    #[test]
    fn invalid_input_display() {
        let err = ServiceError::invalid("missing \"message\" field");
        assert_eq!(err.to_string(), "invalid input: missing \"message\" field");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn rate_limit_converts() {
        let err: ServiceError = RateLimitError::PostLimitExceeded.into();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert_eq!(err.to_string(), "rate limit exceeded: post rate limit exceeded");
    }

    #[test]
    fn service_error_wraps_into_relay_error() {
        let err: RelayError = ServiceError::invalid("bad cursor").into();
        assert!(err.to_string().starts_with("service error:"));
    }
}
