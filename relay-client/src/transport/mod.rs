//! Transport abstraction for chatrelay.
//!
//! This module provides a pluggable transport layer that abstracts how the
//! post and fetch actions reach the relay (HTTP, mock for testing).
//!
//! # Design
//!
//! The transport trait is async and request/response only:
//! - `post_message()` sends one message body and returns the acknowledgement
//! - `get_messages()` sends a cursor and returns every newer message
//!
//! There is no connection state: every call stands alone, so a failed call
//! can simply be retried on the next poll.

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

use async_trait::async_trait;
use relay_types::{ErrorKind, FetchMessages, FetchResponse, PostAck, PostMessage};
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not reach the relay.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The relay did not answer in time.
    #[error("request timeout")]
    Timeout,

    /// The relay rejected the request with an error body.
    #[error("relay rejected request ({status}, {kind}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error category reported by the relay.
        kind: ErrorKind,
        /// Detail reported by the relay.
        message: String,
    },

    /// The relay answered with an unexpected status and no error body.
    #[error("unexpected status: {0}")]
    Status(u16),

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl TransportError {
    /// Whether retrying the same request later could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout | Self::Status(_) => true,
            Self::Rejected { kind, .. } => *kind == ErrorKind::RateLimited,
            Self::InvalidResponse(_) => false,
        }
    }
}

/// Transport trait for the post and fetch actions.
///
/// Implementations handle the underlying request mechanism
/// (HTTP, in-memory mock, etc).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post one message to the shared channel.
    async fn post_message(&self, request: &PostMessage) -> Result<PostAck, TransportError>;

    /// Fetch every message after the cursor in `request`.
    async fn get_messages(&self, request: &FetchMessages) -> Result<FetchResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(TransportError::Timeout.is_retryable());
        assert!(TransportError::ConnectionFailed("refused".into()).is_retryable());
        assert!(TransportError::Rejected {
            status: 429,
            kind: ErrorKind::RateLimited,
            message: "slow down".into(),
        }
        .is_retryable());
        assert!(!TransportError::Rejected {
            status: 400,
            kind: ErrorKind::InvalidInput,
            message: "bad".into(),
        }
        .is_retryable());
        assert!(!TransportError::InvalidResponse("garbage".into()).is_retryable());
    }

    #[test]
    fn rejected_display_includes_kind() {
        let err = TransportError::Rejected {
            status: 400,
            kind: ErrorKind::InvalidInput,
            message: "missing \"message\" field".into(),
        };
        assert_eq!(
            err.to_string(),
            "relay rejected request (400, invalid_input): missing \"message\" field"
        );
    }
}
