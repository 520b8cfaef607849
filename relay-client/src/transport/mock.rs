//! Mock transport for testing.
//!
//! Keeps its own in-memory log with relay semantics, and allows injecting
//! failures and inspecting the cursors that were requested.

use super::{Transport, TransportError};
use async_trait::async_trait;
use parking_lot::Mutex;
use relay_types::{
    ErrorKind, FetchMessages, FetchResponse, MessageEntry, PostAck, PostMessage, Position,
};
use std::sync::Arc;

/// Mock transport for testing.
///
/// Clones share the same log, so one clone can play "another client" posting
/// while the code under test polls through a second.
#[derive(Debug, Default, Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    log: Vec<String>,
    fetch_cursors: Vec<i64>,
    fail_next_post: Option<TransportError>,
    fail_next_fetch: Option<TransportError>,
}

impl MockTransport {
    /// Create a new mock transport with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message directly, as if another client had posted it.
    pub fn inject(&self, text: &str) -> Position {
        let mut inner = self.inner.lock();
        inner.log.push(text.to_string());
        Position::new(inner.log.len() as i64 - 1)
    }

    /// All message texts in the mock log, in order.
    pub fn posted(&self) -> Vec<String> {
        self.inner.lock().log.clone()
    }

    /// Cursors sent with each fetch, in call order.
    pub fn fetch_cursors(&self) -> Vec<i64> {
        self.inner.lock().fetch_cursors.clone()
    }

    /// Cause the next post_message() to fail with the given error.
    pub fn fail_next_post(&self, error: TransportError) {
        self.inner.lock().fail_next_post = Some(error);
    }

    /// Cause the next get_messages() to fail with the given error.
    pub fn fail_next_fetch(&self, error: TransportError) {
        self.inner.lock().fail_next_fetch = Some(error);
    }

    /// Clear all state (log, captured cursors, pending failures).
    pub fn reset(&self) {
        *self.inner.lock() = MockTransportInner::default();
    }
}

fn invalid_input(message: &str) -> TransportError {
    TransportError::Rejected {
        status: 400,
        kind: ErrorKind::InvalidInput,
        message: message.to_string(),
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_message(&self, request: &PostMessage) -> Result<PostAck, TransportError> {
        let mut inner = self.inner.lock();

        if let Some(error) = inner.fail_next_post.take() {
            return Err(error);
        }

        let text = request
            .message
            .as_ref()
            .ok_or_else(|| invalid_input("missing \"message\" field"))?;
        inner.log.push(text.clone());
        Ok(PostAck {
            index: Position::new(inner.log.len() as i64 - 1),
        })
    }

    async fn get_messages(&self, request: &FetchMessages) -> Result<FetchResponse, TransportError> {
        let mut inner = self.inner.lock();

        if let Some(error) = inner.fail_next_fetch.take() {
            return Err(error);
        }

        let cursor = request
            .index
            .ok_or_else(|| invalid_input("missing \"index\" field"))?;
        inner.fetch_cursors.push(cursor);

        if !Position::new(cursor).is_valid_cursor() {
            return Err(invalid_input("cursor is below the sentinel"));
        }

        let start = usize::try_from(cursor.saturating_add(1)).unwrap_or(usize::MAX);
        let messages = inner
            .log
            .iter()
            .enumerate()
            .skip(start)
            .map(|(i, text)| MessageEntry {
                index: Position::new(i as i64),
                message: text.clone(),
            })
            .collect();

        Ok(FetchResponse { messages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn post_assigns_sequential_positions() {
        let transport = MockTransport::new();
        let a = transport.post_message(&PostMessage::new("a")).await.unwrap();
        let b = transport.post_message(&PostMessage::new("b")).await.unwrap();
        assert_eq!(a.index, Position::new(0));
        assert_eq!(b.index, Position::new(1));
        assert_eq!(transport.posted(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn fetch_filters_by_cursor() {
        let transport = MockTransport::new();
        transport.inject("a");
        transport.inject("b");
        transport.inject("c");

        let response = transport
            .get_messages(&FetchMessages::after(Position::new(0)))
            .await
            .unwrap();
        let texts: Vec<_> = response.messages.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
        assert_eq!(transport.fetch_cursors(), vec![0]);
    }

    #[tokio::test]
    async fn fetch_rejects_cursor_below_sentinel() {
        let transport = MockTransport::new();
        let err = transport
            .get_messages(&FetchMessages { index: Some(-3) })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransportError::Rejected {
                kind: ErrorKind::InvalidInput,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn injected_failures_fire_once() {
        let transport = MockTransport::new();
        transport.fail_next_fetch(TransportError::Timeout);

        let request = FetchMessages::after(Position::BEGINNING);
        assert!(matches!(
            transport.get_messages(&request).await,
            Err(TransportError::Timeout)
        ));
        assert!(transport.get_messages(&request).await.is_ok());
    }

    #[tokio::test]
    async fn clones_share_the_log() {
        let transport = MockTransport::new();
        let other = transport.clone();
        other.inject("from elsewhere");
        assert_eq!(transport.posted(), vec!["from elsewhere"]);

        transport.reset();
        assert!(other.posted().is_empty());
    }
}
