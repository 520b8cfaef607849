//! RelayClient - the main interface for chatrelay callers.
//!
//! This module provides [`RelayClient`], which pairs a [`Transport`] with a
//! [`CursorTracker`] so callers only ever see messages they have not seen.
//!
//! # Example
//!
//! ```ignore
//! use chatrelay_client::{HttpTransport, RelayClient};
//!
//! let transport = HttpTransport::new("http://127.0.0.1:8000")?;
//! let client = RelayClient::new(transport);
//!
//! client.post("hello").await?;
//! for entry in client.fetch_new().await? {
//!     println!("[{}] {}", entry.index, entry.message);
//! }
//! ```

use relay_types::{FetchMessages, FetchResponse, MessageEntry, PostMessage, Position};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::cursor::CursorTracker;
use crate::transport::{Transport, TransportError};

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A cursor below the "from the beginning" sentinel was supplied.
    #[error("invalid cursor: {0} (must be >= -1)")]
    InvalidCursor(Position),
}

/// The main relay client.
///
/// Safe to share between tasks; concurrent `fetch_new` calls are serialized
/// so each message is handed out once.
pub struct RelayClient<T: Transport> {
    transport: T,
    cursor: Mutex<CursorTracker>,
}

impl<T: Transport> std::fmt::Debug for RelayClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayClient").finish_non_exhaustive()
    }
}

impl<T: Transport> RelayClient<T> {
    /// Create a client that starts from the beginning of the log.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cursor: Mutex::new(CursorTracker::new()),
        }
    }

    /// Create a client that resumes after `cursor`.
    pub fn with_cursor(transport: T, cursor: Position) -> Result<Self, ClientError> {
        if !cursor.is_valid_cursor() {
            return Err(ClientError::InvalidCursor(cursor));
        }
        Ok(Self {
            transport,
            cursor: Mutex::new(CursorTracker::with_cursor(cursor)),
        })
    }

    /// Post a message. Returns the position the relay assigned.
    pub async fn post(&self, text: &str) -> Result<Position, ClientError> {
        let ack = self.transport.post_message(&PostMessage::new(text)).await?;
        tracing::debug!("Posted message at position {}", ack.index);
        Ok(ack.index)
    }

    /// Fetch messages after the tracked cursor and advance it.
    ///
    /// Returns only messages this client has not received before, ascending.
    /// On error the cursor is left unchanged, so the next call retries the
    /// same range.
    pub async fn fetch_new(&self) -> Result<Vec<MessageEntry>, ClientError> {
        let mut cursor = self.cursor.lock().await;
        let response = self
            .transport
            .get_messages(&FetchMessages::after(cursor.last()))
            .await?;

        let fresh = cursor.observe(response.messages);
        if !fresh.is_empty() {
            tracing::debug!("Received {} new messages (cursor now {})", fresh.len(), cursor.last());
        }
        Ok(fresh)
    }

    /// Fetch messages after an explicit cursor without touching the tracked one.
    pub async fn fetch_after(&self, cursor: Position) -> Result<FetchResponse, ClientError> {
        if !cursor.is_valid_cursor() {
            return Err(ClientError::InvalidCursor(cursor));
        }
        Ok(self.transport.get_messages(&FetchMessages::after(cursor)).await?)
    }

    /// The last position this client has consumed.
    pub async fn cursor(&self) -> Position {
        self.cursor.lock().await.last()
    }

    /// Get a reference to the transport (for testing).
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
