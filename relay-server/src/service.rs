//! Post and fetch actions over the message log.
//!
//! [`SyncService`] is the only entry point callers use. It decodes request
//! bodies, validates them, and delegates to a [`MessageStorage`]. It keeps no
//! state of its own.

use crate::error::{ServiceError, ServiceResult};
use crate::storage::MessageStorage;
use relay_types::{FetchMessages, FetchResponse, Message, PostAck, PostMessage, Position};
use std::sync::Arc;

/// Stateless façade over a message log.
#[derive(Clone)]
pub struct SyncService {
    store: Arc<dyn MessageStorage>,
    max_message_bytes: usize,
}

impl std::fmt::Debug for SyncService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncService")
            .field("messages", &self.store.len())
            .field("max_message_bytes", &self.max_message_bytes)
            .finish()
    }
}

impl SyncService {
    /// Create a service over the given store.
    ///
    /// Posts longer than `max_message_bytes` are rejected.
    pub fn new(store: Arc<dyn MessageStorage>, max_message_bytes: usize) -> Self {
        Self {
            store,
            max_message_bytes,
        }
    }

    /// Access the underlying store (read-only use: health, metrics).
    pub fn store(&self) -> &dyn MessageStorage {
        self.store.as_ref()
    }

    /// Decode a raw post body and run [`SyncService::post`].
    pub fn handle_post(&self, body: &[u8]) -> ServiceResult<PostAck> {
        let request: PostMessage = relay_types::decode(body)
            .map_err(|e| ServiceError::invalid(format!("malformed post body: {e}")))?;
        self.post(request)
    }

    /// Decode a raw fetch body and run [`SyncService::fetch_since`].
    pub fn handle_fetch(&self, body: &[u8]) -> ServiceResult<FetchResponse> {
        let request: FetchMessages = relay_types::decode(body)
            .map_err(|e| ServiceError::invalid(format!("malformed fetch body: {e}")))?;
        let cursor = request
            .index
            .ok_or_else(|| ServiceError::invalid("missing \"index\" field"))?;
        self.fetch_since(Position::new(cursor))
    }

    /// Append a message to the log.
    ///
    /// Empty and whitespace-only texts are accepted and stored verbatim.
    pub fn post(&self, request: PostMessage) -> ServiceResult<PostAck> {
        let text = request
            .message
            .ok_or_else(|| ServiceError::invalid("missing \"message\" field"))?;

        if text.len() > self.max_message_bytes {
            return Err(ServiceError::invalid(format!(
                "message too long: {} bytes (limit: {} bytes)",
                text.len(),
                self.max_message_bytes
            )));
        }

        let Message { position, .. } = self.store.append(&text);
        tracing::debug!("Appended message at position {} ({} bytes)", position, text.len());

        Ok(PostAck { index: position })
    }

    /// Return every message after `cursor`, ascending.
    pub fn fetch_since(&self, cursor: Position) -> ServiceResult<FetchResponse> {
        if !cursor.is_valid_cursor() {
            return Err(ServiceError::invalid(format!(
                "cursor {} is below the sentinel {}",
                cursor,
                Position::BEGINNING
            )));
        }

        let messages: Vec<_> = self
            .store
            .read_from(cursor)
            .iter()
            .map(Message::to_entry)
            .collect();

        tracing::trace!("Fetched {} messages after cursor {}", messages.len(), cursor);

        Ok(FetchResponse { messages })
    }
}
