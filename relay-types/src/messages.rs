//! Protocol messages for chatrelay.
//!
//! Request and response bodies are JSON objects. The field names `index` and
//! `message` are the protocol's names for a log position and a message text.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{Position, WireError};

/// A message stored in the log.
///
/// The text is shared, so cloning a `Message` out of the store never copies
/// the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Relay-assigned position.
    pub position: Position,
    /// Message body, stored verbatim.
    pub text: Arc<str>,
}

impl Message {
    /// Create a message at the given position.
    pub fn new(position: Position, text: impl Into<Arc<str>>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }

    /// Convert into the wire representation used in fetch responses.
    pub fn to_entry(&self) -> MessageEntry {
        MessageEntry {
            index: self.position,
            message: self.text.to_string(),
        }
    }
}

/// Post a message to the shared channel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostMessage {
    /// Message body. Absent means the request is malformed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PostMessage {
    /// Build a post request for the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
        }
    }
}

/// Acknowledgement that a post was appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAck {
    /// Position assigned to the new message (informational).
    pub index: Position,
}

/// Request every message after a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FetchMessages {
    /// Last position the caller has consumed, or -1 for "from the beginning".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
}

impl FetchMessages {
    /// Build a fetch request for messages after `cursor`.
    pub fn after(cursor: Position) -> Self {
        Self {
            index: Some(cursor.value()),
        }
    }
}

/// A single message in a fetch response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    /// Position of the message.
    pub index: Position,
    /// Message body.
    pub message: String,
}

/// Response to a fetch request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Messages after the requested cursor, ascending by position.
    pub messages: Vec<MessageEntry>,
}

impl FetchResponse {
    /// Highest position in this response, if any.
    pub fn max_index(&self) -> Option<Position> {
        self.messages.iter().map(|m| m.index).max()
    }
}

/// Serialize a protocol body to JSON bytes.
pub fn encode<T: Serialize>(body: &T) -> Result<Vec<u8>, WireError> {
    serde_json::to_vec(body).map_err(WireError::Serialization)
}

/// Deserialize a protocol body from JSON bytes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WireError> {
    serde_json::from_slice(bytes).map_err(WireError::Deserialization)
}
