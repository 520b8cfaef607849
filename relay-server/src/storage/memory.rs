//! In-memory message log.

use super::MessageStorage;
use parking_lot::RwLock;
use relay_types::{Message, Position};

/// In-memory append-only message log.
///
/// A message's position equals its index in the backing vec, so a read from
/// any cursor is a single slice. The write lock covers both position
/// assignment and the push, which makes appends linearizable; readers copy
/// out a consistent snapshot under the read lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    messages: RwLock<Vec<Message>>,
}

impl MemoryStore {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the first message after `after`, clamped to the start of the log.
    fn start_index(after: Position) -> usize {
        let start = after.value().saturating_add(1).max(0);
        usize::try_from(start).unwrap_or(usize::MAX)
    }
}

impl MessageStorage for MemoryStore {
    fn append(&self, text: &str) -> Message {
        let mut messages = self.messages.write();
        let position = messages
            .last()
            .map(|m| m.position.next())
            .unwrap_or(Position::FIRST);
        let message = Message::new(position, text);
        messages.push(message.clone());
        message
    }

    fn read_from(&self, after: Position) -> Vec<Message> {
        let start = Self::start_index(after);
        let messages = self.messages.read();
        messages.get(start..).map(<[Message]>::to_vec).unwrap_or_default()
    }

    fn latest(&self) -> Option<Position> {
        self.messages.read().last().map(|m| m.position)
    }

    fn len(&self) -> usize {
        self.messages.read().len()
    }
}
