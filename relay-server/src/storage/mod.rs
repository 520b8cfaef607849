//! Storage layer for chatrelay-server.
//!
//! Provides the append-only message log with position-based reads.

mod memory;

pub use memory::MemoryStore;

use relay_types::{Message, Position};

/// Trait for message log backends.
///
/// Implementations receive only validated input; all checks happen in
/// [`crate::service::SyncService`] before the store is touched.
pub trait MessageStorage: Send + Sync {
    /// Append a message and assign it the next position.
    ///
    /// Returns the stored message. Concurrent appends never share a position.
    fn append(&self, text: &str) -> Message;

    /// Get every message with a position greater than `after`, ascending.
    ///
    /// `Position::BEGINNING` reads the whole log. Returns an empty vec when
    /// nothing newer exists.
    fn read_from(&self, after: Position) -> Vec<Message>;

    /// Position of the most recent message, or `None` if the log is empty.
    fn latest(&self) -> Option<Position>;

    /// Number of stored messages.
    fn len(&self) -> usize;

    /// Whether the log holds no messages.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
