//! Client-side cursor tracking.
//!
//! A client remembers one number: the highest position it has consumed. It
//! starts at [`Position::BEGINNING`] and only ever moves forward. Each fetch
//! asks for everything after it.

use relay_types::{MessageEntry, Position};

/// Tracks the last consumed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorTracker {
    last: Position,
}

impl CursorTracker {
    /// Create a tracker that has seen nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker resuming after `cursor`.
    pub fn with_cursor(cursor: Position) -> Self {
        Self { last: cursor }
    }

    /// The last consumed position (the cursor for the next fetch).
    pub fn last(&self) -> Position {
        self.last
    }

    /// Record a fetched batch and return the entries not seen before.
    ///
    /// Entries at or below the cursor are dropped, so replaying an old batch
    /// delivers nothing twice. The cursor advances to the highest position
    /// returned and never moves backwards.
    pub fn observe(&mut self, mut batch: Vec<MessageEntry>) -> Vec<MessageEntry> {
        batch.sort_by_key(|entry| entry.index);

        let mut fresh = Vec::with_capacity(batch.len());
        for entry in batch {
            if entry.index > self.last {
                self.last = entry.index;
                fresh.push(entry);
            }
        }
        fresh
    }

    /// Move the cursor back to the beginning.
    pub fn reset(&mut self) {
        self.last = Position::BEGINNING;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: i64) -> MessageEntry {
        MessageEntry {
            index: Position::new(index),
            message: format!("msg {index}"),
        }
    }

    #[test]
    fn new_tracker_starts_at_sentinel() {
        let tracker = CursorTracker::new();
        assert_eq!(tracker.last(), Position::BEGINNING);
    }

    #[test]
    fn observe_advances_to_max() {
        let mut tracker = CursorTracker::new();
        let fresh = tracker.observe(vec![entry(0), entry(1), entry(2)]);
        assert_eq!(fresh.len(), 3);
        assert_eq!(tracker.last(), Position::new(2));
    }

    #[test]
    fn empty_batch_keeps_cursor() {
        let mut tracker = CursorTracker::with_cursor(Position::new(5));
        assert!(tracker.observe(Vec::new()).is_empty());
        assert_eq!(tracker.last(), Position::new(5));
    }

    #[test]
    fn replayed_entries_are_dropped() {
        let mut tracker = CursorTracker::new();
        tracker.observe(vec![entry(0), entry(1)]);

        let fresh = tracker.observe(vec![entry(0), entry(1), entry(2)]);
        assert_eq!(fresh, vec![entry(2)]);
    }

    #[test]
    fn cursor_never_moves_backwards() {
        let mut tracker = CursorTracker::with_cursor(Position::new(10));
        assert!(tracker.observe(vec![entry(3)]).is_empty());
        assert_eq!(tracker.last(), Position::new(10));
    }

    #[test]
    fn unordered_batch_is_delivered_in_order() {
        let mut tracker = CursorTracker::new();
        let fresh = tracker.observe(vec![entry(2), entry(0), entry(1)]);
        let order: Vec<_> = fresh.iter().map(|e| e.index.value()).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn duplicate_entries_in_one_batch_are_delivered_once() {
        let mut tracker = CursorTracker::new();
        let fresh = tracker.observe(vec![entry(0), entry(0), entry(1)]);
        assert_eq!(fresh.len(), 2);
    }

    #[test]
    fn reset_returns_to_sentinel() {
        let mut tracker = CursorTracker::with_cursor(Position::new(3));
        tracker.reset();
        assert!(tracker.last().is_beginning());
    }
}
