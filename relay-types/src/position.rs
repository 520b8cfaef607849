//! Ordering type for the chatrelay message log.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in the append-only message log.
///
/// Assigned by the relay at append time, never by clients. The first message
/// sits at position 0 and each later message gets the next integer. The same
/// type doubles as a client cursor, where [`Position::BEGINNING`] (-1) means
/// "nothing consumed yet".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(i64);

impl Position {
    /// Cursor value meaning "no messages seen". Sorts before every assigned position.
    pub const BEGINNING: Position = Position(-1);

    /// Position assigned to the first message of an empty log.
    pub const FIRST: Position = Position(0);

    /// Create a Position with the given value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the numeric value of this Position.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Whether this is the "from the beginning" sentinel.
    pub fn is_beginning(&self) -> bool {
        *self == Self::BEGINNING
    }

    /// Whether this value is usable as a fetch cursor (at or above the sentinel).
    pub fn is_valid_cursor(&self) -> bool {
        self.0 >= Self::BEGINNING.0
    }

    /// The position immediately after this one.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::BEGINNING
    }
}

impl From<i64> for Position {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.0)
    }
}
