//! CLI command implementations.

pub mod fetch;
pub mod post;
pub mod watch;

use relay_types::MessageEntry;

/// Render one message as a `[index] text` line.
pub fn format_entry(entry: &MessageEntry) -> String {
    format!("[{}] {}", entry.index, entry.message)
}
