//! One-shot fetch from the relay.

use anyhow::{Context, Result};
use chatrelay_client::{RelayClient, Transport};
use relay_types::{MessageEntry, Position};

use super::format_entry;

/// Run the fetch command: print every message after `after`.
pub async fn run<T: Transport>(client: &RelayClient<T>, after: Position) -> Result<Vec<MessageEntry>> {
    let response = client
        .fetch_after(after)
        .await
        .with_context(|| format!("Failed to fetch messages after {}", after))?;

    for entry in &response.messages {
        println!("{}", format_entry(entry));
    }
    tracing::debug!("Fetched {} messages", response.messages.len());
    Ok(response.messages)
}
