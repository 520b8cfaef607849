//! Post a message to the relay.

use anyhow::{Context, Result};
use chatrelay_client::{RelayClient, Transport};
use relay_types::Position;

/// Run the post command. Prints and returns the assigned position.
pub async fn run<T: Transport>(client: &RelayClient<T>, text: &str) -> Result<Position> {
    let position = client
        .post(text)
        .await
        .context("Failed to post message")?;
    println!("{}", position);
    Ok(position)
}
