//! Continuously print new messages.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use chatrelay_client::{PollLoop, RelayClient, Transport};

use super::format_entry;

/// Run the watch command until `shutdown` resolves.
///
/// Returns the number of messages printed.
pub async fn run<T, W, F>(
    client: Arc<RelayClient<T>>,
    poll: PollLoop,
    out: &mut W,
    shutdown: F,
) -> Result<usize>
where
    T: Transport + 'static,
    W: Write,
    F: Future<Output = ()>,
{
    let (mut rx, handle) = poll.spawn(client);
    tokio::pin!(shutdown);

    let mut printed = 0;
    loop {
        tokio::select! {
            entry = rx.recv() => {
                let Some(entry) = entry else { break };
                writeln!(out, "{}", format_entry(&entry)).context("Failed to write output")?;
                out.flush().context("Failed to write output")?;
                printed += 1;
            }
            _ = &mut shutdown => {
                tracing::debug!("Watch interrupted");
                break;
            }
        }
    }

    handle.abort();
    Ok(printed)
}
