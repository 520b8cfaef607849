//! Periodic polling loop.
//!
//! [`PollLoop`] fetches immediately, then waits `interval` after each
//! response before fetching again. The wait starts only once a response (or
//! error) is in, so a slow relay never sees overlapping polls from one client.
//! Failed fetches are logged and retried on the next cycle.

use std::sync::Arc;
use std::time::Duration;

use relay_types::MessageEntry;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::client::RelayClient;
use crate::transport::Transport;

/// Default delay between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default capacity of the delivery channel.
const DEFAULT_BUFFER: usize = 256;

/// Configuration for a polling loop.
#[derive(Debug, Clone, Copy)]
pub struct PollLoop {
    interval: Duration,
    buffer: usize,
}

impl Default for PollLoop {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl PollLoop {
    /// Poll every `interval` (measured from the end of the previous fetch).
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            buffer: DEFAULT_BUFFER,
        }
    }

    /// Set the delivery channel capacity.
    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer.max(1);
        self
    }

    /// The configured interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start polling on the current tokio runtime.
    ///
    /// New messages arrive on the returned receiver in position order. The
    /// loop stops when the receiver is dropped or the handle is aborted.
    pub fn spawn<T>(self, client: Arc<RelayClient<T>>) -> (mpsc::Receiver<MessageEntry>, JoinHandle<()>)
    where
        T: Transport + 'static,
    {
        let (tx, rx) = mpsc::channel(self.buffer);
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            tracing::debug!("Poll loop started (interval: {:?})", interval);
            loop {
                match client.fetch_new().await {
                    Ok(messages) => {
                        for entry in messages {
                            if tx.send(entry).await.is_err() {
                                tracing::debug!("Poll loop receiver dropped, stopping");
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Fetch failed, retrying in {:?}: {}", interval, e);
                    }
                }

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = tx.closed() => {
                        tracing::debug!("Poll loop receiver dropped, stopping");
                        return;
                    }
                }
            }
        });

        (rx, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockTransport, TransportError};
    use relay_types::Position;

    const TICK: Duration = Duration::from_millis(10);

    async fn recv(rx: &mut mpsc::Receiver<MessageEntry>) -> MessageEntry {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for message")
            .expect("poll loop stopped")
    }

    #[tokio::test]
    async fn delivers_existing_and_new_messages_in_order() {
        let transport = MockTransport::new();
        transport.inject("a");
        transport.inject("b");

        let client = Arc::new(RelayClient::new(transport.clone()));
        let (mut rx, handle) = PollLoop::new(TICK).spawn(client);

        assert_eq!(recv(&mut rx).await.message, "a");
        assert_eq!(recv(&mut rx).await.message, "b");

        transport.inject("c");
        let c = recv(&mut rx).await;
        assert_eq!(c.message, "c");
        assert_eq!(c.index, Position::new(2));

        handle.abort();
    }

    #[tokio::test]
    async fn keeps_polling_after_errors() {
        let transport = MockTransport::new();
        transport.fail_next_fetch(TransportError::ConnectionFailed("refused".into()));
        transport.inject("after outage");

        let client = Arc::new(RelayClient::new(transport));
        let (mut rx, handle) = PollLoop::new(TICK).spawn(client);

        assert_eq!(recv(&mut rx).await.message, "after outage");
        handle.abort();
    }

    #[tokio::test]
    async fn stops_when_receiver_dropped() {
        let client = Arc::new(RelayClient::new(MockTransport::new()));
        let (rx, handle) = PollLoop::new(TICK).spawn(client);
        drop(rx);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("poll loop should stop")
            .expect("poll loop should not panic");
    }

    #[tokio::test]
    async fn cursor_advances_between_polls() {
        let transport = MockTransport::new();
        transport.inject("x");
        let client = Arc::new(RelayClient::new(transport.clone()));
        let (mut rx, handle) = PollLoop::new(TICK).spawn(Arc::clone(&client));

        recv(&mut rx).await;
        // Let at least one more poll happen with the advanced cursor.
        tokio::time::sleep(TICK * 5).await;
        handle.abort();

        let cursors = transport.fetch_cursors();
        assert_eq!(cursors.first(), Some(&-1));
        assert!(cursors.iter().skip(1).all(|&c| c == 0));
    }

    #[test]
    fn buffer_is_at_least_one() {
        let poll = PollLoop::new(TICK).with_buffer(0);
        assert_eq!(poll.buffer, 1);
        assert_eq!(PollLoop::default().interval(), DEFAULT_POLL_INTERVAL);
    }
}
