//! # chatrelay-client
//!
//! Client library for the chatrelay message relay.
//!
//! Applications use this crate to post messages and to receive every message
//! posted by anyone, exactly once and in order.
//!
//! ## Features
//!
//! - **Cursor Tracking**: remembers the last consumed position and only asks for newer messages
//! - **Transport Abstraction**: pluggable transport layer (HTTP, mock)
//! - **Polling Loop**: fixed-delay background polling with delivery over a channel
//!
//! ## Example
//!
//! ```ignore
//! use std::{sync::Arc, time::Duration};
//! use chatrelay_client::{HttpTransport, PollLoop, RelayClient};
//!
//! let client = Arc::new(RelayClient::new(HttpTransport::new("http://127.0.0.1:8000")?));
//! client.post("hello").await?;
//!
//! let (mut rx, _handle) = PollLoop::new(Duration::from_secs(2)).spawn(client);
//! while let Some(entry) = rx.recv().await {
//!     println!("[{}] {}", entry.index, entry.message);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod cursor;
pub mod poll;
pub mod transport;

pub use client::{ClientError, RelayClient};
pub use cursor::CursorTracker;
pub use poll::{PollLoop, DEFAULT_POLL_INTERVAL};
pub use relay_types::{MessageEntry, Position};
pub use transport::{HttpTransport, MockTransport, Transport, TransportError};
