//! # chatrelay-server
//!
//! In-memory message relay for chatrelay.
//!
//! This crate implements a relay server that:
//! - Accepts short text messages from any number of clients
//! - Appends them to a single append-only log, assigning each a position
//! - Answers "everything after position N" queries for polling clients
//! - Keeps nothing on disk (the log lives as long as the process)
//!
//! ## Architecture
//!
//! ```text
//! Client A ──┐   POST /api/postMessage   ┌── Client B
//!            │   POST /api/getMessages   │
//!            ├──────────────────────────►│
//!        ┌───┴───────────────────────────┴───┐
//!        │          chatrelay-server         │
//!        │  SyncService ──► MessageStorage   │
//!        │                  (MemoryStore)    │
//!        └───────────────────────────────────┘
//! ```
//!
//! ## Protocol
//!
//! - `{"message": text}` → `{"index": position}` (post)
//! - `{"index": cursor}` → `{"messages": [{"index", "message"}, ...]}` (fetch)
//!
//! A cursor of `-1` fetches from the beginning.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod http;
pub mod limits;
pub mod maintenance;
pub mod server;
pub mod service;
pub mod storage;

pub use config::Config;
pub use error::{RelayError, ServiceError};
pub use server::ChatRelay;
pub use service::SyncService;
pub use storage::{MemoryStore, MessageStorage};
