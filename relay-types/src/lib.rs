//! # chatrelay-types
//!
//! Wire format types for the chatrelay message log protocol.
//!
//! This crate provides the types shared by the relay server and its clients:
//! - [`Position`] - Ordering type for the append-only log (and client cursors)
//! - [`Message`] - A stored message and its assigned position
//! - [`PostMessage`], [`PostAck`], [`FetchMessages`], [`FetchResponse`] - Request/response bodies
//! - [`ErrorKind`], [`ErrorBody`], [`WireError`] - Error reporting

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod messages;
mod position;

pub use error::{ErrorBody, ErrorKind, WireError};
pub use messages::{
    decode, encode, FetchMessages, FetchResponse, Message, MessageEntry, PostAck, PostMessage,
};
pub use position::Position;
