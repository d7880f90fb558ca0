//! WebSocket transport for glidepad.
//!
//! A thin I/O layer: it opens one outbound WebSocket connection, writes each
//! [`glidepad_proto::WireMessage`] as one WebSocket message and reports
//! lifecycle changes. Reconnection decisions stay in the Sans-IO channel of
//! `glidepad-core`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod transport;

pub use error::TransportError;
pub use transport::{Connection, ConnectionEvent, ConnectionId, endpoint_url, spawn_connection};
