//! Transport errors.

use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection task is gone; the socket closed or was stopped.
    #[error("connection closed")]
    Closed,

    /// WebSocket handshake or I/O failure.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}
