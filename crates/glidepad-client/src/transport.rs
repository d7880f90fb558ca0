//! WebSocket connection task.
//!
//! Provides [`Connection`], a handle to a spawned task that owns the socket.
//! Messages go in through a channel and lifecycle changes come out as
//! [`ConnectionEvent`]s, so the task never touches pipeline state.

use futures::{SinkExt, StreamExt};
use glidepad_proto::WireMessage;
use tokio::{
    net::TcpStream,
    sync::mpsc::{self, error::TrySendError},
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async_with_config, tungstenite::Message,
};

use crate::TransportError;

/// Outgoing messages buffered between the runtime and the socket task.
const OUTGOING_CAPACITY: usize = 256;

/// Identifies one connection attempt. Events from earlier attempts are
/// stale once a new one has started.
pub type ConnectionId = u64;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Lifecycle notification from a connection task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Handshake completed.
    Opened {
        /// Attempt this event belongs to
        id: ConnectionId,
    },
    /// Attempt failed or the open connection ended.
    Closed {
        /// Attempt this event belongs to
        id: ConnectionId,
        /// Human-readable cause
        reason: String,
    },
}

impl ConnectionEvent {
    /// Attempt this event belongs to.
    #[must_use]
    pub fn id(&self) -> ConnectionId {
        match self {
            Self::Opened { id } | Self::Closed { id, .. } => *id,
        }
    }
}

/// Handle to a spawned connection task.
///
/// Dropping the handle does not stop the task; call [`Connection::stop`].
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    to_remote: mpsc::Sender<WireMessage>,
    abort_handle: tokio::task::AbortHandle,
}

impl Connection {
    /// Attempt this handle belongs to.
    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue one message for writing without waiting.
    ///
    /// A full queue means the peer has stopped reading. The message is
    /// dropped and `Ok` returned, the same as a write while not open.
    ///
    /// # Errors
    ///
    /// - `TransportError::Closed` if the task has ended
    pub fn send(&self, message: WireMessage) -> Result<(), TransportError> {
        match self.to_remote.try_send(message) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                tracing::trace!(id = self.id, "outgoing queue full, dropping message");
                Ok(())
            },
            Err(TrySendError::Closed(_)) => Err(TransportError::Closed),
        }
    }

    /// Stop the connection task. No further events are reported.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// URL of the remote endpoint.
///
/// IPv6 literals are bracketed.
#[must_use]
pub fn endpoint_url(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("ws://[{host}]:{port}/")
    } else {
        format!("ws://{host}:{port}/")
    }
}

/// Spawn a task that connects to `url` and bridges messages to the socket.
///
/// Exactly one [`ConnectionEvent::Closed`] is reported per attempt unless the
/// task is stopped first, preceded by [`ConnectionEvent::Opened`] if the
/// handshake succeeded.
pub fn spawn_connection(
    id: ConnectionId,
    url: String,
    events: mpsc::UnboundedSender<ConnectionEvent>,
) -> Connection {
    let (to_remote, outgoing) = mpsc::channel(OUTGOING_CAPACITY);
    let handle = tokio::spawn(run_connection(id, url, outgoing, events));

    Connection { id, to_remote, abort_handle: handle.abort_handle() }
}

/// Run one connection attempt to completion.
async fn run_connection(
    id: ConnectionId,
    url: String,
    outgoing: mpsc::Receiver<WireMessage>,
    events: mpsc::UnboundedSender<ConnectionEvent>,
) {
    let reason = match open(&url).await {
        Ok(socket) => {
            tracing::info!(id, %url, "websocket open");
            // Receiver gone means the runtime is shutting down.
            if events.send(ConnectionEvent::Opened { id }).is_err() {
                return;
            }
            match pump(socket, outgoing).await {
                Ok(()) => "closed by remote".to_string(),
                Err(e) => e.to_string(),
            }
        },
        Err(e) => {
            tracing::warn!(id, %url, error = %e, "websocket connect failed");
            drop(outgoing);
            e.to_string()
        },
    };

    // Senders observe the closed queue before the event arrives.
    let _ = events.send(ConnectionEvent::Closed { id, reason });
}

async fn open(url: &str) -> Result<WsStream, TransportError> {
    let (socket, _response) = connect_async_with_config(url, None, true).await?;
    Ok(socket)
}

/// Write outgoing messages until either side closes.
///
/// Inbound data is not part of the protocol and is discarded.
async fn pump(
    socket: WsStream,
    mut outgoing: mpsc::Receiver<WireMessage>,
) -> Result<(), TransportError> {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            message = outgoing.recv() => {
                let Some(message) = message else {
                    let _ = sink.close().await;
                    return Err(TransportError::Closed);
                };
                sink.send(to_ws(message)).await?;
            },
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(?frame, "remote sent close");
                    return Ok(());
                },
                Some(Ok(other)) => {
                    tracing::trace!(len = other.len(), "discarding inbound message");
                },
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
        }
    }
}

fn to_ws(message: WireMessage) -> Message {
    match message {
        WireMessage::Binary(bytes) => Message::Binary(bytes),
        WireMessage::Text(text) => Message::Text(text.into()),
    }
}
