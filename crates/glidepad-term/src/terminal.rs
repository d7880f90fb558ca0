//! Terminal driver for the glidepad client.
//!
//! Implements the [`Driver`] trait using crossterm mouse capture as the
//! gesture surface and a WebSocket connection as the transport.

use std::io::{self, stdout};

use crossterm::{
    ExecutableCommand,
    cursor::MoveTo,
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    style::Print,
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode,
        enable_raw_mode,
    },
};
use futures::StreamExt;
use glidepad_app::{Driver, DriverEvent, TransportEvent};
use glidepad_client::{Connection, ConnectionEvent, ConnectionId, TransportError, spawn_connection};
use glidepad_core::{ConnectionState, gesture::Feedback};
use glidepad_proto::WireMessage;
use thiserror::Error;
use tokio::{sync::mpsc, time::Instant};

use crate::input::{InputMapper, is_quit};

const HINT: &str = "glidepad: drag to move, click, wheel to scroll. q to quit.";

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Write attempted with no connection.
    #[error("not connected")]
    NotConnected,
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Owns the terminal (raw mode, mouse capture) for its lifetime and at most
/// one connection task at a time.
pub struct TerminalDriver {
    event_stream: EventStream,
    mapper: InputMapper,
    url: String,
    connection: Option<Connection>,
    next_id: ConnectionId,
    events_tx: mpsc::UnboundedSender<ConnectionEvent>,
    events_rx: mpsc::UnboundedReceiver<ConnectionEvent>,
}

impl TerminalDriver {
    /// Take over the terminal and prepare to connect to `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be switched to raw mode.
    pub fn new(url: String, mapper: InputMapper) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        let mut out = stdout();
        out.execute(EnterAlternateScreen)?;
        out.execute(EnableMouseCapture)?;
        out.execute(Clear(ClearType::All))?;
        out.execute(MoveTo(0, 0))?;
        out.execute(Print(HINT))?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            event_stream: EventStream::new(),
            mapper,
            url,
            connection: None,
            next_id: 0,
            events_tx,
            events_rx,
        })
    }

    /// Show the connection state in the terminal title.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be written.
    pub fn show_state(state: ConnectionState) -> Result<(), TerminalError> {
        let label = match state {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "connected",
            ConnectionState::Closed => "disconnected",
        };
        stdout().execute(SetTitle(format!("glidepad ({label})")))?;
        Ok(())
    }

    /// Transport event for the current attempt; stale attempts are ignored.
    fn transport_event(&self, event: ConnectionEvent) -> Option<TransportEvent> {
        let current = self.connection.as_ref().map(Connection::id);
        if current != Some(event.id()) {
            tracing::trace!(id = event.id(), "ignoring event from stale connection");
            return None;
        }

        match event {
            ConnectionEvent::Opened { .. } => Some(TransportEvent::Opened),
            ConnectionEvent::Closed { reason, .. } => Some(TransportEvent::Closed { reason }),
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;
    type Instant = Instant;

    async fn next_event(&mut self, deadline: Option<Instant>) -> Result<DriverEvent, Self::Error> {
        loop {
            let sleep = async {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                biased;

                Some(event) = self.events_rx.recv() => {
                    if let Some(event) = self.transport_event(event) {
                        return Ok(DriverEvent::Transport(event));
                    }
                },

                maybe_event = self.event_stream.next() => match maybe_event {
                    Some(Ok(Event::Mouse(mouse))) => {
                        if let Some(input) = self.mapper.map(mouse) {
                            return Ok(DriverEvent::Input(input));
                        }
                    },
                    Some(Ok(Event::Key(key))) if is_quit(key) => return Ok(DriverEvent::Shutdown),
                    Some(Ok(_)) => {},
                    Some(Err(e)) => return Err(TerminalError::Io(e)),
                    None => return Ok(DriverEvent::Shutdown),
                },

                () = sleep => return Ok(DriverEvent::Timeout),
            }
        }
    }

    async fn connect(&mut self) -> Result<(), Self::Error> {
        self.stop();
        self.next_id += 1;
        tracing::debug!(id = self.next_id, url = %self.url, "connecting");
        self.connection =
            Some(spawn_connection(self.next_id, self.url.clone(), self.events_tx.clone()));
        Ok(())
    }

    async fn write(&mut self, message: WireMessage) -> Result<(), Self::Error> {
        let connection = self.connection.as_ref().ok_or(TerminalError::NotConnected)?;
        connection.send(message)?;
        Ok(())
    }

    fn feedback(&mut self, feedback: Feedback) {
        tracing::trace!(?feedback, "feedback");
    }

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn stop(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.stop();
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let mut out = stdout();
        let _ = out.execute(DisableMouseCapture);
        let _ = out.execute(LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}
