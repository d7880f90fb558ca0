//! Connection channel state machine.
//!
//! Owns the lifecycle of one outbound connection and decides when to
//! reconnect. Uses the action pattern: methods take time as input and return
//! actions for the driver to execute. Socket I/O happens elsewhere.
//!
//! # State Machine
//!
//! ```text
//!             opened            closed / failed
//! ┌────────────┐    ┌──────┐    ┌────────┐
//! │ Connecting │───>│ Open │───>│ Closed │
//! └────────────┘    └──────┘    └────────┘
//!       ^  │ failed                  │ reconnect delay
//!       │  └─────────────────────────┤
//!       └────────────────────────────┘
//! ```
//!
//! Sends are only forwarded while `Open`. Anything offered in another state
//! is dropped and counted: motion and scroll recompute fresh values on the
//! next tick, and clicks are not queued.

use std::time::Duration;

use glidepad_proto::WireMessage;

use crate::{error::ChannelError, time::Timestamp};

/// Delay before reconnecting (or restarting) after the connection closes.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Actions returned by the channel state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelAction {
    /// Open a new connection to the configured endpoint
    Connect,

    /// Write this message as one transport write
    Write(WireMessage),

    /// Discard all pipeline state and start over with a fresh channel
    Restart,
}

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Connection attempt in flight
    Connecting,
    /// Connection established; writes are forwarded
    Open,
    /// Connection lost; waiting for the reconnect delay
    Closed,
}

/// What to do once the reconnect delay lapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconnectPolicy {
    /// Restart the whole pipeline, losing recognizer and aggregator state.
    ReloadOnClose,
    /// Reconnect the channel alone; the pipeline keeps running.
    #[default]
    ReconnectInPlace,
}

/// Channel configuration
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Behaviour after an unexpected close
    pub policy: ReconnectPolicy,
    /// Delay between the close and the next attempt
    pub reconnect_delay: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { policy: ReconnectPolicy::default(), reconnect_delay: DEFAULT_RECONNECT_DELAY }
    }
}

/// Connection channel state machine.
///
/// Pure state machine: no I/O, time passed as parameters. Generic over the
/// instant type to support virtual time in tests.
#[derive(Debug, Clone)]
pub struct Channel<I>
where
    I: Timestamp,
{
    /// Current state
    state: ConnectionState,
    /// Configuration
    config: ChannelConfig,
    /// When to retry. `Some` only while `Closed`.
    retry_at: Option<I>,
    /// Connection attempts since the last successful open
    attempts: u32,
    /// Messages forwarded to the transport
    sent: u64,
    /// Messages dropped because the channel was not open
    dropped: u64,
}

impl<I> Channel<I>
where
    I: Timestamp,
{
    /// Create a channel in [`ConnectionState::Connecting`].
    ///
    /// The caller must issue the initial connect returned by
    /// [`Channel::start`].
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            state: ConnectionState::Connecting,
            config,
            retry_at: None,
            attempts: 0,
            sent: 0,
            dropped: 0,
        }
    }

    /// Begin the first connection attempt.
    pub fn start(&mut self) -> Vec<ChannelAction> {
        self.state = ConnectionState::Connecting;
        self.retry_at = None;
        self.attempts = 1;
        tracing::debug!("channel connecting");
        vec![ChannelAction::Connect]
    }

    /// Current connection state
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Reconnection policy in effect
    #[must_use]
    pub fn policy(&self) -> ReconnectPolicy {
        self.config.policy
    }

    /// Connection attempts since the last successful open
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Messages forwarded to the transport
    #[must_use]
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Messages dropped because the channel was not open
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Transport reports the connection is established.
    ///
    /// # Errors
    ///
    /// - `ChannelError::InvalidState` if not in `Connecting`
    pub fn handle_opened(&mut self) -> Result<(), ChannelError> {
        if self.state != ConnectionState::Connecting {
            return Err(ChannelError::InvalidState { state: self.state, operation: "open" });
        }

        tracing::info!(attempts = self.attempts, "channel open");
        self.state = ConnectionState::Open;
        self.attempts = 0;
        Ok(())
    }

    /// Transport reports the connection closed or the attempt failed.
    ///
    /// Schedules the next attempt. A close while already `Closed` is ignored
    /// so the retry deadline is not pushed back.
    pub fn handle_closed(&mut self, now: I, reason: &str) {
        if self.state == ConnectionState::Closed {
            return;
        }

        tracing::info!(from = ?self.state, reason, "channel closed");

        self.state = ConnectionState::Closed;
        self.retry_at = Some(now + self.config.reconnect_delay);
    }

    /// Offer a message for writing.
    ///
    /// Returns the write action when `Open`. In any other state this is a
    /// no-op apart from the drop counter: no error, no retry, no queue.
    pub fn send(&mut self, message: WireMessage) -> Option<ChannelAction> {
        if self.state == ConnectionState::Open {
            self.sent += 1;
            Some(ChannelAction::Write(message))
        } else {
            self.dropped += 1;
            tracing::debug!(state = ?self.state, dropped = self.dropped, "dropping message");
            None
        }
    }

    /// Next instant at which [`Channel::handle_timeout`] has work to do.
    #[must_use]
    pub fn poll_timeout(&self) -> Option<I> {
        self.retry_at
    }

    /// Fire the reconnect deadline if it has passed.
    pub fn handle_timeout(&mut self, now: I) -> Vec<ChannelAction> {
        match self.retry_at {
            Some(at) if at <= now => {},
            _ => return Vec::new(),
        }

        debug_assert_eq!(self.state, ConnectionState::Closed);
        self.retry_at = None;

        match self.config.policy {
            ReconnectPolicy::ReconnectInPlace => {
                self.state = ConnectionState::Connecting;
                self.attempts += 1;
                tracing::debug!(attempts = self.attempts, "channel reconnecting");
                vec![ChannelAction::Connect]
            },
            ReconnectPolicy::ReloadOnClose => {
                tracing::debug!("channel requesting restart");
                vec![ChannelAction::Restart]
            },
        }
    }
}
