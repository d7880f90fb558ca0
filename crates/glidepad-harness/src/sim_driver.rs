//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`glidepad_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Time is `tokio::time::Instant`. Under a paused clock
//! (`#[tokio::test(start_paused = true)]`) sleeping advances virtual time
//! instantly, so scripted timelines run without real delays.

use std::{collections::VecDeque, time::Duration};

use glidepad_app::{Driver, DriverEvent, TransportEvent};
use glidepad_core::gesture::{Feedback, RawInput};
use glidepad_proto::{SemanticAction, WireMessage};
use thiserror::Error;
use tokio::time::Instant;

/// Error type for simulation driver.
#[derive(Debug, Clone, Error)]
pub enum SimDriverError {
    /// Write issued while the simulated transport was closed.
    #[error("write while transport closed")]
    NotConnected,
}

/// One captured transport write.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedWrite {
    /// Virtual time since the driver was created.
    pub at: Duration,
    /// Message as handed to the transport.
    pub message: WireMessage,
}

impl CapturedWrite {
    /// Decoded action. `None` if the message is malformed.
    pub fn action(&self) -> Option<SemanticAction> {
        self.message.decode().ok()
    }
}

/// What the simulated host does when asked to connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectBehavior {
    /// Accept immediately.
    #[default]
    Accept,
    /// Refuse the next `n` attempts, then accept.
    Refuse(u32),
    /// Never answer.
    Silent,
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`glidepad_app::Runtime`]
/// orchestration code runs in both production and simulation tests.
pub struct SimDriver {
    origin: Instant,
    script: VecDeque<(Instant, DriverEvent)>,
    immediate: VecDeque<DriverEvent>,
    behavior: ConnectBehavior,
    connected: bool,
    writes: Vec<CapturedWrite>,
    rejected_writes: usize,
    feedback: Vec<Feedback>,
    connects: usize,
    stops: usize,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a driver whose virtual time origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            script: VecDeque::new(),
            immediate: VecDeque::new(),
            behavior: ConnectBehavior::default(),
            connected: false,
            writes: Vec::new(),
            rejected_writes: 0,
            feedback: Vec::new(),
            connects: 0,
            stops: 0,
        }
    }

    /// Set how connection attempts are answered.
    #[must_use]
    pub fn with_connect_behavior(mut self, behavior: ConnectBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Schedule a raw input sample at `offset` from the origin.
    #[must_use]
    pub fn input_at(self, offset: Duration, input: RawInput) -> Self {
        self.event_at(offset, DriverEvent::Input(input))
    }

    /// Schedule a transport event at `offset` from the origin.
    #[must_use]
    pub fn transport_at(self, offset: Duration, event: TransportEvent) -> Self {
        self.event_at(offset, DriverEvent::Transport(event))
    }

    /// Schedule shutdown at `offset` from the origin.
    #[must_use]
    pub fn shutdown_at(self, offset: Duration) -> Self {
        self.event_at(offset, DriverEvent::Shutdown)
    }

    /// Schedule any event at `offset` from the origin.
    ///
    /// Events are kept in time order; events at the same instant keep their
    /// insertion order.
    #[must_use]
    pub fn event_at(mut self, offset: Duration, event: DriverEvent) -> Self {
        let at = self.origin + offset;
        let index = self.script.partition_point(|(t, _)| *t <= at);
        self.script.insert(index, (at, event));
        self
    }

    /// Virtual time origin.
    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// Whether the simulated transport is open.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// All captured writes.
    pub fn writes(&self) -> &[CapturedWrite] {
        &self.writes
    }

    /// Decoded actions of all captured writes, in order.
    pub fn actions(&self) -> Vec<SemanticAction> {
        self.writes.iter().filter_map(CapturedWrite::action).collect()
    }

    /// Writes refused because the simulated transport was closed.
    pub fn rejected_writes(&self) -> usize {
        self.rejected_writes
    }

    /// Feedback handed to the driver.
    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    /// Connection attempts made.
    pub fn connects(&self) -> usize {
        self.connects
    }

    /// Times the connection was stopped.
    pub fn stops(&self) -> usize {
        self.stops
    }

    /// Events still scheduled.
    pub fn remaining(&self) -> usize {
        self.script.len() + self.immediate.len()
    }

    fn deliver(&mut self, event: DriverEvent) -> DriverEvent {
        if let DriverEvent::Transport(transport) = &event {
            self.connected = matches!(transport, TransportEvent::Opened);
        }
        event
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Instant = Instant;

    async fn next_event(&mut self, deadline: Option<Instant>) -> Result<DriverEvent, Self::Error> {
        if let Some(event) = self.immediate.pop_front() {
            return Ok(self.deliver(event));
        }

        let next_at = self.script.front().map(|(at, _)| *at);
        match (next_at, deadline) {
            (Some(at), Some(deadline)) if deadline < at => {
                tokio::time::sleep_until(deadline).await;
                Ok(DriverEvent::Timeout)
            },
            (Some(at), _) => {
                tokio::time::sleep_until(at).await;
                match self.script.pop_front() {
                    Some((_, event)) => Ok(self.deliver(event)),
                    None => Ok(DriverEvent::Timeout),
                }
            },
            (None, Some(deadline)) => {
                tokio::time::sleep_until(deadline).await;
                Ok(DriverEvent::Timeout)
            },
            (None, None) => Ok(DriverEvent::Shutdown),
        }
    }

    async fn connect(&mut self) -> Result<(), Self::Error> {
        self.connects += 1;
        self.connected = false;
        tracing::trace!(attempt = self.connects, behavior = ?self.behavior, "simulated connect");

        match self.behavior {
            ConnectBehavior::Accept => {
                self.immediate.push_back(DriverEvent::Transport(TransportEvent::Opened));
            },
            ConnectBehavior::Refuse(n) => {
                self.behavior =
                    if n <= 1 { ConnectBehavior::Accept } else { ConnectBehavior::Refuse(n - 1) };
                self.immediate.push_back(DriverEvent::Transport(TransportEvent::Closed {
                    reason: "connection refused".to_string(),
                }));
            },
            ConnectBehavior::Silent => {},
        }
        Ok(())
    }

    async fn write(&mut self, message: WireMessage) -> Result<(), Self::Error> {
        if !self.connected {
            self.rejected_writes += 1;
            return Err(SimDriverError::NotConnected);
        }

        let at = Instant::now() - self.origin;
        self.writes.push(CapturedWrite { at, message });
        Ok(())
    }

    fn feedback(&mut self, feedback: Feedback) {
        self.feedback.push(feedback);
    }

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.connected = false;
    }
}
