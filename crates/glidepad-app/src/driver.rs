//! The I/O seam of the runtime.
//!
//! A [`Driver`] supplies raw input, transport lifecycle events and the clock,
//! and carries out connects, writes and feedback. Everything between those
//! ends is decided by [`crate::Runtime`] and the pipeline it owns.

use std::future::Future;

use glidepad_core::{Timestamp, gesture::Feedback};
use glidepad_proto::WireMessage;

use crate::DriverEvent;

/// Input surface, transport and clock for one [`Runtime`](crate::Runtime).
///
/// # Implementations
///
/// - **Terminal**: crossterm mouse capture, tokio-tungstenite transport
/// - **Simulation**: scripted input and captured writes on tokio's paused
///   clock
///
/// # Associated Types
///
/// - [`Error`](Driver::Error): failure of the input source or transport
/// - [`Instant`](Driver::Instant): wall clock or virtual clock
pub trait Driver: Send {
    /// Input source or transport failure.
    type Error: std::error::Error + Send + 'static;

    /// Clock reading passed to every pipeline call.
    type Instant: Timestamp;

    /// Wait for the next event.
    ///
    /// Returns [`DriverEvent::Timeout`] once `deadline` is reached with
    /// nothing else to report. `None` waits indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if the input source fails.
    fn next_event(
        &mut self,
        deadline: Option<Self::Instant>,
    ) -> impl Future<Output = Result<DriverEvent, Self::Error>> + Send;

    /// Start connecting to the remote host.
    ///
    /// Success or failure of the attempt is reported later as a
    /// [`crate::TransportEvent`].
    ///
    /// # Errors
    ///
    /// Returns an error if the attempt cannot be started. The runtime treats
    /// this like a close.
    fn connect(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Write one message to the open connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is gone. The runtime treats this
    /// like a close.
    fn write(&mut self, message: WireMessage) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Show local feedback. Must not fail.
    fn feedback(&mut self, feedback: Feedback);

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Tear down the current connection, if any. No event follows.
    fn stop(&mut self);
}
