//! Runtime input events.
//!
//! Events originate from two sources:
//! - The gesture surface (raw pointer and touch samples).
//! - The transport (connection opened or closed).

use glidepad_core::gesture::RawInput;

/// Connection lifecycle notifications from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Connection established.
    Opened,

    /// Connection closed, or the attempt failed.
    Closed {
        /// Human-readable cause.
        reason: String,
    },
}

/// Events returned by [`crate::Driver::next_event`].
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    /// Raw sample from the gesture surface.
    Input(RawInput),

    /// Transport notification.
    Transport(TransportEvent),

    /// The requested deadline was reached.
    Timeout,

    /// The user asked to quit.
    Shutdown,
}
