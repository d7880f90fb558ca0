//! Error types for the core state machines.
//!
//! Transport failures are not errors here: they are events the channel
//! absorbs. What remains are transitions the channel cannot take from its
//! current state, which indicate a driver bug.

use thiserror::Error;

use crate::channel::ConnectionState;

/// Errors from the connection channel state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// Invalid state transition attempted
    #[error("invalid state transition: cannot {operation} from {state:?}")]
    InvalidState {
        /// Current state when error occurred
        state: ConnectionState,
        /// Operation that was attempted
        operation: &'static str,
    },
}
