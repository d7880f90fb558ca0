//! Pipeline side-effects.
//!
//! This module defines [`PipelineAction`], the instructions produced by the
//! [`crate::Pipeline`] for the runtime to execute.

use glidepad_core::gesture::Feedback;
use glidepad_proto::WireMessage;

/// Actions produced by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineAction {
    /// Open the connection to the remote host.
    Connect,

    /// Write one message to the open connection.
    Write(WireMessage),

    /// Show local feedback. Fire-and-forget.
    Feedback(Feedback),

    /// Discard all pipeline state and start over.
    Restart,
}
