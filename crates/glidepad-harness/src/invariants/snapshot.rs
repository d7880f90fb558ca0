//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the runtime at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use glidepad_app::Pipeline;
use glidepad_core::{Accumulator, ConnectionState};
use tokio::time::Instant;

use crate::sim_driver::{CapturedWrite, SimDriver};

/// Snapshot of one pipeline and the transport writes it caused.
#[derive(Debug, Clone)]
pub struct PipelineSnapshot {
    /// Connection state.
    pub state: ConnectionState,
    /// Motion accumulator.
    pub accumulator: Accumulator,
    /// Whether the rounding remainder is carried between ticks.
    pub carry_remainder: bool,
    /// Motion flush is scheduled.
    pub motion_deadline: bool,
    /// Scroll value waiting for quiescence.
    pub scroll_pending: bool,
    /// Scroll emission is scheduled.
    pub scroll_deadline: bool,
    /// Reconnect deadline is scheduled.
    pub retry_deadline: bool,
    /// Every write the transport accepted.
    pub writes: Vec<CapturedWrite>,
    /// Writes issued while the transport was closed.
    pub rejected_writes: usize,
}

impl PipelineSnapshot {
    /// Capture pipeline and driver state.
    pub fn capture(pipeline: &Pipeline<Instant>, driver: &SimDriver) -> Self {
        Self {
            state: pipeline.state(),
            accumulator: pipeline.motion().accumulator(),
            carry_remainder: pipeline.config().motion.carry_remainder,
            motion_deadline: pipeline.motion().poll_timeout().is_some(),
            scroll_pending: pipeline.scroll().latest().is_some(),
            scroll_deadline: pipeline.scroll().poll_timeout().is_some(),
            retry_deadline: pipeline.channel().poll_timeout().is_some(),
            writes: driver.writes().to_vec(),
            rejected_writes: driver.rejected_writes(),
        }
    }

    /// Snapshot of a pipeline that has not started.
    pub fn idle() -> Self {
        Self {
            state: ConnectionState::Connecting,
            accumulator: Accumulator::default(),
            carry_remainder: false,
            motion_deadline: false,
            scroll_pending: false,
            scroll_deadline: false,
            retry_deadline: false,
            writes: Vec::new(),
            rejected_writes: 0,
        }
    }
}
