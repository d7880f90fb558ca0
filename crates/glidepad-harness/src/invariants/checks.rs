//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use super::{Invariant, InvariantResult, PipelineSnapshot, Violation};

/// The accumulator's pending flag mirrors the scheduled flush.
///
/// A pending sum without a deadline would never be sent; a deadline without
/// a pending sum would fire for nothing.
pub struct AccumulatorPendingConsistency;

impl Invariant for AccumulatorPendingConsistency {
    fn name(&self) -> &'static str {
        "accumulator_pending_consistency"
    }

    fn check(&self, state: &PipelineSnapshot) -> InvariantResult {
        if state.accumulator.pending != state.motion_deadline {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "pending={} but flush deadline scheduled={}",
                    state.accumulator.pending, state.motion_deadline
                ),
            });
        }
        Ok(())
    }
}

/// A held scroll value exists exactly while its emission is scheduled.
pub struct ScrollPendingConsistency;

impl Invariant for ScrollPendingConsistency {
    fn name(&self) -> &'static str {
        "scroll_pending_consistency"
    }

    fn check(&self, state: &PipelineSnapshot) -> InvariantResult {
        if state.scroll_pending != state.scroll_deadline {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "scroll held={} but emission scheduled={}",
                    state.scroll_pending, state.scroll_deadline
                ),
            });
        }
        Ok(())
    }
}

/// Without remainder carry, an idle accumulator holds exactly zero.
pub struct AccumulatorClearedWhenIdle;

impl Invariant for AccumulatorClearedWhenIdle {
    fn name(&self) -> &'static str {
        "accumulator_cleared_when_idle"
    }

    fn check(&self, state: &PipelineSnapshot) -> InvariantResult {
        let acc = state.accumulator;
        if !state.carry_remainder && !acc.pending && (acc.x != 0.0 || acc.y != 0.0) {
            return Err(Violation {
                invariant: self.name(),
                message: format!("idle accumulator holds ({}, {})", acc.x, acc.y),
            });
        }
        Ok(())
    }
}

/// A reconnect deadline exists exactly while the channel is closed.
pub struct RetryScheduledWhileClosed;

impl Invariant for RetryScheduledWhileClosed {
    fn name(&self) -> &'static str {
        "retry_scheduled_while_closed"
    }

    fn check(&self, state: &PipelineSnapshot) -> InvariantResult {
        let closed = state.state == glidepad_core::ConnectionState::Closed;
        if closed != state.retry_deadline {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "state {:?} with retry deadline scheduled={}",
                    state.state, state.retry_deadline
                ),
            });
        }
        Ok(())
    }
}

/// Writes only reach the transport while it is open.
pub struct WritesOnlyWhileOpen;

impl Invariant for WritesOnlyWhileOpen {
    fn name(&self) -> &'static str {
        "writes_only_while_open"
    }

    fn check(&self, state: &PipelineSnapshot) -> InvariantResult {
        if state.rejected_writes > 0 {
            return Err(Violation {
                invariant: self.name(),
                message: format!("{} writes issued to a closed transport", state.rejected_writes),
            });
        }
        Ok(())
    }
}

/// Every write decodes to a semantic action.
pub struct FramesWellFormed;

impl Invariant for FramesWellFormed {
    fn name(&self) -> &'static str {
        "frames_well_formed"
    }

    fn check(&self, state: &PipelineSnapshot) -> InvariantResult {
        for (index, write) in state.writes.iter().enumerate() {
            if let Err(e) = write.message.decode() {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("write {index} at {:?} does not decode: {e}", write.at),
                });
            }
        }
        Ok(())
    }
}
