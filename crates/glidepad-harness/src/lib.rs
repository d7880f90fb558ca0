//! Deterministic simulation harness for glidepad.
//!
//! [`SimDriver`] implements the runtime's `Driver` trait over a scripted
//! timeline and tokio's virtual clock, so the production
//! [`glidepad_app::Runtime`] can be exercised end to end without a terminal
//! or a socket.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. [`run_with_invariants`] drives a runtime to completion and checks
//! [`InvariantRegistry::standard()`] after every step.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod invariants;
pub mod sim_driver;

use glidepad_app::Runtime;
pub use invariants::{
    AccumulatorClearedWhenIdle, AccumulatorPendingConsistency, FramesWellFormed, Invariant,
    InvariantRegistry, InvariantResult, PipelineSnapshot, RetryScheduledWhileClosed,
    ScrollPendingConsistency, Violation, WritesOnlyWhileOpen,
};
pub use sim_driver::{CapturedWrite, ConnectBehavior, SimDriver, SimDriverError};

/// Upper bound on runtime steps, guarding against a runtime that never
/// reaches shutdown.
pub const MAX_STEPS: usize = 10_000;

/// Drive `runtime` until shutdown, checking every invariant after each step.
///
/// Returns the number of steps taken.
///
/// # Errors
///
/// Returns an error if the driver fails.
///
/// # Panics
///
/// Panics on the first invariant violation, or if shutdown is not reached
/// within [`MAX_STEPS`].
#[allow(clippy::panic)]
pub async fn run_with_invariants(
    runtime: &mut Runtime<SimDriver>,
    registry: &InvariantRegistry,
) -> Result<usize, SimDriverError> {
    runtime.start().await;
    registry.assert_all(&snapshot(runtime), "after start");

    for step in 1..=MAX_STEPS {
        let running = runtime.step().await?;
        registry.assert_all(&snapshot(runtime), &format!("after step {step}"));
        if !running {
            return Ok(step);
        }
    }

    panic!("runtime did not shut down within {MAX_STEPS} steps");
}

/// Capture the current runtime state.
pub fn snapshot(runtime: &Runtime<SimDriver>) -> PipelineSnapshot {
    PipelineSnapshot::capture(runtime.pipeline(), runtime.driver())
}
