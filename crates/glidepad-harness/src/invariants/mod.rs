//! Pipeline invariants checked between runtime steps.
//!
//! An invariant is a property of the pipeline that holds after every step no
//! matter what input, timing or transport behavior led there. Scenario tests
//! pin down exact outputs; invariants catch the states no scenario thought of.
//!
//! # Architecture
//!
//! Each check reads a [`PipelineSnapshot`] taken from the pipeline and the
//! [`SimDriver`](crate::SimDriver) after a step. [`InvariantRegistry`] runs
//! every registered check and collects the [`Violation`]s.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! runtime.step().await?;
//! registry.assert_all(&PipelineSnapshot::capture(runtime.pipeline(), runtime.driver()), "step");
//! ```

mod checks;
mod snapshot;

pub use checks::{
    AccumulatorClearedWhenIdle, AccumulatorPendingConsistency, FramesWellFormed,
    RetryScheduledWhileClosed, ScrollPendingConsistency, WritesOnlyWhileOpen,
};
pub use snapshot::PipelineSnapshot;
use thiserror::Error;

/// Outcome of one invariant check.
pub type InvariantResult = Result<(), Violation>;

/// A broken invariant and what was observed.
#[derive(Debug, Clone, Error)]
#[error("{invariant}: {message}")]
pub struct Violation {
    /// Invariant that failed.
    pub invariant: &'static str,
    /// Observed state that broke it.
    pub message: String,
}

/// A property every [`PipelineSnapshot`] must satisfy.
pub trait Invariant: Send + Sync {
    /// Short snake_case identifier used in violation reports.
    fn name(&self) -> &'static str;

    /// Inspect `state`, returning a [`Violation`] if the property is broken.
    fn check(&self, state: &PipelineSnapshot) -> InvariantResult;
}

/// Ordered set of invariants run together.
#[derive(Default)]
pub struct InvariantRegistry {
    checks: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Registry with no checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pipeline invariant:
    ///
    /// - [`AccumulatorPendingConsistency`]: pending flag matches the flush
    ///   deadline
    /// - [`ScrollPendingConsistency`]: a held scroll value has its emission
    ///   scheduled
    /// - [`AccumulatorClearedWhenIdle`]: no stray sum without carry
    /// - [`RetryScheduledWhileClosed`]: closed channels always retry
    /// - [`WritesOnlyWhileOpen`]: the transport never sees a write while
    ///   closed
    /// - [`FramesWellFormed`]: every write decodes
    pub fn standard() -> Self {
        Self::new()
            .with(AccumulatorPendingConsistency)
            .with(ScrollPendingConsistency)
            .with(AccumulatorClearedWhenIdle)
            .with(RetryScheduledWhileClosed)
            .with(WritesOnlyWhileOpen)
            .with(FramesWellFormed)
    }

    /// Builder form of [`InvariantRegistry::add`].
    #[must_use]
    pub fn with<I: Invariant + 'static>(mut self, invariant: I) -> Self {
        self.add(invariant);
        self
    }

    /// Register one more check.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.checks.push(Box::new(invariant));
    }

    /// Run every check, collecting all violations.
    pub fn check_all(&self, state: &PipelineSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.checks.iter().filter_map(|check| check.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Run every check and panic with all violations, labelled by `context`.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &PipelineSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            let report: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("invariant violated {context}:\n  {}", report.join("\n  "));
        }
    }

    /// Number of registered checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// No checks registered.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
