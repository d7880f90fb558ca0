//! Scroll debouncing.
//!
//! Scroll samples are treated as "set scroll velocity to this value", so a
//! burst collapses to its most recent sample rather than a sum. The timer
//! restarts on every submission and the latest value is emitted once the
//! input has been quiet for the debounce window.

use std::time::Duration;

use glidepad_proto::SemanticAction;

use crate::{motion::round_delta, time::Timestamp};

/// Quiescence window before a scroll is emitted.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(50);

/// Scroll debouncer configuration
#[derive(Debug, Clone)]
pub struct ScrollConfig {
    /// Quiet time required before the latest value is emitted
    pub debounce_window: Duration,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { debounce_window: DEFAULT_DEBOUNCE_WINDOW }
    }
}

/// Collapses a scroll burst into one scroll carrying the latest delta.
#[derive(Debug, Clone)]
pub struct ScrollDebouncer<I>
where
    I: Timestamp,
{
    config: ScrollConfig,
    latest: Option<f64>,
    fire_at: Option<I>,
}

impl<I> ScrollDebouncer<I>
where
    I: Timestamp,
{
    /// Create an idle debouncer.
    pub fn new(config: ScrollConfig) -> Self {
        Self { config, latest: None, fire_at: None }
    }

    /// Record a sample and restart the timer.
    ///
    /// Non-finite samples are ignored and do not restart the timer.
    pub fn submit(&mut self, dy: f64, now: I) {
        if !dy.is_finite() {
            tracing::trace!(dy, "ignoring non-finite scroll delta");
            return;
        }

        self.latest = Some(dy);
        self.fire_at = Some(now + self.config.debounce_window);
    }

    /// A sample is waiting for the window to lapse.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.fire_at.is_some()
    }

    /// Sample that will be emitted when the window lapses.
    #[must_use]
    pub fn latest(&self) -> Option<f64> {
        self.latest
    }

    /// Deadline at which the latest sample is emitted.
    #[must_use]
    pub fn poll_timeout(&self) -> Option<I> {
        self.fire_at
    }

    /// Emit the latest sample if the window has lapsed.
    ///
    /// A sample that rounds to zero is still emitted: it stops the scroll.
    pub fn handle_timeout(&mut self, now: I) -> Option<SemanticAction> {
        match self.fire_at {
            Some(at) if at <= now => {},
            _ => return None,
        }

        self.fire_at = None;
        self.latest.take().map(|dy| SemanticAction::Scroll { dy: round_delta(dy) })
    }

    /// Drop the pending sample.
    pub fn reset(&mut self) {
        self.latest = None;
        self.fire_at = None;
    }
}
