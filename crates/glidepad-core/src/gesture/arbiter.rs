//! Tap / double-tap arbitration.
//!
//! Joint state machine shared by the single-tap and double-tap recognizers.
//! The single tap has a failure dependency on the double tap: it is only
//! reported once the double tap can no longer match.
//!
//! ```text
//!              tap                        second tap (in time, close)
//! ┌──────────┐ ───> ┌─────────────────┐ ─────────────────────────────> DoubleTap
//! │ Resolved │      │ WaitingForRival │
//! └──────────┘ <─── └─────────────────┘ ── deadline / far tap / pan ──> Tap
//! ```

use std::time::Duration;

use crate::{gesture::distance, time::Timestamp};

/// Outcome of arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapResolution {
    /// The double tap failed; report one single tap.
    Tap,
    /// Two taps matched.
    DoubleTap,
}

/// Arbitration state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArbiterState<I> {
    /// No tap is awaiting a rival.
    Resolved,
    /// A tap happened; a second one before `deadline` makes a double tap.
    WaitingForRival {
        /// When the double tap definitively fails
        deadline: I,
        /// Position of the first tap
        x: f64,
        /// Position of the first tap
        y: f64,
    },
}

/// Tap arbiter.
#[derive(Debug, Clone)]
pub struct TapArbiter<I>
where
    I: Timestamp,
{
    state: ArbiterState<I>,
    interval: Duration,
    max_distance: f64,
    enabled: bool,
}

impl<I> TapArbiter<I>
where
    I: Timestamp,
{
    /// Arbiter recognizing double taps within `interval` and `max_distance`.
    pub fn new(interval: Duration, max_distance: f64) -> Self {
        Self { state: ArbiterState::Resolved, interval, max_distance, enabled: true }
    }

    /// Arbiter without a double-tap rival: every tap resolves immediately.
    pub fn single_only() -> Self {
        Self {
            state: ArbiterState::Resolved,
            interval: Duration::ZERO,
            max_distance: 0.0,
            enabled: false,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ArbiterState<I> {
        self.state
    }

    /// A tap is waiting for its rival.
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        matches!(self.state, ArbiterState::WaitingForRival { .. })
    }

    /// Register a completed tap at `(x, y)`.
    ///
    /// Returns the resolutions this tap settles, in order. A far or late
    /// second tap settles the first as [`TapResolution::Tap`] and starts
    /// waiting itself.
    pub fn on_tap(&mut self, x: f64, y: f64, now: I) -> Vec<TapResolution> {
        if !self.enabled {
            return vec![TapResolution::Tap];
        }

        match self.state {
            ArbiterState::Resolved => {
                self.state = ArbiterState::WaitingForRival { deadline: now + self.interval, x, y };
                Vec::new()
            },
            ArbiterState::WaitingForRival { deadline, x: px, y: py } => {
                if now <= deadline && distance((px, py), (x, y)) <= self.max_distance {
                    self.state = ArbiterState::Resolved;
                    vec![TapResolution::DoubleTap]
                } else {
                    self.state =
                        ArbiterState::WaitingForRival { deadline: now + self.interval, x, y };
                    vec![TapResolution::Tap]
                }
            },
        }
    }

    /// Deadline at which a waiting tap resolves as single.
    #[must_use]
    pub fn poll_timeout(&self) -> Option<I> {
        match self.state {
            ArbiterState::WaitingForRival { deadline, .. } => Some(deadline),
            ArbiterState::Resolved => None,
        }
    }

    /// Resolve the waiting tap as single if its deadline has passed.
    pub fn handle_timeout(&mut self, now: I) -> Option<TapResolution> {
        match self.state {
            ArbiterState::WaitingForRival { deadline, .. } if deadline <= now => {
                self.state = ArbiterState::Resolved;
                Some(TapResolution::Tap)
            },
            _ => None,
        }
    }

    /// Resolve the waiting tap as single now.
    ///
    /// Used when the next contact turns into something other than a tap, so
    /// the click is reported before that gesture's output.
    pub fn resolve_pending(&mut self) -> Option<TapResolution> {
        match self.state {
            ArbiterState::WaitingForRival { .. } => {
                self.state = ArbiterState::Resolved;
                Some(TapResolution::Tap)
            },
            ArbiterState::Resolved => None,
        }
    }

    /// Forget any waiting tap.
    pub fn reset(&mut self) {
        self.state = ArbiterState::Resolved;
    }
}
