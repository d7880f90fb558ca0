//! Motion aggregation.
//!
//! Pointer deltas arrive far faster than the remote host needs them. The
//! aggregator sums every delta received within one display-refresh tick and
//! emits at most one move per tick.
//!
//! # Invariants
//!
//! - At most one flush is pending at any time; deltas arriving while a flush
//!   is pending merge into the same sum.
//! - A flush emits `round(Σdx), round(Σdy)` and only when at least one
//!   component is non-zero.
//! - With `carry_remainder` off the accumulator is exactly zero after every
//!   flush. With it on, the sub-integer remainder (|r| <= 0.5) is kept.

use std::time::Duration;

use glidepad_proto::SemanticAction;

use crate::time::Timestamp;

/// One refresh tick on a 60 Hz display.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Motion aggregator configuration
#[derive(Debug, Clone)]
pub struct MotionConfig {
    /// Time between the first delta of a burst and its flush
    pub frame_interval: Duration,
    /// Keep the rounding remainder for the next tick instead of discarding it
    pub carry_remainder: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self { frame_interval: DEFAULT_FRAME_INTERVAL, carry_remainder: false }
    }
}

/// Running sum of deltas for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Accumulator {
    /// Horizontal sum
    pub x: f64,
    /// Vertical sum
    pub y: f64,
    /// A flush is scheduled
    pub pending: bool,
}

/// Coalesces motion deltas into at most one move per refresh tick.
#[derive(Debug, Clone)]
pub struct MotionAggregator<I>
where
    I: Timestamp,
{
    config: MotionConfig,
    acc: Accumulator,
    /// Deadline of the pending flush. `Some` iff `acc.pending`.
    flush_at: Option<I>,
}

impl<I> MotionAggregator<I>
where
    I: Timestamp,
{
    /// Create an empty aggregator.
    pub fn new(config: MotionConfig) -> Self {
        Self { config, acc: Accumulator::default(), flush_at: None }
    }

    /// Add a delta, scheduling a flush for the next tick if none is pending.
    ///
    /// Non-finite deltas are ignored.
    pub fn accumulate(&mut self, dx: f64, dy: f64, now: I) {
        if !dx.is_finite() || !dy.is_finite() {
            tracing::trace!(dx, dy, "ignoring non-finite motion delta");
            return;
        }

        self.acc.x += dx;
        self.acc.y += dy;

        if !self.acc.pending {
            self.acc.pending = true;
            self.flush_at = Some(now + self.config.frame_interval);
        }

        debug_assert_eq!(self.acc.pending, self.flush_at.is_some());
    }

    /// Deadline of the pending flush.
    #[must_use]
    pub fn poll_timeout(&self) -> Option<I> {
        self.flush_at
    }

    /// Flush if the pending deadline has been reached.
    pub fn handle_timeout(&mut self, now: I) -> Option<SemanticAction> {
        match self.flush_at {
            Some(at) if at <= now => self.flush(),
            _ => None,
        }
    }

    /// Emit the rounded sum and reset the accumulator.
    ///
    /// Returns `None` when both rounded components are zero.
    pub fn flush(&mut self) -> Option<SemanticAction> {
        let dx = round_delta(self.acc.x);
        let dy = round_delta(self.acc.y);

        if self.config.carry_remainder {
            self.acc.x -= f64::from(dx);
            self.acc.y -= f64::from(dy);
        } else {
            self.acc.x = 0.0;
            self.acc.y = 0.0;
        }
        self.acc.pending = false;
        self.flush_at = None;

        (dx != 0 || dy != 0).then_some(SemanticAction::Move { dx, dy })
    }

    /// Current accumulator state.
    #[must_use]
    pub fn accumulator(&self) -> Accumulator {
        self.acc
    }

    /// Drop everything, including any pending flush.
    pub fn reset(&mut self) {
        self.acc = Accumulator::default();
        self.flush_at = None;
    }
}

/// Round half away from zero, saturating at the `i32` range.
pub(crate) fn round_delta(value: f64) -> i32 {
    value.round() as i32
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    fn aggregator() -> MotionAggregator<Instant> {
        MotionAggregator::new(MotionConfig::default())
    }

    #[test]
    fn burst_flushes_rounded_sum() {
        let t0 = Instant::now();
        let mut agg = aggregator();

        agg.accumulate(1.4, 0.3, t0);
        agg.accumulate(1.4, 0.3, t0 + Duration::from_millis(4));
        agg.accumulate(0.4, -2.0, t0 + Duration::from_millis(8));

        let action = agg.handle_timeout(t0 + DEFAULT_FRAME_INTERVAL);
        assert_eq!(action, Some(SemanticAction::Move { dx: 3, dy: -1 }));
        assert_eq!(agg.accumulator(), Accumulator::default());
    }

    #[test]
    fn single_flush_scheduled_per_burst() {
        let t0 = Instant::now();
        let mut agg = aggregator();

        agg.accumulate(1.0, 0.0, t0);
        agg.accumulate(1.0, 0.0, t0 + Duration::from_millis(10));

        assert_eq!(agg.poll_timeout(), Some(t0 + DEFAULT_FRAME_INTERVAL));
    }

    #[test]
    fn no_flush_before_deadline() {
        let t0 = Instant::now();
        let mut agg = aggregator();
        agg.accumulate(5.0, 5.0, t0);

        assert_eq!(agg.handle_timeout(t0 + Duration::from_millis(15)), None);
        assert!(agg.accumulator().pending);
    }

    #[test]
    fn zero_after_rounding_emits_nothing() {
        let t0 = Instant::now();
        let mut agg = aggregator();

        agg.accumulate(0.3, -0.4, t0);
        agg.accumulate(0.1, 0.2, t0);

        assert_eq!(agg.flush(), None);
        assert_eq!(agg.accumulator(), Accumulator::default());
        assert_eq!(agg.poll_timeout(), None);
    }

    #[test]
    fn remainder_discarded_by_default() {
        let t0 = Instant::now();
        let mut agg = aggregator();

        agg.accumulate(0.4, 0.0, t0);
        assert_eq!(agg.flush(), None);
        agg.accumulate(0.4, 0.0, t0);
        assert_eq!(agg.flush(), None);
    }

    #[test]
    fn remainder_carried_when_enabled() {
        let t0 = Instant::now();
        let mut agg =
            MotionAggregator::new(MotionConfig { carry_remainder: true, ..Default::default() });

        agg.accumulate(0.4, 0.0, t0);
        assert_eq!(agg.flush(), None);
        assert!((agg.accumulator().x - 0.4).abs() < 1e-9);

        agg.accumulate(0.4, 0.0, t0);
        assert_eq!(agg.flush(), Some(SemanticAction::Move { dx: 1, dy: 0 }));
        assert!((agg.accumulator().x + 0.2).abs() < 1e-9);
    }

    #[test]
    fn next_burst_schedules_fresh_flush() {
        let t0 = Instant::now();
        let mut agg = aggregator();

        agg.accumulate(2.0, 0.0, t0);
        agg.handle_timeout(t0 + DEFAULT_FRAME_INTERVAL);

        let t1 = t0 + Duration::from_millis(40);
        agg.accumulate(1.0, 1.0, t1);
        assert_eq!(agg.poll_timeout(), Some(t1 + DEFAULT_FRAME_INTERVAL));
    }

    #[test]
    fn non_finite_deltas_ignored() {
        let t0 = Instant::now();
        let mut agg = aggregator();

        agg.accumulate(f64::NAN, 1.0, t0);
        agg.accumulate(f64::INFINITY, 0.0, t0);

        assert_eq!(agg.accumulator(), Accumulator::default());
        assert_eq!(agg.poll_timeout(), None);
    }

    #[test]
    fn halves_round_away_from_zero() {
        assert_eq!(round_delta(0.5), 1);
        assert_eq!(round_delta(-0.5), -1);
        assert_eq!(round_delta(2.49), 2);
        assert_eq!(round_delta(1e12), i32::MAX);
    }
}
