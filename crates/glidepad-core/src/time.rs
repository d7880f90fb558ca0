//! Time abstraction for deterministic testing.
//!
//! State machines are generic over the instant type so production code uses
//! `std::time::Instant` or `tokio::time::Instant` while tests drive a paused
//! or hand-advanced clock.

use std::{
    ops::{Add, Sub},
    time::Duration,
};

/// Monotonic instant usable as a deadline.
///
/// # Invariants
///
/// - Callers MUST pass non-decreasing instants to a given state machine.
pub trait Timestamp:
    Copy + Ord + Send + Sync + Add<Duration, Output = Self> + Sub<Output = Duration>
{
}

impl<T> Timestamp for T where
    T: Copy + Ord + Send + Sync + Add<Duration, Output = T> + Sub<Output = Duration>
{
}

/// Earliest of two optional deadlines.
pub fn earliest<I: Timestamp>(a: Option<I>, b: Option<I>) -> Option<I> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[test]
    fn earliest_picks_minimum() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_millis(5);

        assert_eq!(earliest(Some(t1), Some(t0)), Some(t0));
        assert_eq!(earliest(Some(t1), None), Some(t1));
        assert_eq!(earliest(None, Some(t0)), Some(t0));
        assert_eq!(earliest::<Instant>(None, None), None);
    }
}
