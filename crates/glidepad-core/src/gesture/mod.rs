//! Gesture recognition.
//!
//! Turns raw pointer and touch samples into move, scroll and click intents in
//! two stages:
//!
//! 1. [`Classifier`] tracks contacts and emits [`GestureEvent`]s (pan start,
//!    pan move, tap, long press, ...), arbitrating between interpretations
//!    that compete for the same input.
//! 2. [`Recognizer`] maps those events to [`GestureAction`]s: per-sample
//!    motion deltas, vertical scroll deltas, protocol-level clicks and local
//!    feedback.
//!
//! # Tap arbitration
//!
//! A single tap and a double tap observe the same contact. The single tap is
//! held back by [`TapArbiter`] until the double tap has definitively failed
//! (its interval lapsed without a second tap), so a double tap is never also
//! reported as a single tap.

mod arbiter;
mod button;
mod classifier;
mod event;
mod input;
mod recognizer;

use std::time::Duration;

pub use arbiter::{ArbiterState, TapArbiter, TapResolution};
pub use button::PlatformButton;
pub use classifier::Classifier;
pub use event::{Feedback, GestureAction, GestureEvent};
pub use input::{ContactId, RawInput};
pub use recognizer::Recognizer;

/// Movement (px) that turns a touch contact into a pan. Also the most a tap
/// may move, so there is no gap between "too far for a tap" and "far enough
/// for a pan".
pub const DEFAULT_PAN_THRESHOLD: f64 = 10.0;

/// Movement (px) that turns a pressed mouse button into a drag.
pub const DEFAULT_CLICK_SLOP: f64 = 4.0;

/// Longest contact that still counts as a tap.
pub const DEFAULT_TAP_MAX_DURATION: Duration = Duration::from_millis(250);

/// Window after a tap in which a second tap makes a double tap.
pub const DEFAULT_DOUBLE_TAP_INTERVAL: Duration = Duration::from_millis(300);

/// Furthest (px) the second tap of a double tap may land from the first.
pub const DEFAULT_DOUBLE_TAP_DISTANCE: f64 = 25.0;

/// Hold time for a long press.
pub const DEFAULT_LONG_PRESS_DURATION: Duration = Duration::from_millis(600);

/// Delta multiplier for touch surfaces.
pub const TOUCH_SENSITIVITY: f64 = 1.2;

/// Input modality of the gesture surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surface {
    /// Mouse-style surface: drag to move, native click-on-release with
    /// explicit button mapping. Double taps are not recognized.
    #[default]
    Desktop,
    /// Multi-finger touchpad: one-finger pan, two-finger scroll, tap, double
    /// tap and long press.
    Touch,
}

/// Gesture recognizer configuration
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Input modality
    pub surface: Surface,
    /// Single-contact pan threshold (px)
    pub pan_threshold: f64,
    /// Two-contact pan threshold (px); zero starts on first movement
    pub multi_pan_threshold: f64,
    /// Pointer drag threshold (px)
    pub click_slop: f64,
    /// Longest contact that counts as a tap
    pub tap_max_duration: Duration,
    /// Double-tap window, measured between tap releases
    pub double_tap_interval: Duration,
    /// Maximum distance between the two taps of a double tap (px)
    pub double_tap_distance: f64,
    /// Hold time for a long press
    pub long_press_duration: Duration,
    /// Multiplier applied to pan and two-finger scroll deltas
    pub sensitivity: f64,
}

impl GestureConfig {
    /// Defaults for a mouse-driven surface.
    #[must_use]
    pub fn desktop() -> Self {
        Self {
            surface: Surface::Desktop,
            pan_threshold: DEFAULT_PAN_THRESHOLD,
            multi_pan_threshold: 0.0,
            click_slop: DEFAULT_CLICK_SLOP,
            tap_max_duration: DEFAULT_TAP_MAX_DURATION,
            double_tap_interval: DEFAULT_DOUBLE_TAP_INTERVAL,
            double_tap_distance: DEFAULT_DOUBLE_TAP_DISTANCE,
            long_press_duration: DEFAULT_LONG_PRESS_DURATION,
            sensitivity: 1.0,
        }
    }

    /// Defaults for a touchpad surface.
    #[must_use]
    pub fn touch() -> Self {
        Self { surface: Surface::Touch, sensitivity: TOUCH_SENSITIVITY, ..Self::desktop() }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

/// Euclidean distance between two points.
fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}
