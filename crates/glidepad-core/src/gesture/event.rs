//! Gesture events and recognizer output.

use std::time::Duration;

use glidepad_proto::Button;

use crate::gesture::PlatformButton;

/// Classified gesture, produced by [`crate::gesture::Classifier`].
///
/// Pan starts carry the position where the contact went down, so the first
/// move after the threshold is crossed accounts for all motion so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Single-contact pan began at this point.
    PanStart {
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Pan centroid moved to this point.
    PanMove {
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Single- or two-contact pan ended.
    PanEnd,
    /// Two-contact pan began with this centroid.
    MultiPanStart {
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Two-contact centroid moved to this point.
    MultiPanMove {
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Single tap, confirmed after the double-tap window lapsed.
    Tap,
    /// Two taps within the double-tap window.
    DoubleTap,
    /// Contact held still past the long-press duration.
    LongPress,
    /// Pointer pressed and released without dragging.
    Click {
        /// Platform button number
        button: PlatformButton,
    },
}

/// Local feedback for the user. Carries no protocol obligation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feedback {
    /// Vibrate for this long.
    Haptic(Duration),
    /// Show the contact indicator at this point.
    ContactShown {
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Hide the contact indicator.
    ContactHidden,
}

/// Output of [`crate::gesture::Recognizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    /// Motion delta for the aggregator.
    Move {
        /// Horizontal delta
        dx: f64,
        /// Vertical delta
        dy: f64,
    },
    /// Scroll delta for the debouncer.
    Scroll {
        /// Vertical delta
        dy: f64,
    },
    /// Click, sent immediately.
    Click(Button),
    /// Local feedback, fire-and-forget.
    Feedback(Feedback),
}
