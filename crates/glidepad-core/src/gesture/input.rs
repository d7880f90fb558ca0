//! Surface-agnostic raw input.

use crate::gesture::PlatformButton;

/// Identifier of one touch contact, stable from down to up.
pub type ContactId = u32;

/// Raw pointer and touch samples.
///
/// Decouples recognition from platform event types (terminal mouse events,
/// browser touch lists, ...). Coordinates are surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    /// Finger touched the surface.
    ContactDown {
        /// Contact identifier
        id: ContactId,
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Finger moved.
    ContactMove {
        /// Contact identifier
        id: ContactId,
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Finger lifted.
    ContactUp {
        /// Contact identifier
        id: ContactId,
    },
    /// Platform cancelled the contact. Never produces a tap.
    ContactCancel {
        /// Contact identifier
        id: ContactId,
    },
    /// Mouse button pressed.
    PointerDown {
        /// Platform button number
        button: PlatformButton,
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Mouse moved.
    PointerMove {
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Mouse button released.
    PointerUp {
        /// Platform button number
        button: PlatformButton,
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Scroll wheel, positive scrolls down.
    Wheel {
        /// Vertical delta
        dy: f64,
    },
}
