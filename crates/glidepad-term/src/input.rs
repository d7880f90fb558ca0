//! Terminal mouse events to raw input.
//!
//! Terminal coordinates are character cells; they are scaled to approximate
//! pixels so the gesture thresholds keep their meaning.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use glidepad_core::gesture::{ContactId, PlatformButton, RawInput, Surface};

/// Approximate width of one terminal cell in pixels.
pub const CELL_WIDTH: f64 = 8.0;

/// Approximate height of one terminal cell in pixels.
pub const CELL_HEIGHT: f64 = 16.0;

/// Scroll delta for one wheel notch. Positive scrolls down.
pub const WHEEL_STEP: f64 = 1.0;

/// Contact the left button stands in for on a touch surface.
const EMULATED_CONTACT: ContactId = 0;

/// Maps terminal mouse events to [`RawInput`].
///
/// On a touch surface the left button emulates one finger, so taps, double
/// taps and long presses can be exercised with a mouse. Other buttons stay
/// pointer buttons.
#[derive(Debug, Clone, Copy)]
pub struct InputMapper {
    surface: Surface,
}

impl InputMapper {
    /// Mapper for the given surface.
    #[must_use]
    pub fn new(surface: Surface) -> Self {
        Self { surface }
    }

    /// Raw input for a mouse event, if it carries any.
    #[must_use]
    pub fn map(&self, event: MouseEvent) -> Option<RawInput> {
        let x = f64::from(event.column) * CELL_WIDTH;
        let y = f64::from(event.row) * CELL_HEIGHT;
        let touch = self.surface == Surface::Touch;

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) if touch => {
                Some(RawInput::ContactDown { id: EMULATED_CONTACT, x, y })
            },
            MouseEventKind::Drag(MouseButton::Left) if touch => {
                Some(RawInput::ContactMove { id: EMULATED_CONTACT, x, y })
            },
            MouseEventKind::Up(MouseButton::Left) if touch => {
                Some(RawInput::ContactUp { id: EMULATED_CONTACT })
            },
            MouseEventKind::Down(button) => {
                Some(RawInput::PointerDown { button: platform_button(button), x, y })
            },
            MouseEventKind::Up(button) => {
                Some(RawInput::PointerUp { button: platform_button(button), x, y })
            },
            MouseEventKind::Drag(_) | MouseEventKind::Moved => Some(RawInput::PointerMove { x, y }),
            MouseEventKind::ScrollDown => Some(RawInput::Wheel { dy: WHEEL_STEP }),
            MouseEventKind::ScrollUp => Some(RawInput::Wheel { dy: -WHEEL_STEP }),
            MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => None,
        }
    }
}

/// Platform button number for a terminal mouse button.
#[must_use]
pub fn platform_button(button: MouseButton) -> PlatformButton {
    match button {
        MouseButton::Left => PlatformButton::PRIMARY,
        MouseButton::Middle => PlatformButton::AUXILIARY,
        MouseButton::Right => PlatformButton::SECONDARY,
    }
}

/// Key presses that end the session: `q`, Esc and Ctrl-C.
#[must_use]
pub fn is_quit(key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
