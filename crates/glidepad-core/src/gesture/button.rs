//! Platform button numbering and its translation table.

use glidepad_proto::Button;

/// Platform-native pointer button number (DOM `MouseEvent.button` numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformButton(pub i16);

impl PlatformButton {
    /// Main button, usually the left button.
    pub const PRIMARY: Self = Self(0);
    /// Auxiliary button, usually the wheel or middle button.
    pub const AUXILIARY: Self = Self(1);
    /// Secondary button, usually the right button.
    pub const SECONDARY: Self = Self(2);
    /// Browser back button.
    pub const BACK: Self = Self(3);
    /// Browser forward button.
    pub const FORWARD: Self = Self(4);

    /// Protocol button for this platform button.
    ///
    /// `None` for buttons the protocol has no code for; callers drop those
    /// silently.
    #[must_use]
    pub const fn to_protocol(self) -> Option<Button> {
        match self {
            Self::PRIMARY => Some(Button::Left),
            Self::SECONDARY => Some(Button::Right),
            Self::AUXILIARY => Some(Button::Middle),
            _ => None,
        }
    }
}
