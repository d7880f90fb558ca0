//! Semantic actions carried by the wire protocol.

use serde::{Deserialize, Serialize};

/// Protocol-level pointer button.
///
/// Decoupled from platform button numbering. Translation from platform codes
/// happens at the gesture boundary; only these buttons ever reach the wire.
///
/// `Middle` and `Double` share protocol code 3: desktop surfaces send it for
/// the auxiliary button, touch surfaces send it for a double tap. A binary
/// frame carrying code 3 always decodes as [`Button::Middle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Primary button (code 1).
    Left,
    /// Secondary button (code 2).
    Right,
    /// Auxiliary button (code 3).
    Middle,
    /// Double click (code 3).
    Double,
}

impl Button {
    /// Wire code for this button.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Right => 2,
            Self::Middle | Self::Double => 3,
        }
    }

    /// Button for a wire code. `None` for codes outside the protocol.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Left),
            2 => Some(Self::Right),
            3 => Some(Self::Middle),
            _ => None,
        }
    }
}

/// Action consumed by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticAction {
    /// Relative pointer motion.
    Move {
        /// Horizontal delta.
        dx: i32,
        /// Vertical delta.
        dy: i32,
    },
    /// Vertical scroll.
    Scroll {
        /// Vertical delta.
        dy: i32,
    },
    /// Button click.
    Click {
        /// Clicked button.
        button: Button,
    },
}
