//! Binary frame codec.
//!
//! A `Frame` is one fixed-size binary message:
//! - 1-byte tag identifying the action
//! - payload whose layout is fixed by the tag (little-endian integers)
//!
//! There is no length prefix. The tag determines the frame size, so a frame
//! can never be partially encoded.
//!
//! ```text
//! 0x01 Move    [tag][dx: i32 LE][dy: i32 LE]   9 bytes
//! 0x02 Scroll  [tag][dy: i32 LE]               5 bytes
//! 0x03 Click   [tag][button: u8]               2 bytes
//! ```

use bytes::{BufMut, Bytes};
use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::{I32, LittleEndian},
};

use crate::{
    Button, SemanticAction,
    errors::{ProtocolError, Result},
};

/// Frame tag (first byte on the wire).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Relative pointer motion
    Move = 0x01,
    /// Vertical scroll
    Scroll = 0x02,
    /// Button click
    Click = 0x03,
}

impl Tag {
    /// Parse a tag byte. `None` if the byte is not a known tag.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Move),
            0x02 => Some(Self::Scroll),
            0x03 => Some(Self::Click),
            _ => None,
        }
    }

    /// Tag byte.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Total frame size (tag included) fixed by this tag.
    #[must_use]
    pub const fn frame_size(self) -> usize {
        match self {
            Self::Move => size_of::<MoveFrame>(),
            Self::Scroll => size_of::<ScrollFrame>(),
            Self::Click => size_of::<ClickFrame>(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
struct MoveFrame {
    tag: u8,
    dx: I32<LittleEndian>,
    dy: I32<LittleEndian>,
}

#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
struct ScrollFrame {
    tag: u8,
    dy: I32<LittleEndian>,
}

#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
struct ClickFrame {
    tag: u8,
    button: u8,
}

const _: () = assert!(size_of::<MoveFrame>() == 9);
const _: () = assert!(size_of::<ScrollFrame>() == 5);
const _: () = assert!(size_of::<ClickFrame>() == 2);

/// Encoded binary frame.
///
/// Immutable once built. Holds both the action and its wire bytes so the
/// transport never re-encodes and tests never re-parse.
///
/// # Invariants
///
/// - `bytes.len() == tag.frame_size()`
/// - `Frame::decode(frame.as_bytes())` yields the same action, except that
///   [`Button::Double`] comes back as [`Button::Middle`] (shared code 3)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    action: SemanticAction,
    bytes: Bytes,
}

impl Frame {
    /// Encode an action into its frame.
    #[must_use]
    pub fn from_action(action: SemanticAction) -> Self {
        let bytes = match action {
            SemanticAction::Move { dx, dy } => {
                let frame =
                    MoveFrame { tag: Tag::Move.to_u8(), dx: I32::new(dx), dy: I32::new(dy) };
                Bytes::copy_from_slice(frame.as_bytes())
            },
            SemanticAction::Scroll { dy } => {
                let frame = ScrollFrame { tag: Tag::Scroll.to_u8(), dy: I32::new(dy) };
                Bytes::copy_from_slice(frame.as_bytes())
            },
            SemanticAction::Click { button } => {
                let frame = ClickFrame { tag: Tag::Click.to_u8(), button: button.code() };
                Bytes::copy_from_slice(frame.as_bytes())
            },
        };

        let frame = Self { action, bytes };
        debug_assert_eq!(frame.bytes.len(), frame.tag().frame_size());
        frame
    }

    /// Decode a frame from wire bytes.
    ///
    /// The input must be exactly one frame: trailing bytes are rejected, since
    /// each transport message carries exactly one frame.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::EmptyFrame` if `bytes` is empty
    /// - `ProtocolError::UnknownTag` if the first byte is not a known tag
    /// - `ProtocolError::InvalidLength` if the length differs from the tag's
    ///   frame size
    /// - `ProtocolError::UnknownButton` if a click carries an unknown code
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (&first, _) = bytes.split_first().ok_or(ProtocolError::EmptyFrame)?;
        let tag = Tag::from_u8(first).ok_or(ProtocolError::UnknownTag(first))?;

        let invalid_length = || ProtocolError::InvalidLength {
            tag: first,
            expected: tag.frame_size(),
            actual: bytes.len(),
        };

        let action = match tag {
            Tag::Move => {
                let frame = MoveFrame::read_from_bytes(bytes).map_err(|_| invalid_length())?;
                SemanticAction::Move { dx: frame.dx.get(), dy: frame.dy.get() }
            },
            Tag::Scroll => {
                let frame = ScrollFrame::read_from_bytes(bytes).map_err(|_| invalid_length())?;
                SemanticAction::Scroll { dy: frame.dy.get() }
            },
            Tag::Click => {
                let frame = ClickFrame::read_from_bytes(bytes).map_err(|_| invalid_length())?;
                let button =
                    Button::from_code(frame.button).ok_or(ProtocolError::UnknownButton(frame.button))?;
                SemanticAction::Click { button }
            },
        };

        Ok(Self { action, bytes: Bytes::copy_from_slice(bytes) })
    }

    /// Write the frame bytes into `dst`.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(&self.bytes);
    }

    /// Action carried by this frame.
    #[must_use]
    pub fn action(&self) -> SemanticAction {
        self.action
    }

    /// Frame tag.
    #[must_use]
    pub fn tag(&self) -> Tag {
        match self.action {
            SemanticAction::Move { .. } => Tag::Move,
            SemanticAction::Scroll { .. } => Tag::Scroll,
            SemanticAction::Click { .. } => Tag::Click,
        }
    }

    /// Wire bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Wire bytes, consuming the frame.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}
