//! Protocol errors.
//!
//! Encoding cannot fail for well-formed actions: payload sizes are fixed per
//! tag. These errors come from decoding bytes or records produced elsewhere.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while decoding wire messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Message contained no bytes.
    #[error("empty frame")]
    EmptyFrame,

    /// First byte is not a known tag.
    #[error("unknown frame tag {0:#04x}")]
    UnknownTag(u8),

    /// Frame length does not match the size fixed by its tag.
    #[error("invalid frame length for tag {tag:#04x}: expected {expected}, got {actual}")]
    InvalidLength {
        /// Tag byte of the frame
        tag: u8,
        /// Size fixed by the tag
        expected: usize,
        /// Bytes received
        actual: usize,
    },

    /// Click frame carried a button code outside the protocol.
    #[error("unknown button code {0}")]
    UnknownButton(u8),

    /// Text record could not be parsed or serialized.
    #[error("invalid text record: {0}")]
    InvalidRecord(String),

    /// Text record is missing a field required by its message type.
    #[error("text record of type {msg_type} is missing field {field}")]
    MissingField {
        /// Message type of the record
        msg_type: &'static str,
        /// Name of the missing field
        field: &'static str,
    },
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidRecord(err.to_string())
    }
}
