//! Per-deployment framing choice.

use bytes::Bytes;

use crate::{Frame, SemanticAction, TextRecord, errors::Result};

/// Wire form used on a connection.
///
/// Chosen once per deployment. There is no negotiation: the remote host must
/// expect the same framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Fixed-size binary frames sent as binary transport messages.
    #[default]
    Binary,
    /// JSON records sent as text transport messages.
    Text,
}

/// One transport write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireMessage {
    /// Binary frame bytes
    Binary(Bytes),
    /// JSON record
    Text(String),
}

impl Framing {
    /// Encode an action into a transport message.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::InvalidRecord` if JSON serialization fails (text
    ///   framing only)
    pub fn encode(self, action: SemanticAction) -> Result<WireMessage> {
        match self {
            Self::Binary => Ok(WireMessage::Binary(Frame::from_action(action).into_bytes())),
            Self::Text => Ok(WireMessage::Text(TextRecord::from(action).to_json()?)),
        }
    }
}

impl WireMessage {
    /// Decode the action carried by this message.
    pub fn decode(&self) -> Result<SemanticAction> {
        match self {
            Self::Binary(bytes) => Ok(Frame::decode(bytes)?.action()),
            Self::Text(text) => SemanticAction::try_from(TextRecord::from_json(text)?),
        }
    }

    /// Number of bytes written to the transport.
    #[must_use]
    pub fn wire_size(&self) -> usize {
        match self {
            Self::Binary(bytes) => bytes.len(),
            Self::Text(text) => text.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Button;

    #[test]
    fn binary_framing_produces_frame_bytes() {
        let message = Framing::Binary.encode(SemanticAction::Click { button: Button::Right }).unwrap();
        assert_eq!(message, WireMessage::Binary(Bytes::from_static(&[0x03, 0x02])));
        assert_eq!(message.wire_size(), 2);
    }

    #[test]
    fn text_framing_produces_record() {
        let message = Framing::Text.encode(SemanticAction::Scroll { dy: 2 }).unwrap();
        assert_eq!(message, WireMessage::Text(r#"{"msg_type":"scroll","delta_y":2}"#.to_string()));
    }

    #[test]
    fn both_framings_decode_to_same_action() {
        let action = SemanticAction::Move { dx: -7, dy: 12 };
        for framing in [Framing::Binary, Framing::Text] {
            let message = framing.encode(action).unwrap();
            assert_eq!(message.decode().unwrap(), action);
        }
    }
}
