//! JSON record framing.
//!
//! Semantically equivalent to [`crate::Frame`], one record per action, no
//! batching:
//!
//! ```json
//! {"msg_type":"move","delta_x":3,"delta_y":4}
//! {"msg_type":"scroll","delta_y":-10}
//! {"msg_type":"click","button":"left"}
//! ```
//!
//! Fields not used by a message type are omitted.

use serde::{Deserialize, Serialize};

use crate::{
    Button, SemanticAction,
    errors::{ProtocolError, Result},
};

/// Record discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MsgType {
    /// Relative pointer motion
    Move,
    /// Button click
    Click,
    /// Vertical scroll
    Scroll,
}

impl MsgType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Click => "click",
            Self::Scroll => "scroll",
        }
    }
}

/// One textual message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    /// Message type
    pub msg_type: MsgType,
    /// Horizontal delta (move only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_x: Option<i32>,
    /// Vertical delta (move and scroll)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_y: Option<i32>,
    /// Clicked button (click only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<Button>,
}

impl TextRecord {
    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from a JSON string.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl From<SemanticAction> for TextRecord {
    fn from(action: SemanticAction) -> Self {
        match action {
            SemanticAction::Move { dx, dy } => Self {
                msg_type: MsgType::Move,
                delta_x: Some(dx),
                delta_y: Some(dy),
                button: None,
            },
            SemanticAction::Scroll { dy } => {
                Self { msg_type: MsgType::Scroll, delta_x: None, delta_y: Some(dy), button: None }
            },
            SemanticAction::Click { button } => {
                Self { msg_type: MsgType::Click, delta_x: None, delta_y: None, button: Some(button) }
            },
        }
    }
}

impl TryFrom<TextRecord> for SemanticAction {
    type Error = ProtocolError;

    fn try_from(record: TextRecord) -> Result<Self> {
        let missing =
            |field| ProtocolError::MissingField { msg_type: record.msg_type.as_str(), field };

        match record.msg_type {
            MsgType::Move => Ok(Self::Move {
                dx: record.delta_x.ok_or_else(|| missing("delta_x"))?,
                dy: record.delta_y.ok_or_else(|| missing("delta_y"))?,
            }),
            MsgType::Scroll => Ok(Self::Scroll { dy: record.delta_y.ok_or_else(|| missing("delta_y"))? }),
            MsgType::Click => {
                Ok(Self::Click { button: record.button.ok_or_else(|| missing("button"))? })
            },
        }
    }
}
