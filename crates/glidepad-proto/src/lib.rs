//! Wire protocol for glidepad.
//!
//! Three semantic actions (move, scroll, click) travel from the gesture
//! surface to the remote host. Each action is encoded into exactly one
//! message and each message is one transport write.
//!
//! # Framings
//!
//! - [`Frame`]: fixed-size binary frames, 1-byte tag followed by a payload
//!   whose layout is fixed by the tag. Little-endian integers.
//! - [`TextRecord`]: one JSON record per action.
//!
//! A deployment picks one [`Framing`] and keeps it; the two are not
//! interchangeable on the same connection.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod errors;
mod frame;
mod framing;
mod record;

pub use action::{Button, SemanticAction};
pub use errors::{ProtocolError, Result};
pub use frame::{Frame, Tag};
pub use framing::{Framing, WireMessage};
pub use record::{MsgType, TextRecord};
