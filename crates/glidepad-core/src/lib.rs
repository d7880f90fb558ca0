//! Core state machines for glidepad.
//!
//! Everything here is Sans-IO: methods take the current time as an argument
//! and return values or actions for the caller to execute. Timers are exposed
//! as deadlines (`poll_timeout`) and fired with `handle_timeout(now)`, so the
//! same code runs under a real clock and under virtual time in tests.
//!
//! # Components
//!
//! - [`gesture::Recognizer`]: raw pointer/touch samples to move, scroll and
//!   click intents
//! - [`MotionAggregator`]: at most one move per refresh tick, summing deltas
//! - [`ScrollDebouncer`]: one scroll per quiescence window, latest value wins
//! - [`Channel`]: connection lifecycle and reconnection policy

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod channel;
pub mod error;
pub mod gesture;
pub mod motion;
pub mod scroll;
pub mod time;

pub use channel::{Channel, ChannelAction, ChannelConfig, ConnectionState, ReconnectPolicy};
pub use error::ChannelError;
pub use motion::{Accumulator, MotionAggregator, MotionConfig};
pub use scroll::{ScrollConfig, ScrollDebouncer};
pub use time::Timestamp;
