//! Terminal gesture surface for glidepad
//!
//! A thin shell over [`glidepad_app::Driver`] that turns terminal mouse
//! events into raw input and writes frames over a WebSocket. All
//! orchestration logic lives in the generic [`glidepad_app::Runtime`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod input;
pub mod terminal;

pub use glidepad_app::{Driver, PipelineConfig, Runtime};
pub use input::InputMapper;
pub use terminal::{TerminalDriver, TerminalError};
