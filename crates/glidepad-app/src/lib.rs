//! Application layer for glidepad
//!
//! Wires the Sans-IO components of `glidepad-core` into one input pipeline
//! and drives it with a generic runtime, so the same orchestration code runs
//! against a real terminal and socket and under deterministic simulation.
//!
//! # Components
//!
//! - [`Pipeline`]: recognizer, aggregator, debouncer, codec and channel
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod config;
mod driver;
mod event;
mod pipeline;
mod runtime;

pub use action::PipelineAction;
pub use config::PipelineConfig;
pub use driver::Driver;
pub use event::{DriverEvent, TransportEvent};
pub use pipeline::Pipeline;
pub use runtime::Runtime;
