//! Fuzz target for the input pipeline (recognize → aggregate → frame → channel)
//!
//! # Strategy
//!
//! - Arbitrary interleavings of touch, pointer and wheel samples
//! - Non-finite coordinates and deltas
//! - Virtual time advancing in arbitrary steps, firing deadlines in order
//! - Transport opening and closing at arbitrary points, both reconnect
//!   policies
//!
//! # Invariants
//!
//! - Writes are only produced while the channel is open
//! - Every write decodes to a semantic action
//! - The accumulator is pending exactly when a flush deadline exists
//! - Deadlines never lie in the past after they have been handled
//! - Full pipeline never panics

#![no_main]

use std::time::{Duration, Instant};

use arbitrary::Arbitrary;
use glidepad_app::{Pipeline, PipelineAction, PipelineConfig, TransportEvent};
use glidepad_core::{
    ConnectionState, ReconnectPolicy,
    gesture::{PlatformButton, RawInput},
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct Scenario {
    touch: bool,
    reload_on_close: bool,
    ops: Vec<Op>,
}

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Down { id: u8, x: i16, y: i16 },
    Move { id: u8, x: i16, y: i16 },
    Up { id: u8 },
    Cancel { id: u8 },
    PointerDown { button: i8, x: i16, y: i16 },
    PointerMove { x: i16, y: i16 },
    PointerUp { button: i8, x: i16, y: i16 },
    Wheel { dy: i16 },
    NonFinite { id: u8 },
    Advance { ms: u16 },
    Open,
    Close,
}

impl Op {
    fn input(&self) -> Option<RawInput> {
        let (x, y) = match *self {
            Self::Down { x, y, .. }
            | Self::Move { x, y, .. }
            | Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y, .. } => (f64::from(x), f64::from(y)),
            _ => (0.0, 0.0),
        };

        Some(match *self {
            Self::Down { id, .. } => RawInput::ContactDown { id: u32::from(id % 4), x, y },
            Self::Move { id, .. } => RawInput::ContactMove { id: u32::from(id % 4), x, y },
            Self::Up { id } => RawInput::ContactUp { id: u32::from(id % 4) },
            Self::Cancel { id } => RawInput::ContactCancel { id: u32::from(id % 4) },
            Self::PointerDown { button, .. } => {
                RawInput::PointerDown { button: PlatformButton(i16::from(button)), x, y }
            },
            Self::PointerMove { .. } => RawInput::PointerMove { x, y },
            Self::PointerUp { button, .. } => {
                RawInput::PointerUp { button: PlatformButton(i16::from(button)), x, y }
            },
            Self::Wheel { dy } => RawInput::Wheel { dy: f64::from(dy) / 4.0 },
            Self::NonFinite { id } => {
                RawInput::ContactMove { id: u32::from(id % 4), x: f64::NAN, y: f64::INFINITY }
            },
            Self::Advance { .. } | Self::Open | Self::Close => return None,
        })
    }
}

fn check(pipeline: &Pipeline<Instant>, actions: &[PipelineAction]) {
    for action in actions {
        if let PipelineAction::Write(message) = action {
            assert_eq!(pipeline.state(), ConnectionState::Open, "write while not open");
            assert!(message.decode().is_ok(), "malformed write {message:?}");
        }
    }

    assert_eq!(
        pipeline.motion().accumulator().pending,
        pipeline.motion().poll_timeout().is_some(),
        "accumulator pending flag out of sync with its deadline"
    );
}

/// Apply actions the way the runtime would, without a transport.
fn execute(pipeline: &mut Pipeline<Instant>, actions: Vec<PipelineAction>) {
    let mut pending = actions;
    while !pending.is_empty() {
        for action in std::mem::take(&mut pending) {
            if action == PipelineAction::Restart {
                pending.extend(pipeline.restart());
            }
        }
    }
}

fuzz_target!(|scenario: Scenario| {
    let mut config = if scenario.touch { PipelineConfig::touch() } else { PipelineConfig::desktop() };
    if scenario.reload_on_close {
        config.channel.policy = ReconnectPolicy::ReloadOnClose;
    }

    let mut now = Instant::now();
    let mut pipeline = Pipeline::new(config);
    pipeline.start();

    for op in scenario.ops.iter().take(512) {
        let actions = match op {
            Op::Advance { ms } => {
                let until = now + Duration::from_millis(u64::from(*ms));
                while let Some(at) = pipeline.poll_timeout().filter(|at| *at <= until) {
                    let fired = pipeline.handle_timeout(at);
                    check(&pipeline, &fired);
                    execute(&mut pipeline, fired);
                    if let Some(next) = pipeline.poll_timeout() {
                        assert!(next > at, "deadline left behind at {at:?}");
                    }
                }
                now = until;
                Vec::new()
            },
            Op::Open => {
                pipeline.handle_transport(TransportEvent::Opened, now);
                Vec::new()
            },
            Op::Close => {
                pipeline.handle_transport(TransportEvent::Closed { reason: "fuzz".into() }, now);
                Vec::new()
            },
            _ => match op.input() {
                Some(input) => pipeline.handle_input(input, now),
                None => Vec::new(),
            },
        };

        check(&pipeline, &actions);
        execute(&mut pipeline, actions);
    }
});
