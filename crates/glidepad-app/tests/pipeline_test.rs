//! Integration tests for the input pipeline.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - Exactly the expected actions reached the wire, in order
//! - Nothing reached the wire while the channel was not open
//! - Aggregation state is empty once all deadlines have fired

use std::time::{Duration, Instant};

use glidepad_app::{Pipeline, PipelineAction, PipelineConfig, TransportEvent};
use glidepad_core::{
    ChannelConfig, ConnectionState, ReconnectPolicy,
    gesture::{PlatformButton, RawInput},
};
use glidepad_proto::{Button, SemanticAction, WireMessage};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Create a pipeline whose channel is already open.
fn open_pipeline(config: PipelineConfig, now: Instant) -> Pipeline<Instant> {
    let mut pipeline = Pipeline::new(config);
    pipeline.start();
    pipeline.handle_transport(TransportEvent::Opened, now);
    pipeline
}

/// Decode every write in `actions`.
fn written(actions: &[PipelineAction]) -> Vec<SemanticAction> {
    actions
        .iter()
        .filter_map(|a| match a {
            PipelineAction::Write(m) => Some(m.decode().unwrap()),
            _ => None,
        })
        .collect()
}

/// Fire deadlines until none remain before `until`.
fn drain(pipeline: &mut Pipeline<Instant>, until: Instant) -> Vec<PipelineAction> {
    let mut actions = Vec::new();
    while let Some(at) = pipeline.poll_timeout() {
        if at > until {
            break;
        }
        actions.extend(pipeline.handle_timeout(at));
    }
    actions
}

#[test]
fn drag_within_one_tick_is_one_move() {
    let t0 = Instant::now();
    let mut p = open_pipeline(PipelineConfig::desktop(), t0);
    let button = PlatformButton::PRIMARY;

    let mut actions = Vec::new();
    actions.extend(p.handle_input(RawInput::PointerDown { button, x: 0.0, y: 0.0 }, t0));
    actions.extend(p.handle_input(RawInput::PointerMove { x: 3.0, y: 0.0 }, t0 + ms(2)));
    actions.extend(p.handle_input(RawInput::PointerMove { x: 3.0, y: 4.0 }, t0 + ms(4)));
    actions.extend(drain(&mut p, t0 + ms(100)));

    assert_eq!(written(&actions), vec![SemanticAction::Move { dx: 3, dy: 4 }]);
    assert_eq!(p.motion().accumulator().x, 0.0);
    assert_eq!(p.motion().accumulator().y, 0.0);
}

#[test]
fn tap_tap_is_one_double_click() {
    let t0 = Instant::now();
    let mut p = open_pipeline(PipelineConfig::touch(), t0);

    let mut actions = Vec::new();
    actions.extend(p.handle_input(RawInput::ContactDown { id: 1, x: 50.0, y: 50.0 }, t0));
    actions.extend(p.handle_input(RawInput::ContactUp { id: 1 }, t0 + ms(30)));
    actions.extend(drain(&mut p, t0 + ms(60)));
    actions.extend(p.handle_input(RawInput::ContactDown { id: 2, x: 51.0, y: 50.0 }, t0 + ms(60)));
    actions.extend(p.handle_input(RawInput::ContactUp { id: 2 }, t0 + ms(80)));
    actions.extend(drain(&mut p, t0 + ms(5000)));

    assert_eq!(written(&actions), vec![SemanticAction::Click { button: Button::Double }]);
}

#[test]
fn double_click_frame_uses_shared_code() {
    let t0 = Instant::now();
    let mut p = open_pipeline(PipelineConfig::touch(), t0);

    let mut actions = Vec::new();
    actions.extend(p.handle_input(RawInput::ContactDown { id: 1, x: 0.0, y: 0.0 }, t0));
    actions.extend(p.handle_input(RawInput::ContactUp { id: 1 }, t0 + ms(30)));
    actions.extend(p.handle_input(RawInput::ContactDown { id: 2, x: 0.0, y: 0.0 }, t0 + ms(60)));
    actions.extend(p.handle_input(RawInput::ContactUp { id: 2 }, t0 + ms(80)));

    let writes: Vec<_> = actions
        .iter()
        .filter_map(|a| match a {
            PipelineAction::Write(WireMessage::Binary(bytes)) => Some(bytes.to_vec()),
            _ => None,
        })
        .collect();
    assert_eq!(writes, vec![vec![0x03, 0x03]]);
}

#[test]
fn scroll_burst_sends_last_value() {
    let t0 = Instant::now();
    let mut p = open_pipeline(PipelineConfig::desktop(), t0);

    let mut actions = Vec::new();
    for (i, dy) in [1.0, 4.0, 9.0, -2.4].into_iter().enumerate() {
        actions.extend(drain(&mut p, t0 + ms(i as u64 * 10)));
        actions.extend(p.handle_input(RawInput::Wheel { dy }, t0 + ms(i as u64 * 10)));
    }
    actions.extend(drain(&mut p, t0 + ms(1000)));

    assert_eq!(written(&actions), vec![SemanticAction::Scroll { dy: -2 }]);
}

#[test]
fn long_press_is_right_click() {
    let t0 = Instant::now();
    let mut p = open_pipeline(PipelineConfig::touch(), t0);

    let mut actions = Vec::new();
    actions.extend(p.handle_input(RawInput::ContactDown { id: 1, x: 0.0, y: 0.0 }, t0));
    actions.extend(drain(&mut p, t0 + ms(700)));
    actions.extend(p.handle_input(RawInput::ContactUp { id: 1 }, t0 + ms(700)));
    actions.extend(drain(&mut p, t0 + ms(5000)));

    assert_eq!(written(&actions), vec![SemanticAction::Click { button: Button::Right }]);
}

#[test]
fn two_finger_pan_scrolls_vertically() {
    let t0 = Instant::now();
    let mut config = PipelineConfig::touch();
    config.gesture.sensitivity = 1.0;
    let mut p = open_pipeline(config, t0);

    let mut actions = Vec::new();
    actions.extend(p.handle_input(RawInput::ContactDown { id: 1, x: 0.0, y: 0.0 }, t0));
    actions.extend(p.handle_input(RawInput::ContactDown { id: 2, x: 20.0, y: 0.0 }, t0));
    actions.extend(p.handle_input(RawInput::ContactMove { id: 1, x: 30.0, y: 12.0 }, t0 + ms(5)));
    actions.extend(p.handle_input(RawInput::ContactMove { id: 2, x: 50.0, y: 12.0 }, t0 + ms(10)));
    actions.extend(drain(&mut p, t0 + ms(1000)));

    assert_eq!(written(&actions), vec![SemanticAction::Scroll { dy: 6 }]);
}

#[test]
fn reconnect_in_place_drops_while_closed_and_resumes() {
    let t0 = Instant::now();
    let mut p = open_pipeline(PipelineConfig::desktop(), t0);

    p.handle_transport(TransportEvent::Closed { reason: "reset".into() }, t0);
    assert_eq!(p.state(), ConnectionState::Closed);

    let mut actions = p.handle_input(RawInput::Wheel { dy: 5.0 }, t0);
    actions.extend(p.handle_timeout(t0 + ms(50)));
    assert!(written(&actions).is_empty());
    assert_eq!(p.channel().dropped(), 1);

    let actions = drain(&mut p, t0 + ms(1000));
    assert_eq!(actions, vec![PipelineAction::Connect]);
    assert_eq!(p.state(), ConnectionState::Connecting);

    p.handle_transport(TransportEvent::Opened, t0 + ms(1100));
    let mut actions = p.handle_input(RawInput::Wheel { dy: 5.0 }, t0 + ms(1100));
    actions.extend(drain(&mut p, t0 + ms(2000)));
    assert_eq!(written(&actions), vec![SemanticAction::Scroll { dy: 5 }]);
}

#[test]
fn reload_on_close_requests_restart() {
    let t0 = Instant::now();
    let config = PipelineConfig {
        channel: ChannelConfig { policy: ReconnectPolicy::ReloadOnClose, reconnect_delay: ms(250) },
        ..PipelineConfig::desktop()
    };
    let mut p = open_pipeline(config, t0);

    p.handle_input(RawInput::Wheel { dy: 5.0 }, t0);
    p.handle_transport(TransportEvent::Closed { reason: "gone".into() }, t0);

    let actions = drain(&mut p, t0 + ms(250));
    assert!(actions.contains(&PipelineAction::Restart));

    assert_eq!(p.restart(), vec![PipelineAction::Connect]);
    assert!(!p.scroll().is_pending());
    assert_eq!(p.channel().dropped(), 0);
}

#[test]
fn unmapped_button_never_reaches_wire() {
    let t0 = Instant::now();
    let mut p = open_pipeline(PipelineConfig::desktop(), t0);
    let button = PlatformButton::FORWARD;

    let mut actions = p.handle_input(RawInput::PointerDown { button, x: 0.0, y: 0.0 }, t0);
    actions.extend(p.handle_input(RawInput::PointerUp { button, x: 0.0, y: 0.0 }, t0));
    actions.extend(drain(&mut p, t0 + ms(1000)));

    assert!(written(&actions).is_empty());
}
