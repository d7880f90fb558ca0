//! Contact tracking and gesture classification.
//!
//! One [`Classifier`] owns every contact on the surface. Exactly one gesture
//! interpretation is active at a time:
//!
//! ```text
//!  Idle ──down──> Pressed ──move > pan_threshold──> Panning
//!                    │  └──held long_press_duration──> LongPressed
//!                    │
//!               second contact (also ends a pan)
//!                    v
//!              MultiPressed ──centroid moved──> MultiPanning
//!                    │                               │
//!                    └─── lift one / third contact ──┴──> Suppressed
//!
//!  every phase returns to Idle once all contacts are lifted
//! ```
//!
//! Pointer input runs a separate press / drag pair of phases and never mixes
//! with touch contacts.

use std::collections::BTreeMap;

use tracing::trace;

use crate::{
    gesture::{
        ContactId, GestureConfig, GestureEvent, PlatformButton, RawInput, Surface, TapArbiter,
        TapResolution, distance,
    },
    time::{Timestamp, earliest},
};

type Point = (f64, f64);

#[derive(Debug, Clone, Copy)]
enum Phase<I> {
    Idle,
    Pressed { id: ContactId, origin: Point, down_at: I, press_at: I },
    Panning { id: ContactId },
    LongPressed { id: ContactId },
    MultiPressed { origin: Point },
    MultiPanning,
    /// Contacts remain but none may produce a gesture until all are lifted.
    Suppressed,
    PointerPressed { button: PlatformButton, origin: Point },
    PointerPanning { button: PlatformButton },
}

/// Gesture classifier.
///
/// Sans-IO: takes the current time with every call and reports deadlines via
/// [`Classifier::poll_timeout`].
#[derive(Debug, Clone)]
pub struct Classifier<I>
where
    I: Timestamp,
{
    config: GestureConfig,
    phase: Phase<I>,
    contacts: BTreeMap<ContactId, Point>,
    arbiter: TapArbiter<I>,
}

impl<I> Classifier<I>
where
    I: Timestamp,
{
    /// Classifier for the given configuration.
    ///
    /// Desktop surfaces have no double tap, so their taps resolve immediately.
    pub fn new(config: GestureConfig) -> Self {
        let arbiter = match config.surface {
            Surface::Touch => {
                TapArbiter::new(config.double_tap_interval, config.double_tap_distance)
            },
            Surface::Desktop => TapArbiter::single_only(),
        };

        Self { config, phase: Phase::Idle, contacts: BTreeMap::new(), arbiter }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// No contact or pointer button is down.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    /// Number of touch contacts currently down.
    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Tap arbitration state.
    #[must_use]
    pub fn arbiter(&self) -> &TapArbiter<I> {
        &self.arbiter
    }

    /// Classify one raw sample.
    pub fn handle_input(&mut self, input: RawInput, now: I) -> Vec<GestureEvent> {
        match input {
            RawInput::ContactDown { id, x, y } => self.contact_down(id, (x, y), now),
            RawInput::ContactMove { id, x, y } => self.contact_move(id, (x, y)),
            RawInput::ContactUp { id } => self.contact_up(id, now, false),
            RawInput::ContactCancel { id } => self.contact_up(id, now, true),
            RawInput::PointerDown { button, x, y } => self.pointer_down(button, (x, y)),
            RawInput::PointerMove { x, y } => self.pointer_move((x, y)),
            RawInput::PointerUp { button, x, y } => self.pointer_up(button, (x, y)),
            RawInput::Wheel { .. } => Vec::new(),
        }
    }

    /// Earliest pending deadline: a tap waiting for its rival or a contact
    /// that may become a long press.
    #[must_use]
    pub fn poll_timeout(&self) -> Option<I> {
        let press_at = match self.phase {
            Phase::Pressed { press_at, .. } => Some(press_at),
            _ => None,
        };

        earliest(self.arbiter.poll_timeout(), press_at)
    }

    /// Fire deadlines that have been reached.
    pub fn handle_timeout(&mut self, now: I) -> Vec<GestureEvent> {
        let mut events = Vec::new();

        if let Some(resolution) = self.arbiter.handle_timeout(now) {
            events.push(resolution_event(resolution));
        }

        if let Phase::Pressed { id, press_at, .. } = self.phase
            && press_at <= now
        {
            self.resolve_pending_tap(&mut events);
            trace!(id, "long press");
            events.push(GestureEvent::LongPress);
            self.phase = Phase::LongPressed { id };
        }

        events
    }

    /// Drop all contacts, phases and pending taps.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.contacts.clear();
        self.arbiter.reset();
    }

    fn contact_down(&mut self, id: ContactId, at: Point, now: I) -> Vec<GestureEvent> {
        if !is_finite(at) || self.is_pointer_phase() {
            return Vec::new();
        }

        self.contacts.insert(id, at);
        let mut events = Vec::new();

        match (self.contacts.len(), self.phase) {
            (1, Phase::Idle) => {
                self.phase = Phase::Pressed {
                    id,
                    origin: at,
                    down_at: now,
                    press_at: now + self.config.long_press_duration,
                };
            },
            (2, Phase::Pressed { .. } | Phase::Panning { .. } | Phase::LongPressed { .. }) => {
                if matches!(self.phase, Phase::Panning { .. }) {
                    events.push(GestureEvent::PanEnd);
                }
                self.phase = Phase::MultiPressed { origin: self.centroid() };
            },
            (n, Phase::MultiPressed { .. } | Phase::MultiPanning) if n > 2 => {
                if matches!(self.phase, Phase::MultiPanning) {
                    events.push(GestureEvent::PanEnd);
                }
                self.phase = Phase::Suppressed;
            },
            _ => {},
        }

        events
    }

    fn contact_move(&mut self, id: ContactId, at: Point) -> Vec<GestureEvent> {
        if !is_finite(at) {
            return Vec::new();
        }
        let Some(position) = self.contacts.get_mut(&id) else {
            return Vec::new();
        };
        *position = at;

        let mut events = Vec::new();

        match self.phase {
            Phase::Pressed { id: pressed, origin, .. }
                if pressed == id && distance(origin, at) > self.config.pan_threshold =>
            {
                self.resolve_pending_tap(&mut events);
                events.push(GestureEvent::PanStart { x: origin.0, y: origin.1 });
                events.push(GestureEvent::PanMove { x: at.0, y: at.1 });
                self.phase = Phase::Panning { id };
            },
            Phase::Panning { id: panning } if panning == id => {
                events.push(GestureEvent::PanMove { x: at.0, y: at.1 });
            },
            Phase::MultiPressed { origin } => {
                let centroid = self.centroid();
                if distance(origin, centroid) > self.config.multi_pan_threshold {
                    self.resolve_pending_tap(&mut events);
                    events.push(GestureEvent::MultiPanStart { x: origin.0, y: origin.1 });
                    events.push(GestureEvent::MultiPanMove { x: centroid.0, y: centroid.1 });
                    self.phase = Phase::MultiPanning;
                }
            },
            Phase::MultiPanning => {
                let centroid = self.centroid();
                events.push(GestureEvent::MultiPanMove { x: centroid.0, y: centroid.1 });
            },
            _ => {},
        }

        events
    }

    fn contact_up(&mut self, id: ContactId, now: I, cancelled: bool) -> Vec<GestureEvent> {
        if self.contacts.remove(&id).is_none() {
            return Vec::new();
        }

        let mut events = Vec::new();
        let remaining = self.contacts.len();

        match self.phase {
            Phase::Pressed { id: pressed, origin, down_at, .. } if pressed == id => {
                self.phase = Phase::Idle;
                if !cancelled && now - down_at <= self.config.tap_max_duration {
                    events.extend(
                        self.arbiter.on_tap(origin.0, origin.1, now).into_iter().map(resolution_event),
                    );
                }
            },
            Phase::Panning { id: panning } if panning == id => {
                events.push(GestureEvent::PanEnd);
                self.phase = Phase::Idle;
            },
            Phase::LongPressed { id: pressed } if pressed == id => {
                self.phase = Phase::Idle;
            },
            Phase::MultiPressed { .. } | Phase::MultiPanning | Phase::Suppressed => {
                if matches!(self.phase, Phase::MultiPanning) {
                    events.push(GestureEvent::PanEnd);
                }
                self.phase = if remaining == 0 { Phase::Idle } else { Phase::Suppressed };
            },
            _ => {},
        }

        events
    }

    fn pointer_down(&mut self, button: PlatformButton, at: Point) -> Vec<GestureEvent> {
        if is_finite(at) && matches!(self.phase, Phase::Idle) && self.contacts.is_empty() {
            self.phase = Phase::PointerPressed { button, origin: at };
        }
        Vec::new()
    }

    fn pointer_move(&mut self, at: Point) -> Vec<GestureEvent> {
        if !is_finite(at) {
            return Vec::new();
        }

        match self.phase {
            Phase::PointerPressed { button, origin }
                if distance(origin, at) > self.config.click_slop =>
            {
                self.phase = Phase::PointerPanning { button };
                vec![
                    GestureEvent::PanStart { x: origin.0, y: origin.1 },
                    GestureEvent::PanMove { x: at.0, y: at.1 },
                ]
            },
            Phase::PointerPanning { .. } => vec![GestureEvent::PanMove { x: at.0, y: at.1 }],
            _ => Vec::new(),
        }
    }

    fn pointer_up(&mut self, button: PlatformButton, at: Point) -> Vec<GestureEvent> {
        match self.phase {
            Phase::PointerPressed { button: pressed, .. } if pressed == button => {
                self.phase = Phase::Idle;
                vec![GestureEvent::Click { button }]
            },
            Phase::PointerPanning { button: pressed } if pressed == button => {
                self.phase = Phase::Idle;
                let mut events = Vec::with_capacity(2);
                if is_finite(at) {
                    events.push(GestureEvent::PanMove { x: at.0, y: at.1 });
                }
                events.push(GestureEvent::PanEnd);
                events
            },
            _ => Vec::new(),
        }
    }

    fn resolve_pending_tap(&mut self, events: &mut Vec<GestureEvent>) {
        if let Some(resolution) = self.arbiter.resolve_pending() {
            events.push(resolution_event(resolution));
        }
    }

    fn is_pointer_phase(&self) -> bool {
        matches!(self.phase, Phase::PointerPressed { .. } | Phase::PointerPanning { .. })
    }

    #[allow(clippy::cast_precision_loss)]
    fn centroid(&self) -> Point {
        let n = self.contacts.len().max(1) as f64;
        let (sx, sy) =
            self.contacts.values().fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
        (sx / n, sy / n)
    }
}

fn resolution_event(resolution: TapResolution) -> GestureEvent {
    match resolution {
        TapResolution::Tap => GestureEvent::Tap,
        TapResolution::DoubleTap => GestureEvent::DoubleTap,
    }
}

fn is_finite(at: Point) -> bool {
    at.0.is_finite() && at.1.is_finite()
}
