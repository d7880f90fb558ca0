//! Mapping from classified gestures to intents.

use std::time::Duration;

use glidepad_proto::Button;
use tracing::trace;

use crate::{
    gesture::{
        Classifier, Feedback, GestureAction, GestureConfig, GestureEvent, RawInput, Surface,
    },
    time::Timestamp,
};

const TAP_HAPTIC: Duration = Duration::from_millis(50);
const PRESS_HAPTIC: Duration = Duration::from_millis(100);
const DOUBLE_TAP_HAPTIC: Duration = Duration::from_millis(50);

/// Gesture recognizer.
///
/// Pan moves become per-sample deltas (current position minus the previous
/// sample) scaled by the configured sensitivity. Two-contact pans forward only
/// their vertical delta, as scroll. Taps, long presses and double taps become
/// left, right and double clicks.
#[derive(Debug, Clone)]
pub struct Recognizer<I>
where
    I: Timestamp,
{
    classifier: Classifier<I>,
    last_point: Option<(f64, f64)>,
}

impl<I> Recognizer<I>
where
    I: Timestamp,
{
    /// Recognizer for the given configuration.
    pub fn new(config: GestureConfig) -> Self {
        Self { classifier: Classifier::new(config), last_point: None }
    }

    /// Underlying classifier.
    #[must_use]
    pub fn classifier(&self) -> &Classifier<I> {
        &self.classifier
    }

    /// Input modality.
    #[must_use]
    pub fn surface(&self) -> Surface {
        self.classifier.config().surface
    }

    /// Recognize one raw sample.
    pub fn handle_input(&mut self, input: RawInput, now: I) -> Vec<GestureAction> {
        if let RawInput::Wheel { dy } = input {
            if dy.is_finite() && dy != 0.0 {
                return vec![GestureAction::Scroll { dy }];
            }
            return Vec::new();
        }

        let events = self.classifier.handle_input(input, now);
        self.map_events(events)
    }

    /// Earliest gesture deadline.
    #[must_use]
    pub fn poll_timeout(&self) -> Option<I> {
        self.classifier.poll_timeout()
    }

    /// Fire gesture deadlines that have been reached.
    pub fn handle_timeout(&mut self, now: I) -> Vec<GestureAction> {
        let events = self.classifier.handle_timeout(now);
        self.map_events(events)
    }

    /// Forget all gesture state.
    pub fn reset(&mut self) {
        self.classifier.reset();
        self.last_point = None;
    }

    fn map_events(&mut self, events: Vec<GestureEvent>) -> Vec<GestureAction> {
        let mut actions = Vec::with_capacity(events.len());
        for event in events {
            self.map_event(event, &mut actions);
        }
        actions
    }

    fn map_event(&mut self, event: GestureEvent, actions: &mut Vec<GestureAction>) {
        let sensitivity = self.classifier.config().sensitivity;

        match event {
            GestureEvent::PanStart { x, y } | GestureEvent::MultiPanStart { x, y } => {
                self.last_point = Some((x, y));
                actions.push(GestureAction::Feedback(Feedback::ContactShown { x, y }));
            },
            GestureEvent::PanMove { x, y } => {
                if let Some((px, py)) = self.last_point.replace((x, y)) {
                    let (dx, dy) = ((x - px) * sensitivity, (y - py) * sensitivity);
                    if dx != 0.0 || dy != 0.0 {
                        actions.push(GestureAction::Move { dx, dy });
                    }
                }
            },
            GestureEvent::MultiPanMove { x, y } => {
                if let Some((_, py)) = self.last_point.replace((x, y)) {
                    let dy = (y - py) * sensitivity;
                    if dy != 0.0 {
                        actions.push(GestureAction::Scroll { dy });
                    }
                }
            },
            GestureEvent::PanEnd => {
                self.last_point = None;
                actions.push(GestureAction::Feedback(Feedback::ContactHidden));
            },
            GestureEvent::Tap => {
                actions.push(GestureAction::Click(Button::Left));
                actions.push(GestureAction::Feedback(Feedback::Haptic(TAP_HAPTIC)));
            },
            GestureEvent::LongPress => {
                actions.push(GestureAction::Click(Button::Right));
                actions.push(GestureAction::Feedback(Feedback::Haptic(PRESS_HAPTIC)));
            },
            GestureEvent::DoubleTap => {
                actions.push(GestureAction::Click(Button::Double));
                actions.push(GestureAction::Feedback(Feedback::Haptic(DOUBLE_TAP_HAPTIC)));
            },
            GestureEvent::Click { button } => match button.to_protocol() {
                Some(button) => actions.push(GestureAction::Click(button)),
                None => trace!(button = button.0, "dropping unmapped button"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::gesture::PlatformButton;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn clicks(actions: &[GestureAction]) -> Vec<Button> {
        actions
            .iter()
            .filter_map(|a| match a {
                GestureAction::Click(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    fn moves(actions: &[GestureAction]) -> (f64, f64) {
        actions.iter().fold((0.0, 0.0), |(sx, sy), a| match a {
            GestureAction::Move { dx, dy } => (sx + dx, sy + dy),
            _ => (sx, sy),
        })
    }

    #[test]
    fn drag_yields_deltas_from_press_point() {
        let t0 = Instant::now();
        let mut r = Recognizer::new(GestureConfig::desktop());
        let button = PlatformButton::PRIMARY;

        let mut actions = Vec::new();
        actions.extend(r.handle_input(RawInput::PointerDown { button, x: 0.0, y: 0.0 }, t0));
        actions.extend(r.handle_input(RawInput::PointerMove { x: 3.0, y: 0.0 }, t0));
        actions.extend(r.handle_input(RawInput::PointerMove { x: 3.0, y: 4.0 }, t0));

        assert_eq!(actions, vec![
            GestureAction::Feedback(Feedback::ContactShown { x: 0.0, y: 0.0 }),
            GestureAction::Move { dx: 3.0, dy: 4.0 },
        ]);

        let actions = r.handle_input(RawInput::PointerUp { button, x: 3.0, y: 4.0 }, t0);
        assert_eq!(actions, vec![GestureAction::Feedback(Feedback::ContactHidden)]);
    }

    #[test]
    fn touch_pan_scaled_by_sensitivity() {
        let t0 = Instant::now();
        let mut r = Recognizer::new(GestureConfig::touch());

        let mut actions = Vec::new();
        actions.extend(r.handle_input(RawInput::ContactDown { id: 1, x: 0.0, y: 0.0 }, t0));
        actions.extend(r.handle_input(RawInput::ContactMove { id: 1, x: 20.0, y: 0.0 }, t0));
        actions.extend(r.handle_input(RawInput::ContactMove { id: 1, x: 30.0, y: 10.0 }, t0));

        let (dx, dy) = moves(&actions);
        assert!((dx - 36.0).abs() < 1e-9);
        assert!((dy - 12.0).abs() < 1e-9);
    }

    #[test]
    fn double_tap_is_one_double_click() {
        let t0 = Instant::now();
        let mut r = Recognizer::new(GestureConfig::touch());

        let mut actions = Vec::new();
        actions.extend(r.handle_input(RawInput::ContactDown { id: 1, x: 5.0, y: 5.0 }, t0));
        actions.extend(r.handle_input(RawInput::ContactUp { id: 1 }, t0 + ms(40)));
        actions.extend(r.handle_input(RawInput::ContactDown { id: 2, x: 6.0, y: 5.0 }, t0 + ms(70)));
        actions.extend(r.handle_input(RawInput::ContactUp { id: 2 }, t0 + ms(90)));
        actions.extend(r.handle_timeout(t0 + ms(2000)));

        assert_eq!(clicks(&actions), vec![Button::Double]);
        assert!(actions.contains(&GestureAction::Feedback(Feedback::Haptic(DOUBLE_TAP_HAPTIC))));
    }

    #[test]
    fn single_tap_clicks_left_after_window() {
        let t0 = Instant::now();
        let mut r = Recognizer::new(GestureConfig::touch());

        r.handle_input(RawInput::ContactDown { id: 1, x: 5.0, y: 5.0 }, t0);
        assert!(r.handle_input(RawInput::ContactUp { id: 1 }, t0 + ms(40)).is_empty());

        let deadline = r.poll_timeout().unwrap();
        let actions = r.handle_timeout(deadline);
        assert_eq!(actions, vec![
            GestureAction::Click(Button::Left),
            GestureAction::Feedback(Feedback::Haptic(TAP_HAPTIC)),
        ]);
    }

    #[test]
    fn long_press_is_right_click_without_tap() {
        let t0 = Instant::now();
        let mut r = Recognizer::new(GestureConfig::touch());

        let mut actions = Vec::new();
        actions.extend(r.handle_input(RawInput::ContactDown { id: 1, x: 5.0, y: 5.0 }, t0));
        actions.extend(r.handle_timeout(t0 + ms(600)));
        actions.extend(r.handle_input(RawInput::ContactUp { id: 1 }, t0 + ms(700)));
        actions.extend(r.handle_timeout(t0 + ms(5000)));

        assert_eq!(clicks(&actions), vec![Button::Right]);
        assert!(actions.contains(&GestureAction::Feedback(Feedback::Haptic(PRESS_HAPTIC))));
    }

    #[test]
    fn two_finger_pan_forwards_vertical_only() {
        let t0 = Instant::now();
        let mut r = Recognizer::new(GestureConfig { sensitivity: 1.0, ..GestureConfig::touch() });

        let mut actions = Vec::new();
        actions.extend(r.handle_input(RawInput::ContactDown { id: 1, x: 0.0, y: 0.0 }, t0));
        actions.extend(r.handle_input(RawInput::ContactDown { id: 2, x: 10.0, y: 0.0 }, t0));
        actions.extend(r.handle_input(RawInput::ContactMove { id: 1, x: 40.0, y: 20.0 }, t0));
        actions.extend(r.handle_input(RawInput::ContactMove { id: 2, x: 50.0, y: 20.0 }, t0));

        assert!(!actions.iter().any(|a| matches!(a, GestureAction::Move { .. })));
        let scrolled: f64 = actions
            .iter()
            .filter_map(|a| match a {
                GestureAction::Scroll { dy } => Some(*dy),
                _ => None,
            })
            .sum();
        assert!((scrolled - 20.0).abs() < 1e-9);
    }

    #[test]
    fn unmapped_button_dropped() {
        let t0 = Instant::now();
        let mut r = Recognizer::new(GestureConfig::desktop());
        let button = PlatformButton::BACK;

        r.handle_input(RawInput::PointerDown { button, x: 1.0, y: 1.0 }, t0);
        assert!(r.handle_input(RawInput::PointerUp { button, x: 1.0, y: 1.0 }, t0).is_empty());
    }

    #[test]
    fn mapped_buttons_click() {
        let t0 = Instant::now();
        let mut r = Recognizer::new(GestureConfig::desktop());

        for (button, expected) in [
            (PlatformButton::PRIMARY, Button::Left),
            (PlatformButton::SECONDARY, Button::Right),
            (PlatformButton::AUXILIARY, Button::Middle),
        ] {
            r.handle_input(RawInput::PointerDown { button, x: 1.0, y: 1.0 }, t0);
            let actions = r.handle_input(RawInput::PointerUp { button, x: 1.0, y: 1.0 }, t0);
            assert_eq!(actions, vec![GestureAction::Click(expected)]);
        }
    }

    #[test]
    fn wheel_scrolls_on_any_surface() {
        let t0 = Instant::now();
        for config in [GestureConfig::desktop(), GestureConfig::touch()] {
            let mut r = Recognizer::new(config);
            assert_eq!(r.handle_input(RawInput::Wheel { dy: -3.0 }, t0), vec![
                GestureAction::Scroll { dy: -3.0 }
            ]);
            assert!(r.handle_input(RawInput::Wheel { dy: 0.0 }, t0).is_empty());
            assert!(r.handle_input(RawInput::Wheel { dy: f64::NAN }, t0).is_empty());
        }
    }
}
