//! Input-to-wire pipeline.
//!
//! ```text
//! RawInput ─> Recognizer ─┬─ move ───> MotionAggregator ─┐
//!                         ├─ scroll ─> ScrollDebouncer ──┼─> Framing ─> Channel ─> Write
//!                         ├─ click ──────────────────────┘
//!                         └─ feedback ─────────────────────────────────────────> Feedback
//! ```
//!
//! Sans-IO like its parts: every method takes `now` and returns
//! [`PipelineAction`]s. A click first flushes pending motion so the remote
//! pointer reaches its final position before the button event arrives.

use glidepad_core::{
    Channel, ChannelAction, ConnectionState, MotionAggregator, ScrollDebouncer, Timestamp,
    gesture::{GestureAction, RawInput, Recognizer},
    time::earliest,
};
use glidepad_proto::SemanticAction;

use crate::{PipelineAction, PipelineConfig, TransportEvent};

/// Gesture-to-wire pipeline for one connection.
#[derive(Debug, Clone)]
pub struct Pipeline<I>
where
    I: Timestamp,
{
    config: PipelineConfig,
    recognizer: Recognizer<I>,
    motion: MotionAggregator<I>,
    scroll: ScrollDebouncer<I>,
    channel: Channel<I>,
}

impl<I> Pipeline<I>
where
    I: Timestamp,
{
    /// Create a pipeline. Call [`Pipeline::start`] to connect.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            recognizer: Recognizer::new(config.gesture.clone()),
            motion: MotionAggregator::new(config.motion.clone()),
            scroll: ScrollDebouncer::new(config.scroll.clone()),
            channel: Channel::new(config.channel.clone()),
            config,
        }
    }

    /// Begin the first connection attempt.
    pub fn start(&mut self) -> Vec<PipelineAction> {
        self.channel.start().into_iter().map(channel_action).collect()
    }

    /// Discard all state and start over with the same configuration.
    pub fn restart(&mut self) -> Vec<PipelineAction> {
        tracing::info!("restarting pipeline");
        *self = Self::new(self.config.clone());
        self.start()
    }

    /// Feed one raw sample.
    pub fn handle_input(&mut self, input: RawInput, now: I) -> Vec<PipelineAction> {
        let gestures = self.recognizer.handle_input(input, now);
        let mut actions = Vec::new();
        self.apply(gestures, now, &mut actions);
        actions
    }

    /// Transport reports a lifecycle change.
    pub fn handle_transport(&mut self, event: TransportEvent, now: I) {
        match event {
            TransportEvent::Opened => {
                if let Err(e) = self.channel.handle_opened() {
                    tracing::warn!(error = %e, "ignoring unexpected open");
                }
            },
            TransportEvent::Closed { reason } => self.channel.handle_closed(now, &reason),
        }
    }

    /// Earliest deadline across all stages.
    #[must_use]
    pub fn poll_timeout(&self) -> Option<I> {
        [
            self.recognizer.poll_timeout(),
            self.motion.poll_timeout(),
            self.scroll.poll_timeout(),
            self.channel.poll_timeout(),
        ]
        .into_iter()
        .fold(None, earliest)
    }

    /// Fire every deadline that has been reached.
    ///
    /// Gesture deadlines run first so a tap confirmed now is sent after the
    /// motion that preceded it.
    pub fn handle_timeout(&mut self, now: I) -> Vec<PipelineAction> {
        let mut actions = Vec::new();

        let gestures = self.recognizer.handle_timeout(now);
        self.apply(gestures, now, &mut actions);

        if let Some(action) = self.motion.handle_timeout(now) {
            self.send(action, &mut actions);
        }
        if let Some(action) = self.scroll.handle_timeout(now) {
            self.send(action, &mut actions);
        }

        actions.extend(self.channel.handle_timeout(now).into_iter().map(channel_action));
        actions
    }

    /// Connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.channel.state()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Gesture recognizer.
    #[must_use]
    pub fn recognizer(&self) -> &Recognizer<I> {
        &self.recognizer
    }

    /// Motion aggregator.
    #[must_use]
    pub fn motion(&self) -> &MotionAggregator<I> {
        &self.motion
    }

    /// Scroll debouncer.
    #[must_use]
    pub fn scroll(&self) -> &ScrollDebouncer<I> {
        &self.scroll
    }

    /// Connection channel.
    #[must_use]
    pub fn channel(&self) -> &Channel<I> {
        &self.channel
    }

    fn apply(&mut self, gestures: Vec<GestureAction>, now: I, actions: &mut Vec<PipelineAction>) {
        for gesture in gestures {
            match gesture {
                GestureAction::Move { dx, dy } => self.motion.accumulate(dx, dy, now),
                GestureAction::Scroll { dy } => self.scroll.submit(dy, now),
                GestureAction::Click(button) => {
                    if let Some(pending) = self.motion.flush() {
                        self.send(pending, actions);
                    }
                    self.send(SemanticAction::Click { button }, actions);
                },
                GestureAction::Feedback(feedback) => actions.push(PipelineAction::Feedback(feedback)),
            }
        }
    }

    fn send(&mut self, action: SemanticAction, actions: &mut Vec<PipelineAction>) {
        let message = match self.config.framing.encode(action) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(?action, error = %e, "failed to encode action");
                return;
            },
        };

        tracing::trace!(?action, "sending");
        actions.extend(self.channel.send(message).map(channel_action));
    }
}

fn channel_action(action: ChannelAction) -> PipelineAction {
    match action {
        ChannelAction::Connect => PipelineAction::Connect,
        ChannelAction::Write(message) => PipelineAction::Write(message),
        ChannelAction::Restart => PipelineAction::Restart,
    }
}
