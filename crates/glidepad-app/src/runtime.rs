//! Generic runtime for pipeline orchestration.
//!
//! The Runtime drives the event loop, coordinating between:
//! - [`Pipeline`]: gesture-to-wire state machines
//! - [`Driver`]: platform-specific I/O
//!
//! Connection state changes are published on a `tokio::sync::watch` channel.

use glidepad_core::ConnectionState;
use tokio::sync::watch;

use crate::{Driver, DriverEvent, Pipeline, PipelineAction, PipelineConfig, TransportEvent};

/// Generic runtime that orchestrates Pipeline and Driver.
pub struct Runtime<D>
where
    D: Driver,
{
    driver: D,
    pipeline: Pipeline<D::Instant>,
    state_tx: watch::Sender<ConnectionState>,
}

impl<D> Runtime<D>
where
    D: Driver,
{
    /// Create a new runtime with the given driver and configuration.
    pub fn new(driver: D, config: PipelineConfig) -> Self {
        let pipeline = Pipeline::new(config);
        let (state_tx, _) = watch::channel(pipeline.state());
        Self { driver, pipeline, state_tx }
    }

    /// Subscribe to connection state changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Run until the driver reports shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver's input source fails. Transport
    /// failures never end the loop.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.start().await;

        while self.step().await? {}

        self.driver.stop();
        Ok(())
    }

    /// Issue the initial connect.
    pub async fn start(&mut self) {
        let actions = self.pipeline.start();
        self.execute(actions).await;
        self.publish_state();
    }

    /// Process one cycle of the event loop.
    ///
    /// Deadlines that have already passed fire before the new event is
    /// handled. Returns `false` once the driver reports shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver's input source fails.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        let deadline = self.pipeline.poll_timeout();
        let event = self.driver.next_event(deadline).await?;
        let now = self.driver.now();

        let mut actions = Vec::new();
        if deadline.is_some_and(|at| at <= now) {
            actions.extend(self.pipeline.handle_timeout(now));
        }

        match event {
            DriverEvent::Input(input) => actions.extend(self.pipeline.handle_input(input, now)),
            DriverEvent::Transport(event) => self.pipeline.handle_transport(event, now),
            DriverEvent::Timeout => {},
            DriverEvent::Shutdown => {
                tracing::info!("shutting down");
                self.execute(actions).await;
                self.publish_state();
                return Ok(false);
            },
        }

        self.execute(actions).await;
        self.publish_state();
        Ok(true)
    }

    /// Get a reference to the Pipeline
    pub fn pipeline(&self) -> &Pipeline<D::Instant> {
        &self.pipeline
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the Driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Execute pipeline actions, including those they cause in turn.
    async fn execute(&mut self, initial_actions: Vec<PipelineAction>) {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    PipelineAction::Connect => {
                        if let Err(e) = self.driver.connect().await {
                            tracing::warn!(error = %e, "connect failed");
                            self.transport_failed(e.to_string());
                        }
                    },
                    PipelineAction::Write(message) => {
                        if let Err(e) = self.driver.write(message).await {
                            tracing::warn!(error = %e, "write failed");
                            self.transport_failed(e.to_string());
                        }
                    },
                    PipelineAction::Feedback(feedback) => self.driver.feedback(feedback),
                    PipelineAction::Restart => {
                        self.driver.stop();
                        pending_actions.extend(self.pipeline.restart());
                    },
                }
            }
        }
    }

    fn transport_failed(&mut self, reason: String) {
        let now = self.driver.now();
        self.pipeline.handle_transport(TransportEvent::Closed { reason }, now);
    }

    fn publish_state(&self) {
        let state = self.pipeline.state();
        self.state_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                tracing::debug!(from = ?*current, to = ?state, "connection state changed");
                *current = state;
                true
            }
        });
    }
}
