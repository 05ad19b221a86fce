//! Playback over materialized traces.
//!
//! [`PlaybackController`] is the pure position/play/speed state machine,
//! [`driver`] runs it on a timer, and [`Visualization`] ties one controller to
//! the one trace it was built for.

pub mod controller;
pub mod driver;

use std::time::Duration;

use tokio::sync::mpsc;

pub use controller::PlaybackController;
pub use driver::{PlaybackCommand, PlaybackDriver, PlaybackHandle, PlaybackUpdate};

use crate::trace::{Step, Trace};

/// A trace together with the controller scrubbing through it.
///
/// Loading a new trace discards the old controller and stops any running
/// playback task, so a controller never outlives its trace.
#[derive(Debug)]
pub struct Visualization<S> {
    trace: Trace<S>,
    controller: PlaybackController,
    driver: Option<PlaybackHandle>,
    generation: u64,
}

impl<S: Step> Visualization<S> {
    pub fn new(trace: Trace<S>, speed: Duration) -> Self {
        let controller = PlaybackController::new(trace.len(), speed);
        Self {
            trace,
            controller,
            driver: None,
            generation: 0,
        }
    }

    /// Replace the trace after an input change. Position returns to 0,
    /// paused, at the current speed (including changes reported by the
    /// driver).
    pub fn load(&mut self, trace: Trace<S>) {
        self.stop_driver();
        self.generation += 1;
        self.controller = PlaybackController::new(trace.len(), self.controller.speed());
        self.trace = trace;
        tracing::debug!(
            generation = self.generation,
            steps = self.trace.len(),
            "Loaded new trace"
        );
    }

    pub fn trace(&self) -> &Trace<S> {
        &self.trace
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController {
        &mut self.controller
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn position(&self) -> usize {
        self.controller.position()
    }

    /// Step at the current position.
    pub fn current(&self) -> Option<&S> {
        self.trace.get(self.controller.position())
    }

    /// Hand the current controller state to a timer task. Updates must be fed
    /// back through [`observe`](Self::observe).
    pub fn spawn_driver(&mut self, update_tx: mpsc::UnboundedSender<PlaybackUpdate>) -> PlaybackHandle {
        self.stop_driver();
        let handle = PlaybackDriver::spawn(self.generation, self.controller.clone(), update_tx);
        self.driver = Some(handle.clone());
        handle
    }

    pub fn driver(&self) -> Option<&PlaybackHandle> {
        self.driver.as_ref()
    }

    /// Mirror an update from the playback task. Returns false for updates
    /// that belong to a trace that has since been replaced.
    pub fn observe(&mut self, update: PlaybackUpdate) -> bool {
        if update.generation() != self.generation {
            return false;
        }
        match update {
            PlaybackUpdate::PositionChanged {
                position, playing, ..
            } => {
                self.controller.seek(position);
                if playing {
                    self.controller.play();
                }
            }
            PlaybackUpdate::SpeedChanged { speed, .. } => self.controller.set_speed(speed),
            PlaybackUpdate::Finished { position, .. } => self.controller.seek(position),
        }
        true
    }

    /// Change the advance delay here and on the running driver, if any.
    /// The speed carries over to traces loaded later.
    pub fn set_speed(&mut self, speed: Duration) {
        self.controller.set_speed(speed);
        if let Some(handle) = &self.driver {
            handle.set_speed(speed);
        }
    }

    fn stop_driver(&mut self) {
        if let Some(handle) = self.driver.take() {
            handle.shutdown();
        }
    }
}

impl<S> Drop for Visualization<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.driver.take() {
            handle.shutdown();
        }
    }
}
