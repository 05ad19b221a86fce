//! Timer-driven playback task
//!
//! Owns a [`PlaybackController`] on a tokio task, sleeps `speed` between
//! advances while playing, and reports every position, play-state and speed
//! change back to the caller. The pending advance keeps its deadline unless a
//! command actually changes one of those; no-op commands never delay it.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use super::controller::PlaybackController;

/// Commands to the playback task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Play,
    Pause,
    Toggle,
    StepForward,
    StepBackward,
    Reset,
    /// Jump to a step index (clamped) and pause
    Seek(usize),
    SetSpeed(Duration),
    /// Stop the task; any pending advance is dropped
    Shutdown,
}

/// Updates sent from the playback task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackUpdate {
    /// Position or play flag changed.
    ///
    /// `generation` identifies the trace the task was started for, so a
    /// consumer can drop late updates after it has loaded a new trace.
    PositionChanged {
        generation: u64,
        position: usize,
        playing: bool,
    },
    /// Delay between advances changed
    SpeedChanged { generation: u64, speed: Duration },
    /// Playback reached the last step and stopped on its own
    Finished { generation: u64, position: usize },
}

impl PlaybackUpdate {
    pub fn generation(&self) -> u64 {
        match self {
            PlaybackUpdate::PositionChanged { generation, .. }
            | PlaybackUpdate::SpeedChanged { generation, .. }
            | PlaybackUpdate::Finished { generation, .. } => *generation,
        }
    }
}

/// Handle to control a running playback task
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    generation: u64,
    cmd_tx: mpsc::UnboundedSender<PlaybackCommand>,
}

impl PlaybackHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Send a command; returns false once the task has stopped
    pub fn send(&self, cmd: PlaybackCommand) -> bool {
        self.cmd_tx.send(cmd).is_ok()
    }

    pub fn play(&self) {
        let _ = self.cmd_tx.send(PlaybackCommand::Play);
    }

    pub fn pause(&self) {
        let _ = self.cmd_tx.send(PlaybackCommand::Pause);
    }

    pub fn toggle(&self) {
        let _ = self.cmd_tx.send(PlaybackCommand::Toggle);
    }

    pub fn step_forward(&self) {
        let _ = self.cmd_tx.send(PlaybackCommand::StepForward);
    }

    pub fn step_backward(&self) {
        let _ = self.cmd_tx.send(PlaybackCommand::StepBackward);
    }

    pub fn reset(&self) {
        let _ = self.cmd_tx.send(PlaybackCommand::Reset);
    }

    pub fn seek(&self, index: usize) {
        let _ = self.cmd_tx.send(PlaybackCommand::Seek(index));
    }

    pub fn set_speed(&self, speed: Duration) {
        let _ = self.cmd_tx.send(PlaybackCommand::SetSpeed(speed));
    }

    /// Shutdown the task
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(PlaybackCommand::Shutdown);
    }

    pub fn is_closed(&self) -> bool {
        self.cmd_tx.is_closed()
    }
}

/// Background playback task
pub struct PlaybackDriver {
    generation: u64,
    controller: PlaybackController,
    /// Receive commands from the owner
    cmd_rx: mpsc::UnboundedReceiver<PlaybackCommand>,
    /// Send updates to the owner
    update_tx: mpsc::UnboundedSender<PlaybackUpdate>,
}

impl PlaybackDriver {
    /// Spawn the playback task and return a handle to control it
    pub fn spawn(
        generation: u64,
        controller: PlaybackController,
        update_tx: mpsc::UnboundedSender<PlaybackUpdate>,
    ) -> PlaybackHandle {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let driver = Self {
            generation,
            controller,
            cmd_rx,
            update_tx,
        };

        tokio::spawn(driver.run());

        PlaybackHandle { generation, cmd_tx }
    }

    /// Main loop for the playback task
    async fn run(mut self) {
        tracing::debug!(
            generation = self.generation,
            steps = self.controller.len(),
            "Playback task started"
        );

        let timer = sleep_until(Instant::now());
        tokio::pin!(timer);
        // Deadline of the pending advance, if one is scheduled.
        let mut due: Option<Instant> = None;

        loop {
            match (self.controller.next_delay(), due) {
                (Some(delay), None) => {
                    let at = Instant::now() + delay;
                    timer.as_mut().reset(at);
                    due = Some(at);
                }
                (None, Some(_)) => due = None,
                _ => {}
            }

            tokio::select! {
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        None | Some(PlaybackCommand::Shutdown) => break,
                        Some(cmd) => {
                            if self.apply(cmd) {
                                due = None;
                            }
                        }
                    }
                }
                _ = &mut timer, if due.is_some() => {
                    due = None;
                    if self.controller.tick() {
                        self.report();
                    }
                    if !self.controller.is_playing() {
                        let _ = self.update_tx.send(PlaybackUpdate::Finished {
                            generation: self.generation,
                            position: self.controller.position(),
                        });
                    }
                }
            }
        }

        tracing::debug!(generation = self.generation, "Playback task stopped");
    }

    /// Apply a command. Returns true when position, play state or speed
    /// changed, which reschedules the pending advance.
    fn apply(&mut self, cmd: PlaybackCommand) -> bool {
        let before = (self.controller.position(), self.controller.is_playing());
        let speed_before = self.controller.speed();
        match cmd {
            PlaybackCommand::Play => self.controller.play(),
            PlaybackCommand::Pause => self.controller.pause(),
            PlaybackCommand::Toggle => self.controller.toggle(),
            PlaybackCommand::StepForward => {
                self.controller.step_forward();
            }
            PlaybackCommand::StepBackward => {
                self.controller.step_backward();
            }
            PlaybackCommand::Reset => self.controller.reset(),
            PlaybackCommand::Seek(index) => self.controller.seek(index),
            PlaybackCommand::SetSpeed(speed) => self.controller.set_speed(speed),
            PlaybackCommand::Shutdown => {}
        }

        let moved = (self.controller.position(), self.controller.is_playing()) != before;
        if moved {
            self.report();
        }
        let retimed = self.controller.speed() != speed_before;
        if retimed {
            let _ = self.update_tx.send(PlaybackUpdate::SpeedChanged {
                generation: self.generation,
                speed: self.controller.speed(),
            });
        }
        moved || retimed
    }

    fn report(&self) {
        let _ = self.update_tx.send(PlaybackUpdate::PositionChanged {
            generation: self.generation,
            position: self.controller.position(),
            playing: self.controller.is_playing(),
        });
    }
}
