use std::time::Duration;

/// Position/play/speed state machine over a trace of known length.
///
/// The controller never looks at steps; it only moves a pointer in
/// `[0, len - 1]`. Scheduling the delayed advance is the caller's job (see
/// [`super::driver`]): while [`next_delay`](Self::next_delay) returns a
/// duration, wait that long and call [`tick`](Self::tick).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackController {
    len: usize,
    position: usize,
    playing: bool,
    speed: Duration,
}

impl PlaybackController {
    pub fn new(len: usize, speed: Duration) -> Self {
        Self {
            len,
            position: 0,
            playing: false,
            speed,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> Duration {
        self.speed
    }

    pub fn last_index(&self) -> usize {
        self.len.saturating_sub(1)
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.last_index()
    }

    /// Start playing. From the last step, playback restarts at 0.
    pub fn play(&mut self) {
        if self.len <= 1 {
            return;
        }
        if self.is_at_end() {
            self.position = 0;
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Delay before the next scheduled advance, if one is due.
    pub fn next_delay(&self) -> Option<Duration> {
        (self.playing && !self.is_at_end()).then_some(self.speed)
    }

    /// Scheduled advance. Reaching the last step stops playback.
    /// Returns true when the position moved.
    pub fn tick(&mut self) -> bool {
        if !self.playing {
            return false;
        }
        let moved = if self.is_at_end() {
            false
        } else {
            self.position += 1;
            true
        };
        if self.is_at_end() {
            self.playing = false;
        }
        moved
    }

    /// Manual step, only while paused.
    pub fn step_forward(&mut self) -> bool {
        if self.playing || self.is_at_end() {
            return false;
        }
        self.position += 1;
        true
    }

    /// Manual step, only while paused.
    pub fn step_backward(&mut self) -> bool {
        if self.playing || self.position == 0 {
            return false;
        }
        self.position -= 1;
        true
    }

    /// Jump to `index` (clamped) and pause.
    pub fn seek(&mut self, index: usize) {
        self.playing = false;
        self.position = index.min(self.last_index());
    }

    pub fn reset(&mut self) {
        self.position = 0;
        self.playing = false;
    }

    pub fn set_speed(&mut self, speed: Duration) {
        self.speed = speed;
    }
}
