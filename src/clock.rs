//! Elapsed play time.
//!
//! The clock starts at the first committed action of a game and stops when
//! the game is won. Undo rewinds it to the value captured in the snapshot.

use std::time::{Duration, Instant};

#[derive(Clone, Debug, Default)]
pub struct GameClock {
    /// Time banked before `running_since`.
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Start the clock unless it is already running. Returns true if this
    /// call started it.
    pub fn start_if_needed(&mut self) -> bool {
        if self.running_since.is_some() {
            return false;
        }
        self.running_since = Some(Instant::now());
        true
    }

    pub fn stop(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.accumulated + self.running_since.map_or(Duration::ZERO, |s| s.elapsed())
    }

    /// Rewind to `elapsed`. A running clock keeps running from there.
    pub fn restore(&mut self, elapsed: Duration) {
        self.accumulated = elapsed;
        if self.running_since.is_some() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// "mm:ss", minutes not capped at 59.
pub fn format_elapsed(d: Duration) -> String {
    let s = d.as_secs();
    format!("{:02}:{:02}", s / 60, s % 60)
}
