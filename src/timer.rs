use crate::lifecycle::{GameState, GameStateListener};
use std::time::Instant;

/// Stopwatch that runs while a round is being played.
#[derive(Debug)]
pub(crate) struct Timer {
    start: Instant,
    running: bool,
    elapsed: u64,
}

impl Timer {
    pub(crate) fn new() -> Self {
        Self {
            start: Instant::now(),
            running: false,
            elapsed: 0,
        }
    }

    /// Whole seconds elapsed, live while running.
    pub(crate) fn display_value(&self) -> u64 {
        self.display_value_at(Instant::now())
    }

    fn display_value_at(&self, now: Instant) -> u64 {
        if self.running {
            now.saturating_duration_since(self.start).as_secs()
        } else {
            self.elapsed
        }
    }

    fn on_state_change_at(&mut self, state: GameState, now: Instant) {
        match state {
            GameState::Playing => {
                self.running = true;
                self.start = now;
            }
            GameState::Won | GameState::Lost => {
                self.elapsed = self.display_value_at(now);
                self.running = false;
            }
            GameState::Init => {
                self.running = false;
                self.elapsed = 0;
            }
        }
    }
}

impl GameStateListener for Timer {
    fn on_state_change(&mut self, state: GameState) {
        self.on_state_change_at(state, Instant::now());
    }
}
