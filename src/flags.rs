use crate::lifecycle::{GameState, GameStateListener};
use log::debug;

pub(crate) trait FlagStateListener {
    fn on_flag_state_change(&mut self, exhausted: bool);
}

/// Tracks how many flags are left to place.
#[derive(Debug)]
pub(crate) struct FlagCounter {
    mines: usize,
    flags: usize,
}

impl FlagCounter {
    pub(crate) fn new(mines: usize) -> Self {
        Self { mines, flags: mines }
    }

    pub(crate) fn display_value(&self) -> usize {
        self.flags
    }

    /// Accounts for a flag being placed or removed.
    ///
    /// Returns `Some(exhausted)` only when the budget crosses the 0/1
    /// boundary.
    pub(crate) fn on_flag(&mut self, flagged: bool) -> Option<bool> {
        if flagged {
            debug_assert!(self.flags > 0, "flag placed with an exhausted budget");
            self.flags = self.flags.saturating_sub(1);
            if self.flags == 0 {
                debug!("flag budget exhausted");
                return Some(true);
            }
        } else {
            debug_assert!(self.flags < self.mines, "more flags removed than placed");
            self.flags = (self.flags + 1).min(self.mines);
            if self.flags == 1 {
                debug!("flag budget available again");
                return Some(false);
            }
        }
        None
    }
}

impl GameStateListener for FlagCounter {
    fn on_state_change(&mut self, state: GameState) {
        if state == GameState::Init {
            self.flags = self.mines;
        }
    }
}
