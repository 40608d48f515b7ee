use crate::surface::Face;
use log::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum GameState {
    Init,
    Playing,
    Won,
    Lost,
}

impl GameState {
    pub(crate) const fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

pub(crate) trait GameStateListener {
    fn on_state_change(&mut self, state: GameState);
}

/// The face button. Counts safe reveals and decides when a round starts,
/// is won or is lost.
#[derive(Debug)]
pub(crate) struct Button {
    state: GameState,
    revealed: usize,
    blanks: usize,
}

impl Button {
    pub(crate) fn new(blanks: usize) -> Self {
        Self {
            state: GameState::Init,
            revealed: 0,
            blanks,
        }
    }

    pub(crate) fn state(&self) -> GameState {
        self.state
    }

    /// Number of safe tiles revealed this round.
    #[cfg(test)]
    pub(crate) fn revealed(&self) -> usize {
        self.revealed
    }

    /// Manual reset, allowed from any state.
    pub(crate) fn handle_click(&mut self) -> GameState {
        self.state = GameState::Init;
        self.revealed = 0;
        debug!("game reset");
        self.state
    }

    /// Accounts for a tile reveal, returning the transitions to broadcast in
    /// order.
    pub(crate) fn on_reveal(&mut self, mine: bool) -> impl Iterator<Item = GameState> {
        let mut started = None;
        let mut finished = None;

        if !self.state.is_over() {
            if mine {
                self.state = GameState::Lost;
                finished = Some(self.state);
            } else {
                if self.state == GameState::Init {
                    self.state = GameState::Playing;
                    started = Some(self.state);
                }
                self.revealed += 1;
                debug_assert!(self.revealed <= self.blanks);
                if self.revealed == self.blanks {
                    self.state = GameState::Won;
                    finished = Some(self.state);
                }
            }
        }

        for state in started.iter().chain(&finished) {
            debug!("game state -> {state:?} ({} of {} revealed)", self.revealed, self.blanks);
        }
        started.into_iter().chain(finished)
    }

    pub(crate) fn face(&self) -> Face {
        match self.state {
            GameState::Init | GameState::Playing => Face::Playing,
            GameState::Won => Face::Won,
            GameState::Lost => Face::Lost,
        }
    }
}
