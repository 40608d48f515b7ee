use crate::{
    flags::FlagStateListener,
    lifecycle::{GameState, GameStateListener},
    surface::{MouseButton, Visual},
};

/// What a tile tells its neighbors and the global listeners after it changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Signal {
    Reveal { mine: bool, has_adjacent_mines: bool },
    Flag(bool),
    Clear,
}

#[derive(Debug, Clone)]
pub(crate) struct Tile {
    adjacent_mines: u8,
    // maintained from neighbor flag signals, never rescanned
    adjacent_flags: u8,
    mine: bool,
    flagged: bool,
    revealed: bool,
    game_over: bool,
    flag_remaining: bool,
}

impl Tile {
    pub(crate) fn new(adjacent_mines: u8, mine: bool) -> Self {
        Self {
            adjacent_mines,
            adjacent_flags: 0,
            mine,
            flagged: false,
            revealed: false,
            game_over: false,
            flag_remaining: true,
        }
    }

    /// Replaces the cell content for a new layout.
    pub(crate) fn reset(&mut self, adjacent_mines: u8, mine: bool) {
        self.adjacent_mines = adjacent_mines;
        self.mine = mine;
    }

    pub(crate) fn handle_click(&mut self, button: MouseButton) -> Option<Signal> {
        match button {
            MouseButton::Left if self.revealed => self.try_clear(),
            MouseButton::Left => self.try_reveal(),
            MouseButton::Right => self.try_toggle_flag(),
        }
    }

    /// A neighbor was revealed. Only an empty, mine-free neighbor cascades.
    pub(crate) fn on_reveal(&mut self, mine: bool, has_adjacent_mines: bool) -> Option<Signal> {
        if !mine && !has_adjacent_mines {
            self.try_reveal()
        } else {
            None
        }
    }

    pub(crate) fn on_flag(&mut self, flagged: bool) {
        if flagged {
            debug_assert!(self.adjacent_flags < 8);
            self.adjacent_flags += 1;
        } else {
            debug_assert!(self.adjacent_flags > 0);
            self.adjacent_flags = self.adjacent_flags.saturating_sub(1);
        }
    }

    pub(crate) fn on_clear(&mut self) -> Option<Signal> {
        self.try_reveal()
    }

    pub(crate) fn visual(&self) -> Visual {
        if self.revealed {
            if self.mine {
                Visual::TileMine
            } else {
                Visual::Tile(self.adjacent_mines)
            }
        } else if self.flagged {
            Visual::TileFlag
        } else {
            Visual::TileHidden
        }
    }

    fn try_reveal(&mut self) -> Option<Signal> {
        if self.game_over || self.flagged || self.revealed {
            return None;
        }
        self.revealed = true;
        Some(Signal::Reveal {
            mine: self.mine,
            has_adjacent_mines: self.adjacent_mines > 0,
        })
    }

    fn try_toggle_flag(&mut self) -> Option<Signal> {
        if self.game_over || self.revealed {
            return None;
        }
        if !self.flagged && !self.flag_remaining {
            return None;
        }
        self.flagged = !self.flagged;
        Some(Signal::Flag(self.flagged))
    }

    fn try_clear(&self) -> Option<Signal> {
        (self.adjacent_flags == self.adjacent_mines).then_some(Signal::Clear)
    }
}

#[cfg(test)]
impl Tile {
    pub(crate) fn is_mine(&self) -> bool {
        self.mine
    }

    pub(crate) fn is_flagged(&self) -> bool {
        self.flagged
    }

    pub(crate) fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub(crate) fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub(crate) fn adjacent_flags(&self) -> u8 {
        self.adjacent_flags
    }
}

impl GameStateListener for Tile {
    fn on_state_change(&mut self, state: GameState) {
        match state {
            GameState::Init => {
                self.flagged = false;
                self.revealed = false;
                self.adjacent_flags = 0;
                self.game_over = false;
                self.flag_remaining = true;
            }
            GameState::Won | GameState::Lost => self.game_over = true,
            GameState::Playing => {}
        }
    }
}

impl FlagStateListener for Tile {
    fn on_flag_state_change(&mut self, exhausted: bool) {
        self.flag_remaining = !exhausted;
    }
}
