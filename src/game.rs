use crate::{
    board::Board,
    config::{Difficulty, Mode},
    error::Error,
    flags::{FlagCounter, FlagStateListener},
    geometry::Coordinate,
    layout::{Layout, Metrics},
    lifecycle::{Button, GameState, GameStateListener},
    surface::{render_digits, Click, MouseButton, Surface, Visual},
    tile::Signal,
    timer::Timer,
};
use bit_set::BitSet;
use log::{info, trace};
use rand::{rngs::StdRng, SeedableRng};

/// A signal and the subscribers of its emitter that have yet to hear it.
struct Fanout {
    signal: Signal,
    subscribers: [usize; 8],
    len: usize,
    cursor: usize,
}

impl Fanout {
    fn new(signal: Signal, subscribers: &BitSet) -> Self {
        let mut fanout = Self {
            signal,
            subscribers: [0; 8],
            len: 0,
            cursor: 0,
        };
        debug_assert!(subscribers.len() <= fanout.subscribers.len());
        for (slot, index) in fanout.subscribers.iter_mut().zip(subscribers) {
            *slot = index;
            fanout.len += 1;
        }
        fanout
    }
}

impl Iterator for Fanout {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.cursor == self.len {
            return None;
        }
        self.cursor += 1;
        Some(self.subscribers[self.cursor - 1])
    }
}

/// One play session: a board plus the face button, flag counter and timer
/// that listen to it.
pub(crate) struct Game {
    mode: Mode,
    layout: Layout,
    board: Board,
    button: Button,
    flag_counter: FlagCounter,
    timer: Timer,
}

impl Game {
    pub(crate) fn new(mode: Mode, difficulty: Difficulty, metrics: Metrics) -> Result<Self, Error> {
        Self::with_rng(mode, difficulty, metrics, StdRng::from_entropy())
    }

    /// A session whose sequence of mine layouts is fixed by `seed`.
    pub(crate) fn seeded(
        mode: Mode,
        difficulty: Difficulty,
        metrics: Metrics,
        seed: u64,
    ) -> Result<Self, Error> {
        Self::with_rng(mode, difficulty, metrics, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        mode: Mode,
        difficulty: Difficulty,
        metrics: Metrics,
        rng: StdRng,
    ) -> Result<Self, Error> {
        let board = Board::new(&difficulty, rng)?;
        Ok(Self::with_board(mode, difficulty, metrics, board))
    }

    fn with_board(mode: Mode, difficulty: Difficulty, metrics: Metrics, board: Board) -> Self {
        info!(
            "new {}x{} game with {} mines",
            difficulty.rows(),
            difficulty.columns(),
            difficulty.mines()
        );
        Self {
            mode,
            layout: Layout::new(&difficulty, metrics),
            board,
            button: Button::new(difficulty.blanks()),
            flag_counter: FlagCounter::new(difficulty.mines()),
            timer: Timer::new(),
        }
    }

    pub(crate) fn layout(&self) -> &Layout {
        &self.layout
    }

    pub(crate) fn state(&self) -> GameState {
        self.button.state()
    }

    /// Offers a click to everything drawn under it.
    pub(crate) fn on_click(&mut self, click: Click) {
        if self.layout.face().contains(click.x, click.y) {
            self.reset();
        }
        if let Some(coord) = self.layout.tile_at(click.x, click.y) {
            self.click_tile(coord, click.button);
        }
    }

    /// Routes a click straight to the tile at `coord`.
    pub(crate) fn click_tile(&mut self, coord: Coordinate, button: MouseButton) {
        if let Some((origin, signal)) = self.board.handle_click(coord, button) {
            self.propagate(origin, signal);
        }
    }

    /// Starts a new round with a fresh layout.
    pub(crate) fn reset(&mut self) {
        let state = self.button.handle_click();
        self.broadcast_state(state);
    }

    pub(crate) fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.render(Visual::Background(self.mode), self.layout.background());
        render_digits(
            surface,
            self.layout.timer_panel(),
            self.layout.timer_digits(),
            self.timer.display_value(),
        );
        render_digits(
            surface,
            self.layout.flags_panel(),
            self.layout.flags_digits(),
            self.flag_counter.display_value() as u64,
        );
        surface.render(Visual::Face(self.button.face()), self.layout.face());
        for (coord, tile) in self.board.tiles() {
            surface.render(tile.visual(), self.layout.tile(coord));
        }
    }

    /// Delivers `signal` from the tile at `origin` and everything it sets
    /// off. Global listeners hear a signal as soon as it is emitted so that
    /// lifecycle changes land before the next tile acts. Neighbors are
    /// visited depth-first: a signal a neighbor emits reaches all of its own
    /// subscribers before the next sibling hears the signal that caused it.
    fn propagate(&mut self, origin: usize, signal: Signal) {
        let mut pending = Vec::new();
        self.emit(origin, signal, &mut pending);

        let mut delivered = 0usize;
        while let Some(fanout) = pending.last_mut() {
            let Some(neighbor) = fanout.next() else {
                pending.pop();
                continue;
            };
            let signal = fanout.signal;
            delivered += 1;
            if let Some(emitted) = self.board.deliver(neighbor, signal) {
                self.emit(neighbor, emitted, &mut pending);
            }
        }
        trace!("{signal:?} from tile {origin} reached {delivered} subscribers");
    }

    fn emit(&mut self, source: usize, signal: Signal, pending: &mut Vec<Fanout>) {
        match signal {
            Signal::Reveal { mine, .. } => {
                for state in self.button.on_reveal(mine) {
                    self.broadcast_state(state);
                }
            }
            Signal::Flag(flagged) => {
                if let Some(exhausted) = self.flag_counter.on_flag(flagged) {
                    self.board.on_flag_state_change(exhausted);
                }
            }
            Signal::Clear => {}
        }
        pending.push(Fanout::new(signal, self.board.subscribers(source)));
    }

    fn broadcast_state(&mut self, state: GameState) {
        self.board.on_state_change(state);
        self.timer.on_state_change(state);
        self.flag_counter.on_state_change(state);
    }

    #[cfg(test)]
    fn tile(&self, coord: Coordinate) -> &crate::tile::Tile {
        self.board.tile(coord).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{minefield::MineField, surface::tests::Recorder, surface::Face};

    fn metrics() -> Metrics {
        Metrics::terminal(5, 3)
    }

    fn with_mines(difficulty: Difficulty, mines: &[Coordinate]) -> Game {
        let board = Board::with_field(
            difficulty.dimensions(),
            MineField::from_coordinates(&difficulty, mines),
            StdRng::seed_from_u64(99),
        );
        Game::with_board(Mode::Beginner, difficulty, metrics(), board)
    }

    fn revealed(game: &Game) -> usize {
        game.board.tiles().filter(|(_, tile)| tile.is_revealed()).count()
    }

    fn hidden_and_clear(game: &Game) -> bool {
        game.board
            .tiles()
            .all(|(_, tile)| !tile.is_revealed() && !tile.is_flagged())
    }

    #[test]
    fn one_click_can_win_the_whole_board() {
        let mut game = with_mines(Difficulty::new(9, 9, 1).unwrap(), &[(8, 8)]);

        game.click_tile((0, 0), MouseButton::Left);

        assert_eq!(game.state(), GameState::Won);
        assert_eq!(game.button.revealed(), 80);
        assert_eq!(revealed(&game), 80);
        assert!(!game.tile((8, 8)).is_revealed());
        assert_eq!(game.button.face(), Face::Won);
    }

    #[test]
    fn revealing_a_mine_loses_and_freezes_the_board() {
        let mut game = with_mines(Difficulty::new(9, 9, 1).unwrap(), &[(8, 8)]);

        game.click_tile((8, 8), MouseButton::Left);

        assert_eq!(game.state(), GameState::Lost);
        assert_eq!(game.button.revealed(), 0);

        game.click_tile((0, 0), MouseButton::Left);
        game.click_tile((0, 1), MouseButton::Right);
        assert_eq!(game.state(), GameState::Lost);
        assert_eq!(revealed(&game), 1);
        assert!(!game.tile((0, 1)).is_flagged());
        assert_eq!(game.flag_counter.display_value(), 1);
    }

    #[test]
    fn flood_fill_stops_at_the_numbered_ring() {
        let difficulty = Difficulty::new(5, 5, 5).unwrap();
        let wall = [(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)];
        let mut game = with_mines(difficulty, &wall);

        game.click_tile((0, 0), MouseButton::Left);

        assert_eq!(game.state(), GameState::Playing);
        for row in 0..5 {
            assert!(game.tile((row, 0)).is_revealed());
            assert!(game.tile((row, 1)).is_revealed());
            for column in 2..5 {
                assert!(!game.tile((row, column)).is_revealed(), "({row}, {column})");
            }
        }
        assert_eq!(game.button.revealed(), 10);
    }

    #[test]
    fn numbered_tile_reveals_only_itself() {
        let mut game = with_mines(Difficulty::new(9, 9, 1).unwrap(), &[(8, 8)]);

        game.click_tile((7, 7), MouseButton::Left);

        assert_eq!(revealed(&game), 1);
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn flagged_tiles_block_the_flood() {
        let mut game = with_mines(Difficulty::new(3, 3, 1).unwrap(), &[(2, 2)]);

        game.click_tile((0, 2), MouseButton::Right);
        game.click_tile((0, 0), MouseButton::Left);

        assert!(!game.tile((0, 2)).is_revealed());
        assert!(game.tile((0, 2)).is_flagged());
        assert_eq!(revealed(&game), 7);
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn flag_budget_runs_out_and_comes_back() {
        let difficulty = Difficulty::new(9, 9, 10).unwrap();
        let mines = (0..9).map(|column| (8, column)).chain([(7, 0)]).collect::<Vec<_>>();
        let mut game = with_mines(difficulty, &mines);

        for column in 0..9 {
            game.click_tile((0, column), MouseButton::Right);
        }
        game.click_tile((1, 0), MouseButton::Right);
        assert_eq!(game.flag_counter.display_value(), 0);

        game.click_tile((2, 0), MouseButton::Right);
        assert!(!game.tile((2, 0)).is_flagged());
        assert_eq!(game.flag_counter.display_value(), 0);

        game.click_tile((0, 4), MouseButton::Right);
        assert!(!game.tile((0, 4)).is_flagged());
        assert_eq!(game.flag_counter.display_value(), 1);

        game.click_tile((2, 0), MouseButton::Right);
        assert!(game.tile((2, 0)).is_flagged());
        assert_eq!(game.flag_counter.display_value(), 0);
    }

    #[test]
    fn neighbors_track_flag_counts() {
        let mut game = with_mines(Difficulty::new(3, 3, 2).unwrap(), &[(0, 0), (2, 2)]);

        game.click_tile((0, 1), MouseButton::Right);
        game.click_tile((2, 2), MouseButton::Right);

        assert_eq!(game.tile((1, 1)).adjacent_flags(), 2);
        assert_eq!(game.tile((0, 0)).adjacent_flags(), 1);
        assert_eq!(game.tile((2, 0)).adjacent_flags(), 0);

        game.click_tile((0, 1), MouseButton::Right);
        assert_eq!(game.tile((1, 1)).adjacent_flags(), 1);
    }

    #[test]
    fn chord_reveals_unflagged_neighbors() {
        let difficulty = Difficulty::new(9, 9, 3).unwrap();
        let mut game = with_mines(difficulty, &[(0, 0), (0, 2), (8, 8)]);

        game.click_tile((1, 1), MouseButton::Left);
        assert_eq!(game.tile((1, 1)).adjacent_mines(), 2);
        game.click_tile((0, 0), MouseButton::Right);
        game.click_tile((0, 2), MouseButton::Right);

        game.click_tile((1, 1), MouseButton::Left);

        for coord in [(0, 1), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)] {
            assert!(game.tile(coord).is_revealed(), "{coord:?}");
        }
        for coord in [(0, 0), (0, 2)] {
            assert!(!game.tile(coord).is_revealed());
            assert!(game.tile(coord).is_flagged());
        }
        // the empty (2, 0) corner floods the rest of the board
        assert_eq!(game.state(), GameState::Won);
    }

    #[test]
    fn chord_with_too_few_flags_does_nothing() {
        let difficulty = Difficulty::new(9, 9, 2).unwrap();
        let mut game = with_mines(difficulty, &[(0, 0), (0, 2)]);

        game.click_tile((1, 1), MouseButton::Left);
        game.click_tile((0, 0), MouseButton::Right);
        game.click_tile((1, 1), MouseButton::Left);

        assert_eq!(revealed(&game), 1);
    }

    #[test]
    fn chord_onto_a_mine_stops_the_remaining_reveals() {
        let difficulty = Difficulty::new(9, 9, 2).unwrap();
        let mut game = with_mines(difficulty, &[(0, 0), (0, 2)]);

        game.click_tile((1, 1), MouseButton::Left);
        game.click_tile((0, 1), MouseButton::Right);
        game.click_tile((1, 0), MouseButton::Right);
        game.click_tile((1, 1), MouseButton::Left);

        assert_eq!(game.state(), GameState::Lost);
        assert!(game.tile((0, 0)).is_revealed());
        assert!(!game.tile((0, 2)).is_revealed());
        assert!(!game.tile((2, 2)).is_revealed());
        assert_eq!(game.button.revealed(), 1);
    }

    #[test]
    fn chord_floods_an_empty_neighbor_before_reaching_a_later_mine() {
        let difficulty = Difficulty::new(9, 9, 2).unwrap();
        let mut game = with_mines(difficulty, &[(4, 6), (6, 6)]);

        game.click_tile((5, 5), MouseButton::Left);
        game.click_tile((4, 6), MouseButton::Right);
        // wrong flag, so the chord uncovers the mine at (6, 6)
        game.click_tile((6, 4), MouseButton::Right);
        game.click_tile((5, 5), MouseButton::Left);

        assert_eq!(game.state(), GameState::Lost);
        assert!(game.tile((6, 6)).is_revealed());
        // (4, 4) comes first and its flood finishes before (6, 6) is tried
        for coord in [(4, 4), (0, 0), (0, 8), (8, 0), (3, 7)] {
            assert!(game.tile(coord).is_revealed(), "{coord:?}");
        }
        assert!(!game.tile((6, 4)).is_revealed());
        assert!(!game.tile((4, 6)).is_revealed());
    }

    #[test]
    fn fanout_yields_each_subscriber_once() {
        let subscribers = [1, 4, 5].into_iter().collect::<BitSet>();
        let fanout = Fanout::new(Signal::Clear, &subscribers);

        assert_eq!(fanout.collect::<Vec<_>>(), [1, 4, 5]);
    }

    #[test]
    fn reset_from_every_state() {
        let difficulty = Difficulty::new(9, 9, 1).unwrap();

        let mut fresh = with_mines(difficulty, &[(8, 8)]);
        let mut won = with_mines(difficulty, &[(8, 8)]);
        won.click_tile((0, 0), MouseButton::Left);
        let mut lost = with_mines(difficulty, &[(8, 8)]);
        lost.click_tile((4, 4), MouseButton::Right);
        lost.click_tile((8, 8), MouseButton::Left);
        let mut playing = with_mines(difficulty, &[(8, 8)]);
        playing.click_tile((7, 7), MouseButton::Left);
        playing.click_tile((7, 8), MouseButton::Right);

        for game in [&mut fresh, &mut won, &mut lost, &mut playing] {
            game.reset();

            assert_eq!(game.state(), GameState::Init);
            assert_eq!(game.timer.display_value(), 0);
            assert_eq!(game.flag_counter.display_value(), 1);
            assert_eq!(game.button.revealed(), 0);
            assert!(hidden_and_clear(game));
            assert_eq!(game.board.mine_count(), 1);
            assert_eq!(
                game.board.tiles().filter(|(_, tile)| tile.is_mine()).count(),
                1
            );
            assert!(game
                .board
                .tiles()
                .all(|(_, tile)| tile.adjacent_flags() == 0));
        }
    }

    #[test]
    fn reset_reenables_flagging_after_exhaustion() {
        let mut game = with_mines(Difficulty::new(3, 3, 1).unwrap(), &[(0, 0)]);
        game.click_tile((2, 2), MouseButton::Right);
        assert_eq!(game.flag_counter.display_value(), 0);

        game.reset();
        let target = game
            .board
            .tiles()
            .map(|(coord, _)| coord)
            .next()
            .unwrap();
        game.click_tile(target, MouseButton::Right);

        assert!(game.tile(target).is_flagged());
        assert_eq!(game.flag_counter.display_value(), 0);
    }

    #[test]
    fn seeded_games_play_after_reset() {
        let mut game = Game::seeded(Mode::Expert, Difficulty::EXPERT, metrics(), 17).unwrap();
        assert_eq!(game.board.mine_count(), 99);

        for round in 0..5 {
            game.reset();
            let safe = game
                .board
                .tiles()
                .find(|(_, tile)| !tile.is_mine())
                .map(|(coord, _)| coord)
                .unwrap();
            game.click_tile(safe, MouseButton::Left);
            assert!(
                matches!(game.state(), GameState::Playing | GameState::Won),
                "round {round}"
            );
            assert_eq!(game.button.revealed(), revealed(&game));
        }
    }

    #[test]
    fn clicks_are_routed_by_position() {
        let mut game = with_mines(Difficulty::new(9, 9, 1).unwrap(), &[(8, 8)]);
        let tile = game.layout().tile((7, 7));

        game.on_click(Click {
            x: tile.x + 1,
            y: tile.y + 1,
            button: MouseButton::Left,
        });
        assert!(game.tile((7, 7)).is_revealed());
        assert_eq!(game.state(), GameState::Playing);

        let panel = game.layout().flags_panel();
        game.on_click(Click {
            x: panel.x,
            y: panel.y,
            button: MouseButton::Left,
        });
        assert_eq!(game.state(), GameState::Playing);

        let face = game.layout().face();
        game.on_click(Click {
            x: face.x,
            y: face.y,
            button: MouseButton::Right,
        });
        assert_eq!(game.state(), GameState::Init);
        assert!(hidden_and_clear(&game));

        let window = game.layout().window();
        game.on_click(Click {
            x: window.width + 10,
            y: -3,
            button: MouseButton::Left,
        });
        assert!(hidden_and_clear(&game));
    }

    #[test]
    fn frame_draws_background_panels_face_and_tiles() {
        let mut game = with_mines(Difficulty::new(9, 9, 1).unwrap(), &[(8, 8)]);
        game.click_tile((0, 0), MouseButton::Right);
        game.click_tile((8, 8), MouseButton::Left);

        let mut recorder = Recorder::default();
        game.render(&mut recorder);
        let keys = recorder.keys();

        assert_eq!(keys.len(), 1 + 4 + 4 + 1 + 81);
        assert_eq!(keys[0], "bg-beginner");
        assert_eq!(&keys[1..5], ["digit-panel", "digit-0", "digit-0", "digit-0"]);
        assert_eq!(&keys[5..9], ["digit-panel", "digit-0", "digit-0", "digit-0"]);
        assert_eq!(keys[9], "face-lost");
        assert_eq!(keys[10], "tile-flag");
        assert_eq!(keys[90], "tile-mine");
        assert_eq!(keys[11], "tile-hidden");
        assert_eq!(recorder.calls[90].1, game.layout().tile((8, 8)));
    }
}
