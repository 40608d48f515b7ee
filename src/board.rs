use crate::{
    config::Difficulty,
    error::Error,
    flags::FlagStateListener,
    geometry::{Coordinate, Dimensions},
    lifecycle::{GameState, GameStateListener},
    minefield::MineField,
    surface::MouseButton,
    tile::{Signal, Tile},
};
use bit_set::BitSet;
use log::warn;
use rand::rngs::StdRng;

/// Owns every tile and the mine layout. Tiles are addressed by linear index
/// and each tile's neighbors are fixed for the lifetime of the board.
pub(crate) struct Board {
    dimensions: Dimensions,
    field: MineField,
    tiles: Vec<Tile>,
    subscribers: Vec<BitSet>,
    rng: StdRng,
}

impl Board {
    pub(crate) fn new(difficulty: &Difficulty, mut rng: StdRng) -> Result<Self, Error> {
        let field = MineField::random(difficulty, &mut rng)?;
        Ok(Self::with_field(difficulty.dimensions(), field, rng))
    }

    pub(crate) fn with_field(dimensions: Dimensions, field: MineField, rng: StdRng) -> Self {
        let (tiles, subscribers) = (0..dimensions.len())
            .map(|index| {
                let coord = dimensions.coordinate(index);
                (
                    Tile::new(field.adjacent_mines(coord), field.mine_at(coord)),
                    dimensions.neighbor_indices(coord),
                )
            })
            .unzip();

        Self {
            dimensions,
            field,
            tiles,
            subscribers,
            rng,
        }
    }

    #[cfg(test)]
    pub(crate) fn tile(&self, (row, column): Coordinate) -> Option<&Tile> {
        if !self.dimensions.is_valid(row, column) {
            return None;
        }
        self.tiles.get(self.dimensions.index((row, column)))
    }

    pub(crate) fn tiles(&self) -> impl Iterator<Item = (Coordinate, &Tile)> {
        let dimensions = self.dimensions;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(index, tile)| (dimensions.coordinate(index), tile))
    }

    /// Routes a click to the tile at `coord`, returning the emitting tile's
    /// index and what it emitted. Clicks off the board are ignored.
    pub(crate) fn handle_click(
        &mut self,
        (row, column): Coordinate,
        button: MouseButton,
    ) -> Option<(usize, Signal)> {
        if !self.dimensions.is_valid(row, column) {
            return None;
        }
        let index = self.dimensions.index((row, column));
        let signal = self.tiles[index].handle_click(button)?;
        Some((index, signal))
    }

    /// The tiles that hear whatever the tile at `index` emits.
    pub(crate) fn subscribers(&self, index: usize) -> &BitSet {
        &self.subscribers[index]
    }

    /// Hands a neighbor's signal to the tile at `index`.
    pub(crate) fn deliver(&mut self, index: usize, signal: Signal) -> Option<Signal> {
        let tile = &mut self.tiles[index];
        match signal {
            Signal::Reveal {
                mine,
                has_adjacent_mines,
            } => tile.on_reveal(mine, has_adjacent_mines),
            Signal::Flag(flagged) => {
                tile.on_flag(flagged);
                None
            }
            Signal::Clear => tile.on_clear(),
        }
    }

    #[cfg(test)]
    pub(crate) fn mine_count(&self) -> usize {
        self.field.len()
    }
}

impl GameStateListener for Board {
    fn on_state_change(&mut self, state: GameState) {
        if state == GameState::Init {
            match self.field.reset(&mut self.rng) {
                Ok(()) => {
                    for (index, tile) in self.tiles.iter_mut().enumerate() {
                        let coord = self.dimensions.coordinate(index);
                        tile.reset(self.field.adjacent_mines(coord), self.field.mine_at(coord));
                    }
                }
                Err(err) => warn!("keeping previous mine layout: {err}"),
            }
        }

        for tile in self.tiles.iter_mut() {
            tile.on_state_change(state);
        }
    }
}

impl FlagStateListener for Board {
    fn on_flag_state_change(&mut self, exhausted: bool) {
        for tile in self.tiles.iter_mut() {
            tile.on_flag_state_change(exhausted);
        }
    }
}
