use crate::{
    config::Difficulty,
    error::Error,
    geometry::{Coordinate, Dimensions},
};
use bit_set::BitSet;
use log::info;
use rand::Rng;

/// Draws `mines` distinct linear indices uniformly from `rows * columns` cells.
///
/// Duplicate draws are rejected and redrawn until the set is full.
pub(crate) fn place_mines<R: Rng + ?Sized>(
    rows: usize,
    columns: usize,
    mines: usize,
    rng: &mut R,
) -> Result<BitSet, Error> {
    let tiles = rows.checked_mul(columns).unwrap_or(0);
    if mines >= tiles {
        return Err(Error::InvalidConfiguration {
            rows,
            columns,
            mines,
        });
    }

    let mut samples = BitSet::with_capacity(tiles);
    while samples.len() < mines {
        samples.insert(rng.gen_range(0..tiles));
    }
    Ok(samples)
}

#[derive(Debug, Clone)]
pub(crate) struct MineField {
    dimensions: Dimensions,
    count: usize,
    mines: BitSet,
}

impl MineField {
    pub(crate) fn random<R: Rng + ?Sized>(
        difficulty: &Difficulty,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let mut field = Self {
            dimensions: difficulty.dimensions(),
            count: difficulty.mines(),
            mines: BitSet::new(),
        };
        field.reset(rng)?;
        Ok(field)
    }

    /// A layout with mines exactly at `coordinates`.
    #[cfg(test)]
    pub(crate) fn from_coordinates(difficulty: &Difficulty, coordinates: &[Coordinate]) -> Self {
        let dimensions = difficulty.dimensions();
        let mines = coordinates
            .iter()
            .map(|&(row, column)| {
                assert!(dimensions.is_valid(row, column), "mine at ({row}, {column}) is off the board");
                dimensions.index((row, column))
            })
            .collect::<BitSet>();
        assert_eq!(mines.len(), difficulty.mines(), "layout must match the mine count");
        Self {
            dimensions,
            count: difficulty.mines(),
            mines,
        }
    }

    /// Replaces the layout with a freshly drawn one of the same size.
    pub(crate) fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), Error> {
        self.mines = place_mines(self.dimensions.rows, self.dimensions.columns, self.count, rng)?;
        info!(
            "placed {} mines on a {}x{} board",
            self.count, self.dimensions.rows, self.dimensions.columns
        );
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.mines.len()
    }

    pub(crate) fn mine_at(&self, coord: Coordinate) -> bool {
        self.mines.contains(self.dimensions.index(coord))
    }

    pub(crate) fn adjacent_mines(&self, coord: Coordinate) -> u8 {
        let adjacent_mines = self
            .dimensions
            .neighbors(coord)
            .fold(0, |total, neighbor| total + u8::from(self.mine_at(neighbor)));
        debug_assert!(adjacent_mines <= 8);
        adjacent_mines
    }
}
