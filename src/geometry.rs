use bit_set::BitSet;

pub(crate) type Coordinate = (usize, usize);

#[derive(Debug, Copy, Clone, PartialEq)]
enum Increment {
    NegOne,
    Zero,
    One,
}

impl Increment {
    fn offset(self, value: usize) -> Option<usize> {
        match self {
            Self::NegOne => value.checked_sub(1),
            Self::Zero => Some(value),
            Self::One => value.checked_add(1),
        }
    }
}

/// Row/column extent of a board.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Dimensions {
    pub(crate) rows: usize,
    pub(crate) columns: usize,
}

impl Dimensions {
    pub(crate) const fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Total number of cells.
    pub(crate) const fn len(&self) -> usize {
        self.rows * self.columns
    }

    pub(crate) const fn is_valid(&self, row: usize, column: usize) -> bool {
        row < self.rows && column < self.columns
    }

    pub(crate) const fn index(&self, (row, column): Coordinate) -> usize {
        row * self.columns + column
    }

    pub(crate) const fn coordinate(&self, index: usize) -> Coordinate {
        (index / self.columns, index % self.columns)
    }

    /// The up-to-8 cells around `(row, column)`, clipped to the board.
    ///
    /// Cells are yielded row-major within the surrounding 3x3 block.
    pub(crate) fn neighbors(
        &self,
        (row, column): Coordinate,
    ) -> impl Iterator<Item = Coordinate> {
        const INCREMENTS: [Increment; 3] = [Increment::NegOne, Increment::Zero, Increment::One];

        let dimensions = *self;
        INCREMENTS
            .iter()
            .copied()
            .flat_map(|row_incr| std::iter::repeat(row_incr).zip(INCREMENTS))
            .filter_map(move |(row_incr, column_incr)| match (row_incr, column_incr) {
                (Increment::Zero, Increment::Zero) => None,
                _ => {
                    let row_offset = row_incr.offset(row)?;
                    let column_offset = column_incr.offset(column)?;
                    dimensions
                        .is_valid(row_offset, column_offset)
                        .then_some((row_offset, column_offset))
                }
            })
    }

    /// Linear indices of the neighbors of `coord`.
    pub(crate) fn neighbor_indices(&self, coord: Coordinate) -> BitSet {
        self.neighbors(coord)
            .map(|neighbor| self.index(neighbor))
            .collect()
    }
}
