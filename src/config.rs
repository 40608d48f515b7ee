use crate::{error::Error, geometry::Dimensions};

/// Named difficulty presets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum Mode {
    Beginner,
    Intermediate,
    #[default]
    Expert,
}

impl Mode {
    /// Parses a mode flag by its first character: `b` for beginner, `i` for
    /// intermediate, anything else is expert.
    pub(crate) fn parse(src: &str) -> Self {
        match src.chars().next() {
            Some('b') => Self::Beginner,
            Some('i') => Self::Intermediate,
            _ => Self::Expert,
        }
    }

    pub(crate) const fn difficulty(self) -> Difficulty {
        match self {
            Self::Beginner => Difficulty::BEGINNER,
            Self::Intermediate => Difficulty::INTERMEDIATE,
            Self::Expert => Difficulty::EXPERT,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Difficulty {
    rows: usize,
    columns: usize,
    mines: usize,
}

impl Difficulty {
    pub(crate) const BEGINNER: Self = Self {
        rows: 9,
        columns: 9,
        mines: 10,
    };
    pub(crate) const INTERMEDIATE: Self = Self {
        rows: 16,
        columns: 16,
        mines: 40,
    };
    pub(crate) const EXPERT: Self = Self {
        rows: 16,
        columns: 30,
        mines: 99,
    };

    /// Validates a custom board. At least one mine and one safe cell are
    /// required.
    pub(crate) fn new(rows: usize, columns: usize, mines: usize) -> Result<Self, Error> {
        let tiles = rows.checked_mul(columns).unwrap_or(0);
        if tiles == 0 || mines == 0 || mines >= tiles {
            return Err(Error::InvalidConfiguration {
                rows,
                columns,
                mines,
            });
        }
        Ok(Self {
            rows,
            columns,
            mines,
        })
    }

    pub(crate) const fn rows(&self) -> usize {
        self.rows
    }

    pub(crate) const fn columns(&self) -> usize {
        self.columns
    }

    pub(crate) const fn mines(&self) -> usize {
        self.mines
    }

    pub(crate) const fn tiles(&self) -> usize {
        self.rows * self.columns
    }

    /// Number of cells without a mine; revealing all of them wins.
    pub(crate) const fn blanks(&self) -> usize {
        self.tiles() - self.mines
    }

    pub(crate) const fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.rows, self.columns)
    }
}

impl From<Mode> for Difficulty {
    fn from(mode: Mode) -> Self {
        mode.difficulty()
    }
}
