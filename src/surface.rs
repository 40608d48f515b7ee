//! The seams between the game and whatever draws it and feeds it clicks.

use crate::config::Mode;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub(crate) struct Rect {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

impl Rect {
    pub(crate) const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub(crate) const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum MouseButton {
    Left,
    Right,
}

/// A mouse-button-down event at a point on the surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Click {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) button: MouseButton,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Face {
    Playing,
    Won,
    Lost,
}

/// Symbolic name of something to draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Visual {
    Background(Mode),
    TileHidden,
    TileFlag,
    TileMine,
    /// A revealed safe tile showing its adjacent mine count.
    Tile(u8),
    DigitPanel,
    Digit(u8),
    Face(Face),
}

impl Visual {
    const TILES: [&'static str; 9] = [
        "tile-0", "tile-1", "tile-2", "tile-3", "tile-4", "tile-5", "tile-6", "tile-7", "tile-8",
    ];
    const DIGITS: [&'static str; 10] = [
        "digit-0", "digit-1", "digit-2", "digit-3", "digit-4", "digit-5", "digit-6", "digit-7",
        "digit-8", "digit-9",
    ];

    pub(crate) fn key(self) -> &'static str {
        match self {
            Self::Background(Mode::Beginner) => "bg-beginner",
            Self::Background(Mode::Intermediate) => "bg-intermediate",
            Self::Background(Mode::Expert) => "bg-expert",
            Self::TileHidden => "tile-hidden",
            Self::TileFlag => "tile-flag",
            Self::TileMine => "tile-mine",
            Self::Tile(n) => Self::TILES[usize::from(n.min(8))],
            Self::DigitPanel => "digit-panel",
            Self::Digit(d) => Self::DIGITS[usize::from(d % 10)],
            Self::Face(Face::Playing) => "face-playing",
            Self::Face(Face::Won) => "face-won",
            Self::Face(Face::Lost) => "face-lost",
        }
    }
}

pub(crate) trait Surface {
    fn render(&mut self, visual: Visual, rect: Rect);
}

/// Draws a three digit panel. Values of 1000 and up wrap to their last three
/// digits.
pub(crate) fn render_digits<S: Surface + ?Sized>(
    surface: &mut S,
    panel: Rect,
    digits: [Rect; 3],
    value: u64,
) {
    surface.render(Visual::DigitPanel, panel);

    let hundreds = (value / 100) % 10;
    let tens = (value / 10) % 10;
    let ones = value % 10;
    for (digit, rect) in [hundreds, tens, ones].into_iter().zip(digits) {
        // each digit is < 10 so the cast never truncates
        surface.render(Visual::Digit(digit as u8), rect);
    }
}
