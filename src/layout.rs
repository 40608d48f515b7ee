use crate::{config::Difficulty, geometry::Coordinate, surface::Rect};

/// Sizes and margins of the on-screen elements, in surface units.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Metrics {
    pub(crate) tile_width: i32,
    pub(crate) tile_height: i32,
    pub(crate) digit_width: i32,
    pub(crate) digit_height: i32,
    pub(crate) panel_width: i32,
    pub(crate) panel_height: i32,
    pub(crate) panel_offset: i32,
    pub(crate) panel_top: i32,
    pub(crate) face_width: i32,
    pub(crate) face_height: i32,
    pub(crate) face_top: i32,
    pub(crate) grid_left: i32,
    pub(crate) grid_top: i32,
}

impl Metrics {
    /// Metrics for a character grid where every tile is `cell_width` by
    /// `cell_height` characters.
    pub(crate) fn terminal(cell_width: u16, cell_height: u16) -> Self {
        Self {
            tile_width: i32::from(cell_width),
            tile_height: i32::from(cell_height),
            digit_width: 1,
            digit_height: 1,
            panel_width: 7,
            panel_height: 3,
            panel_offset: 1,
            panel_top: 1,
            face_width: 6,
            face_height: 3,
            face_top: 1,
            grid_left: 1,
            grid_top: 5,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Layout {
    metrics: Metrics,
    rows: i32,
    columns: i32,
}

impl Layout {
    pub(crate) fn new(difficulty: &Difficulty, metrics: Metrics) -> Self {
        Self {
            metrics,
            rows: i32::try_from(difficulty.rows()).unwrap_or(i32::MAX),
            columns: i32::try_from(difficulty.columns()).unwrap_or(i32::MAX),
        }
    }

    pub(crate) fn window(&self) -> Rect {
        let m = &self.metrics;
        Rect::new(
            0,
            0,
            2 * m.grid_left + self.columns * m.tile_width,
            m.grid_top + self.rows * m.tile_height + m.grid_left,
        )
    }

    pub(crate) fn background(&self) -> Rect {
        self.window()
    }

    pub(crate) fn flags_panel(&self) -> Rect {
        let m = &self.metrics;
        Rect::new(m.panel_offset, m.panel_top, m.panel_width, m.panel_height)
    }

    pub(crate) fn timer_panel(&self) -> Rect {
        let m = &self.metrics;
        Rect::new(
            self.window().width - m.panel_offset - m.panel_width,
            m.panel_top,
            m.panel_width,
            m.panel_height,
        )
    }

    pub(crate) fn flags_digits(&self) -> [Rect; 3] {
        self.digits(self.flags_panel())
    }

    pub(crate) fn timer_digits(&self) -> [Rect; 3] {
        self.digits(self.timer_panel())
    }

    fn digits(&self, panel: Rect) -> [Rect; 3] {
        let m = &self.metrics;
        let horizontal_margin = (m.panel_width - 3 * m.digit_width) / 4;
        let vertical_margin = (m.panel_height - m.digit_height) / 2;
        [0, 1, 2].map(|position| {
            Rect::new(
                panel.x + horizontal_margin * (position + 1) + m.digit_width * position,
                panel.y + vertical_margin,
                m.digit_width,
                m.digit_height,
            )
        })
    }

    pub(crate) fn face(&self) -> Rect {
        let m = &self.metrics;
        Rect::new(
            self.window().width / 2 - m.face_width / 2,
            m.face_top,
            m.face_width,
            m.face_height,
        )
    }

    pub(crate) fn grid(&self) -> Rect {
        let m = &self.metrics;
        Rect::new(
            m.grid_left,
            m.grid_top,
            self.columns * m.tile_width,
            self.rows * m.tile_height,
        )
    }

    pub(crate) fn tile(&self, (row, column): Coordinate) -> Rect {
        let m = &self.metrics;
        let grid = self.grid();
        Rect::new(
            grid.x + column as i32 * m.tile_width,
            grid.y + row as i32 * m.tile_height,
            m.tile_width,
            m.tile_height,
        )
    }

    /// The tile under a point, if any.
    pub(crate) fn tile_at(&self, x: i32, y: i32) -> Option<Coordinate> {
        let grid = self.grid();
        if !grid.contains(x, y) {
            return None;
        }
        let row = (y - grid.y) / self.metrics.tile_height;
        let column = (x - grid.x) / self.metrics.tile_width;
        Some((usize::try_from(row).ok()?, usize::try_from(column).ok()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beginner() -> Layout {
        Layout::new(&Difficulty::BEGINNER, Metrics::terminal(5, 3))
    }

    #[test]
    fn window_wraps_the_grid() {
        let layout = beginner();
        assert_eq!(layout.window(), Rect::new(0, 0, 47, 33));
        assert_eq!(layout.grid(), Rect::new(1, 5, 45, 27));
        assert_eq!(layout.background(), layout.window());
    }

    #[test]
    fn panels_and_face_sit_on_the_header() {
        let layout = beginner();
        assert_eq!(layout.flags_panel(), Rect::new(1, 1, 7, 3));
        assert_eq!(layout.timer_panel(), Rect::new(39, 1, 7, 3));
        assert_eq!(layout.face(), Rect::new(20, 1, 6, 3));
        assert_eq!(
            layout.flags_digits(),
            [Rect::new(2, 2, 1, 1), Rect::new(4, 2, 1, 1), Rect::new(6, 2, 1, 1)]
        );
        assert_eq!(layout.timer_digits()[0], Rect::new(40, 2, 1, 1));
    }

    #[test]
    fn tile_hit_testing_inverts_tile_rects() {
        let layout = Layout::new(&Difficulty::EXPERT, Metrics::terminal(3, 1));
        for coord in [(0, 0), (7, 12), (15, 29)] {
            let rect = layout.tile(coord);
            assert_eq!(layout.tile_at(rect.x, rect.y), Some(coord));
            assert_eq!(
                layout.tile_at(rect.x + rect.width - 1, rect.y + rect.height - 1),
                Some(coord)
            );
        }
    }

    #[test]
    fn points_outside_the_grid_hit_nothing() {
        let layout = beginner();
        let grid = layout.grid();
        assert_eq!(layout.tile_at(grid.x - 1, grid.y), None);
        assert_eq!(layout.tile_at(grid.x + grid.width, grid.y), None);
        assert_eq!(layout.tile_at(grid.x, grid.y + grid.height), None);
        assert_eq!(layout.tile_at(layout.face().x, layout.face().y), None);
    }
}
