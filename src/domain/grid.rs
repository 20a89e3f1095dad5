/// Board geometry: cells, headings and the fixed board constants.
///
/// Cells are logical grid positions, never pixels. The renderer does its own
/// cell → pixel conversion using `CELL_PIXELS`.

use std::time::Duration;

// ── Board constants (fixed, not user-configurable) ──

pub const TILE_COUNT: i32 = 20;
pub const CELL_PIXELS: i32 = 20;
pub const BOARD_PIXELS: i32 = TILE_COUNT * CELL_PIXELS;
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
pub const SCORE_INCREMENT: u32 = 10;

/// A grid-aligned position. Valid board cells satisfy `0 <= x, y < TILE_COUNT`;
/// out-of-range values only ever exist transiently as a candidate head.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Center of the board; where every run starts.
    pub const fn center() -> Self {
        Cell { x: TILE_COUNT / 2, y: TILE_COUNT / 2 }
    }

    pub fn offset(self, dir: Direction) -> Cell {
        Cell { x: self.x + dir.dx, y: self.y + dir.dy }
    }

    pub fn in_bounds(self) -> bool {
        (0..TILE_COUNT).contains(&self.x) && (0..TILE_COUNT).contains(&self.y)
    }

    /// Pixel coordinates of the cell's center.
    pub fn pixel_center(self) -> (f32, f32) {
        let half = CELL_PIXELS as f32 / 2.0;
        (
            (self.x * CELL_PIXELS) as f32 + half,
            (self.y * CELL_PIXELS) as f32 + half,
        )
    }
}

/// Unit heading. `NONE` (0,0) means the snake has not started moving.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Direction {
    pub dx: i32,
    pub dy: i32,
}

impl Direction {
    pub const NONE: Direction = Direction { dx: 0, dy: 0 };
    pub const UP: Direction = Direction { dx: 0, dy: -1 };
    pub const DOWN: Direction = Direction { dx: 0, dy: 1 };
    pub const LEFT: Direction = Direction { dx: -1, dy: 0 };
    pub const RIGHT: Direction = Direction { dx: 1, dy: 0 };

    pub fn is_none(self) -> bool {
        self == Direction::NONE
    }

    /// Would turning from `current` to `self` be a 180° reversal?
    ///
    /// Checked per axis: only the axis `current` is moving along counts, so a
    /// stationary `current` never makes anything a reversal.
    pub fn reverses(self, current: Direction) -> bool {
        let flips_x = current.dx != 0 && self.dy == 0 && self.dx == -current.dx;
        let flips_y = current.dy != 0 && self.dx == 0 && self.dy == -current.dy;
        flips_x || flips_y
    }
}
