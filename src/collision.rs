//! Placement legality: bounds and settled-cell overlap.

use crate::grid::Grid;
use crate::shapes::Shape;

/// Top-left anchor of a shape in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// True if any filled cell of `shape` at `origin` is left of column 0, right of the last column,
/// below the last row, or on a settled cell. Cells above row 0 only get the horizontal check.
pub fn collides(grid: &Grid, shape: &Shape, origin: Position) -> bool {
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    shape.filled_cells().any(|(r, c)| {
        let x = origin.x + c as i32;
        let y = origin.y + r as i32;
        if x < 0 || x >= w || y >= h {
            return true;
        }
        if y < 0 {
            return false;
        }
        grid.is_cell_occupied(x as usize, y as usize)
    })
}
