//! The falling piece and its rotation rule.

use crate::collision::{Position, collides};
use crate::grid::Grid;
use crate::shapes::{Rgb, Shape, ShapeDefinition, ShapeKind};

/// Current piece: shape in its current orientation, top-left anchor, colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: ShapeKind,
    pub shape: Shape,
    pub origin: Position,
    pub color: Rgb,
}

impl ActivePiece {
    /// Top-centre spawn: `x = width / 2 - shape_cols / 2`, `y = 0`.
    pub fn spawn(def: &ShapeDefinition, grid_width: usize) -> Self {
        let x = (grid_width / 2) as i32 - (def.shape.cols() / 2) as i32;
        Self {
            kind: def.kind,
            shape: def.shape.clone(),
            origin: Position { x, y: 0 },
            color: def.color,
        }
    }

    /// Grid coordinates of every filled cell.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled_cells()
            .map(|(r, c)| (self.origin.x + c as i32, self.origin.y + r as i32))
    }

    #[inline]
    pub fn fits(&self, grid: &Grid) -> bool {
        !collides(grid, &self.shape, self.origin)
    }
}

/// One clockwise quarter turn about the same origin, or the piece unchanged if the
/// turned shape would collide. No kicks.
pub fn rotate(grid: &Grid, piece: &ActivePiece) -> ActivePiece {
    let turned = piece.shape.rotated_cw();
    if collides(grid, &turned, piece.origin) {
        return piece.clone();
    }
    ActivePiece {
        shape: turned,
        ..piece.clone()
    }
}
