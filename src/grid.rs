//! Grid: fixed-size matrix of settled cells, merge on lock, row clearing.

use crate::collision::collides;
use crate::piece::ActivePiece;
use crate::shapes::Rgb;
use std::collections::VecDeque;

/// Single cell: empty or filled with the colour of the piece that settled there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Rgb),
}

impl Cell {
    #[inline]
    pub fn is_occupied(self) -> bool {
        matches!(self, Self::Filled(_))
    }

    #[inline]
    pub fn color(self) -> Option<Rgb> {
        match self {
            Self::Filled(c) => Some(c),
            Self::Empty => None,
        }
    }
}

/// Board of settled cells. y=0 is top; dimensions never change after `new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// rows[y][x] = cell. rows[0] is top.
    rows: VecDeque<Vec<Cell>>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid must be at least 1x1");
        let rows = (0..height).map(|_| vec![Cell::Empty; width]).collect();
        Self {
            width,
            height,
            rows,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    /// True iff `(x, y)` is on the board and settled. Callers bounds-check first.
    #[inline]
    pub fn is_cell_occupied(&self, x: usize, y: usize) -> bool {
        debug_assert!(
            x < self.width && y < self.height,
            "cell ({}, {}) outside {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        self.get(x, y).is_some_and(Cell::is_occupied)
    }

    /// Rows top to bottom, for rendering.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    #[cfg(test)]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y][x] = cell;
    }

    /// Fill every cell of row `y` except the columns in `gaps`.
    #[cfg(test)]
    pub fn fill_row(&mut self, y: usize, color: Rgb, gaps: &[usize]) {
        for x in 0..self.width {
            if !gaps.contains(&x) {
                self.rows[y][x] = Cell::Filled(color);
            }
        }
    }

    /// Stamp the piece into the board. The piece must be a legal placement.
    pub fn merge(&mut self, piece: &ActivePiece) {
        assert!(
            !collides(self, &piece.shape, piece.origin),
            "merge of an illegal placement at {:?}",
            piece.origin
        );
        for (r, c) in piece.shape.filled_cells() {
            let x = (piece.origin.x + c as i32) as usize;
            let y = piece.origin.y + r as i32;
            // Rows above the board cannot hold settled cells.
            if y < 0 {
                continue;
            }
            self.rows[y as usize][x] = Cell::Filled(piece.color);
        }
    }

    /// Drop every full row and push the same number of empty rows in at the top.
    /// Surviving rows keep their relative order. Returns the number of rows removed.
    pub fn clear_completed_rows(&mut self) -> u32 {
        let before = self.rows.len();
        let mut kept: VecDeque<Vec<Cell>> = std::mem::take(&mut self.rows)
            .into_iter()
            .filter(|row| !row.iter().all(|c| c.is_occupied()))
            .collect();
        let cleared = before - kept.len();
        for _ in 0..cleared {
            kept.push_front(vec![Cell::Empty; self.width]);
        }
        self.rows = kept;
        debug_assert_eq!(self.rows.len(), self.height);
        cleared as u32
    }
}
