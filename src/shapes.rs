//! Shape catalog: the seven tetromino matrices, their colours, and the picker used to draw one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Plain RGB colour carried by shapes and settled cells. The renderer maps it to a terminal colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Tetromino kinds (I, O, T, S, Z, J, L).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeKind {
    /// Catalog order.
    pub const ALL: [Self; 7] = [Self::I, Self::O, Self::T, Self::J, Self::L, Self::Z, Self::S];

    /// Spawn-orientation matrix, rows top to bottom.
    fn matrix(self) -> &'static [&'static [u8]] {
        match self {
            Self::I => &[&[1, 1, 1, 1]],
            Self::O => &[&[1, 1], &[1, 1]],
            Self::T => &[&[0, 1, 0], &[1, 1, 1]],
            Self::J => &[&[1, 0, 0], &[1, 1, 1]],
            Self::L => &[&[0, 0, 1], &[1, 1, 1]],
            Self::Z => &[&[1, 1, 0], &[0, 1, 1]],
            Self::S => &[&[0, 1, 1], &[1, 1, 0]],
        }
    }

    fn color(self) -> Rgb {
        match self {
            Self::I => Rgb(0, 255, 255),
            Self::O => Rgb(255, 255, 0),
            Self::T => Rgb(128, 0, 128),
            Self::J => Rgb(255, 165, 0),
            Self::L => Rgb(255, 0, 0),
            Self::Z => Rgb(0, 255, 0),
            Self::S => Rgb(0, 0, 255),
        }
    }
}

/// Rectangular filled/empty matrix. `cells[row][col]`, row 0 is the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    cells: Vec<Vec<bool>>,
}

impl Shape {
    /// Panics on an empty or ragged matrix.
    pub fn new(cells: Vec<Vec<bool>>) -> Self {
        assert!(!cells.is_empty() && !cells[0].is_empty(), "shape must be non-empty");
        let cols = cells[0].len();
        assert!(
            cells.iter().all(|row| row.len() == cols),
            "shape rows must all have {} columns",
            cols
        );
        Self { cells }
    }

    fn from_bits(rows: &[&[u8]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|&b| b != 0).collect())
                .collect(),
        )
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cells[0].len()
    }

    /// Filled cells as `(row, col)`, row-major.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(c, _)| (r, c))
        })
    }

    /// Clockwise quarter turn: transpose of the row-reversed matrix.
    /// A `rows x cols` shape becomes `cols x rows`.
    pub fn rotated_cw(&self) -> Self {
        let (rows, cols) = (self.rows(), self.cols());
        let cells = (0..cols)
            .map(|i| (0..rows).map(|j| self.cells[rows - 1 - j][i]).collect())
            .collect();
        Self { cells }
    }
}

/// One catalog entry. Never mutated after the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeDefinition {
    pub kind: ShapeKind,
    pub shape: Shape,
    pub color: Rgb,
}

/// Uniform choice over `n` items. Swappable so tests can script the sequence.
pub trait ShapePicker {
    /// Index in `0..n`. `n` is never zero.
    fn pick(&mut self, n: usize) -> usize;
}

/// `StdRng`-backed picker; reproducible when built from a seed.
#[derive(Debug, Clone)]
pub struct SeededPicker {
    rng: StdRng,
}

impl SeededPicker {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl ShapePicker for SeededPicker {
    fn pick(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }
}

/// The seven canonical tetrominoes.
#[derive(Debug, Clone)]
pub struct ShapeCatalog {
    definitions: Vec<ShapeDefinition>,
}

impl ShapeCatalog {
    pub fn standard() -> Self {
        let definitions = ShapeKind::ALL
            .iter()
            .map(|&kind| ShapeDefinition {
                kind,
                shape: Shape::from_bits(kind.matrix()),
                color: kind.color(),
            })
            .collect();
        Self { definitions }
    }

    #[cfg(test)]
    pub fn get(&self, kind: ShapeKind) -> &ShapeDefinition {
        // The catalog is built from ALL, so every kind is present.
        let index = ShapeKind::ALL
            .iter()
            .position(|&k| k == kind)
            .unwrap_or_default();
        &self.definitions[index]
    }

    /// Draw one definition; each call is independent of the previous ones.
    pub fn pick_random(&self, picker: &mut dyn ShapePicker) -> &ShapeDefinition {
        let index = picker.pick(self.definitions.len());
        &self.definitions[index % self.definitions.len()]
    }
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Replays a fixed list of shape kinds, cycling when exhausted.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ScriptedPicker {
    sequence: Vec<ShapeKind>,
    index: usize,
}

#[cfg(test)]
impl ScriptedPicker {
    pub fn new(sequence: Vec<ShapeKind>) -> Self {
        assert!(!sequence.is_empty());
        Self { sequence, index: 0 }
    }
}

#[cfg(test)]
impl ShapePicker for ScriptedPicker {
    fn pick(&mut self, n: usize) -> usize {
        assert_eq!(n, ShapeKind::ALL.len(), "scripted picker only serves the standard catalog");
        let kind = self.sequence[self.index % self.sequence.len()];
        self.index += 1;
        ShapeKind::ALL
            .iter()
            .position(|&k| k == kind)
            .unwrap_or_default()
    }
}
