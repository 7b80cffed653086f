//! Game state: grid, falling piece, gravity tick, lock, row clear, spawn, game over.

use crate::collision::collides;
use crate::grid::Grid;
use crate::piece::{ActivePiece, rotate};
use crate::score::{ScorePolicy, ScoreTracker};
use crate::shapes::{ShapeCatalog, ShapePicker};

/// `Falling` until a freshly spawned piece has nowhere to go; `GameOver` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Falling,
    GameOver,
}

/// Directional commands accepted between gravity ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
}

/// What one gravity tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Piece moved down one row.
    Fell,
    /// Piece locked, rows were cleared and the next piece spawned.
    Locked { lines_cleared: u32 },
    /// Piece locked but the next piece could not spawn.
    GameOver { lines_cleared: u32 },
    /// Tick arrived after game over; nothing changed.
    Halted,
}

pub struct GameState {
    grid: Grid,
    /// None only once the game is over.
    piece: Option<ActivePiece>,
    catalog: ShapeCatalog,
    picker: Box<dyn ShapePicker>,
    score: ScoreTracker,
    phase: Phase,
    pieces_spawned: u32,
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("grid", &self.grid)
            .field("piece", &self.piece)
            .field("score", &self.score)
            .field("phase", &self.phase)
            .field("pieces_spawned", &self.pieces_spawned)
            .finish_non_exhaustive()
    }
}

impl GameState {
    pub fn new(config: &crate::GameConfig, picker: Box<dyn ShapePicker>) -> Self {
        Self::with_grid(
            Grid::new(config.width as usize, config.height as usize),
            ScoreTracker::new(config.score_policy),
            picker,
        )
    }

    /// Start on an arbitrary board. Spawns the first piece immediately.
    pub fn with_grid(grid: Grid, score: ScoreTracker, picker: Box<dyn ShapePicker>) -> Self {
        let mut state = Self {
            grid,
            piece: None,
            catalog: ShapeCatalog::standard(),
            picker,
            score,
            phase: Phase::Falling,
            pieces_spawned: 0,
        };
        state.spawn_next();
        state
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn piece(&self) -> Option<&ActivePiece> {
        self.piece.as_ref()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score.score()
    }

    #[inline]
    pub fn lines_cleared(&self) -> u32 {
        self.score.lines()
    }

    #[inline]
    pub fn pieces_spawned(&self) -> u32 {
        self.pieces_spawned
    }

    #[inline]
    pub fn score_policy(&self) -> ScorePolicy {
        self.score.policy()
    }

    /// Apply one directional command. Returns true if the piece moved or turned;
    /// a blocked command leaves everything as it was.
    pub fn apply(&mut self, command: Command) -> bool {
        if self.phase == Phase::GameOver {
            return false;
        }
        let Some(piece) = self.piece.as_mut() else {
            return false;
        };
        match command {
            Command::MoveLeft => try_shift(&self.grid, piece, -1, 0),
            Command::MoveRight => try_shift(&self.grid, piece, 1, 0),
            Command::SoftDrop => try_shift(&self.grid, piece, 0, 1),
            Command::Rotate => {
                let turned = rotate(&self.grid, piece);
                let changed = turned != *piece;
                *piece = turned;
                changed
            }
        }
    }

    /// One gravity step: fall a row, or lock, clear, score and spawn.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase == Phase::GameOver {
            return TickOutcome::Halted;
        }
        let Some(piece) = self.piece.as_mut() else {
            return TickOutcome::Halted;
        };
        if try_shift(&self.grid, piece, 0, 1) {
            return TickOutcome::Fell;
        }
        self.lock_piece()
    }

    fn lock_piece(&mut self) -> TickOutcome {
        let Some(piece) = self.piece.take() else {
            return TickOutcome::Halted;
        };
        self.grid.merge(&piece);
        let lines_cleared = self.grid.clear_completed_rows();
        self.score.add(lines_cleared);
        if self.spawn_next() {
            TickOutcome::Locked { lines_cleared }
        } else {
            TickOutcome::GameOver { lines_cleared }
        }
    }

    /// Spawn at the top centre. On collision the board is left untouched and the game ends.
    fn spawn_next(&mut self) -> bool {
        let def = self.catalog.pick_random(self.picker.as_mut());
        let next = ActivePiece::spawn(def, self.grid.width());
        if !next.fits(&self.grid) {
            self.piece = None;
            self.phase = Phase::GameOver;
            return false;
        }
        self.piece = Some(next);
        self.pieces_spawned = self.pieces_spawned.saturating_add(1);
        true
    }
}

/// Move by `(dx, dy)` if the destination is free; otherwise leave the piece alone.
fn try_shift(grid: &Grid, piece: &mut ActivePiece, dx: i32, dy: i32) -> bool {
    let target = piece.origin.offset(dx, dy);
    if collides(grid, &piece.shape, target) {
        return false;
    }
    piece.origin = target;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Position;
    use crate::grid::Cell;
    use crate::shapes::{Rgb, ScriptedPicker, ShapeKind};

    const GREY: Rgb = Rgb(128, 128, 128);

    fn game_on(grid: Grid, sequence: Vec<ShapeKind>) -> GameState {
        GameState::with_grid(
            grid,
            ScoreTracker::new(ScorePolicy::PerLine),
            Box::new(ScriptedPicker::new(sequence)),
        )
    }

    fn origin(state: &GameState) -> Position {
        state.piece().map(|p| p.origin).unwrap()
    }

    /// Tick until the current piece locks.
    fn drop_to_lock(state: &mut GameState) -> TickOutcome {
        loop {
            match state.tick() {
                TickOutcome::Fell => {}
                other => return other,
            }
        }
    }

    #[test]
    fn test_new_game_spawns_at_top_centre() {
        let config = crate::GameConfig {
            width: 10,
            height: 20,
            ..crate::GameConfig::default()
        };
        let state = GameState::new(&config, Box::new(ScriptedPicker::new(vec![ShapeKind::I])));
        assert_eq!(state.phase(), Phase::Falling);
        assert_eq!(origin(&state), Position { x: 3, y: 0 });
        assert_eq!(state.piece().unwrap().kind, ShapeKind::I);
        assert_eq!(state.pieces_spawned(), 1);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_gravity_moves_piece_down() {
        let mut state = game_on(Grid::new(10, 20), vec![ShapeKind::O]);
        assert_eq!(state.tick(), TickOutcome::Fell);
        assert_eq!(origin(&state), Position { x: 4, y: 1 });
    }

    #[test]
    fn test_horizontal_moves_stop_at_walls() {
        let mut state = game_on(Grid::new(10, 20), vec![ShapeKind::O]);
        for _ in 0..4 {
            assert!(state.apply(Command::MoveLeft));
        }
        assert_eq!(origin(&state).x, 0);
        assert!(!state.apply(Command::MoveLeft));
        assert_eq!(origin(&state).x, 0);

        for _ in 0..8 {
            assert!(state.apply(Command::MoveRight));
        }
        assert!(!state.apply(Command::MoveRight));
        assert_eq!(origin(&state).x, 8);
    }

    #[test]
    fn test_blocked_move_leaves_piece_identical() {
        let mut grid = Grid::new(10, 20);
        grid.set(3, 0, Cell::Filled(GREY));
        let mut state = game_on(grid, vec![ShapeKind::O]);
        let before = state.piece().cloned();
        assert!(!state.apply(Command::MoveLeft));
        assert_eq!(state.piece().cloned(), before);
    }

    #[test]
    fn test_blocked_soft_drop_does_not_lock() {
        let mut state = game_on(Grid::new(10, 2), vec![ShapeKind::O, ShapeKind::I]);
        assert!(!state.apply(Command::SoftDrop));
        assert_eq!(origin(&state), Position { x: 4, y: 0 });
        assert_eq!(state.pieces_spawned(), 1);
        assert!(state.grid().rows().flatten().all(|c| !c.is_occupied()));
    }

    #[test]
    fn test_soft_drop_moves_one_row() {
        let mut state = game_on(Grid::new(10, 20), vec![ShapeKind::T]);
        assert!(state.apply(Command::SoftDrop));
        assert_eq!(origin(&state).y, 1);
    }

    #[test]
    fn test_rotate_command() {
        let mut state = game_on(Grid::new(10, 20), vec![ShapeKind::I]);
        state.tick();
        assert!(state.apply(Command::Rotate));
        let piece = state.piece().unwrap();
        assert_eq!((piece.shape.rows(), piece.shape.cols()), (4, 1));
        assert_eq!(piece.origin, Position { x: 3, y: 1 });
    }

    #[test]
    fn test_rejected_rotation_reports_no_change() {
        // Horizontal I resting on the floor cannot stand up.
        let mut state = game_on(Grid::new(10, 4), vec![ShapeKind::I]);
        for _ in 0..3 {
            assert_eq!(state.tick(), TickOutcome::Fell);
        }
        let before = state.piece().cloned();
        assert!(!state.apply(Command::Rotate));
        assert_eq!(state.piece().cloned(), before);
    }

    #[test]
    fn test_lock_merges_and_spawns_next() {
        let mut state = game_on(Grid::new(10, 20), vec![ShapeKind::O, ShapeKind::T]);
        let outcome = drop_to_lock(&mut state);
        assert_eq!(outcome, TickOutcome::Locked { lines_cleared: 0 });

        let yellow = Rgb(255, 255, 0);
        for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
            assert_eq!(state.grid().get(x, y), Some(Cell::Filled(yellow)));
        }
        let next = state.piece().unwrap();
        assert_eq!(next.kind, ShapeKind::T);
        assert_eq!(next.origin, Position { x: 4, y: 0 });
        assert_eq!(state.pieces_spawned(), 2);
    }

    #[test]
    fn test_lock_clears_completed_row_and_scores() {
        let mut grid = Grid::new(10, 20);
        // Bottom row full except where the I will land.
        grid.fill_row(19, GREY, &[3, 4, 5, 6]);
        grid.set(0, 18, Cell::Filled(GREY));
        let mut state = game_on(grid, vec![ShapeKind::I]);

        assert_eq!(drop_to_lock(&mut state), TickOutcome::Locked { lines_cleared: 1 });
        assert_eq!(state.score(), 10);
        assert_eq!(state.lines_cleared(), 1);
        // The lone cell above the cleared row shifted down into it.
        assert_eq!(state.grid().get(0, 19), Some(Cell::Filled(GREY)));
        assert_eq!(
            state.grid().rows().flatten().filter(|c| c.is_occupied()).count(),
            1
        );
    }

    #[test]
    fn test_double_clear_per_line_and_flat() {
        for (policy, expected) in [(ScorePolicy::PerLine, 20), (ScorePolicy::Flat, 10)] {
            let mut grid = Grid::new(4, 6);
            grid.fill_row(4, GREY, &[1, 2]);
            grid.fill_row(5, GREY, &[1, 2]);
            // O spawns at x = 4/2 - 2/2 = 1 and fills the gaps exactly.
            let mut state = GameState::with_grid(
                grid,
                ScoreTracker::new(policy),
                Box::new(ScriptedPicker::new(vec![ShapeKind::O])),
            );
            assert_eq!(drop_to_lock(&mut state), TickOutcome::Locked { lines_cleared: 2 });
            assert_eq!(state.score(), expected, "{:?}", policy);
            assert_eq!(state.lines_cleared(), 2);
            assert!(state.grid().rows().flatten().all(|c| !c.is_occupied()));
        }
    }

    #[test]
    fn test_score_never_decreases_over_a_game() {
        let mut state = game_on(
            Grid::new(6, 10),
            vec![ShapeKind::I, ShapeKind::O, ShapeKind::T, ShapeKind::Z],
        );
        let mut last = 0;
        for i in 0..500 {
            if i % 3 == 0 {
                state.apply(Command::MoveLeft);
            }
            if i % 7 == 0 {
                state.apply(Command::Rotate);
            }
            if state.tick() == TickOutcome::Halted {
                break;
            }
            assert!(state.score() >= last);
            last = state.score();
        }
        assert!(state.is_game_over());
    }

    #[test]
    fn test_blocked_spawn_is_game_over_without_mutation() {
        let mut grid = Grid::new(10, 20);
        // Row 0 is free for the first I, rows below are not: it locks where it spawned
        // and the second I has nowhere to go.
        grid.fill_row(1, GREY, &[0]);
        grid.fill_row(2, GREY, &[0]);
        let mut state = game_on(grid, vec![ShapeKind::I]);
        assert_eq!(state.phase(), Phase::Falling);

        let outcome = state.tick();
        assert_eq!(outcome, TickOutcome::GameOver { lines_cleared: 0 });
        assert!(state.is_game_over());
        assert!(state.piece().is_none());
        assert_eq!(state.pieces_spawned(), 1);

        let frozen = state.grid().clone();
        assert_eq!(state.tick(), TickOutcome::Halted);
        assert!(!state.apply(Command::MoveLeft));
        assert!(!state.apply(Command::Rotate));
        assert_eq!(state.grid(), &frozen);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_prefilled_spawn_area_ends_on_first_spawn() {
        let mut grid = Grid::new(10, 20);
        grid.set(4, 0, Cell::Filled(GREY));
        let state = game_on(grid.clone(), vec![ShapeKind::O]);
        assert!(state.is_game_over());
        assert!(state.piece().is_none());
        assert_eq!(state.grid(), &grid);
    }

    #[test]
    fn test_shape_wider_than_board_is_immediate_game_over() {
        let state = game_on(Grid::new(2, 10), vec![ShapeKind::I]);
        assert_eq!(state.phase(), Phase::GameOver);
    }

    #[test]
    fn test_stacking_to_the_top_ends_the_game() {
        let mut state = game_on(Grid::new(10, 6), vec![ShapeKind::O]);
        let mut locks = 0;
        let result = loop {
            match state.tick() {
                TickOutcome::Fell => {}
                TickOutcome::Locked { .. } => locks += 1,
                TickOutcome::GameOver { lines_cleared } => break lines_cleared,
                TickOutcome::Halted => unreachable!(),
            }
        };
        // Three O pieces stack to height 6; the fourth cannot spawn.
        assert_eq!(locks, 2);
        assert_eq!(result, 0);
        assert_eq!(state.pieces_spawned(), 3);
        assert_eq!(
            state.grid().rows().flatten().filter(|c| c.is_occupied()).count(),
            12
        );
    }
}
