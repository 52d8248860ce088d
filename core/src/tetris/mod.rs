//! Tetris with hold, a one-piece preview, wall kicks and level-based gravity.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

pub use board::*;
pub use shape::*;

mod board;
mod shape;

/// Column offsets tried, in order, when a rotation collides.
pub const KICK_OFFSETS: [i32; 5] = [0, -1, 1, -2, 2];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TetrisConfig {
    pub width: u8,
    pub height: u8,
    pub base_interval_ms: u32,
    pub level_step_ms: u32,
    pub min_interval_ms: u32,
    pub lines_per_level: u32,
    pub line_score: u32,
}

impl TetrisConfig {
    pub const CLASSIC: Self = Self {
        width: 10,
        height: 20,
        base_interval_ms: 1000,
        level_step_ms: 100,
        min_interval_ms: 100,
        lines_per_level: 10,
        line_score: 100,
    };

    pub fn new(width: u8, height: u8) -> Self {
        let clamped = (width.max(4), height.max(4));
        if clamped != (width, height) {
            log::warn!(
                "Board {}x{} cannot hold every piece, using {}x{}",
                width,
                height,
                clamped.0,
                clamped.1
            );
        }
        Self {
            width: clamped.0,
            height: clamped.1,
            ..Self::CLASSIC
        }
    }

    /// Copy with every field raised to a playable minimum.
    pub fn sanitized(self) -> Self {
        let min_interval_ms = self.min_interval_ms.max(1);
        Self {
            width: self.width.max(4),
            height: self.height.max(4),
            base_interval_ms: self.base_interval_ms.max(min_interval_ms),
            min_interval_ms,
            lines_per_level: self.lines_per_level.max(1),
            ..self
        }
    }

    pub fn interval_for_level(&self, level: u32) -> u32 {
        self.base_interval_ms
            .saturating_sub(level.saturating_sub(1).saturating_mul(self.level_step_ms))
            .max(self.min_interval_ms)
    }
}

impl Default for TetrisConfig {
    fn default() -> Self {
        Self::CLASSIC
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Playing,
    GameOver,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Shift {
    Left,
    Right,
    Down,
}

impl Shift {
    const fn delta(self) -> (i32, i32) {
        match self {
            Self::Left => (0, -1),
            Self::Right => (0, 1),
            Self::Down => (1, 0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PieceOutcome {
    NoChange,
    Moved,
    /// The piece settled, clearing this many lines.
    Locked(u32),
    /// The next piece had no room.
    Ended,
}

impl PieceOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

impl From<PieceOutcome> for TickOutcome {
    fn from(outcome: PieceOutcome) -> Self {
        match outcome {
            PieceOutcome::NoChange => TickOutcome::NoChange,
            PieceOutcome::Moved | PieceOutcome::Locked(0) => TickOutcome::Moved,
            PieceOutcome::Locked(_) => TickOutcome::Scored,
            PieceOutcome::Ended => TickOutcome::Ended,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Tetris {
    config: TetrisConfig,
    board: Board,
    current: Piece,
    next: PieceKind,
    held: Option<PieceKind>,
    can_hold: bool,
    score: u32,
    lines: u32,
    level: u32,
    status: Status,
    paused: bool,
    rng: SmallRng,
}

impl Tetris {
    pub fn new(config: TetrisConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let first = random_kind(&mut rng);
        Self::starting_with(config, seed ^ rng.random::<u64>(), first)
    }

    /// Game whose first piece is fixed, the rest are drawn from `seed`.
    pub fn starting_with(config: TetrisConfig, seed: u64, first: PieceKind) -> Self {
        let sanitized = config.sanitized();
        if sanitized != config {
            log::warn!("Tetris config {:?} out of range, using {:?}", config, sanitized);
        }
        let config = sanitized;
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = Board::new(config.width, config.height);
        let next = random_kind(&mut rng);
        log::debug!("New tetris game, first piece {:?}", first);
        let mut game = Self {
            config,
            current: Piece::spawn(first, board.width()),
            board,
            next,
            held: None,
            can_hold: true,
            score: 0,
            lines: 0,
            level: 1,
            status: Status::Playing,
            paused: false,
            rng,
        };
        game.spawn(first);
        game
    }

    pub fn new_game(&mut self, seed: u64) {
        *self = Self::new(self.config, seed);
    }

    pub fn config(&self) -> TetrisConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Piece {
        self.current
    }

    pub fn next(&self) -> PieceKind {
        self.next
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Row the current piece would settle at after a hard drop.
    pub fn ghost_row(&self) -> i32 {
        self.current.row + self.drop_distance()
    }

    /// Settled cells with the falling piece drawn on top.
    pub fn render_cells(&self) -> ndarray::Array2<Option<PieceKind>> {
        let mut cells = self.board.cells().clone();
        for (row, col) in self.current.cells() {
            if row >= 0 && col >= 0 {
                if let Some(cell) = cells.get_mut((row as usize, col as usize)) {
                    *cell = Some(self.current.kind);
                }
            }
        }
        cells
    }

    /// Moves sideways, or down one row. A blocked downward move locks the piece.
    pub fn move_piece(&mut self, shift: Shift) -> Result<PieceOutcome> {
        self.check_active()?;
        let (rows, cols) = shift.delta();
        let moved = self.current.shifted(rows, cols);
        if self.board.fits(&moved) {
            self.current = moved;
            return Ok(PieceOutcome::Moved);
        }
        match shift {
            Shift::Down => Ok(self.lock()),
            Shift::Left | Shift::Right => Ok(PieceOutcome::NoChange),
        }
    }

    /// Rotates clockwise, trying each of [`KICK_OFFSETS`] in turn.
    pub fn rotate(&mut self) -> Result<PieceOutcome> {
        self.check_active()?;
        let rotated = self.current.rotated();
        let kicked = KICK_OFFSETS.iter().find_map(|&offset| {
            log::trace!("Trying rotation with column offset {}", offset);
            let candidate = rotated.shifted(0, offset);
            self.board.fits(&candidate).then_some(candidate)
        });
        match kicked {
            Some(piece) => {
                self.current = piece;
                Ok(PieceOutcome::Moved)
            }
            None => Ok(PieceOutcome::NoChange),
        }
    }

    pub fn hard_drop(&mut self) -> Result<PieceOutcome> {
        self.check_active()?;
        self.current = self.current.shifted(self.drop_distance(), 0);
        Ok(self.lock())
    }

    /// Swaps the falling piece with the held one, once per spawned piece.
    pub fn hold(&mut self) -> Result<PieceOutcome> {
        self.check_active()?;
        if !self.can_hold {
            return Err(GameError::IllegalMove);
        }
        let kind = self.current.kind;
        let outcome = match self.held {
            Some(held) => {
                let swapped = Piece::spawn(held, self.board.width());
                if !self.board.fits(&swapped) {
                    return Err(GameError::IllegalMove);
                }
                self.current = swapped;
                PieceOutcome::Moved
            }
            None => self.spawn_next(),
        };
        self.held = Some(kind);
        self.can_hold = false;
        Ok(outcome)
    }

    pub fn toggle_pause(&mut self) -> Result<bool> {
        self.check_playing()?;
        self.paused = !self.paused;
        log::debug!("Tetris paused: {}", self.paused);
        Ok(self.paused)
    }

    fn drop_distance(&self) -> i32 {
        (0..)
            .take_while(|&rows| self.board.fits(&self.current.shifted(rows + 1, 0)))
            .count() as i32
    }

    fn lock(&mut self) -> PieceOutcome {
        self.board.merge(&self.current);
        let cleared = self.board.clear_full_rows();
        if cleared > 0 {
            self.lines += cleared;
            self.level = self.lines / self.config.lines_per_level + 1;
            self.score += cleared * self.config.line_score * self.level;
            log::debug!(
                "Cleared {} lines, total {}, level {}",
                cleared,
                self.lines,
                self.level
            );
        }
        match self.spawn_next() {
            PieceOutcome::Ended => PieceOutcome::Ended,
            _ => PieceOutcome::Locked(cleared),
        }
    }

    fn spawn_next(&mut self) -> PieceOutcome {
        let kind = std::mem::replace(&mut self.next, random_kind(&mut self.rng));
        self.spawn(kind)
    }

    fn spawn(&mut self, kind: PieceKind) -> PieceOutcome {
        self.current = Piece::spawn(kind, self.board.width());
        self.can_hold = true;
        if self.board.fits(&self.current) {
            PieceOutcome::Moved
        } else {
            self.status = Status::GameOver;
            log::debug!("Tetris over, score {}", self.score);
            PieceOutcome::Ended
        }
    }

    fn check_playing(&self) -> Result<()> {
        match self.status {
            Status::Playing => Ok(()),
            Status::GameOver => Err(GameError::AlreadyEnded),
        }
    }

    fn check_active(&self) -> Result<()> {
        self.check_playing()?;
        if self.paused {
            return Err(GameError::Paused);
        }
        Ok(())
    }
}

fn random_kind(rng: &mut SmallRng) -> PieceKind {
    PieceKind::ALL[rng.random_range(0..PieceKind::ALL.len())]
}

impl Ticking for Tetris {
    fn tick(&mut self) -> Result<TickOutcome> {
        self.move_piece(Shift::Down).map(TickOutcome::from)
    }

    fn tick_interval_ms(&self) -> u32 {
        self.config.interval_for_level(self.level)
    }
}

impl StatusText for Tetris {
    fn status_key(&self) -> &'static str {
        match (self.status, self.paused) {
            (Status::GameOver, _) => "tetris.status.gameOver",
            (Status::Playing, true) => "tetris.status.paused",
            (Status::Playing, false) => "tetris.status.playing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(first: PieceKind) -> Tetris {
        Tetris::starting_with(TetrisConfig::CLASSIC, 3, first)
    }

    fn fill_row_except(game: &mut Tetris, row: i32, gap: std::ops::Range<i32>) {
        for col in (0..game.board.width()).filter(|col| !gap.contains(col)) {
            game.board.set(row, col, Some(PieceKind::O)).unwrap();
        }
    }

    #[test]
    fn gravity_interval_speeds_up() {
        let config = TetrisConfig::CLASSIC;
        assert_eq!(config.interval_for_level(1), 1000);
        assert_eq!(config.interval_for_level(4), 700);
        assert_eq!(config.interval_for_level(10), 100);
        assert_eq!(config.interval_for_level(40), 100);
    }

    #[test]
    fn moves_down_row_by_row() {
        let mut game = game(PieceKind::I);
        let start = game.current();
        for _ in 0..4 {
            assert_eq!(game.move_piece(Shift::Down), Ok(PieceOutcome::Moved));
        }
        assert_eq!(game.current(), start.shifted(4, 0));
    }

    #[test]
    fn walls_block_sideways_moves() {
        let mut game = game(PieceKind::O);
        for _ in 0..4 {
            assert_eq!(game.move_piece(Shift::Left), Ok(PieceOutcome::Moved));
        }
        assert_eq!(game.current().col, 0);
        assert_eq!(game.move_piece(Shift::Left), Ok(PieceOutcome::NoChange));
        assert_eq!(game.current().col, 0);
    }

    #[test]
    fn rotation_kicks_off_the_right_wall() {
        let mut game = game(PieceKind::I);
        game.rotate().unwrap();
        while game.move_piece(Shift::Right) == Ok(PieceOutcome::Moved) {}
        // vertical I sits in mask column 2
        assert_eq!(game.current().col, 7);

        assert_eq!(game.rotate(), Ok(PieceOutcome::Moved));
        assert_eq!(game.current().col, 6);
        assert!(game.board.fits(&game.current()));
    }

    #[test]
    fn rotation_kicks_two_columns_off_the_left_wall() {
        let mut game = game(PieceKind::I);
        game.rotate().unwrap();
        while game.move_piece(Shift::Left) == Ok(PieceOutcome::Moved) {}
        assert_eq!(game.current().col, -2);

        assert_eq!(game.rotate(), Ok(PieceOutcome::Moved));
        assert_eq!(game.current().col, 0);
        assert_eq!(game.current().rotation, 2);
    }

    #[test]
    fn rotation_without_room_is_ignored() {
        let mut game = game(PieceKind::I);
        game.rotate().unwrap();
        let vertical = game.current();
        // walls on both sides of the vertical bar
        for row in 0..6 {
            for col in [4, 6] {
                game.board.set(row, col, Some(PieceKind::O)).unwrap();
            }
        }
        assert_eq!(game.rotate(), Ok(PieceOutcome::NoChange));
        assert_eq!(game.current(), vertical);
    }

    #[test]
    fn hard_drop_lands_on_the_floor() {
        let mut game = game(PieceKind::I);
        assert_eq!(game.ghost_row(), 18);
        assert_eq!(game.hard_drop(), Ok(PieceOutcome::Locked(0)));
        for col in 3..7 {
            assert_eq!(game.board.get(19, col), Some(PieceKind::I));
        }
        assert_eq!(game.board.get(19, 2), None);
        assert_eq!(game.current().row, 0);
    }

    #[test]
    fn hard_drop_stops_one_step_before_collision() {
        let mut game = game(PieceKind::O);
        game.board.set(10, 4, Some(PieceKind::T)).unwrap();
        game.hard_drop().unwrap();
        assert_eq!(game.board.get(9, 4), Some(PieceKind::O));
        assert_eq!(game.board.get(8, 5), Some(PieceKind::O));
        assert_eq!(game.board.get(11, 4), None);
    }

    #[test]
    fn clearing_lines_scores_by_level() {
        let mut game = game(PieceKind::I);
        fill_row_except(&mut game, 19, 3..7);
        assert_eq!(game.hard_drop(), Ok(PieceOutcome::Locked(1)));
        assert_eq!(game.lines(), 1);
        assert_eq!(game.score(), 100);
        assert!((0..10).all(|col| game.board.get(19, col).is_none()));

        game.lines = 9;
        game.current = Piece::spawn(PieceKind::I, 10);
        fill_row_except(&mut game, 19, 3..7);
        fill_row_except(&mut game, 18, 0..0);
        game.board.set(18, 5, None).unwrap();
        game.current = Piece {
            rotation: 1,
            ..game.current
        };
        // vertical I covering column 5 down to the floor
        assert_eq!(game.hard_drop(), Ok(PieceOutcome::Locked(1)));
        assert_eq!(game.level(), 2);
        assert_eq!(game.score(), 100 + 200);
        assert_eq!(game.tick_interval_ms(), 900);
    }

    #[test]
    fn hold_once_per_piece() {
        let mut game = game(PieceKind::T);
        let next = game.next();
        assert_eq!(game.hold(), Ok(PieceOutcome::Moved));
        assert_eq!(game.held(), Some(PieceKind::T));
        assert_eq!(game.current().kind, next);
        assert_eq!(game.hold(), Err(GameError::IllegalMove));

        game.hard_drop().unwrap();
        let dropped_next = game.current().kind;
        assert!(game.can_hold());
        assert_eq!(game.hold(), Ok(PieceOutcome::Moved));
        assert_eq!(game.current().kind, PieceKind::T);
        assert_eq!(game.held(), Some(dropped_next));
    }

    #[test]
    fn blocked_spawn_ends_the_game() {
        let mut game = game(PieceKind::O);
        fill_row_except(&mut game, 1, 0..0);
        game.board.set(1, 4, None).unwrap();
        game.board.set(1, 5, None).unwrap();
        assert_eq!(game.spawn(PieceKind::T), PieceOutcome::Ended);
        assert_eq!(game.status(), Status::GameOver);
        assert_eq!(game.tick(), Err(GameError::AlreadyEnded));
        assert_eq!(game.status_key(), "tetris.status.gameOver");
    }

    #[test]
    fn out_of_range_config_is_clamped() {
        let config = TetrisConfig {
            width: 2,
            lines_per_level: 0,
            min_interval_ms: 0,
            ..TetrisConfig::CLASSIC
        };
        let mut game = Tetris::starting_with(config, 3, PieceKind::I);
        assert_eq!(game.config().width, 4);
        assert_eq!(game.config().lines_per_level, 1);
        assert_eq!(game.config().min_interval_ms, 1);
        assert_eq!(game.status(), Status::Playing);

        // the spawned I spans the whole narrow board and clears a line on the floor
        assert_eq!(game.hard_drop(), Ok(PieceOutcome::Locked(1)));
        assert_eq!(game.lines(), 1);
        assert_eq!(game.level(), 2);
    }

    #[test]
    fn pause_stops_gravity() {
        let mut game = game(PieceKind::S);
        assert_eq!(game.toggle_pause(), Ok(true));
        assert_eq!(game.tick(), Err(GameError::Paused));
        assert_eq!(game.rotate(), Err(GameError::Paused));
        assert_eq!(game.toggle_pause(), Ok(false));
        assert_eq!(game.tick(), Ok(TickOutcome::Moved));
    }

    #[test]
    fn render_overlays_current_piece() {
        let game = game(PieceKind::O);
        let cells = game.render_cells();
        assert_eq!(cells[[0, 4]], Some(PieceKind::O));
        assert_eq!(cells[[1, 5]], Some(PieceKind::O));
        assert_eq!(cells.iter().filter(|cell| cell.is_some()).count(), 4);
    }
}
