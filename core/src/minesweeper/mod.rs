//! Minesweeper with deferred mine placement: the board stays empty until the first reveal, which
//! picks the layout around the revealed cell so the opening move is never a mine.

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

use crate::*;

pub use cell::*;
pub use engine::*;
pub use generator::*;

mod cell;
mod engine;
mod generator;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub size: Coord2,
    pub mines: CellCount,
}

impl Difficulty {
    pub const BEGINNER: Self = Self::new_unchecked((9, 9), 10);
    pub const INTERMEDIATE: Self = Self::new_unchecked((16, 16), 40);
    pub const EXPERT: Self = Self::new_unchecked((20, 20), 99);

    pub const PRESETS: [(&'static str, Self); 3] = [
        ("minesweeper.difficulty.beginner", Self::BEGINNER),
        ("minesweeper.difficulty.intermediate", Self::INTERMEDIATE),
        ("minesweeper.difficulty.expert", Self::EXPERT),
    ];

    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Clamps the size to at least 2 cells and the mines so at least one safe cell remains.
    pub fn new((rows, cols): Coord2, mines: CellCount) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(if rows == 1 { 2 } else { 1 });
        let max_mines = mult(rows, cols) - 1;
        let clamped = mines.clamp(1, max_mines);
        if clamped != mines {
            log::warn!(
                "Mine count {} does not fit a {}x{} board, using {}",
                mines,
                rows,
                cols,
                clamped
            );
        }
        Self::new_unchecked((rows, cols), clamped)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::BEGINNER
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Board shown, mines not placed yet.
    #[default]
    Ready,
    Playing,
    Won,
    Lost,
}

impl Status {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Merges outcomes of a multi-cell reveal, the most severe one wins.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Won, _) | (_, Won) => Won,
            (Revealed, _) | (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
