use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

/// One board square. Mine data is fixed once the layout is placed; only `state` changes after.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    is_mine: bool,
    neighbor_mines: u8,
    state: CellState,
}

impl Cell {
    pub(crate) const fn new(is_mine: bool, neighbor_mines: u8) -> Self {
        Self {
            is_mine,
            neighbor_mines,
            state: CellState::Hidden,
        }
    }

    pub const fn is_mine(self) -> bool {
        self.is_mine
    }

    pub const fn neighbor_mines(self) -> u8 {
        self.neighbor_mines
    }

    pub const fn state(self) -> CellState {
        self.state
    }

    pub const fn is_hidden(self) -> bool {
        matches!(self.state, CellState::Hidden)
    }

    pub(crate) fn set_state(&mut self, state: CellState) {
        self.state = state;
    }
}
