use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::*;

/// Settled cells, `[row, col]` with row 0 at the top.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Option<PieceKind>>,
}

impl Board {
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            cells: Array2::default((height as usize, width as usize)),
        }
    }

    pub fn width(&self) -> i32 {
        self.cells.ncols() as i32
    }

    pub fn height(&self) -> i32 {
        self.cells.nrows() as i32
    }

    fn index(&self, row: i32, col: i32) -> Option<(usize, usize)> {
        let in_bounds = (0..self.height()).contains(&row) && (0..self.width()).contains(&col);
        in_bounds.then_some((row as usize, col as usize))
    }

    /// Settled piece at a cell, `None` when empty or outside.
    pub fn get(&self, row: i32, col: i32) -> Option<PieceKind> {
        self.index(row, col).and_then(|index| self.cells[index])
    }

    pub fn set(&mut self, row: i32, col: i32, cell: Option<PieceKind>) -> Result<()> {
        let index = self.index(row, col).ok_or(GameError::InvalidCoords)?;
        self.cells[index] = cell;
        Ok(())
    }

    /// Cells above the top edge count as free so a piece can spawn partly hidden.
    pub fn is_free(&self, row: i32, col: i32) -> bool {
        if !(0..self.width()).contains(&col) || row >= self.height() {
            return false;
        }
        row < 0 || self.get(row, col).is_none()
    }

    pub fn fits(&self, piece: &Piece) -> bool {
        piece
            .cells()
            .into_iter()
            .all(|(row, col)| self.is_free(row, col))
    }

    pub fn merge(&mut self, piece: &Piece) {
        for (row, col) in piece.cells() {
            if let Some(index) = self.index(row, col) {
                self.cells[index] = Some(piece.kind);
            }
        }
    }

    /// Removes full rows and drops everything above them. Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> u32 {
        let kept: Vec<usize> = self
            .cells
            .rows()
            .into_iter()
            .enumerate()
            .filter(|(_, row)| row.iter().any(Option::is_none))
            .map(|(r, _)| r)
            .collect();
        let cleared = self.cells.nrows() - kept.len();
        if cleared == 0 {
            return 0;
        }

        let mut cells = Array2::default(self.cells.dim());
        for (i, &r) in kept.iter().enumerate() {
            cells.row_mut(cleared + i).assign(&self.cells.row(r));
        }
        self.cells = cells;
        cleared as u32
    }

    pub fn cells(&self) -> &Array2<Option<PieceKind>> {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, row: i32, kind: PieceKind) {
        for col in 0..board.width() {
            board.set(row, col, Some(kind)).unwrap();
        }
    }

    #[test]
    fn bounds() {
        let mut board = Board::new(10, 20);
        assert!(board.is_free(-2, 0));
        assert!(!board.is_free(-2, -1));
        assert!(!board.is_free(20, 0));
        assert!(!board.is_free(0, 10));
        board.set(5, 5, Some(PieceKind::T)).unwrap();
        assert!(!board.is_free(5, 5));
        assert_eq!(board.set(20, 0, None), Err(GameError::InvalidCoords));
    }

    #[test]
    fn clears_full_rows_and_shifts_down() {
        let mut board = Board::new(4, 6);
        fill_row(&mut board, 5, PieceKind::I);
        fill_row(&mut board, 3, PieceKind::O);
        board.set(4, 1, Some(PieceKind::S)).unwrap();
        board.set(2, 0, Some(PieceKind::Z)).unwrap();

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.height(), 6);
        assert_eq!(board.get(5, 1), Some(PieceKind::S));
        assert_eq!(board.get(4, 0), Some(PieceKind::Z));
        assert!(board.cells().rows().into_iter().take(4).all(|row| row.iter().all(Option::is_none)));
        assert_eq!(board.clear_full_rows(), 0);
    }
}
