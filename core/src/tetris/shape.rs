use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

/// Square occupancy mask, `[row, col]`.
pub type Shape = Array2<bool>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    fn mask(self) -> &'static [&'static str] {
        match self {
            Self::I => &["....", "####", "....", "...."],
            Self::O => &["##", "##"],
            Self::T => &[".#.", "###", "..."],
            Self::S => &[".##", "##.", "..."],
            Self::Z => &["##.", ".##", "..."],
            Self::J => &["#..", "###", "..."],
            Self::L => &["..#", "###", "..."],
        }
    }

    pub fn base_shape(self) -> Shape {
        let rows = self.mask();
        Array2::from_shape_fn((rows.len(), rows.len()), |(r, c)| {
            rows[r].as_bytes()[c] == b'#'
        })
    }

    pub fn size(self) -> usize {
        self.mask().len()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::I => "i",
            Self::O => "o",
            Self::T => "t",
            Self::S => "s",
            Self::Z => "z",
            Self::J => "j",
            Self::L => "l",
        }
    }
}

/// Quarter turn clockwise: transpose, then mirror the columns.
pub fn rotate_shape(shape: &Shape) -> Shape {
    shape.t().slice(s![.., ..;-1]).to_owned()
}

/// A falling piece. `row` and `col` locate the top-left corner of its mask on the board and may
/// be negative.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: u8,
    pub row: i32,
    pub col: i32,
}

impl Piece {
    /// Top row, horizontally centred.
    pub fn spawn(kind: PieceKind, board_width: i32) -> Self {
        Self {
            kind,
            rotation: 0,
            row: 0,
            col: (board_width - kind.size() as i32) / 2,
        }
    }

    pub fn shape(&self) -> Shape {
        (0..self.rotation % 4).fold(self.kind.base_shape(), |shape, _| rotate_shape(&shape))
    }

    /// Board coordinates `(row, col)` of the occupied cells.
    pub fn cells(&self) -> Vec<(i32, i32)> {
        self.shape()
            .indexed_iter()
            .filter(|(_, &filled)| filled)
            .map(|((r, c), _)| (self.row + r as i32, self.col + c as i32))
            .collect()
    }

    pub fn shifted(&self, rows: i32, cols: i32) -> Self {
        Self {
            row: self.row + rows,
            col: self.col + cols,
            ..*self
        }
    }

    pub fn rotated(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % 4,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(shape: &Shape) -> Vec<String> {
        shape
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|&f| if f { '#' } else { '.' }).collect())
            .collect()
    }

    #[test]
    fn rotates_clockwise() {
        let t = PieceKind::T.base_shape();
        assert_eq!(render(&rotate_shape(&t)), [".#.", ".##", ".#."]);

        let i = rotate_shape(&PieceKind::I.base_shape());
        assert_eq!(render(&i), ["..#.", "..#.", "..#.", "..#."]);
    }

    #[test]
    fn four_turns_is_identity() {
        for kind in PieceKind::ALL {
            let base = kind.base_shape();
            let turned = (0..4).fold(base.clone(), |shape, _| rotate_shape(&shape));
            assert_eq!(turned, base, "{:?}", kind);
        }
    }

    #[test]
    fn every_piece_has_four_cells() {
        for kind in PieceKind::ALL {
            for rotation in 0..4 {
                let piece = Piece {
                    rotation,
                    ..Piece::spawn(kind, 10)
                };
                assert_eq!(piece.cells().len(), 4);
            }
        }
    }

    #[test]
    fn spawn_is_centred() {
        assert_eq!(Piece::spawn(PieceKind::I, 10).col, 3);
        assert_eq!(Piece::spawn(PieceKind::O, 10).col, 4);
        assert_eq!(Piece::spawn(PieceKind::T, 10).col, 3);
    }
}
