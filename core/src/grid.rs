use ndarray::Array2;

/// Single coordinate axis used for grid rows and columns.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Grid coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    (a as CellCount).saturating_mul(b as CellCount)
}

/// Dimensions of a grid as `(rows, cols)`, taken from the array itself rather than any config.
pub fn grid_size<T>(grid: &Array2<T>) -> Coord2 {
    let (rows, cols) = grid.dim();
    (
        rows.try_into().unwrap_or(Coord::MAX),
        cols.try_into().unwrap_or(Coord::MAX),
    )
}

pub fn in_bounds((row, col): Coord2, (rows, cols): Coord2) -> bool {
    row < rows && col < cols
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, center: Coord2) -> Neighbors;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, center: Coord2) -> Neighbors {
        Neighbors::new(center, grid_size(self))
    }
}

const OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Iterator over the in-bounds cells of the 8-neighbourhood around `center`.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Coord2,
    bounds: Coord2,
    next: usize,
}

impl Neighbors {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            next: 0,
        }
    }

    fn offset(&self, (dr, dc): (i8, i8)) -> Option<Coord2> {
        let row = self.center.0.checked_add_signed(dr)?;
        let col = self.center.1.checked_add_signed(dc)?;
        in_bounds((row, col), self.bounds).then_some((row, col))
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = OFFSETS.get(self.next) {
            self.next += 1;
            if let Some(pos) = self.offset(delta) {
                return Some(pos);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_three_neighbors() {
        let neighbors: Vec<_> = Neighbors::new((0, 0), (3, 3)).collect();
        assert_eq!(neighbors, vec![(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn center_has_eight_neighbors() {
        assert_eq!(Neighbors::new((1, 1), (3, 3)).count(), 8);
    }

    #[test]
    fn single_cell_grid_has_no_neighbors() {
        let grid: Array2<bool> = Array2::default((1, 1));
        assert_eq!(grid.iter_neighbors((0, 0)).count(), 0);
    }
}
