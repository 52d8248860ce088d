use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// How much room the first revealed cell gets when the layout is placed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirstMovePolicy {
    /// Only the revealed cell is guaranteed mine-free.
    #[default]
    SafeCell,
    /// The revealed cell and its neighbours are mine-free, so the first reveal opens an area.
    ZeroCell,
}

/// Places `mines` uniformly over every cell not reserved for the first move.
///
/// The start cell is always reserved. When the board is too crowded for [`FirstMovePolicy::ZeroCell`]
/// the policy degrades to [`FirstMovePolicy::SafeCell`].
pub fn place_mines(
    size: Coord2,
    mines: CellCount,
    start: Coord2,
    policy: FirstMovePolicy,
    seed: u64,
) -> Array2<bool> {
    let mut reserved: Array2<bool> = Array2::default(size.to_nd_index());
    reserved[start.to_nd_index()] = true;

    let total_cells = mult(size.0, size.1);
    let policy = match policy {
        FirstMovePolicy::ZeroCell if mines + 9 > total_cells => {
            log::warn!("Cannot keep the first cell at zero, falling back to a safe cell");
            FirstMovePolicy::SafeCell
        }
        policy => policy,
    };
    if policy == FirstMovePolicy::ZeroCell {
        for pos in reserved.iter_neighbors(start) {
            reserved[pos.to_nd_index()] = true;
        }
    }

    let mut free: Vec<Coord2> = (0..size.0)
        .flat_map(|row| (0..size.1).map(move |col| (row, col)))
        .filter(|&pos| !reserved[pos.to_nd_index()])
        .collect();

    let wanted = usize::from(mines);
    if wanted > free.len() {
        log::warn!(
            "Requested {} mines but only {} cells are free, placing fewer",
            wanted,
            free.len()
        );
    }
    let count = wanted.min(free.len());

    let mut rng = SmallRng::seed_from_u64(seed);
    let (chosen, _) = free.partial_shuffle(&mut rng, count);

    let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
    for &pos in chosen.iter() {
        mine_mask[pos.to_nd_index()] = true;
    }
    log::debug!("Placed {} mines around start {:?} ({:?})", count, start, policy);
    mine_mask
}

/// Number of mines in the 8-neighbourhood of `coords`.
pub fn count_adjacent(mine_mask: &Array2<bool>, coords: Coord2) -> u8 {
    mine_mask
        .iter_neighbors(coords)
        .filter(|&pos| mine_mask[pos.to_nd_index()])
        .count() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_cell_is_never_a_mine() {
        for seed in 0..200 {
            let start = ((seed % 9) as Coord, (seed * 7 % 9) as Coord);
            let mask = place_mines((9, 9), 10, start, FirstMovePolicy::SafeCell, seed);
            assert!(!mask[start.to_nd_index()], "seed {seed}");
            assert_eq!(mask.iter().filter(|&&m| m).count(), 10);
        }
    }

    #[test]
    fn zero_policy_clears_neighbourhood() {
        for seed in 0..100 {
            let mask = place_mines((9, 9), 10, (4, 4), FirstMovePolicy::ZeroCell, seed);
            assert_eq!(count_adjacent(&mask, (4, 4)), 0);
            assert!(!mask[[4, 4]]);
        }
    }

    #[test]
    fn crowded_board_falls_back_to_safe_cell() {
        let mask = place_mines((3, 3), 8, (1, 1), FirstMovePolicy::ZeroCell, 7);
        assert!(!mask[[1, 1]]);
        assert_eq!(mask.iter().filter(|&&m| m).count(), 8);
    }

    #[test]
    fn same_seed_same_layout() {
        let a = place_mines((16, 16), 40, (0, 0), FirstMovePolicy::SafeCell, 42);
        let b = place_mines((16, 16), 40, (0, 0), FirstMovePolicy::SafeCell, 42);
        assert_eq!(a, b);
    }
}
