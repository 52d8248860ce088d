use std::collections::{BTreeSet, VecDeque};

use ndarray::Array2;

use super::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minesweeper {
    difficulty: Difficulty,
    policy: FirstMovePolicy,
    seed: u64,
    board: Array2<Cell>,
    mines_placed: bool,
    hidden_safe: CellCount,
    flags_left: CellCount,
    status: Status,
    triggered_mine: Option<Coord2>,
}

impl Minesweeper {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_policy(difficulty, FirstMovePolicy::default(), seed)
    }

    pub fn with_policy(difficulty: Difficulty, policy: FirstMovePolicy, seed: u64) -> Self {
        let difficulty = Difficulty::new(difficulty.size, difficulty.mines);
        Self {
            difficulty,
            policy,
            seed,
            board: Array2::default(difficulty.size.to_nd_index()),
            mines_placed: false,
            hidden_safe: difficulty.total_cells() - difficulty.mines,
            flags_left: difficulty.mines,
            status: Status::Ready,
            triggered_mine: None,
        }
    }

    /// Board with a fixed layout, mines are considered placed already. The first reveal still
    /// starts the game but does not move any mine.
    pub fn from_mine_coords(size: Coord2, mines: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &pos in mines {
            if !in_bounds(pos, size) {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[pos.to_nd_index()] = true;
        }
        let mine_count = mine_mask.iter().filter(|&&m| m).count() as CellCount;
        let mut game = Self::with_policy(
            Difficulty::new_unchecked(size, mine_count),
            FirstMovePolicy::SafeCell,
            0,
        );
        game.apply_layout(&mine_mask);
        Ok(game)
    }

    /// Starts over with a fresh, unplaced board.
    pub fn new_game(&mut self, difficulty: Difficulty, seed: u64) {
        log::debug!("New minesweeper game {:?}", difficulty);
        *self = Self::with_policy(difficulty, self.policy, seed);
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Dimensions of the live board, which is what all bound checks use.
    pub fn size(&self) -> Coord2 {
        grid_size(&self.board)
    }

    pub fn mine_count(&self) -> CellCount {
        self.difficulty.mines
    }

    pub fn flags_left(&self) -> CellCount {
        self.flags_left
    }

    pub fn hidden_safe_count(&self) -> CellCount {
        self.hidden_safe
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords.to_nd_index()]
    }

    pub fn get(&self, coords: Coord2) -> Option<Cell> {
        in_bounds(coords, self.size()).then(|| self.cell_at(coords))
    }

    pub fn can_chord_reveal_at(&self, coords: Coord2) -> bool {
        if self.status != Status::Playing {
            return false;
        }
        match self.get(coords) {
            Some(cell) if cell.state() == CellState::Revealed && cell.neighbor_mines() > 0 => {
                cell.neighbor_mines() == self.count_flagged_neighbors(coords)
            }
            _ => false,
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_not_finished()?;

        if !self.cell_at(coords).is_hidden() {
            return Ok(RevealOutcome::NoChange);
        }

        if !self.mines_placed {
            let mine_mask = place_mines(
                self.size(),
                self.difficulty.mines,
                coords,
                self.policy,
                self.seed,
            );
            self.apply_layout(&mine_mask);
        }

        Ok(self.reveal_single_cell(coords))
    }

    /// Reveals every hidden neighbour of a satisfied number cell, otherwise acts like [`Self::reveal`].
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_not_finished()?;

        if !self.can_chord_reveal_at(coords) {
            return self.reveal(coords);
        }

        let neighbors: Vec<Coord2> = self.board.iter_neighbors(coords).collect();
        Ok(neighbors
            .into_iter()
            .map(|pos| {
                if self.status.is_finished() {
                    RevealOutcome::NoChange
                } else {
                    self.reveal_single_cell(pos)
                }
            })
            .fold(RevealOutcome::NoChange, BitOr::bitor))
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_playing()?;

        let cell = &mut self.board[coords.to_nd_index()];
        Ok(match cell.state() {
            CellState::Hidden if self.flags_left == 0 => FlagOutcome::NoChange,
            CellState::Hidden => {
                cell.set_state(CellState::Flagged);
                self.flags_left -= 1;
                FlagOutcome::Changed
            }
            CellState::Flagged => {
                cell.set_state(CellState::Hidden);
                self.flags_left = (self.flags_left + 1).min(self.difficulty.mines);
                FlagOutcome::Changed
            }
            CellState::Revealed => FlagOutcome::NoChange,
        })
    }

    fn apply_layout(&mut self, mine_mask: &Array2<bool>) {
        self.board = Array2::from_shape_fn(mine_mask.dim(), |(row, col)| {
            let pos = (row as Coord, col as Coord);
            Cell::new(mine_mask[[row, col]], count_adjacent(mine_mask, pos))
        });
        let mines = mine_mask.iter().filter(|&&m| m).count() as CellCount;
        self.difficulty = Difficulty::new_unchecked(self.size(), mines);
        self.hidden_safe = self.difficulty.total_cells() - mines;
        self.flags_left = mines;
        self.mines_placed = true;
    }

    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self.cell_at(coords);
        if !cell.is_hidden() {
            return RevealOutcome::NoChange;
        }

        if cell.is_mine() {
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return RevealOutcome::HitMine;
        }

        self.open(coords);
        if cell.neighbor_mines() == 0 {
            self.flood_fill(coords);
        }

        if self.hidden_safe == 0 {
            self.end_game(true);
            RevealOutcome::Won
        } else {
            self.mark_started();
            RevealOutcome::Revealed
        }
    }

    /// Breadth-first expansion through zero cells. Flagged cells stop the fill.
    fn flood_fill(&mut self, origin: Coord2) {
        let mut visited = BTreeSet::from([origin]);
        let mut to_visit: VecDeque<Coord2> = self.board.iter_neighbors(origin).collect();

        while let Some(pos) = to_visit.pop_front() {
            if !visited.insert(pos) {
                continue;
            }

            let cell = self.cell_at(pos);
            if !cell.is_hidden() || cell.is_mine() {
                continue;
            }

            self.open(pos);
            log::trace!("Flood opened {:?} ({})", pos, cell.neighbor_mines());

            if cell.neighbor_mines() == 0 {
                to_visit.extend(
                    self.board
                        .iter_neighbors(pos)
                        .filter(|next| !visited.contains(next)),
                );
            }
        }
    }

    fn open(&mut self, coords: Coord2) {
        self.board[coords.to_nd_index()].set_state(CellState::Revealed);
        self.hidden_safe -= 1;
    }

    fn mark_started(&mut self) {
        if self.status == Status::Ready {
            log::debug!("Minesweeper started");
            self.status = Status::Playing;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.status.is_finished() {
            return;
        }

        if won {
            log::debug!("Minesweeper won");
            self.status = Status::Won;
            self.triggered_mine = None;
        } else {
            log::debug!("Minesweeper lost at {:?}", self.triggered_mine);
            self.status = Status::Lost;
            for cell in self.board.iter_mut() {
                if cell.is_mine() && cell.is_hidden() {
                    cell.set_state(CellState::Revealed);
                }
            }
        }
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.board
            .iter_neighbors(coords)
            .filter(|&pos| self.cell_at(pos).state() == CellState::Flagged)
            .count() as u8
    }

    fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    fn check_playing(&self) -> Result<()> {
        match self.status {
            Status::Playing => Ok(()),
            Status::Ready => Err(GameError::NotStarted),
            Status::Won | Status::Lost => Err(GameError::AlreadyEnded),
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

impl StatusText for Minesweeper {
    fn status_key(&self) -> &'static str {
        match self.status {
            Status::Ready => "minesweeper.status.ready",
            Status::Playing => "minesweeper.status.playing",
            Status::Won => "minesweeper.status.won",
            Status::Lost => "minesweeper.status.lost",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: Coord2, mines: &[Coord2]) -> Minesweeper {
        Minesweeper::from_mine_coords(size, mines).unwrap()
    }

    fn count_hidden_safe(game: &Minesweeper) -> CellCount {
        game.board
            .iter()
            .filter(|cell| !cell.is_mine() && cell.state() != CellState::Revealed)
            .count() as CellCount
    }

    #[test]
    fn new_game_is_ready_and_untouched() {
        let game = Minesweeper::new(Difficulty::BEGINNER, 1);
        assert_eq!(game.status(), Status::Ready);
        assert!(!game.mines_placed());
        assert_eq!(game.flags_left(), 10);
        assert_eq!(game.size(), (9, 9));
    }

    #[test]
    fn first_reveal_is_never_a_mine() {
        for seed in 0..150 {
            let mut game = Minesweeper::new(Difficulty::BEGINNER, seed);
            let start = ((seed % 9) as Coord, (seed / 9 % 9) as Coord);
            let outcome = game.reveal(start).unwrap();
            assert_ne!(outcome, RevealOutcome::HitMine, "seed {seed}");
            assert!(!game.cell_at(start).is_mine());
            assert!(game.mines_placed());
        }
    }

    #[test]
    fn neighbor_counts_match_actual_mines() {
        for seed in 0..20 {
            let mut game = Minesweeper::new(Difficulty::INTERMEDIATE, seed);
            game.reveal((0, 0)).unwrap();
            let (rows, cols) = game.size();
            for row in 0..rows {
                for col in 0..cols {
                    let cell = game.cell_at((row, col));
                    if cell.is_mine() {
                        continue;
                    }
                    let actual = game
                        .board
                        .iter_neighbors((row, col))
                        .filter(|&pos| game.cell_at(pos).is_mine())
                        .count() as u8;
                    assert_eq!(cell.neighbor_mines(), actual);
                }
            }
        }
    }

    #[test]
    fn reveal_hits_mine_reveals_all_mines() {
        let mut game = layout((3, 3), &[(0, 0), (2, 2)]);
        game.reveal((0, 2)).unwrap();

        let outcome = game.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(game.status(), Status::Lost);
        assert_eq!(game.triggered_mine(), Some((0, 0)));
        assert_eq!(game.cell_at((2, 2)).state(), CellState::Revealed);
    }

    #[test]
    fn flood_fill_opens_zero_region_and_wins() {
        let mut game = layout((3, 3), &[(2, 2)]);

        let outcome = game.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(game.cell_at((1, 1)).state(), CellState::Revealed);
        assert_eq!(game.cell_at((1, 1)).neighbor_mines(), 1);
        assert_eq!(game.cell_at((2, 2)).state(), CellState::Hidden);
        assert_eq!(game.hidden_safe_count(), 0);
    }

    #[test]
    fn flood_fill_stops_at_flags() {
        let mut game = layout((1, 5), &[(0, 4)]);
        game.reveal((0, 3)).unwrap();
        game.toggle_flag((0, 1)).unwrap();

        game.reveal((0, 0)).unwrap();

        assert_eq!(game.cell_at((0, 1)).state(), CellState::Flagged);
        assert_eq!(game.cell_at((0, 2)).state(), CellState::Hidden);
        assert_eq!(game.status(), Status::Playing);
    }

    #[test]
    fn flagging_before_first_reveal_is_rejected() {
        let mut game = Minesweeper::new(Difficulty::BEGINNER, 3);
        assert_eq!(game.toggle_flag((0, 0)), Err(GameError::NotStarted));
        assert_eq!(game.flags_left(), 10);
    }

    #[test]
    fn flag_count_stays_in_range() {
        let mut game = layout((1, 6), &[(0, 5)]);
        game.reveal((0, 4)).unwrap();
        assert_eq!(game.flags_left(), 1);

        assert_eq!(game.toggle_flag((0, 0)).unwrap(), FlagOutcome::Changed);
        assert_eq!(game.flags_left(), 0);
        assert_eq!(game.toggle_flag((0, 1)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(game.flags_left(), 0);

        assert_eq!(game.toggle_flag((0, 0)).unwrap(), FlagOutcome::Changed);
        assert_eq!(game.flags_left(), 1);
        assert_eq!(game.toggle_flag((0, 4)).unwrap(), FlagOutcome::NoChange);
    }

    #[test]
    fn won_iff_no_hidden_safe_cells() {
        for seed in 0..30 {
            let mut game = Minesweeper::new(Difficulty::BEGINNER, seed);
            let (rows, cols) = game.size();
            'outer: for row in 0..rows {
                for col in 0..cols {
                    if game.is_finished() {
                        break 'outer;
                    }
                    if game.mines_placed() && game.cell_at((row, col)).is_mine() {
                        continue;
                    }
                    game.reveal((row, col)).unwrap();
                    assert_eq!(game.hidden_safe_count(), count_hidden_safe(&game));
                    assert_eq!(
                        game.status() == Status::Won,
                        game.hidden_safe_count() == 0
                    );
                }
            }
            assert_eq!(game.status(), Status::Won);
        }
    }

    #[test]
    fn moves_after_end_are_rejected() {
        let mut game = layout((2, 1), &[(0, 0)]);
        assert_eq!(game.reveal((1, 0)).unwrap(), RevealOutcome::Won);
        let before = game.clone();

        assert_eq!(game.reveal((0, 0)), Err(GameError::AlreadyEnded));
        assert_eq!(game.toggle_flag((0, 0)), Err(GameError::AlreadyEnded));
        assert_eq!(game, before);
    }

    #[test]
    fn out_of_range_coords_use_live_board_size() {
        let mut game = Minesweeper::new(Difficulty::BEGINNER, 5);
        assert_eq!(game.reveal((9, 0)), Err(GameError::InvalidCoords));

        game.new_game(Difficulty::EXPERT, 5);
        assert!(game.reveal((19, 19)).is_ok());
        assert_eq!(game.reveal((20, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn chord_reveal_uses_flagged_neighbors() {
        let mut game = layout((3, 3), &[(1, 0), (1, 2)]);
        game.reveal((1, 1)).unwrap();
        game.toggle_flag((1, 0)).unwrap();
        game.toggle_flag((1, 2)).unwrap();

        let outcome = game.chord_reveal((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(game.cell_at((0, 1)).state(), CellState::Revealed);
        assert_eq!(game.cell_at((2, 1)).state(), CellState::Revealed);
    }

    #[test]
    fn status_key_tracks_state() {
        let mut game = layout((2, 1), &[(0, 0)]);
        assert_eq!(game.status_key(), "minesweeper.status.ready");
        game.reveal((1, 0)).unwrap();
        assert_eq!(game.status_key(), "minesweeper.status.won");
    }
}
