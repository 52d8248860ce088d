//! Klondike solitaire, draw three, with a bounded undo history.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::*;

pub use card::*;
pub use history::*;
pub use rules::*;

mod card;
mod history;
mod rules;

pub const FOUNDATIONS: usize = 4;
pub const COLUMNS: usize = 7;
pub const DRAW_COUNT: usize = 3;
pub const UNDO_LIMIT: usize = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PileId {
    Stock,
    Waste,
    Foundation(u8),
    Tableau(u8),
}

impl PileId {
    pub fn foundations() -> impl Iterator<Item = PileId> {
        (0..FOUNDATIONS as u8).map(PileId::Foundation)
    }

    pub fn tableau() -> impl Iterator<Item = PileId> {
        (0..COLUMNS as u8).map(PileId::Tableau)
    }
}

/// Every card on the table. Undo snapshots are whole `Piles` values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piles {
    pub stock: Vec<Card>,
    pub waste: Vec<Card>,
    pub foundations: [Vec<Card>; FOUNDATIONS],
    pub tableau: [Vec<Card>; COLUMNS],
    pub move_count: u32,
}

impl Piles {
    /// Shuffles a deck and deals column `i` with `i + 1` cards, only the last one face up.
    pub fn deal(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut deck = fresh_deck();
        deck.shuffle(&mut rng);

        let mut piles = Piles::default();
        for (i, column) in piles.tableau.iter_mut().enumerate() {
            column.extend(deck.drain(..=i));
            if let Some(top) = column.last_mut() {
                top.face_up = true;
            }
        }
        piles.stock = deck;
        piles
    }

    pub fn get(&self, id: PileId) -> Option<&[Card]> {
        match id {
            PileId::Stock => Some(&self.stock),
            PileId::Waste => Some(&self.waste),
            PileId::Foundation(i) => self.foundations.get(i as usize).map(Vec::as_slice),
            PileId::Tableau(i) => self.tableau.get(i as usize).map(Vec::as_slice),
        }
    }

    fn get_mut(&mut self, id: PileId) -> Option<&mut Vec<Card>> {
        match id {
            PileId::Stock => Some(&mut self.stock),
            PileId::Waste => Some(&mut self.waste),
            PileId::Foundation(i) => self.foundations.get_mut(i as usize),
            PileId::Tableau(i) => self.tableau.get_mut(i as usize),
        }
    }

    pub fn foundation_cards(&self) -> usize {
        self.foundations.iter().map(Vec::len).sum()
    }

    pub fn card_count(&self) -> usize {
        self.stock.len()
            + self.waste.len()
            + self.foundation_cards()
            + self.tableau.iter().map(Vec::len).sum::<usize>()
    }

    pub fn all_cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.stock
            .iter()
            .chain(&self.waste)
            .chain(self.foundations.iter().flatten())
            .chain(self.tableau.iter().flatten())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Playing,
    Won,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Stock and waste are both empty.
    NoChange,
    Drawn(usize),
    Recycled,
}

impl DrawOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    NoChange,
    Moved,
    Won,
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Result of a click on a card.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AutoMove {
    /// The card went to this foundation.
    Moved(PileId),
    /// No foundation takes it, the host should start a manual drag.
    Drag,
}

#[derive(Clone, Debug)]
pub struct Solitaire {
    piles: Piles,
    history: History<Piles>,
    status: Status,
}

impl Solitaire {
    pub fn new(seed: u64) -> Self {
        Self::from_piles(Piles::deal(seed))
    }

    /// Game over an arbitrary layout, for saved games and fixed scenarios.
    pub fn from_piles(piles: Piles) -> Self {
        let mut game = Self {
            piles,
            history: History::new(UNDO_LIMIT),
            status: Status::Playing,
        };
        game.update_status();
        game
    }

    pub fn new_game(&mut self, seed: u64) {
        log::debug!("New solitaire deal, seed {}", seed);
        self.piles = Piles::deal(seed);
        self.history.clear();
        self.update_status();
    }

    pub fn piles(&self) -> &Piles {
        &self.piles
    }

    pub fn pile(&self, id: PileId) -> &[Card] {
        self.piles.get(id).unwrap_or(&[])
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_won(&self) -> bool {
        self.status == Status::Won
    }

    pub fn move_count(&self) -> u32 {
        self.piles.move_count
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Pile and index of a card.
    pub fn locate(&self, card_id: CardId) -> Option<(PileId, usize)> {
        [PileId::Stock, PileId::Waste]
            .into_iter()
            .chain(PileId::foundations())
            .chain(PileId::tableau())
            .find_map(|id| {
                self.pile(id)
                    .iter()
                    .position(|card| card.id() == card_id)
                    .map(|index| (id, index))
            })
    }

    pub fn draw_from_stock(&mut self) -> Result<DrawOutcome> {
        self.check_playing()?;
        if self.piles.stock.is_empty() && self.piles.waste.is_empty() {
            return Ok(DrawOutcome::NoChange);
        }
        self.snapshot();
        self.piles.move_count += 1;

        if self.piles.stock.is_empty() {
            let waste = std::mem::take(&mut self.piles.waste);
            self.piles.stock = waste
                .into_iter()
                .rev()
                .map(|mut card| {
                    card.face_up = false;
                    card
                })
                .collect();
            log::debug!("Recycled waste into stock, {} cards", self.piles.stock.len());
            return Ok(DrawOutcome::Recycled);
        }

        let count = DRAW_COUNT.min(self.piles.stock.len());
        for _ in 0..count {
            if let Some(card) = self.piles.stock.pop() {
                self.piles.waste.push(card.turned_up());
            }
        }
        Ok(DrawOutcome::Drawn(count))
    }

    /// Moves `card_id` and everything above it from `source` onto `destination`.
    pub fn try_move(
        &mut self,
        card_id: CardId,
        source: PileId,
        destination: PileId,
    ) -> Result<MoveOutcome> {
        self.check_playing()?;
        let index = self.check_move(card_id, source, destination)?;
        if source == destination {
            return Ok(MoveOutcome::NoChange);
        }

        let moved = self.pile(source)[index].id();
        self.snapshot();
        self.transfer(source, index, destination)?;
        log::trace!("Moved card {} from {:?} to {:?}", moved, source, destination);
        Ok(self.after_move())
    }

    /// Plays a waste or tableau top card to the first foundation that accepts it.
    pub fn try_auto_move(&mut self, card_id: CardId, source: PileId) -> Result<AutoMove> {
        self.check_playing()?;
        let pile = self.piles.get(source).ok_or(GameError::InvalidCoords)?;
        let index = pile
            .iter()
            .position(|card| card.id() == card_id)
            .ok_or(GameError::IllegalMove)?;
        let card = pile[index];
        if source == PileId::Stock || !card.face_up {
            return Err(GameError::IllegalMove);
        }

        let is_top = index + 1 == pile.len();
        let auto_source = matches!(source, PileId::Waste | PileId::Tableau(_));
        if is_top && auto_source {
            if let Some(foundation) = self.foundation_for(&card) {
                self.try_move(card_id, source, foundation)?;
                return Ok(AutoMove::Moved(foundation));
            }
        }
        Ok(AutoMove::Drag)
    }

    pub fn undo(&mut self) -> Result<bool> {
        self.check_playing()?;
        match self.history.pop() {
            Some(piles) => {
                self.piles = piles;
                self.update_status();
                log::trace!("Undo, {} steps left", self.history.len());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Nothing is hidden any more: stock and waste are empty and every tableau card is face up.
    pub fn can_auto_complete(&self) -> bool {
        self.status == Status::Playing
            && self.piles.stock.is_empty()
            && self.piles.waste.is_empty()
            && self.piles.tableau.iter().flatten().all(|card| card.face_up)
    }

    /// Plays every tableau card to the foundations, one undo step for the whole run.
    pub fn auto_complete(&mut self) -> Result<MoveOutcome> {
        self.check_playing()?;
        if !self.can_auto_complete() {
            return Err(GameError::IllegalMove);
        }
        self.snapshot();

        let mut moved = false;
        loop {
            let next = PileId::tableau().find_map(|column| {
                let card = *self.pile(column).last()?;
                let foundation = self.foundation_for(&card)?;
                Some((column, foundation))
            });
            let Some((column, foundation)) = next else {
                break;
            };
            let index = self.pile(column).len() - 1;
            self.transfer(column, index, foundation)?;
            moved = true;
        }

        if !moved {
            self.history.pop();
            return Ok(MoveOutcome::NoChange);
        }
        log::debug!("Auto-completed solitaire");
        Ok(self.after_move())
    }

    fn foundation_for(&self, card: &Card) -> Option<PileId> {
        PileId::foundations().find(|&id| can_place_on_foundation(card, self.pile(id)))
    }

    /// Validates a move and returns the index where the moving run starts.
    fn check_move(&self, card_id: CardId, source: PileId, destination: PileId) -> Result<usize> {
        let pile = self.piles.get(source).ok_or(GameError::InvalidCoords)?;
        let target = self.piles.get(destination).ok_or(GameError::InvalidCoords)?;
        let mut index = pile
            .iter()
            .position(|card| card.id() == card_id)
            .ok_or(GameError::IllegalMove)?;
        if !pile[index].face_up {
            return Err(GameError::IllegalMove);
        }
        // a broken run falls back to moving just the top card
        if !is_valid_sequence(&pile[index..]) {
            index = pile.len() - 1;
        }
        let run = &pile[index..];

        match source {
            PileId::Stock => return Err(GameError::IllegalMove),
            PileId::Waste | PileId::Foundation(_) if run.len() != 1 => {
                return Err(GameError::IllegalMove)
            }
            _ => {}
        }
        if !run[0].face_up {
            return Err(GameError::IllegalMove);
        }
        if source == destination {
            return Ok(index);
        }

        let accepted = match destination {
            PileId::Stock | PileId::Waste => false,
            PileId::Foundation(_) => run.len() == 1 && can_place_on_foundation(&run[0], target),
            PileId::Tableau(_) => can_place_on_tableau(&run[0], target),
        };
        if accepted {
            Ok(index)
        } else {
            Err(GameError::IllegalMove)
        }
    }

    fn transfer(&mut self, source: PileId, index: usize, destination: PileId) -> Result<()> {
        let run = {
            let pile = self
                .piles
                .get_mut(source)
                .ok_or(GameError::InvalidCoords)?;
            let run = pile.split_off(index);
            if matches!(source, PileId::Tableau(_)) {
                if let Some(top) = pile.last_mut() {
                    top.face_up = true;
                }
            }
            run
        };
        self.piles
            .get_mut(destination)
            .ok_or(GameError::InvalidCoords)?
            .extend(run);
        self.piles.move_count += 1;
        Ok(())
    }

    fn after_move(&mut self) -> MoveOutcome {
        self.update_status();
        if self.is_won() {
            log::debug!("Solitaire won in {} moves", self.piles.move_count);
            MoveOutcome::Won
        } else {
            MoveOutcome::Moved
        }
    }

    fn snapshot(&mut self) {
        self.history.push(self.piles.clone());
    }

    fn update_status(&mut self) {
        self.status = if self.piles.foundation_cards() == DECK_SIZE {
            Status::Won
        } else {
            Status::Playing
        };
    }

    fn check_playing(&self) -> Result<()> {
        match self.status {
            Status::Playing => Ok(()),
            Status::Won => Err(GameError::AlreadyEnded),
        }
    }
}

impl StatusText for Solitaire {
    fn status_key(&self) -> &'static str {
        match self.status {
            Status::Playing => "solitaire.status.playing",
            Status::Won => "solitaire.status.won",
        }
    }
}
