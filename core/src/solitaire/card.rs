use serde::{Deserialize, Serialize};

/// Stable identity of a card, `0..52`.
pub type CardId = u8;

pub const DECK_SIZE: usize = 52;
pub const KING: u8 = 13;
pub const ACE: u8 = 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub const fn color(self) -> Color {
        match self {
            Self::Diamonds | Self::Hearts => Color::Red,
            Self::Clubs | Self::Spades => Color::Black,
        }
    }

    pub const fn index(self) -> u8 {
        match self {
            Self::Clubs => 0,
            Self::Diamonds => 1,
            Self::Hearts => 2,
            Self::Spades => 3,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Clubs => "♣",
            Self::Diamonds => "♦",
            Self::Hearts => "♥",
            Self::Spades => "♠",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    suit: Suit,
    rank: u8,
    pub face_up: bool,
    id: CardId,
}

impl Card {
    /// Face-down card, `rank` runs from 1 (ace) to 13 (king).
    pub const fn new(suit: Suit, rank: u8) -> Self {
        Self {
            suit,
            rank,
            face_up: false,
            id: suit.index() * KING + (rank - 1),
        }
    }

    pub const fn suit(&self) -> Suit {
        self.suit
    }

    pub const fn rank(&self) -> u8 {
        self.rank
    }

    pub const fn id(&self) -> CardId {
        self.id
    }

    pub const fn color(&self) -> Color {
        self.suit.color()
    }

    pub const fn turned_up(mut self) -> Self {
        self.face_up = true;
        self
    }

    pub fn label(&self) -> String {
        let rank = match self.rank {
            1 => "A".to_owned(),
            11 => "J".to_owned(),
            12 => "Q".to_owned(),
            13 => "K".to_owned(),
            n => n.to_string(),
        };
        format!("{}{}", rank, self.suit.symbol())
    }
}

/// Ordered, face-down deck: clubs ace to king, then diamonds, hearts, spades.
pub fn fresh_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| (ACE..=KING).map(move |rank| Card::new(suit, rank)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn deck_has_unique_ids() {
        let ids: BTreeSet<CardId> = fresh_deck().iter().map(Card::id).collect();
        assert_eq!(ids.len(), DECK_SIZE);
        assert_eq!(ids.first(), Some(&0));
        assert_eq!(ids.last(), Some(&51));
    }

    #[test]
    fn labels() {
        assert_eq!(Card::new(Suit::Hearts, 1).label(), "A♥");
        assert_eq!(Card::new(Suit::Spades, 10).label(), "10♠");
        assert_eq!(Card::new(Suit::Clubs, 13).label(), "K♣");
    }
}
