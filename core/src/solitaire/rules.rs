use super::card::*;

/// Ace on an empty foundation, or the next rank of the foundation's suit.
pub fn can_place_on_foundation(card: &Card, foundation: &[Card]) -> bool {
    match foundation.last() {
        None => card.rank() == ACE,
        Some(top) => card.suit() == top.suit() && card.rank() == top.rank() + 1,
    }
}

/// King on an empty column, or one rank below and the other colour of a face-up top card.
pub fn can_place_on_tableau(first: &Card, column: &[Card]) -> bool {
    match column.last() {
        None => first.rank() == KING,
        Some(top) => {
            top.face_up && top.color() != first.color() && first.rank() + 1 == top.rank()
        }
    }
}

/// A run can be dragged as a unit when colours alternate and ranks descend by one.
pub fn is_valid_sequence(cards: &[Card]) -> bool {
    !cards.is_empty()
        && cards
            .windows(2)
            .all(|pair| pair[0].color() != pair[1].color() && pair[1].rank() + 1 == pair[0].rank())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank).turned_up()
    }

    #[test]
    fn foundation_accepts_only_ace_or_same_suit_successor() {
        for suit in Suit::ALL {
            for rank in ACE..=KING {
                let card = up(suit, rank);
                assert_eq!(can_place_on_foundation(&card, &[]), rank == ACE);

                for top_suit in Suit::ALL {
                    for top_rank in ACE..=KING {
                        let pile = [up(top_suit, top_rank)];
                        let expected = suit == top_suit && rank == top_rank + 1;
                        assert_eq!(
                            can_place_on_foundation(&card, &pile),
                            expected,
                            "{:?} on {:?}",
                            card,
                            pile[0]
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn tableau_rules() {
        assert!(can_place_on_tableau(&up(Suit::Spades, KING), &[]));
        assert!(!can_place_on_tableau(&up(Suit::Spades, 12), &[]));
        assert!(can_place_on_tableau(&up(Suit::Hearts, 6), &[up(Suit::Clubs, 7)]));
        assert!(!can_place_on_tableau(&up(Suit::Diamonds, 6), &[up(Suit::Hearts, 7)]));
        assert!(!can_place_on_tableau(&up(Suit::Hearts, 5), &[up(Suit::Clubs, 7)]));
        assert!(!can_place_on_tableau(
            &up(Suit::Hearts, 6),
            &[Card::new(Suit::Clubs, 7)]
        ));
    }

    #[test]
    fn sequences() {
        let run = [up(Suit::Spades, 9), up(Suit::Hearts, 8), up(Suit::Clubs, 7)];
        assert!(is_valid_sequence(&run));
        assert!(is_valid_sequence(&run[2..]));
        assert!(!is_valid_sequence(&[]));

        let same_color = [up(Suit::Spades, 9), up(Suit::Clubs, 8)];
        assert!(!is_valid_sequence(&same_color));

        let gap = [up(Suit::Spades, 9), up(Suit::Hearts, 7)];
        assert!(!is_valid_sequence(&gap));

        let ascending = [up(Suit::Hearts, 7), up(Suit::Spades, 8)];
        assert!(!is_valid_sequence(&ascending));
    }
}
