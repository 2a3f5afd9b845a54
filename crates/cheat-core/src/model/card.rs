use core::fmt;

use serde::{Deserialize, Serialize};

use crate::model::rank::Rank;
use crate::model::suit::Suit;

/// Rank-major ordering: `Ord` sorts ascending by rank, then suit, so the
/// descending display order is just the reversed comparator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn value(self) -> u8 {
        self.rank.value()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, Rank, Suit};

    #[test]
    fn orders_by_rank_then_suit() {
        let low = Card::new(Rank::Two, Suit::Spades);
        let high = Card::new(Rank::Three, Suit::Clubs);
        assert!(low < high);

        let club = Card::new(Rank::Queen, Suit::Clubs);
        let spade = Card::new(Rank::Queen, Suit::Spades);
        assert!(club < spade);
    }

    #[test]
    fn equality_requires_both_fields() {
        let card = Card::new(Rank::Jack, Suit::Hearts);
        assert_eq!(card, Card::new(Rank::Jack, Suit::Hearts));
        assert_ne!(card, Card::new(Rank::Jack, Suit::Spades));
        assert_ne!(card, Card::new(Rank::Queen, Suit::Hearts));
    }

    #[test]
    fn value_comes_from_the_rank() {
        assert_eq!(Card::new(Rank::King, Suit::Clubs).value(), 10);
        assert_eq!(Card::new(Rank::Ace, Suit::Diamonds).value(), 11);
    }

    #[test]
    fn display_is_rank_then_suit() {
        assert_eq!(Card::new(Rank::Ten, Suit::Diamonds).to_string(), "10D");
        assert_eq!(Card::new(Rank::Ace, Suit::Spades).to_string(), "AS");
    }

    #[test]
    fn serde_round_trip_preserves_value() {
        let card = Card::new(Rank::Nine, Suit::Hearts);
        let encoded = serde_json::to_string(&card).expect("encode");
        let decoded: Card = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(card, decoded);
    }
}
