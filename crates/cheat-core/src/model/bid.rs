use core::fmt;

use serde::{Deserialize, Serialize};

use crate::model::hand::Hand;
use crate::model::rank::Rank;

/// A face-down play: the cards actually put on the pile and the rank the
/// bidder claims every one of them holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    hand: Hand,
    rank: Rank,
}

impl Bid {
    pub fn new(hand: Hand, rank: Rank) -> Self {
        Self { hand, rank }
    }

    /// The open bid starting a fresh pile: no cards yet, only a rank for the
    /// next bidder to match or follow.
    pub fn empty(rank: Rank) -> Self {
        Self::new(Hand::new(), rank)
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn count(&self) -> usize {
        self.hand.len()
    }

    /// True iff any played card fails the claim. An empty bid has nothing to
    /// lie about.
    pub fn is_cheat(&self) -> bool {
        self.hand.iter().any(|card| card.rank != self.rank)
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.count(), self.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::Bid;
    use crate::model::card::Card;
    use crate::model::hand::Hand;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn matching_cards_are_honest() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Jack, Suit::Spades),
            Card::new(Rank::Jack, Suit::Hearts),
        ]);
        let bid = Bid::new(hand, Rank::Jack);
        assert!(!bid.is_cheat());
        assert_eq!(bid.count(), 2);
    }

    #[test]
    fn one_stray_card_makes_the_bid_a_cheat() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Jack, Suit::Spades),
            Card::new(Rank::Queen, Suit::Hearts),
        ]);
        assert!(Bid::new(hand, Rank::Jack).is_cheat());
    }

    #[test]
    fn empty_bid_is_honest() {
        let bid = Bid::empty(Rank::Nine);
        assert!(!bid.is_cheat());
        assert_eq!(bid.count(), 0);
        assert_eq!(bid.rank(), Rank::Nine);
    }

    #[test]
    fn display_shows_count_and_claimed_rank() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Ten, Suit::Clubs),
            Card::new(Rank::Ten, Suit::Diamonds),
            Card::new(Rank::Ten, Suit::Spades),
        ]);
        assert_eq!(Bid::new(hand, Rank::Ten).to_string(), "3 x 10");
    }

    #[test]
    fn serde_round_trip_keeps_claim_and_cards() {
        let bid = Bid::new(
            Hand::with_cards(vec![Card::new(Rank::Ace, Suit::Clubs)]),
            Rank::King,
        );
        let encoded = serde_json::to_string(&bid).expect("encode");
        let decoded: Bid = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(bid, decoded);
        assert!(decoded.is_cheat());
    }
}
