use rand::RngCore;
use rand::seq::SliceRandom;

use crate::model::bid::Bid;
use crate::model::hand::Hand;
use crate::strategy::{Strategy, cards_of_rank, forced_to_cheat};

/// Plays by the book. Honest whenever an honest play exists, a single random
/// card claimed at the successor rank when forced, and a challenge only on
/// certain proof.
#[derive(Debug, Default)]
pub struct BasicStrategy;

impl BasicStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for BasicStrategy {
    fn decide_cheat(&mut self, previous: &Bid, hand: &Hand, _rng: &mut dyn RngCore) -> bool {
        forced_to_cheat(previous, hand)
    }

    fn choose_bid(
        &mut self,
        previous: &Bid,
        hand: &Hand,
        cheating: bool,
        rng: &mut dyn RngCore,
    ) -> Bid {
        let next_rank = previous.rank().next();
        if cheating {
            let mut bid_hand = Hand::new();
            if let Some(&card) = hand.cards().choose(rng) {
                bid_hand.add(card);
            }
            return Bid::new(bid_hand, next_rank);
        }

        let matching = cards_of_rank(hand, previous.rank());
        if !matching.is_empty() {
            return Bid::new(matching, previous.rank());
        }
        Bid::new(cards_of_rank(hand, next_rank), next_rank)
    }

    fn decide_challenge(&mut self, hand: &Hand, current: &Bid, _rng: &mut dyn RngCore) -> bool {
        let certain = hand.count_rank(current.rank()) == 4;
        if certain {
            tracing::debug!(rank = %current.rank(), "holding all four, calling cheat");
        }
        certain
    }
}
