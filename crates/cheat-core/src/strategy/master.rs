use rand::{Rng, RngCore};

use crate::model::bid::Bid;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::strategy::{Strategy, cards_of_rank, forced_to_cheat, purge_stale_memory};

/// The sharpest seat at the table. Tracks its own discards and the bids the
/// other seats have made, bluffs more as the pile grows, and blends several
/// signals into its challenge call. One call in twenty it sneaks a look at
/// the top card of the bid instead.
#[derive(Debug, Default)]
pub struct MasterStrategy {
    own_discards: Hand,
    other_discards: Hand,
}

impl MasterStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards this strategy has bid into the pile itself.
    pub fn own_discards(&self) -> &Hand {
        &self.own_discards
    }

    /// Cards remembered from other seats' bids.
    pub fn other_discards(&self) -> &Hand {
        &self.other_discards
    }

    fn honest_bid(&self, previous: &Bid, hand: &Hand) -> Bid {
        let matching = cards_of_rank(hand, previous.rank());
        let next_rank = previous.rank().next();
        let next_matching = cards_of_rank(hand, next_rank);
        if matching.len() >= next_matching.len() {
            Bid::new(matching, previous.rank())
        } else {
            Bid::new(next_matching, next_rank)
        }
    }

    fn bluff_bid(&self, previous: &Bid, hand: &Hand, rng: &mut dyn RngCore) -> Bid {
        let mut bid_hand = Hand::new();
        if self.own_discards.is_empty() {
            // Nothing to reason from yet; lean toward the middle of the
            // ascending hand with two averaged dice.
            let mut pool = hand.clone();
            pool.sort_ascending();
            if !pool.is_empty() {
                let die1 = rng.gen_range(0..pool.len());
                let die2 = rng.gen_range(0..pool.len());
                if let Some(card) = pool.sorted_at((die1 + die2) / 2) {
                    bid_hand.add(card);
                }
            }
        } else if let Some(card) = self.informed_pick(hand) {
            bid_hand.add(card);
        }
        // A bluff always claims the successor rank, never the table rank.
        Bid::new(bid_hand, previous.rank().next())
    }

    /// Picks the hand card whose rank this strategy has already discarded
    /// the most copies of; those ranks are the hardest for rivals to track.
    fn informed_pick(&self, hand: &Hand) -> Option<Card> {
        let mut discarded = [0usize; 13];
        for &card in self.own_discards.iter() {
            discarded[card.rank.index()] += 1;
        }
        let mut level = discarded.iter().copied().max().unwrap_or(0);
        loop {
            for &card in hand.iter() {
                if discarded[card.rank.index()] == level {
                    return Some(card);
                }
            }
            if level == 0 {
                return None;
            }
            level -= 1;
        }
    }
}

impl Strategy for MasterStrategy {
    fn decide_cheat(&mut self, previous: &Bid, hand: &Hand, rng: &mut dyn RngCore) -> bool {
        if forced_to_cheat(previous, hand) {
            return true;
        }
        // Bluffing odds scale with how many cards are already accounted for.
        let known = (self.own_discards.len() + self.other_discards.len()) as f64;
        rng.r#gen::<f64>() < known / 65.0
    }

    fn choose_bid(
        &mut self,
        previous: &Bid,
        hand: &Hand,
        cheating: bool,
        rng: &mut dyn RngCore,
    ) -> Bid {
        let bid = if cheating {
            self.bluff_bid(previous, hand, rng)
        } else {
            self.honest_bid(previous, hand)
        };
        self.own_discards.add_hand(bid.hand());
        bid
    }

    fn decide_challenge(&mut self, hand: &Hand, current: &Bid, rng: &mut dyn RngCore) -> bool {
        purge_stale_memory(&mut self.own_discards, hand, current);
        purge_stale_memory(&mut self.other_discards, hand, current);

        if rng.gen_range(0..20) == 1 {
            if let Some(&card) = current.hand().cards().last() {
                return card.rank != current.rank();
            }
        }

        let seen = hand.count_rank(current.rank()) + self.own_discards.count_rank(current.rank());
        if seen >= 4 {
            return true;
        }

        let known = self.own_discards.len() as f64;
        let all_known = known + self.other_discards.len() as f64;
        // Averages the deck-coverage, bid-size, and game-progress signals.
        let card_probability = ((known + hand.len() as f64) / 52.0) * (seen as f64 / 6.0);
        let bid_probability = (1.0 - current.count() as f64 / 4.0) / 1.2;
        let end_probability = all_known / 52.0;
        let likelihood = (card_probability + bid_probability + end_probability) / 3.0;
        tracing::debug!(seen, likelihood, "weighing a challenge");

        self.other_discards.add_hand(current.hand());
        likelihood > 0.5
    }
}
