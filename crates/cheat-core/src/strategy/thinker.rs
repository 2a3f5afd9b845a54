use rand::{Rng, RngCore};

use crate::model::bid::Bid;
use crate::model::hand::Hand;
use crate::strategy::{Strategy, cards_of_rank, forced_to_cheat, purge_stale_memory};

/// Remembers every card it has bid into the pile and folds that memory into
/// its challenge odds. Bluffs one turn in four even when an honest play
/// exists, and sometimes holds copies back so its bid size leaks less.
#[derive(Debug, Default)]
pub struct ThinkerStrategy {
    discard_memory: Hand,
}

impl ThinkerStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards this strategy believes are buried in the pile.
    pub fn discard_memory(&self) -> &Hand {
        &self.discard_memory
    }

    fn honest_bid(&self, previous: &Bid, hand: &Hand, rng: &mut dyn RngCore) -> Bid {
        let matching = cards_of_rank(hand, previous.rank());
        let next_rank = previous.rank().next();
        let next_matching = cards_of_rank(hand, next_rank);
        let (mut bid_hand, rank) = if matching.len() > next_matching.len() {
            (matching, previous.rank())
        } else {
            (next_matching, next_rank)
        };

        // One play in four, shed fewer copies than it could.
        if !bid_hand.is_empty() && rng.gen_range(0..4) == 0 {
            let keep = rng.gen_range(1..=bid_hand.len());
            while bid_hand.len() > keep {
                let _ = bid_hand.remove_sorted(bid_hand.len() - 1);
            }
        }
        Bid::new(bid_hand, rank)
    }

    fn bluff_bid(&self, previous: &Bid, hand: &Hand, rng: &mut dyn RngCore) -> Bid {
        let mut pool = hand.clone();
        pool.sort_ascending();
        let mut bid_hand = Hand::new();
        if !pool.is_empty() {
            let count = rng.gen_range(1..=pool.len().min(4));
            for _ in 0..count {
                // Two dice averaged, so picks lean toward the middle of the
                // ascending pool rather than the extremes.
                let die1 = rng.gen_range(0..pool.len());
                let die2 = rng.gen_range(0..pool.len());
                if let Some(card) = pool.remove_sorted((die1 + die2) / 2) {
                    bid_hand.add(card);
                }
            }
        }
        let rank = if rng.gen_range(0..2) == 1 {
            previous.rank().next()
        } else {
            previous.rank()
        };
        Bid::new(bid_hand, rank)
    }
}

impl Strategy for ThinkerStrategy {
    fn decide_cheat(&mut self, previous: &Bid, hand: &Hand, rng: &mut dyn RngCore) -> bool {
        if forced_to_cheat(previous, hand) {
            return true;
        }
        rng.gen_range(0..4) == 0
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
            self.honest_bid(previous, hand, rng)
        };
        self.discard_memory.add_hand(bid.hand());
        bid
    }

    fn decide_challenge(&mut self, hand: &Hand, current: &Bid, rng: &mut dyn RngCore) -> bool {
        purge_stale_memory(&mut self.discard_memory, hand, current);
        let seen = hand.count_rank(current.rank()) + self.discard_memory.count_rank(current.rank());
        if seen >= 4 {
            return true;
        }
        let odds = (seen as f64 + 1.0) / 10.0;
        tracing::debug!(seen, odds, "weighing a challenge");
        rng.r#gen::<f64>() < odds
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::ThinkerStrategy;
    use crate::model::bid::Bid;
    use crate::model::card::Card;
    use crate::model::hand::Hand;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::strategy::Strategy;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn forced_hands_always_bluff() {
        let mut strategy = ThinkerStrategy::new();
        let mut rng = StdRng::seed_from_u64(5);
        let hand = Hand::with_cards(vec![card(Rank::Two, Suit::Clubs)]);
        let previous = Bid::empty(Rank::Queen);
        for _ in 0..20 {
            assert!(strategy.decide_cheat(&previous, &hand, &mut rng));
        }
    }

    #[test]
    fn bluffs_about_one_turn_in_four() {
        let mut strategy = ThinkerStrategy::new();
        let mut rng = StdRng::seed_from_u64(6);
        let hand = Hand::with_cards(vec![card(Rank::Queen, Suit::Clubs)]);
        let previous = Bid::empty(Rank::Queen);
        let bluffs = (0..400)
            .filter(|_| strategy.decide_cheat(&previous, &hand, &mut rng))
            .count();
        assert!((60..=140).contains(&bluffs), "bluffed {bluffs} of 400");
    }

    #[test]
    fn honest_bid_takes_the_larger_rank_set() {
        let mut strategy = ThinkerStrategy::new();
        let mut rng = StdRng::seed_from_u64(7);
        let hand = Hand::with_cards(vec![
            card(Rank::Queen, Suit::Clubs),
            card(Rank::Queen, Suit::Diamonds),
            card(Rank::King, Suit::Hearts),
        ]);
        let bid = strategy.choose_bid(&Bid::empty(Rank::Queen), &hand, false, &mut rng);
        assert_eq!(bid.rank(), Rank::Queen);
        assert!(bid.count() >= 1 && bid.count() <= 2);
        assert!(!bid.is_cheat());
    }

    #[test]
    fn honest_tie_moves_up_a_rank() {
        let mut strategy = ThinkerStrategy::new();
        let mut rng = StdRng::seed_from_u64(8);
        let hand = Hand::with_cards(vec![
            card(Rank::Queen, Suit::Clubs),
            card(Rank::King, Suit::Hearts),
        ]);
        let bid = strategy.choose_bid(&Bid::empty(Rank::Queen), &hand, false, &mut rng);
        assert_eq!(bid.rank(), Rank::King);
        assert!(!bid.is_cheat());
    }

    #[test]
    fn bluffs_cap_at_four_cards_and_claim_a_nearby_rank() {
        let mut rng = StdRng::seed_from_u64(9);
        let hand = Hand::with_cards(vec![
            card(Rank::Two, Suit::Clubs),
            card(Rank::Three, Suit::Diamonds),
            card(Rank::Five, Suit::Hearts),
            card(Rank::Seven, Suit::Spades),
            card(Rank::Nine, Suit::Clubs),
            card(Rank::Ten, Suit::Diamonds),
        ]);
        for _ in 0..40 {
            let mut strategy = ThinkerStrategy::new();
            let bid = strategy.choose_bid(&Bid::empty(Rank::Queen), &hand, true, &mut rng);
            assert!(bid.count() >= 1 && bid.count() <= 4);
            assert!(bid.rank() == Rank::Queen || bid.rank() == Rank::King);
            for &played in bid.hand().iter() {
                assert!(hand.contains(played));
            }
        }
    }

    #[test]
    fn own_bids_land_in_the_discard_memory() {
        let mut strategy = ThinkerStrategy::new();
        let mut rng = StdRng::seed_from_u64(10);
        let hand = Hand::with_cards(vec![card(Rank::Queen, Suit::Clubs)]);
        let bid = strategy.choose_bid(&Bid::empty(Rank::Queen), &hand, false, &mut rng);
        assert_eq!(strategy.discard_memory().len(), bid.count());
        assert!(strategy.discard_memory().contains(card(Rank::Queen, Suit::Clubs)));
    }

    #[test]
    fn four_seen_cards_make_the_challenge_certain() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut strategy = ThinkerStrategy::new();
        let bid = strategy.choose_bid(
            &Bid::empty(Rank::Queen),
            &Hand::with_cards(vec![
                card(Rank::Queen, Suit::Clubs),
                card(Rank::Queen, Suit::Diamonds),
            ]),
            false,
            &mut rng,
        );
        let remembered = bid.count();

        // Hold the queens the memory has not seen, so hand plus memory
        // covers all four.
        let mut hand = Hand::with_cards(vec![
            card(Rank::Queen, Suit::Hearts),
            card(Rank::Queen, Suit::Spades),
        ]);
        for suit in [Suit::Clubs, Suit::Diamonds] {
            if !strategy.discard_memory().contains(card(Rank::Queen, suit)) {
                hand.add(card(Rank::Queen, suit));
            }
        }
        assert_eq!(hand.len() + remembered, 4);

        let current = Bid::new(
            Hand::with_cards(vec![card(Rank::Two, Suit::Spades)]),
            Rank::Queen,
        );
        assert!(strategy.decide_challenge(&hand, &current, &mut rng));
    }

    #[test]
    fn memory_resets_when_its_cards_come_back_around() {
        let mut strategy = ThinkerStrategy::new();
        let mut rng = StdRng::seed_from_u64(12);
        let queen = card(Rank::Queen, Suit::Clubs);
        strategy.choose_bid(
            &Bid::empty(Rank::Queen),
            &Hand::with_cards(vec![queen]),
            false,
            &mut rng,
        );
        assert_eq!(strategy.discard_memory().len(), 1);

        // The remembered queen is back in hand, so the pile must have been
        // handed out by a challenge.
        let hand = Hand::with_cards(vec![queen]);
        let current = Bid::new(
            Hand::with_cards(vec![card(Rank::Five, Suit::Hearts)]),
            Rank::Five,
        );
        strategy.decide_challenge(&hand, &current, &mut rng);
        assert!(strategy.discard_memory().is_empty());
    }
}
