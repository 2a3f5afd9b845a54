use core::fmt;

use rand::RngCore;

use crate::model::bid::Bid;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::strategy::Strategy;

/// A seat at the table: an owned hand plus the strategy deciding for it.
/// The seat applies its strategy's bid to the hand itself, so strategies
/// only ever see the hand read-only.
pub struct Player {
    index: usize,
    hand: Hand,
    strategy: Box<dyn Strategy>,
}

impl Player {
    pub fn new(index: usize, strategy: Box<dyn Strategy>) -> Self {
        Self {
            index,
            hand: Hand::new(),
            strategy,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn cards_left(&self) -> usize {
        self.hand.len()
    }

    pub fn add_card(&mut self, card: Card) {
        self.hand.add(card);
    }

    /// Takes a whole pile into the hand, the usual price of a challenge.
    pub fn add_hand(&mut self, cards: &Hand) {
        self.hand.add_hand(cards);
    }

    pub fn set_strategy(&mut self, strategy: Box<dyn Strategy>) {
        self.strategy = strategy;
    }

    /// Runs one bidding decision: ask the strategy whether to cheat, let it
    /// build the bid, then move the bid cards out of the hand.
    pub fn play_hand(&mut self, previous: &Bid, rng: &mut dyn RngCore) -> Bid {
        let cheating = self.strategy.decide_cheat(previous, &self.hand, rng);
        let bid = self.strategy.choose_bid(previous, &self.hand, cheating, rng);
        for &card in bid.hand().iter() {
            self.hand.remove(card);
        }
        tracing::debug!(player = self.index, bid = %bid, cheating, "bid played");
        bid
    }

    /// Asks the strategy whether to call cheat on another seat's bid.
    pub fn call_cheat(&mut self, current: &Bid, rng: &mut dyn RngCore) -> bool {
        self.strategy.decide_challenge(&self.hand, current, rng)
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("index", &self.index)
            .field("hand", &self.hand)
            .finish_non_exhaustive()
    }
}
