//! Decision-making for seats at the table. Every seat owns a boxed
//! [`Strategy`]; the engine hands it the visible table state plus the game
//! RNG and gets back a play or a challenge verdict. Strategies never touch
//! the player's hand, the seat applies the chosen bid itself.

pub mod basic;
pub mod human;
pub mod master;
pub mod thinker;

pub use basic::BasicStrategy;
pub use human::{Console, HumanStrategy};
pub use master::MasterStrategy;
pub use thinker::ThinkerStrategy;

use core::fmt;

use rand::RngCore;

use crate::model::bid::Bid;
use crate::model::hand::Hand;
use crate::model::rank::Rank;

/// A seat's brain. `decide_cheat` runs first each turn; its answer is passed
/// back into `choose_bid` so a strategy commits to bluffing before it picks
/// cards. `decide_challenge` is asked about other seats' bids.
///
/// The RNG comes in as a trait object so implementations stay object safe
/// and every random draw flows from the engine's seeded stream.
pub trait Strategy: Send {
    /// Whether to bluff this turn. Must return true when
    /// [`forced_to_cheat`] holds, since no honest play exists.
    fn decide_cheat(&mut self, previous: &Bid, hand: &Hand, rng: &mut dyn RngCore) -> bool;

    /// Builds the bid for this turn. `cheating` is the answer the engine got
    /// from `decide_cheat` moments earlier.
    fn choose_bid(&mut self, previous: &Bid, hand: &Hand, cheating: bool, rng: &mut dyn RngCore)
    -> Bid;

    /// Whether to call cheat on the bid another seat just played.
    fn decide_challenge(&mut self, hand: &Hand, current: &Bid, rng: &mut dyn RngCore) -> bool;
}

/// True when the hand holds no card of the claimed rank nor of its
/// successor, leaving no legal honest play.
pub fn forced_to_cheat(previous: &Bid, hand: &Hand) -> bool {
    hand.count_rank(previous.rank()) == 0 && hand.count_rank(previous.rank().next()) == 0
}

/// Every card of `rank` in the hand, in hand order.
pub(crate) fn cards_of_rank(hand: &Hand, rank: Rank) -> Hand {
    let mut matching = Hand::new();
    for &card in hand.iter() {
        if card.rank == rank {
            matching.add(card);
        }
    }
    matching
}

/// Clears a discard memory that can no longer be trusted. A remembered card
/// showing up in the strategy's own hand or in the bid on the table means a
/// challenge recycled the pile since the memory was recorded.
pub(crate) fn purge_stale_memory(memory: &mut Hand, hand: &Hand, current: &Bid) {
    let stale = memory
        .iter()
        .any(|&card| hand.contains(card) || current.hand().contains(card));
    if stale {
        *memory = Hand::new();
    }
}

/// Roster token for picking a seat's strategy, parsed from user input or
/// config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Basic,
    Thinker,
    Master,
    Human,
    Random,
}

impl StrategyKind {
    /// The kinds `Random` may resolve to.
    pub const AI_KINDS: [StrategyKind; 3] =
        [StrategyKind::Basic, StrategyKind::Thinker, StrategyKind::Master];

    /// Parses a roster token. Letter case and any non-letter characters are
    /// ignored, so `"Master "` and `"mas-ter"` both read as `Master`.
    pub fn from_token(token: &str) -> Option<Self> {
        let normalized: String = token
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "basic" => Some(Self::Basic),
            "thinker" => Some(Self::Thinker),
            "master" => Some(Self::Master),
            "human" => Some(Self::Human),
            "random" => Some(Self::Random),
            _ => None,
        }
    }

    /// Collapses `Random` into a concrete AI kind; everything else passes
    /// through unchanged.
    pub fn resolve<R: rand::Rng + ?Sized>(self, rng: &mut R) -> Self {
        match self {
            Self::Random => Self::AI_KINDS[rng.gen_range(0..Self::AI_KINDS.len())],
            kind => kind,
        }
    }

    /// Whether this kind needs a console at the table.
    pub fn is_interactive(self) -> bool {
        matches!(self, Self::Human)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Thinker => "thinker",
            Self::Master => "master",
            Self::Human => "human",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Builds the strategy for an AI kind. `Human` needs a console and `Random`
/// needs resolving first, so both return `None` here.
pub fn ai_strategy(kind: StrategyKind) -> Option<Box<dyn Strategy>> {
    match kind {
        StrategyKind::Basic => Some(Box::new(BasicStrategy::new())),
        StrategyKind::Thinker => Some(Box::new(ThinkerStrategy::new())),
        StrategyKind::Master => Some(Box::new(MasterStrategy::new())),
        StrategyKind::Human | StrategyKind::Random => None,
    }
}
