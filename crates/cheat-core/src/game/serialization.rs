use serde::{Deserialize, Serialize};

use crate::game::player::Player;
use crate::game::state::{ChallengeStats, GameError, GameState};
use crate::model::bid::Bid;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::strategy::Strategy;

/// Everything visible on the table, flattened for storage: hands, the pile,
/// the open bid, and the counters. Strategies are not part of it; whoever
/// restores the snapshot supplies a fresh roster, and strategy memories
/// start over just as the RNG stream does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    seed: u64,
    turn_number: u32,
    current_player: usize,
    claimed_rank: Rank,
    bid_cards: Vec<Card>,
    discards: Vec<Card>,
    hands: Vec<Vec<Card>>,
    challenges: ChallengeStats,
}

impl GameSnapshot {
    pub fn capture(game: &GameState) -> Self {
        Self {
            seed: game.seed(),
            turn_number: game.turn_number(),
            current_player: game.current_player(),
            claimed_rank: game.current_bid().rank(),
            bid_cards: game.current_bid().hand().cards().to_vec(),
            discards: game.discard_pile().cards().to_vec(),
            hands: game
                .players()
                .iter()
                .map(|player| player.hand().cards().to_vec())
                .collect(),
            challenges: game.challenges(),
        }
    }

    /// Rebuilds a playable table around fresh strategies, one per stored
    /// hand.
    pub fn restore(&self, strategies: Vec<Box<dyn Strategy>>) -> Result<GameState, GameError> {
        if strategies.len() != self.hands.len() {
            return Err(GameError::PlayerCount {
                found: strategies.len(),
            });
        }
        let players = self
            .hands
            .iter()
            .zip(strategies)
            .enumerate()
            .map(|(index, (cards, strategy))| {
                let mut player = Player::new(index, strategy);
                player.add_hand(&Hand::with_cards(cards.clone()));
                player
            })
            .collect();
        GameState::from_parts(
            players,
            self.current_player,
            Bid::new(Hand::with_cards(self.bid_cards.clone()), self.claimed_rank),
            Hand::with_cards(self.discards.clone()),
            self.turn_number,
            self.challenges,
            self.seed,
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }
}
