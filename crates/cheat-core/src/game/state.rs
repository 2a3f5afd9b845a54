use core::fmt;
use std::mem;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::player::Player;
use crate::model::bid::Bid;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::strategy::Strategy;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 8;
/// Table size the game recommends when nobody picks one.
pub const DEFAULT_PLAYERS: usize = 5;

/// Setup went wrong before a single turn was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// Roster size outside `MIN_PLAYERS..=MAX_PLAYERS`, or a roster that
    /// does not line up with the hands it was given.
    PlayerCount { found: usize },
    /// A stored current-player index pointing past the roster.
    CurrentPlayer { found: usize, players: usize },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayerCount { found } => write!(
                f,
                "a table seats {MIN_PLAYERS} to {MAX_PLAYERS} players, got {found}"
            ),
            Self::CurrentPlayer { found, players } => write!(
                f,
                "current player {found} is out of range for {players} players"
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Running tally of cheat calls across a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeStats {
    pub total: u32,
    pub correct: u32,
}

/// What one call to [`GameState::play_turn`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Nobody called cheat; play moves to the next seat.
    Passed { bidder: usize, next_player: usize },
    /// A challenge resolved the pile. `caught` says whether the bidder was
    /// lying; `pile_size` counts the cards that changed hands.
    Challenged {
        bidder: usize,
        challenger: usize,
        caught: bool,
        pile_size: usize,
    },
}

/// The whole table: seats, the face-down pile, the bid on top of it, and
/// the seeded RNG every random draw flows from. One `play_turn` call runs
/// one bid and its challenge round.
pub struct GameState {
    players: Vec<Player>,
    current_player: usize,
    current_bid: Bid,
    discards: Hand,
    turn_number: u32,
    challenges: ChallengeStats,
    rng: StdRng,
    seed: u64,
}

impl GameState {
    /// Deals a fresh game with a random seed.
    pub fn new(strategies: Vec<Box<dyn Strategy>>) -> Result<Self, GameError> {
        Self::with_seed(strategies, rand::random())
    }

    /// Deals the whole deck round-robin from seat 0, then draws the opening
    /// seat and the empty opening bid's rank. The same seed and roster deal
    /// the same game.
    pub fn with_seed(strategies: Vec<Box<dyn Strategy>>, seed: u64) -> Result<Self, GameError> {
        let count = strategies.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(GameError::PlayerCount { found: count });
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut players: Vec<Player> = strategies
            .into_iter()
            .enumerate()
            .map(|(index, strategy)| Player::new(index, strategy))
            .collect();

        let mut deck = Deck::shuffled(&mut rng);
        let mut position = 0;
        while let Some(card) = deck.deal() {
            players[position % count].add_card(card);
            position += 1;
        }

        let current_player = rng.gen_range(0..count);
        let current_bid = Bid::empty(Rank::random(&mut rng));
        tracing::debug!(seed, players = count, opens = current_player, "game dealt");
        Ok(Self {
            players,
            current_player,
            current_bid,
            discards: Hand::new(),
            turn_number: 0,
            challenges: ChallengeStats::default(),
            rng,
            seed,
        })
    }

    /// Builds a table from explicit hands instead of a shuffled deal, for
    /// driving known positions through the turn machinery.
    pub fn from_hands(
        hands: Vec<Hand>,
        strategies: Vec<Box<dyn Strategy>>,
        current_player: usize,
        opening_rank: Rank,
        seed: u64,
    ) -> Result<Self, GameError> {
        if strategies.len() != hands.len() {
            return Err(GameError::PlayerCount {
                found: strategies.len(),
            });
        }
        let players = hands
            .into_iter()
            .zip(strategies)
            .enumerate()
            .map(|(index, (hand, strategy))| {
                let mut player = Player::new(index, strategy);
                player.add_hand(&hand);
                player
            })
            .collect();
        Self::from_parts(
            players,
            current_player,
            Bid::empty(opening_rank),
            Hand::new(),
            0,
            ChallengeStats::default(),
            seed,
        )
    }

    /// Reassembles a table from stored pieces. The RNG restarts from the
    /// stored seed; it does not resume mid-stream.
    pub(crate) fn from_parts(
        players: Vec<Player>,
        current_player: usize,
        current_bid: Bid,
        discards: Hand,
        turn_number: u32,
        challenges: ChallengeStats,
        seed: u64,
    ) -> Result<Self, GameError> {
        let count = players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(GameError::PlayerCount { found: count });
        }
        if current_player >= count {
            return Err(GameError::CurrentPlayer {
                found: current_player,
                players: count,
            });
        }
        Ok(Self {
            players,
            current_player,
            current_bid,
            discards,
            turn_number,
            challenges,
            rng: StdRng::seed_from_u64(seed),
            seed,
        })
    }

    /// Runs one turn: the current seat bids onto the pile, then every other
    /// seat gets a chance to call cheat, asked in a random order. The first
    /// call settles the turn; with no call, play passes left.
    pub fn play_turn(&mut self) -> TurnOutcome {
        self.turn_number += 1;
        let bidder = self.current_player;
        let bid = self.players[bidder].play_hand(&self.current_bid, &mut self.rng);
        self.discards.add_hand(bid.hand());
        self.current_bid = bid;

        let mut order: Vec<usize> = (0..self.players.len())
            .filter(|&seat| seat != bidder)
            .collect();
        order.shuffle(&mut self.rng);
        for challenger in order {
            if self.players[challenger].call_cheat(&self.current_bid, &mut self.rng) {
                return self.adjudicate(bidder, challenger);
            }
        }

        let next_player = (bidder + 1) % self.players.len();
        self.current_player = next_player;
        tracing::debug!(turn = self.turn_number, bidder, "no challenge");
        TurnOutcome::Passed { bidder, next_player }
    }

    /// Settles a challenge. Whoever lost the argument takes the whole pile
    /// and leads the next turn; the table reopens on a fresh random rank.
    fn adjudicate(&mut self, bidder: usize, challenger: usize) -> TurnOutcome {
        self.challenges.total += 1;
        let caught = self.current_bid.is_cheat();
        let pile = mem::take(&mut self.discards);
        let pile_size = pile.len();
        if caught {
            self.challenges.correct += 1;
            self.players[bidder].add_hand(&pile);
            self.current_player = bidder;
        } else {
            self.players[challenger].add_hand(&pile);
            self.current_player = challenger;
        }
        self.current_bid = Bid::empty(Rank::random(&mut self.rng));
        tracing::info!(
            turn = self.turn_number,
            bidder,
            challenger,
            caught,
            pile_size,
            "cheat called"
        );
        TurnOutcome::Challenged {
            bidder,
            challenger,
            caught,
            pile_size,
        }
    }

    /// First seat with an empty hand, if the game is over.
    pub fn winner(&self) -> Option<usize> {
        self.players.iter().position(|player| player.hand().is_empty())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn current_bid(&self) -> &Bid {
        &self.current_bid
    }

    pub fn discard_pile(&self) -> &Hand {
        &self.discards
    }

    pub fn challenges(&self) -> ChallengeStats {
        self.challenges
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}
