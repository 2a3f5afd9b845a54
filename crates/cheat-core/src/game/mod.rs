//! The turn engine: seats, the pile, challenge adjudication, and snapshot
//! persistence for the whole table.

pub mod player;
pub mod serialization;
pub mod state;

pub use player::Player;
pub use serialization::GameSnapshot;
pub use state::{
    ChallengeStats, DEFAULT_PLAYERS, GameError, GameState, MAX_PLAYERS, MIN_PLAYERS, TurnOutcome,
};
