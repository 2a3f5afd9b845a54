//! Card-table vocabulary: ranks, suits, cards, the deck, hands, and bids.

pub mod bid;
pub mod card;
pub mod deck;
pub mod hand;
pub mod rank;
pub mod suit;

pub use bid::Bid;
pub use card::Card;
pub use deck::Deck;
pub use hand::Hand;
pub use rank::Rank;
pub use suit::Suit;
