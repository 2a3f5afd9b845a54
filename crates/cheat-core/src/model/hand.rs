use core::fmt;

use serde::{Deserialize, Serialize};

use crate::model::card::Card;
use crate::model::rank::Rank;

/// An ordered multiset of cards kept in two views: `cards` remembers the
/// order cards arrived (the canonical iteration order) while `sorted` is a
/// parallel copy that only reorders when a sort is requested. Positional
/// accessors address the sorted view exclusively; the two index spaces must
/// never be mixed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Card>", into = "Vec<Card>")]
pub struct Hand {
    cards: Vec<Card>,
    sorted: Vec<Card>,
    rank_counts: [u8; 13],
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self::new();
        hand.add_all(cards);
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sorted.push(card);
        self.rank_counts[card.rank.index()] += 1;
    }

    pub fn add_all<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        for card in cards {
            self.add(card);
        }
    }

    pub fn add_hand(&mut self, other: &Hand) {
        for &card in other.iter() {
            self.add(card);
        }
    }

    /// Removes one occurrence matching rank and suit, the earliest by
    /// insertion order when duplicates exist. Returns false when absent.
    pub fn remove(&mut self, card: Card) -> bool {
        let Some(position) = self.cards.iter().position(|&c| c == card) else {
            return false;
        };
        self.cards.remove(position);
        if let Some(sorted_position) = self.sorted.iter().position(|&c| c == card) {
            self.sorted.remove(sorted_position);
        }
        self.rank_counts[card.rank.index()] -= 1;
        true
    }

    /// Removes every card of `other`, one occurrence each. Returns whether
    /// all were found; cards found before a miss stay removed.
    pub fn remove_hand(&mut self, other: &Hand) -> bool {
        let mut removed = 0;
        for &card in other.iter() {
            if self.remove(card) {
                removed += 1;
            }
        }
        removed == other.len()
    }

    /// Removes the card at `index` in the sorted view; `None` when out of
    /// range, leaving the hand untouched.
    pub fn remove_sorted(&mut self, index: usize) -> Option<Card> {
        if index >= self.sorted.len() {
            return None;
        }
        let card = self.sorted.remove(index);
        if let Some(position) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(position);
        }
        self.rank_counts[card.rank.index()] -= 1;
        Some(card)
    }

    /// The card at `index` in the sorted view.
    pub fn sorted_at(&self, index: usize) -> Option<Card> {
        self.sorted.get(index).copied()
    }

    /// Reorders the sorted view: highest rank first, then highest suit.
    pub fn sort_descending(&mut self) {
        self.sorted.sort_by(|a, b| b.cmp(a));
    }

    /// Reorders the sorted view: lowest rank first, then lowest suit.
    pub fn sort_ascending(&mut self) {
        self.sorted.sort();
    }

    /// Canonical iteration, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Insertion-order view.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Position-addressed view; order changes only on explicit sorts.
    pub fn sorted_cards(&self) -> &[Card] {
        &self.sorted
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn count_rank(&self, rank: Rank) -> usize {
        usize::from(self.rank_counts[rank.index()])
    }

    pub fn hand_value(&self) -> u32 {
        self.cards.iter().map(|card| u32::from(card.value())).sum()
    }

    /// True iff the hand holds at least two cards, all of one suit.
    pub fn is_flush(&self) -> bool {
        if self.cards.len() < 2 {
            return false;
        }
        let suit = self.cards[0].suit;
        self.cards.iter().all(|card| card.suit == suit)
    }

    /// True iff the hand holds at least two cards, no rank repeats, and the
    /// present ranks form a single contiguous run. Runs do not wrap: ace is
    /// the high end only.
    pub fn is_straight(&self) -> bool {
        if self.cards.len() < 2 {
            return false;
        }
        if self.rank_counts.iter().any(|&count| count > 1) {
            return false;
        }
        let mut runs = 0;
        let mut in_run = false;
        for &count in &self.rank_counts {
            if count == 1 {
                if !in_run {
                    runs += 1;
                    in_run = true;
                }
            } else {
                in_run = false;
            }
        }
        runs == 1
    }
}

impl PartialEq for Hand {
    /// Hands compare by contents in insertion order; the sorted view and the
    /// histogram are derived state.
    fn eq(&self, other: &Self) -> bool {
        self.cards == other.cards
    }
}

impl Eq for Hand {}

impl From<Vec<Card>> for Hand {
    fn from(cards: Vec<Card>) -> Self {
        Self::with_cards(cards)
    }
}

impl From<Hand> for Vec<Card> {
    fn from(hand: Hand) -> Self {
        hand.cards
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, card) in self.sorted.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{card}")?;
        }
        Ok(())
    }
}
