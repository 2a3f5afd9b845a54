use rand::{Rng, RngCore};

use crate::model::bid::Bid;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::strategy::{Strategy, forced_to_cheat};

/// Blocking text console a [`HumanStrategy`] talks through. Implementations
/// own the retry loop for their input kind and only return usable values:
/// `prompt_int` keeps asking until it gets an integer, `prompt_yes_no` until
/// it gets a yes or a no.
pub trait Console: Send {
    /// Shows one line of text to the player.
    fn line(&mut self, text: &str);

    /// Asks for an integer. Range checks are the caller's job.
    fn prompt_int(&mut self, prompt: &str) -> i64;

    /// Asks a yes/no question.
    fn prompt_yes_no(&mut self, prompt: &str) -> bool;
}

/// Puts a person at the table. Card menus are numbered over the sorted view
/// of the hand; rule checks (no mixed ranks in an honest bid, no card picked
/// twice, at most four cards) happen here, not in the console.
pub struct HumanStrategy {
    io: Box<dyn Console>,
}

impl HumanStrategy {
    pub fn new(io: Box<dyn Console>) -> Self {
        Self { io }
    }

    fn show_hand(&mut self, hand: &Hand) {
        let mut view = hand.clone();
        view.sort_ascending();
        self.io.line("Your cards are:");
        for card in view.sorted_cards() {
            self.io.line(&format!("  {card}"));
        }
    }

    /// Reads menu picks until the player enters 0 with at least one card
    /// picked, or the bid fills up. Honest bids must stay on one rank. A
    /// second 0 on an empty bid picks a random candidate, so the menu always
    /// terminates even when the console has stopped giving real answers.
    fn pick_from_menu(
        &mut self,
        candidates: &[Card],
        single_rank: bool,
        rng: &mut dyn RngCore,
    ) -> Hand {
        let mut picked = Hand::new();
        let cap = candidates.len().min(4);
        let mut warned_empty = false;

        for (position, card) in candidates.iter().enumerate() {
            self.io.line(&format!("  {}. {card}", position + 1));
        }
        loop {
            let entry = self.io.prompt_int("Card number (0 to finish):");
            if entry == 0 {
                if !picked.is_empty() {
                    break;
                }
                if warned_empty {
                    let card = candidates[rng.gen_range(0..candidates.len())];
                    picked.add(card);
                    self.io.line(&format!("Random card selected: {card}."));
                    if picked.len() == cap {
                        break;
                    }
                } else {
                    warned_empty = true;
                    self.io.line(
                        "You have not chosen a card. Choose one now, or \
                         enter 0 again to have one picked for you.",
                    );
                }
                continue;
            }

            let selected = match usize::try_from(entry) {
                Ok(position) if (1..=candidates.len()).contains(&position) => {
                    candidates[position - 1]
                }
                _ => {
                    self.io.line(&format!("Ignoring invalid card number: {entry}"));
                    continue;
                }
            };
            if single_rank {
                if let Some(&first) = picked.cards().first() {
                    if selected.rank != first.rank {
                        self.io.line(
                            "Mixing ranks in that bid would be cheating. Pick \
                             again or enter 0 to finish.",
                        );
                        continue;
                    }
                }
            }
            if picked.contains(selected) {
                self.io.line(
                    "That card is already in the bid. Pick again or enter 0 to finish.",
                );
                continue;
            }
            self.io.line(&format!("{selected} added to your bid."));
            picked.add(selected);
            if picked.len() == cap {
                break;
            }
        }
        picked
    }

    fn choose_honest(&mut self, previous: &Bid, hand: &Hand, rng: &mut dyn RngCore) -> Bid {
        let mut candidates: Vec<Card> = hand
            .iter()
            .copied()
            .filter(|card| card.rank == previous.rank() || card.rank == previous.rank().next())
            .collect();
        candidates.sort();

        let picked = if candidates.len() == 1 {
            self.io.line("Only one card fits the bid, playing it for you.");
            Hand::with_cards(candidates)
        } else if candidates.is_empty() {
            Hand::new()
        } else {
            self.io
                .line("Enter the number of each card to play, then 0 to finish:");
            self.pick_from_menu(&candidates, true, rng)
        };
        let rank = picked
            .cards()
            .first()
            .map_or(previous.rank(), |card| card.rank);
        Bid::new(picked, rank)
    }

    fn choose_bluff(&mut self, previous: &Bid, hand: &Hand, rng: &mut dyn RngCore) -> Bid {
        let mut pool: Vec<Card> = hand.iter().copied().collect();
        pool.sort();

        let picked = if pool.len() == 1 {
            self.io
                .line("Only one card left, adding it to the bid for you.");
            Hand::with_cards(pool)
        } else if pool.is_empty() {
            Hand::new()
        } else {
            self.io.line(
                "You have decided to cheat. Enter the number of each card to \
                 bid, then 0 to finish:",
            );
            self.pick_from_menu(&pool, false, rng)
        };

        // 0 settles on the table rank, so this loop also terminates once the
        // console has gone quiet.
        let rank = loop {
            let entry = self.io.prompt_int(&format!(
                "Which rank will you claim? 1 for {} or 2 for {}.",
                previous.rank(),
                previous.rank().next()
            ));
            match entry {
                0 | 1 => break previous.rank(),
                2 => break previous.rank().next(),
                _ => {}
            }
        };
        Bid::new(picked, rank)
    }
}

impl Strategy for HumanStrategy {
    fn decide_cheat(&mut self, previous: &Bid, hand: &Hand, _rng: &mut dyn RngCore) -> bool {
        self.io
            .line(&format!("The previous bid claimed rank {}.", previous.rank()));
        self.show_hand(hand);

        if forced_to_cheat(previous, hand) {
            self.io.line(
                "No card of the claimed rank or the one above. You will have to cheat.",
            );
            return true;
        }
        // 0 counts as honest, the safe default when the console has nothing
        // left to say.
        loop {
            let choice = self.io.prompt_int(&format!(
                "Enter 1 to play your rank {} or rank {} card(s), or 2 to \
                 cheat with something else.",
                previous.rank(),
                previous.rank().next()
            ));
            match choice {
                0 | 1 => return false,
                2 => return true,
                _ => {}
            }
        }
    }

    fn choose_bid(
        &mut self,
        previous: &Bid,
        hand: &Hand,
        cheating: bool,
        rng: &mut dyn RngCore,
    ) -> Bid {
        if cheating {
            self.choose_bluff(previous, hand, rng)
        } else {
            self.choose_honest(previous, hand, rng)
        }
    }

    fn decide_challenge(&mut self, hand: &Hand, current: &Bid, _rng: &mut dyn RngCore) -> bool {
        self.io.line(&format!("The table says {current}."));
        let matching: Vec<String> = hand
            .iter()
            .filter(|card| card.rank == current.rank())
            .map(|card| card.to_string())
            .collect();
        if matching.is_empty() {
            self.io.line("You hold no cards of that rank.");
        } else {
            self.io.line(&format!("You hold: {}.", matching.join(" ")));
        }
        self.io.prompt_yes_no("Call cheat (y/n)?")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{Console, HumanStrategy};
    use crate::model::bid::Bid;
    use crate::model::card::Card;
    use crate::model::hand::Hand;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::strategy::Strategy;

    #[derive(Default)]
    struct ScriptedConsole {
        ints: VecDeque<i64>,
        answers: VecDeque<bool>,
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedConsole {
        fn with_ints(ints: &[i64]) -> Self {
            Self {
                ints: ints.iter().copied().collect(),
                ..Self::default()
            }
        }
    }

    impl Console for ScriptedConsole {
        fn line(&mut self, text: &str) {
            self.lines.lock().unwrap().push(text.to_string());
        }

        fn prompt_int(&mut self, _prompt: &str) -> i64 {
            self.ints.pop_front().unwrap_or(0)
        }

        fn prompt_yes_no(&mut self, _prompt: &str) -> bool {
            self.answers.pop_front().unwrap_or(false)
        }
    }

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn rejects_garbage_until_a_valid_cheat_choice() {
        let console = ScriptedConsole::with_ints(&[7, -3, 1]);
        let mut strategy = HumanStrategy::new(Box::new(console));
        let mut rng = StdRng::seed_from_u64(20);
        let hand = Hand::with_cards(vec![card(Rank::Queen, Suit::Clubs)]);
        assert!(!strategy.decide_cheat(&Bid::empty(Rank::Queen), &hand, &mut rng));
    }

    #[test]
    fn forced_hand_skips_the_cheat_prompt() {
        let console = ScriptedConsole::default();
        let lines = Arc::clone(&console.lines);
        let mut strategy = HumanStrategy::new(Box::new(console));
        let mut rng = StdRng::seed_from_u64(21);
        let hand = Hand::with_cards(vec![card(Rank::Two, Suit::Clubs)]);
        assert!(strategy.decide_cheat(&Bid::empty(Rank::Queen), &hand, &mut rng));
        let shown = lines.lock().unwrap().join("\n");
        assert!(shown.contains("have to cheat"));
    }

    #[test]
    fn lone_candidate_plays_itself() {
        let console = ScriptedConsole::default();
        let mut strategy = HumanStrategy::new(Box::new(console));
        let mut rng = StdRng::seed_from_u64(22);
        let hand = Hand::with_cards(vec![
            card(Rank::Queen, Suit::Clubs),
            card(Rank::Three, Suit::Spades),
        ]);
        let bid = strategy.choose_bid(&Bid::empty(Rank::Queen), &hand, false, &mut rng);
        assert_eq!(bid.rank(), Rank::Queen);
        assert_eq!(bid.count(), 1);
        assert!(!bid.is_cheat());
    }

    #[test]
    fn menu_refuses_to_mix_ranks_in_an_honest_bid() {
        // Candidates sort to [QC, KD]; the second pick would mix ranks and
        // gets refused, then 0 closes the bid.
        let console = ScriptedConsole::with_ints(&[1, 2, 0]);
        let mut strategy = HumanStrategy::new(Box::new(console));
        let mut rng = StdRng::seed_from_u64(23);
        let hand = Hand::with_cards(vec![
            card(Rank::King, Suit::Diamonds),
            card(Rank::Queen, Suit::Clubs),
            card(Rank::Three, Suit::Spades),
        ]);
        let bid = strategy.choose_bid(&Bid::empty(Rank::Queen), &hand, false, &mut rng);
        assert_eq!(bid.rank(), Rank::Queen);
        assert_eq!(bid.count(), 1);
        assert!(!bid.is_cheat());
    }

    #[test]
    fn two_zeroes_fall_back_to_a_random_candidate() {
        let console = ScriptedConsole::with_ints(&[0, 0]);
        let mut strategy = HumanStrategy::new(Box::new(console));
        let mut rng = StdRng::seed_from_u64(24);
        let hand = Hand::with_cards(vec![
            card(Rank::Queen, Suit::Clubs),
            card(Rank::Queen, Suit::Diamonds),
            card(Rank::Three, Suit::Spades),
        ]);
        let bid = strategy.choose_bid(&Bid::empty(Rank::Queen), &hand, false, &mut rng);
        assert_eq!(bid.rank(), Rank::Queen);
        assert_eq!(bid.count(), 1);
        assert!(!bid.is_cheat());
    }

    #[test]
    fn duplicate_picks_are_refused() {
        let console = ScriptedConsole::with_ints(&[1, 1, 2]);
        let mut strategy = HumanStrategy::new(Box::new(console));
        let mut rng = StdRng::seed_from_u64(25);
        let hand = Hand::with_cards(vec![
            card(Rank::Queen, Suit::Clubs),
            card(Rank::Queen, Suit::Diamonds),
        ]);
        let bid = strategy.choose_bid(&Bid::empty(Rank::Queen), &hand, false, &mut rng);
        assert_eq!(bid.count(), 2);
        assert!(!bid.is_cheat());
    }

    #[test]
    fn bluff_menu_caps_the_bid_at_four_cards() {
        // Four picks fill the bid, the fifth number answers the claim
        // prompt with the successor rank.
        let console = ScriptedConsole::with_ints(&[1, 2, 3, 4, 2]);
        let mut strategy = HumanStrategy::new(Box::new(console));
        let mut rng = StdRng::seed_from_u64(26);
        let hand = Hand::with_cards(vec![
            card(Rank::Two, Suit::Clubs),
            card(Rank::Three, Suit::Diamonds),
            card(Rank::Five, Suit::Hearts),
            card(Rank::Seven, Suit::Spades),
            card(Rank::Nine, Suit::Clubs),
        ]);
        let bid = strategy.choose_bid(&Bid::empty(Rank::Queen), &hand, true, &mut rng);
        assert_eq!(bid.count(), 4);
        assert_eq!(bid.rank(), Rank::King);
        assert!(bid.is_cheat());
    }

    #[test]
    fn bluff_requires_at_least_one_card() {
        // The opening 0 only draws a warning since nothing is picked yet;
        // then one pick, 0 to close, and 1 to claim the current rank.
        let console = ScriptedConsole::with_ints(&[0, 3, 0, 1]);
        let mut strategy = HumanStrategy::new(Box::new(console));
        let mut rng = StdRng::seed_from_u64(27);
        let hand = Hand::with_cards(vec![
            card(Rank::Two, Suit::Clubs),
            card(Rank::Three, Suit::Diamonds),
            card(Rank::Five, Suit::Hearts),
        ]);
        let bid = strategy.choose_bid(&Bid::empty(Rank::Queen), &hand, true, &mut rng);
        assert_eq!(bid.count(), 1);
        assert_eq!(bid.rank(), Rank::Queen);
    }

    #[test]
    fn a_zero_choice_plays_honest() {
        let console = ScriptedConsole::with_ints(&[0]);
        let mut strategy = HumanStrategy::new(Box::new(console));
        let mut rng = StdRng::seed_from_u64(29);
        let hand = Hand::with_cards(vec![card(Rank::Queen, Suit::Clubs)]);
        assert!(!strategy.decide_cheat(&Bid::empty(Rank::Queen), &hand, &mut rng));
    }

    #[test]
    fn an_exhausted_console_still_produces_a_bluff() {
        // Every prompt answers 0: warning, random pick, close, table rank.
        let console = ScriptedConsole::with_ints(&[]);
        let mut strategy = HumanStrategy::new(Box::new(console));
        let mut rng = StdRng::seed_from_u64(33);
        let hand = Hand::with_cards(vec![
            card(Rank::Two, Suit::Clubs),
            card(Rank::Three, Suit::Diamonds),
            card(Rank::Five, Suit::Hearts),
        ]);
        let bid = strategy.choose_bid(&Bid::empty(Rank::Queen), &hand, true, &mut rng);
        assert_eq!(bid.count(), 1);
        assert_eq!(bid.rank(), Rank::Queen);
        assert!(hand.contains(bid.hand().cards()[0]));
    }

    #[test]
    fn challenge_shows_matching_cards_and_relays_the_answer() {
        let console = ScriptedConsole {
            answers: VecDeque::from([true]),
            ..ScriptedConsole::default()
        };
        let lines = Arc::clone(&console.lines);
        let mut strategy = HumanStrategy::new(Box::new(console));
        let mut rng = StdRng::seed_from_u64(28);
        let hand = Hand::with_cards(vec![card(Rank::Queen, Suit::Hearts)]);
        let current = Bid::new(
            Hand::with_cards(vec![card(Rank::Two, Suit::Clubs)]),
            Rank::Queen,
        );
        assert!(strategy.decide_challenge(&hand, &current, &mut rng));
        let shown = lines.lock().unwrap().join("\n");
        assert!(shown.contains("QH"));
    }
}
