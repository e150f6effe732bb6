use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::{all_ranks, all_suits, Card, CardList, JokerKind, Rank, Suit};
use crate::errors::ConfigError;

/// Inclusive rank and suit borders for generated decks.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DeckInterval {
    pub min_rank: Rank,
    pub max_rank: Rank,
    pub min_suit: Suit,
    pub max_suit: Suit,
}

impl Default for DeckInterval {
    fn default() -> Self {
        Self {
            min_rank: Rank::Two,
            max_rank: Rank::Ace,
            min_suit: Suit::Clubs,
            max_suit: Suit::Spades,
        }
    }
}

impl DeckInterval {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_rank > self.max_rank || self.min_suit > self.max_suit {
            return Err(ConfigError::InvalidDeckInterval);
        }
        Ok(())
    }

    /// Highest face a generated deck can contain. Jokers bind to it when
    /// nothing better is available.
    pub fn possible_highest(&self) -> (Rank, Suit) {
        (self.max_rank, self.max_suit)
    }

    pub fn possible_lowest(&self) -> (Rank, Suit) {
        (self.min_rank, self.min_suit)
    }

    fn ranks(&self) -> impl DoubleEndedIterator<Item = Rank> + '_ {
        all_ranks()
            .into_iter()
            .filter(move |r| (self.min_rank..=self.max_rank).contains(r))
    }

    fn suits(&self) -> impl DoubleEndedIterator<Item = Suit> + '_ {
        all_suits()
            .into_iter()
            .filter(move |s| (self.min_suit..=self.max_suit).contains(s))
    }
}

/// How the deck is filled before every round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeckGenerator {
    /// Every face inside the interval, repeated `iterations_amount` times,
    /// each repetition followed by `jokers_amount` jokers.
    FullDeckPlusJokers {
        #[serde(default)]
        interval: DeckInterval,
        #[serde(default)]
        jokers_amount: usize,
        #[serde(default = "one")]
        iterations_amount: usize,
    },
    /// A fixed card list, mostly for rigged test rounds.
    Fixed { cards: CardList },
}

fn one() -> usize {
    1
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DeckConfig {
    pub generator: DeckGenerator,
    #[serde(default = "default_true")]
    pub shuffling: bool,
    /// Shuffle seed. Mixed with the round counter so rounds differ.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            generator: DeckGenerator::FullDeckPlusJokers {
                interval: DeckInterval::default(),
                jokers_amount: 0,
                iterations_amount: 1,
            },
            shuffling: true,
            seed: None,
        }
    }
}

impl DeckConfig {
    /// A non-shuffled deck that reproduces `table` and `hands` exactly.
    pub fn rigged(table: &CardList, hands: &[CardList]) -> Result<Self, ConfigError> {
        Ok(Self {
            generator: DeckGenerator::Fixed {
                cards: factory_from(table, hands)?,
            },
            shuffling: false,
            seed: None,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.generator {
            DeckGenerator::FullDeckPlusJokers {
                interval,
                iterations_amount,
                ..
            } => {
                interval.validate()?;
                if *iterations_amount == 0 {
                    return Err(ConfigError::EmptyDeck);
                }
            }
            DeckGenerator::Fixed { cards } if cards.is_empty() => {
                return Err(ConfigError::EmptyDeck);
            }
            DeckGenerator::Fixed { .. } => {}
        }
        Ok(())
    }

    /// Face jokers bind to when classification needs a top card.
    pub fn possible_highest(&self) -> (Rank, Suit) {
        match &self.generator {
            DeckGenerator::FullDeckPlusJokers { interval, .. } => interval.possible_highest(),
            DeckGenerator::Fixed { .. } => DeckInterval::default().possible_highest(),
        }
    }

    pub fn possible_lowest(&self) -> (Rank, Suit) {
        match &self.generator {
            DeckGenerator::FullDeckPlusJokers { interval, .. } => interval.possible_lowest(),
            DeckGenerator::Fixed { .. } => DeckInterval::default().possible_lowest(),
        }
    }

    /// Builds a fresh deck for round `round`, shuffled if configured.
    pub fn build(&self, round: u32) -> CardList {
        let mut deck = match &self.generator {
            DeckGenerator::FullDeckPlusJokers {
                interval,
                jokers_amount,
                iterations_amount,
            } => full_deck_plus_jokers(interval, *jokers_amount, *iterations_amount),
            DeckGenerator::Fixed { cards } => cards.clone(),
        };
        if self.shuffling {
            let seed = self
                .seed
                .map(|s| s.wrapping_add(u64::from(round)))
                .unwrap_or_else(rand::random);
            shuffle(&mut deck, seed);
        }
        deck
    }
}

/// Ranks high to low, suits high to low, then jokers alternating black and red.
pub fn full_deck_plus_jokers(
    interval: &DeckInterval,
    jokers_amount: usize,
    iterations_amount: usize,
) -> CardList {
    let mut deck = CardList::new();
    for _ in 0..iterations_amount {
        for rank in interval.ranks().rev() {
            for suit in interval.suits().rev() {
                deck.push(Card::new(rank, suit));
            }
        }
        for i in 0..jokers_amount {
            let kind = if i % 2 == 1 {
                JokerKind::Red
            } else {
                JokerKind::Black
            };
            deck.push(Card::joker(kind));
        }
    }
    deck
}

/// Collects a deck guaranteeing that dealing from its end hands `hands[i]`
/// to seat `i` and flops reveal `table`. Shuffling must be off.
pub fn factory_from(table: &CardList, hands: &[CardList]) -> Result<CardList, ConfigError> {
    let width = hands.first().map_or(0, |h| h.len());
    if hands.iter().any(|h| h.len() != width) {
        return Err(ConfigError::UnevenHands);
    }
    let mut deck = table.clone();
    for i in 0..width {
        deck.extend(hands.iter().rev().map(|h| h[i]));
    }
    Ok(deck)
}

pub fn shuffle(deck: &mut CardList, seed: u64) {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    deck.shuffle(&mut rng);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_deck_starts_high_and_ends_with_jokers() {
        let deck = full_deck_plus_jokers(&DeckInterval::default(), 2, 1);
        assert_eq!(deck.len(), 54);
        assert_eq!(deck[0].to_string(), "Ace|S");
        assert_eq!(deck[1].to_string(), "Ace|H");
        assert_eq!(deck[52], Card::joker(JokerKind::Black));
        assert_eq!(deck[53], Card::joker(JokerKind::Red));
    }

    #[test]
    fn same_seed_gives_same_order() {
        let config = DeckConfig {
            seed: Some(7),
            ..DeckConfig::default()
        };
        assert_eq!(config.build(1), config.build(1));
        assert_ne!(config.build(1), config.build(2));
    }
}
