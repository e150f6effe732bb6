//! # jokerpoker-engine: Card Game Round Engine
//!
//! A deterministic engine for multi-seat poker rounds played with optional
//! jokers. Provides card and hand classification, dealer-relative turn order,
//! a configurable per-round stage machine and the processors that drive it.
//!
//! ## Core Modules
//!
//! - [`cards`] - Cards, jokers, ordered card lists and their text form
//! - [`deck`] - Deck generators, rigged decks and seeded shuffling
//! - [`tracking`] - Equal-value and consecutive-rank group tracking with jokers
//! - [`combos`] - Combo catalogue, classification and comparison
//! - [`player`] / [`players`] - Seats and circular views over them
//! - [`stages`] - Round stages, their requirements and side effects
//! - [`actions`] - Legal move prototypes and concrete actions
//! - [`processor`] - Round processing and auto play
//! - [`game`] - Game state and the player arena
//! - [`logger`] - Round history and JSONL round records
//! - [`repository`] - Persistence boundary
//! - [`snapshot`] - Per viewer presentation state
//! - [`errors`] - Error types for every concern
//!
//! ## Quick Start
//!
//! ```rust
//! use jokerpoker_engine::cards::CardList;
//! use jokerpoker_engine::combos::{Combo, ComboKindList};
//! use jokerpoker_engine::tracking::Bounds;
//!
//! let cards: CardList = "Ace|H Ace|D King|C King|S 7|S".parse().unwrap();
//! let combo = Combo::classify(&[&cards], &ComboKindList::classic(), &Bounds::default());
//! assert_eq!(combo.kind.name, "two pair");
//! ```
//!
//! ## Jokers
//!
//! Unbound jokers take whatever value makes the strongest combo:
//!
//! ```rust
//! use jokerpoker_engine::cards::CardList;
//! use jokerpoker_engine::combos::{Combo, ComboKindList};
//! use jokerpoker_engine::tracking::Bounds;
//!
//! let cards: CardList = "red black red black red".parse().unwrap();
//! let combo = Combo::classify(&[&cards], &ComboKindList::classic(), &Bounds::default());
//! assert_eq!(combo.kind.name, "pocker");
//! ```
//!
//! ## Playing a Round
//!
//! ```rust
//! use jokerpoker_engine::config::GameConfig;
//! use jokerpoker_engine::game::Game;
//! use jokerpoker_engine::player::Profile;
//! use jokerpoker_engine::processor::{AutoProcessor, StopCondition};
//!
//! let mut game = Game::new(1, GameConfig::classic()).unwrap();
//! game.join(Profile::new("alice", 1000)).unwrap();
//! game.join(Profile::new("bob", 1000)).unwrap();
//!
//! let mut auto = AutoProcessor::new(&mut game);
//! auto.stop(StopCondition::AfterRoundsAmount(1));
//! auto.run().unwrap();
//! assert_eq!(game.rounds_counter, 2);
//! ```

pub mod actions;
pub mod cards;
pub mod combos;
pub mod config;
pub mod constraints;
pub mod deck;
pub mod errors;
pub mod game;
pub mod interval;
pub mod logger;
pub mod player;
pub mod players;
pub mod processor;
pub mod repository;
pub mod snapshot;
pub mod stages;
pub mod tracking;
