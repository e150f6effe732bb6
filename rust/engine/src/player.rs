use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::CardList;
use crate::errors::ActionError;

/// Stable player identifier. Positions change on leave and dealer rotation,
/// ids never do.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Externally owned account: a username and its bankroll.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub bank: u32,
}

impl Profile {
    pub fn new(username: &str, bank: u32) -> Self {
        Self {
            username: username.to_string(),
            bank,
        }
    }
}

/// A seat at one game's table.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub profile: Profile,
    /// Zero based; the dealer button is always at position 0.
    pub position: usize,
    pub is_host: bool,
    /// False once the player has passed in the current round.
    pub is_active: bool,
    pub hand: CardList,
    /// Contributions placed in the current street, swept into the bank by bidding.
    pub bets: Vec<u32>,
    #[serde(skip)]
    pub(crate) pending_save: bool,
}

impl Player {
    pub fn new(id: PlayerId, profile: Profile, position: usize, is_host: bool) -> Self {
        Self {
            id,
            profile,
            position,
            is_host,
            is_active: true,
            hand: CardList::new(),
            bets: Vec::new(),
            pending_save: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.profile.username
    }

    pub fn bank(&self) -> u32 {
        self.profile.bank
    }

    pub fn is_dealer(&self) -> bool {
        self.position == 0
    }

    pub fn bet_total(&self) -> u32 {
        self.bets.iter().sum()
    }

    pub fn has_bet(&self) -> bool {
        !self.bets.is_empty()
    }

    pub fn is_pending_save(&self) -> bool {
        self.pending_save
    }

    /// Debits the bankroll and records the contribution.
    pub fn place(&mut self, value: u32) -> Result<(), ActionError> {
        if value > self.profile.bank {
            return Err(ActionError::InsufficientFunds {
                needed: value,
                available: self.profile.bank,
            });
        }
        self.profile.bank -= value;
        self.bets.push(value);
        self.pending_save = true;
        Ok(())
    }

    pub fn credit(&mut self, value: u32) {
        self.profile.bank = self.profile.bank.saturating_add(value);
        self.pending_save = true;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
