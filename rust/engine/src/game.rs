use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::cards::CardList;
use crate::config::GameConfig;
use crate::errors::{ActionError, ConfigError, ConstraintError};
use crate::logger::HistoryEntry;
use crate::player::{Player, PlayerId, Profile};
use crate::players::PlayerSelector;
use crate::stages::Stage;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

fn next_instance() -> u64 {
    NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed)
}

/// Identity of one in-memory game object: the persistent id plus a
/// process-unique instance token. Two objects with the same id but different
/// tokens are not "the same" game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GameRef {
    pub id: u64,
    instance: u64,
}

/// State of one table: deck, table cards, bank, stage cursor and the
/// position-ordered player arena.
#[derive(Debug, Serialize, Deserialize)]
pub struct Game {
    pub id: u64,
    #[serde(skip, default = "next_instance")]
    instance: u64,
    config: GameConfig,
    /// True between the host's Start and End actions.
    pub begins: bool,
    pub deck: CardList,
    pub table: CardList,
    pub bank: u32,
    stage_index: usize,
    pub rounds_counter: u32,
    /// Human readable reason the game is idle.
    pub status: String,
    pub actions_history: Vec<HistoryEntry>,
    players: Vec<Player>,
    next_player_id: u32,
    #[serde(skip)]
    pending_save: bool,
}

impl Clone for Game {
    /// A clone is a separate object and gets its own instance token.
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            instance: next_instance(),
            config: self.config.clone(),
            begins: self.begins,
            deck: self.deck.clone(),
            table: self.table.clone(),
            bank: self.bank,
            stage_index: self.stage_index,
            rounds_counter: self.rounds_counter,
            status: self.status.clone(),
            actions_history: self.actions_history.clone(),
            players: self.players.clone(),
            next_player_id: self.next_player_id,
            pending_save: self.pending_save,
        }
    }
}

impl Game {
    pub fn new(id: u64, config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            id,
            instance: next_instance(),
            config,
            begins: false,
            deck: CardList::new(),
            table: CardList::new(),
            bank: 0,
            stage_index: 0,
            rounds_counter: 1,
            status: String::new(),
            actions_history: Vec::new(),
            players: Vec::new(),
            next_player_id: 1,
            pending_save: true,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn game_ref(&self) -> GameRef {
        GameRef {
            id: self.id,
            instance: self.instance,
        }
    }

    pub fn check_continuity(&self, other: GameRef) -> Result<(), ConstraintError> {
        if other == self.game_ref() {
            return Ok(());
        }
        if other.id == self.id {
            return Err(ConstraintError::Continuity(format!(
                "game {} is represented by two different objects",
                self.id
            )));
        }
        Err(ConstraintError::Continuity(format!(
            "object of game {} used with game {}",
            other.id, self.id
        )))
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.config.stage_sequence()
    }

    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    pub fn stage(&self) -> Stage {
        self.stages()
            .get(self.stage_index)
            .copied()
            .unwrap_or(Stage::Setup)
    }

    pub fn opposing_index(&self) -> usize {
        self.stages()
            .iter()
            .position(|s| *s == Stage::Opposing)
            .unwrap_or(0)
    }

    /// Moves the cursor; out of range values wrap to the first stage.
    pub(crate) fn set_stage_index(&mut self, index: usize) {
        self.stage_index = if index < self.stages().len() { index } else { 0 };
        self.pending_save = true;
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn select(&self) -> PlayerSelector<'_> {
        PlayerSelector::new(&self.players)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_by_name(&self, username: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name() == username)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, ActionError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ActionError::UnknownPlayer(id.to_string()))
    }

    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// Seats a new player at the last position. Only allowed while the cursor
    /// is on the opening stage and the round has not begun. The first player
    /// becomes the host.
    pub fn join(&mut self, profile: Profile) -> Result<PlayerId, ActionError> {
        if self.stage() != Stage::Setup || self.begins {
            return Err(ActionError::JoinClosed);
        }
        if self.player_by_name(&profile.username).is_some() {
            return Err(ActionError::AlreadyJoined(profile.username));
        }
        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        let is_host = self.players.is_empty();
        let position = self.players.len();
        tracing::debug!(game_id = self.id, player = %profile.username, position, "player joined");
        self.players.push(Player::new(id, profile, position, is_host));
        self.pending_save = true;
        Ok(id)
    }

    /// Removes a player, shifting later positions down; their street total
    /// stays in the game through the bank.
    pub(crate) fn remove_player(&mut self, id: PlayerId) -> Result<Player, ActionError> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ActionError::UnknownPlayer(id.to_string()))?;
        if self.players[index].is_host {
            return Err(ActionError::HostCanNotLeave);
        }
        let mut player = self.players.remove(index);
        self.bank += player.bet_total();
        player.bets.clear();
        player.pending_save = true;
        self.renumber();
        Ok(player)
    }

    /// Moves the front player to the back so the dealer button passes on.
    pub(crate) fn rotate_dealer(&mut self) {
        if !self.players.is_empty() {
            self.players.rotate_left(1);
            self.renumber();
        }
    }

    fn renumber(&mut self) {
        for (position, player) in self.players.iter_mut().enumerate() {
            if player.position != position {
                player.position = position;
                player.pending_save = true;
            }
        }
        self.pending_save = true;
    }

    pub(crate) fn push_history(&mut self, entry: HistoryEntry) {
        self.actions_history.push(entry);
        self.pending_save = true;
    }

    pub(crate) fn mark_pending(&mut self) {
        self.pending_save = true;
    }

    pub fn is_pending_save(&self) -> bool {
        self.pending_save
    }

    /// Clears the pending flags on the game and every player after a flush.
    pub fn clear_pending(&mut self) {
        self.pending_save = false;
        for player in &mut self.players {
            player.pending_save = false;
        }
    }

    pub fn pending_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.pending_save)
    }
}
