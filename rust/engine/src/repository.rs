//! Persistence boundary. The engine only flags records as pending; a
//! repository decides how a flush is stored.

use std::collections::HashMap;

use crate::errors::RepositoryError;
use crate::game::Game;
use crate::player::PlayerId;

pub trait GameRepository {
    /// Loads a fresh in-memory object for the stored game.
    fn load(&self, game_id: u64) -> Result<Game, RepositoryError>;

    /// Stores the game together with every pending player.
    fn save(&mut self, game: &Game) -> Result<(), RepositoryError>;
}

/// Keeps serde JSON documents in memory.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    games: HashMap<u64, String>,
    players: HashMap<(u64, PlayerId), String>,
    saves: usize,
    player_writes: usize,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saves(&self) -> usize {
        self.saves
    }

    /// Player documents written across all saves.
    pub fn player_writes(&self) -> usize {
        self.player_writes
    }

    pub fn contains(&self, game_id: u64) -> bool {
        self.games.contains_key(&game_id)
    }

    pub fn player_document(&self, game_id: u64, player: PlayerId) -> Option<&str> {
        self.players.get(&(game_id, player)).map(String::as_str)
    }
}

impl GameRepository for InMemoryRepository {
    fn load(&self, game_id: u64) -> Result<Game, RepositoryError> {
        let doc = self
            .games
            .get(&game_id)
            .ok_or(RepositoryError::NotFound(game_id))?;
        let mut game: Game =
            serde_json::from_str(doc).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        game.clear_pending();
        Ok(game)
    }

    fn save(&mut self, game: &Game) -> Result<(), RepositoryError> {
        let mut staged = Vec::new();
        for player in game.pending_players() {
            staged.push(((game.id, player.id), to_json(player)?));
        }
        let doc = to_json(game)?;
        self.player_writes += staged.len();
        self.players.extend(staged);
        self.games.insert(game.id, doc);
        self.saves += 1;
        tracing::debug!(game_id = game.id, saves = self.saves, "game saved");
        Ok(())
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::player::Profile;

    #[test]
    fn missing_game_is_not_found() {
        let repo = InMemoryRepository::new();
        assert!(matches!(repo.load(3), Err(RepositoryError::NotFound(3))));
    }

    #[test]
    fn loaded_game_is_a_new_object() {
        let mut repo = InMemoryRepository::new();
        let mut game = Game::new(5, GameConfig::classic()).unwrap();
        let a = game.join(Profile::new("a", 100)).unwrap();
        repo.save(&game).unwrap();
        assert_eq!(repo.player_writes(), 1);
        let doc = repo.player_document(5, a).expect("player stored");
        assert!(doc.contains("\"username\":\"a\""));
        assert!(repo.player_document(5, PlayerId(99)).is_none());
        let loaded = repo.load(5).unwrap();
        assert_eq!(loaded.players().len(), 1);
        assert!(!loaded.is_pending_save());
        assert!(game.check_continuity(loaded.game_ref()).is_err());
    }
}
