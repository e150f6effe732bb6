use serde::Serialize;

use crate::actions::{ActionPrototype, ValueDomain};
use crate::cards::RenderMode;
use crate::game::Game;
use crate::logger::HistoryEntry;
use crate::player::{Player, PlayerId};
use crate::stages::Stage;

/// A legal move as shown to clients.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PrototypeView {
    pub player: String,
    pub name: &'static str,
    pub values: ValueDomain,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlayerView {
    pub username: String,
    pub position: usize,
    pub is_host: bool,
    pub is_dealer: bool,
    pub is_active: bool,
    pub bank: u32,
    pub bet_total: u32,
    pub hand: String,
}

/// Everything a client needs to draw one game for one viewer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GameSnapshot {
    pub game_id: u64,
    pub stage: String,
    pub status: String,
    pub rounds_counter: u32,
    pub bank: u32,
    pub table: String,
    pub players: Vec<PlayerView>,
    pub actions: Vec<PrototypeView>,
    pub history: Vec<HistoryEntry>,
}

impl GameSnapshot {
    /// Other players' hands stay hidden from `viewer` until the round has
    /// been opposed. `None` views as a spectator. Only the viewer's own moves
    /// are listed.
    pub fn for_viewer(game: &Game, viewer: Option<PlayerId>) -> Self {
        let stage = game.stage();
        let revealed = matches!(stage, Stage::Opposing | Stage::TearDown);
        let mode_for = |p: &Player| {
            if revealed || Some(p.id) == viewer {
                RenderMode::Open
            } else {
                RenderMode::Hidden
            }
        };
        let actions = stage
            .possible_actions(game)
            .iter()
            .filter(|p| Some(p.player) == viewer)
            .map(|p| view_prototype(game, p))
            .collect();
        Self {
            game_id: game.id,
            stage: stage.to_string(),
            status: stage.status(game),
            rounds_counter: game.rounds_counter,
            bank: game.bank,
            table: game.table.render(RenderMode::Open),
            players: game
                .players()
                .iter()
                .map(|p| PlayerView {
                    username: p.name().to_string(),
                    position: p.position,
                    is_host: p.is_host,
                    is_dealer: p.is_dealer(),
                    is_active: p.is_active,
                    bank: p.bank(),
                    bet_total: p.bet_total(),
                    hand: p.hand.render(mode_for(p)),
                })
                .collect(),
            actions,
            history: game.actions_history.clone(),
        }
    }
}

fn view_prototype(game: &Game, prototype: &ActionPrototype) -> PrototypeView {
    PrototypeView {
        player: game
            .player(prototype.player)
            .map(|p| p.name().to_string())
            .unwrap_or_default(),
        name: prototype.kind.name(),
        values: prototype.values.clone(),
    }
}
