use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::cards::CardList;
use crate::game::Game;

/// One line of a game's round history: a stage that ran or an action that
/// was applied.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Username of the acting player; `None` for stage entries.
    pub performer: Option<String>,
    /// Action kind or stage name.
    pub class: String,
    pub message: String,
    #[serde(default)]
    pub value: Option<u32>,
}

impl HistoryEntry {
    pub fn stage(class: &str, message: String) -> Self {
        Self {
            performer: None,
            class: class.to_string(),
            message,
            value: None,
        }
    }
}

/// Cards and bankroll of one seat at the end of a round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub player: String,
    pub position: usize,
    pub hand: CardList,
    pub bank: u32,
    pub is_active: bool,
}

/// Complete record of one played round, written as one JSONL line.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Format: YYYYMMDD-NNNNNN
    pub round_id: String,
    pub game_id: u64,
    pub round: u32,
    /// Deck seed, when the configuration fixes one.
    pub seed: Option<u64>,
    pub table: CardList,
    pub seats: Vec<SeatRecord>,
    pub history: Vec<HistoryEntry>,
    /// Message of the opposing stage.
    pub result: Option<String>,
    /// RFC3339 timestamp
    #[serde(default)]
    pub ts: Option<String>,
}

impl RoundRecord {
    /// Snapshot of a round that has just been opposed.
    pub fn capture(game: &Game, round_id: String) -> Self {
        let result = game
            .actions_history
            .iter()
            .rev()
            .find(|e| e.class == "opposing")
            .map(|e| e.message.clone());
        Self {
            round_id,
            game_id: game.id,
            round: game.rounds_counter,
            seed: game.config().deck.seed,
            table: game.table.clone(),
            seats: game
                .players()
                .iter()
                .map(|p| SeatRecord {
                    player: p.name().to_string(),
                    position: p.position,
                    hand: p.hand.clone(),
                    bank: p.bank(),
                    is_active: p.is_active,
                })
                .collect(),
            history: game.actions_history.clone(),
            result,
            ts: None,
        }
    }
}

pub fn format_round_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Appends round records to a JSONL file.
pub struct RoundLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl RoundLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// A logger that numbers rounds but writes nowhere.
    pub fn detached(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_round_id(&self.date, self.seq)
    }

    pub fn written(&self) -> u32 {
        self.seq
    }

    pub fn write(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }

    /// Numbers and writes the round that `game` just finished opposing.
    pub fn record(&mut self, game: &Game) -> std::io::Result<String> {
        let id = self.next_id();
        self.write(&RoundRecord::capture(game, id.clone()))?;
        Ok(id)
    }
}
