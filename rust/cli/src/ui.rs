//! UI helper functions for terminal output formatting.

use jokerpoker_engine::game::Game;
use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// One `name: bank` line per seat, in seating order.
pub fn write_banks(out: &mut dyn Write, game: &Game) -> std::io::Result<()> {
    let width = game
        .players()
        .iter()
        .map(|p| p.name().len())
        .max()
        .unwrap_or(0);
    for player in game.players() {
        writeln!(out, "  {:<width$}  {}", player.name(), player.bank())?;
    }
    Ok(())
}
