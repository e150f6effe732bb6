use crate::errors::ConstraintError;
use crate::game::Game;

/// Consistency check run before a game is flushed: exactly one host and
/// positions forming `0..n`.
pub fn validate_constraints(game: &Game) -> Result<(), ConstraintError> {
    let players = game.players();
    if players.is_empty() {
        return Ok(());
    }
    let hosts = players.iter().filter(|p| p.is_host).count();
    if hosts != 1 {
        return Err(ConstraintError::HostCount {
            game_id: game.id,
            found: hosts,
        });
    }
    let mut positions: Vec<usize> = players.iter().map(|p| p.position).collect();
    positions.sort_unstable();
    if positions.iter().enumerate().any(|(i, p)| i != *p) {
        return Err(ConstraintError::Positions {
            game_id: game.id,
            positions,
        });
    }
    Ok(())
}
