//! Simulation command handler.
//!
//! Seats `--players` automated players (`p1`, `p2`, ...) with the configured
//! starting bank and auto-plays `--rounds` full rounds. With `--output`, each
//! finished round is appended to the file as one JSON line.
//!
//! When no seed is configured a random one is drawn and printed so the run
//! can be repeated.

use crate::config;
use crate::error::CliError;
use crate::ui;
use jokerpoker_engine::game::Game;
use jokerpoker_engine::logger::RoundLogger;
use jokerpoker_engine::player::Profile;
use jokerpoker_engine::processor::{AutoProcessor, RunStatus, StopCondition};
use std::io::Write;
use std::path::PathBuf;

pub struct SimArgs {
    pub rounds: u32,
    pub players: Option<usize>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    pub output: Option<String>,
}

pub fn handle_sim_command(
    args: SimArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if args.rounds == 0 {
        ui::write_error(err, "rounds must be >= 1")?;
        return Err(CliError::InvalidInput("rounds must be >= 1".to_string()));
    }

    let mut cfg = config::load()?;
    if let Some(players) = args.players {
        cfg.players = players;
    }
    if let Some(preset) = args.preset {
        cfg.preset = preset;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    if let Err(e) = config::validate(&cfg) {
        ui::write_error(err, &e.to_string())?;
        return Err(e.into());
    }
    let seed = cfg.seed.unwrap_or_else(rand::random);
    cfg.seed = Some(seed);

    let mut game = Game::new(1, cfg.game_config()?)?;
    for seat in 1..=cfg.players {
        game.join(Profile::new(&format!("p{seat}"), cfg.starting_bank))?;
    }

    let mut logger = match args.output.as_deref().map(PathBuf::from) {
        Some(path) => Some(RoundLogger::create(&path)?),
        None => None,
    };

    tracing::info!(
        rounds = args.rounds,
        players = cfg.players,
        preset = %cfg.preset,
        seed,
        "simulation starts"
    );
    let status = {
        let mut auto = AutoProcessor::new(&mut game);
        if let Some(logger) = logger.as_mut() {
            auto = auto.with_logger(logger);
        }
        auto.stop(StopCondition::AfterRoundsAmount(args.rounds));
        auto.run()?
    };

    let played = game.rounds_counter.saturating_sub(1);
    if status == RunStatus::Waiting {
        ui::display_warning(
            err,
            &format!("simulation stopped after {} rounds: {}", played, game.status),
        )?;
    }

    writeln!(out, "Simulated: {} rounds", played)?;
    writeln!(out, "Preset: {}", cfg.preset)?;
    writeln!(out, "Seed: {}", seed)?;
    if let (Some(path), Some(logger)) = (args.output.as_deref(), logger.as_ref()) {
        writeln!(out, "Recorded: {} rounds to {}", logger.written(), path)?;
    }
    writeln!(out, "Banks:")?;
    ui::write_banks(out, &game)?;
    Ok(())
}
