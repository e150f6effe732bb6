//! # Jokerpoker CLI Library
//!
//! Command-line front end for the `jokerpoker-engine` crate. The binary is a
//! thin wrapper around [`run`], which parses arguments and dispatches to a
//! subcommand handler.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["jokerpoker", "sim", "--rounds", "10", "--players", "4"];
//! let code = jokerpoker_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `sim`: Auto-play rounds and optionally record them as JSONL
//! - `eval`: Classify a card list and show the proving card groups
//! - `cfg`: Display current configuration settings and their sources
//!
//! ## Configuration
//!
//! Settings resolve default → TOML file named by `JOKERPOKER_CONFIG` →
//! `JOKERPOKER_*` environment variables → command-line flags.

use clap::Parser;
use std::io::Write;
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod logging;
pub mod ui;

use cli::{Commands, JokerpokerCli};
use commands::{handle_cfg_command, handle_eval_command, handle_sim_command};

pub use commands::SimArgs;
pub use error::CliError;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Main entry point for the CLI application.
///
/// Returns the process exit code: `0` for success, `2` for errors.
///
/// ```
/// use std::io;
/// let args = vec!["jokerpoker", "eval", "Ace|H Ace|D red"];
/// let mut out = Vec::new();
/// let code = jokerpoker_cli::run(args, &mut out, &mut io::stderr());
/// assert_eq!(code, 0);
/// assert!(String::from_utf8_lossy(&out).contains("three of kind"));
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let parsed = match JokerpokerCli::try_parse_from(&argv) {
        Ok(parsed) => parsed,
        Err(e) => return report_parse_error(e, out, err),
    };
    logging::init_logging(parsed.verbose);

    let result = match parsed.cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Eval { cards, preset } => handle_eval_command(&cards, preset, out, err),
        Commands::Sim {
            rounds,
            players,
            preset,
            seed,
            output,
        } => handle_sim_command(
            SimArgs {
                rounds,
                players,
                preset,
                seed,
                output,
            },
            out,
            err,
        ),
    };
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            if writeln!(err, "Error: {}", e).is_err() {
                return EXIT_ERROR;
            }
            EXIT_ERROR
        }
    }
}

fn report_parse_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version go to stdout with a zero exit
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        if write!(out, "{}", e).is_err() {
            return EXIT_ERROR;
        }
        return EXIT_SUCCESS;
    }
    if writeln!(err, "{}", e).is_err()
        || writeln!(err).is_err()
        || writeln!(err, "Jokerpoker CLI").is_err()
        || writeln!(err, "Usage: jokerpoker <command> [options]\n").is_err()
        || writeln!(err, "Commands:").is_err()
    {
        return EXIT_ERROR;
    }
    for c in Commands::NAMES {
        if writeln!(err, "  {}", c).is_err() {
            return EXIT_ERROR;
        }
    }
    if writeln!(err, "\nFor full help, run: jokerpoker --help").is_err() {
        return EXIT_ERROR;
    }
    EXIT_ERROR
}
