//! Command-line argument definitions.

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "jokerpoker",
    version,
    about = "Joker poker engine command line"
)]
pub struct JokerpokerCli {
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Auto-play rounds and record each one as a JSONL line
    Sim {
        #[arg(long)]
        rounds: u32,
        #[arg(long)]
        players: Option<usize>,
        #[arg(long)]
        preset: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        output: Option<String>,
    },
    /// Classify a card list given in text form
    Eval {
        cards: String,
        #[arg(long)]
        preset: Option<String>,
    },
    /// Show resolved configuration and where each value came from
    Cfg,
}

impl Commands {
    pub const NAMES: &'static [&'static str] = &["sim", "eval", "cfg"];
}
