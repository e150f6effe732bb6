//! Command handlers, one module per subcommand.
//!
//! Each handler has the shape
//! `pub fn handle_COMMAND_command(...) -> Result<(), CliError>` and writes
//! only to the streams it is given.

mod cfg;
mod eval;
mod sim;

pub use cfg::handle_cfg_command;
pub use eval::handle_eval_command;
pub use sim::{SimArgs, handle_sim_command};
