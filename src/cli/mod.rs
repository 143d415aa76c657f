//! CLI module for aerolog
//!
//! Provides command-line access to the log service:
//! - write: submit one entry and wait for it to reach the file
//! - panic: submit a PANIC entry, optionally terminating

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, LevelArg, Target};
pub use commands::run_command;
pub use errors::{CliError, CliErrorCode, CliResult};

/// Parses the process arguments and runs the selected command.
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args())
}
