//! CLI argument definitions using clap
//!
//! Commands:
//! - aerolog write --log <name> --id <id> --message <text> [--level info] [--data 1,2] [--aggregate]
//! - aerolog panic --log <name> --id <id> --message <text> [--terminate]

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::engine::Level;

/// aerolog - aggregating file-backed log writer
#[derive(Parser, Debug)]
#[command(name = "aerolog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print engine counters as JSON when done
    #[arg(long, global = true)]
    pub stats: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write one entry and wait for it to reach the file
    Write {
        #[command(flatten)]
        target: Target,

        /// Entry level
        #[arg(long, value_enum, default_value_t = LevelArg::Log)]
        level: LevelArg,

        /// Sum into a matching stored line instead of appending
        #[arg(long)]
        aggregate: bool,
    },

    /// Write a PANIC entry, optionally terminating afterwards
    Panic {
        #[command(flatten)]
        target: Target,

        /// Exit after the grace period
        #[arg(long)]
        terminate: bool,
    },
}

/// Log and entry selection shared by all commands
#[derive(Args, Debug)]
pub struct Target {
    /// Log name; the file is log/<name>.logfile
    #[arg(long)]
    pub log: String,

    /// Append the current date to the file name
    #[arg(long)]
    pub daily: bool,

    /// Entry id
    #[arg(long)]
    pub id: String,

    /// Entry message
    #[arg(long, default_value = "")]
    pub message: String,

    /// Comma-separated integer data
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub data: Vec<i64>,

    /// Width limits as message,id,level (0 = unbounded)
    #[arg(long, value_delimiter = ',')]
    pub limits: Option<Vec<usize>>,
}

/// Levels a caller may write
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelArg {
    Log,
    Error,
    Info,
    Warning,
    Recovered,
}

impl From<LevelArg> for Level {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Log => Level::Log,
            LevelArg::Error => Level::Error,
            LevelArg::Info => Level::Info,
            LevelArg::Warning => Level::Warning,
            LevelArg::Recovered => Level::Recovered,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_write() {
        let cli = Cli::try_parse_from([
            "aerolog", "write", "--log", "metrics", "--id", "hits", "--message", "counter",
            "--data", "1,-2", "--level", "info", "--aggregate",
        ])
        .unwrap();

        match cli.command {
            Command::Write { target, level, aggregate } => {
                assert_eq!(target.log, "metrics");
                assert_eq!(target.data, vec![1, -2]);
                assert_eq!(level, LevelArg::Info);
                assert!(aggregate);
                assert!(target.limits.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_limits_and_global_flags() {
        let cli = Cli::try_parse_from([
            "aerolog", "panic", "--log", "app", "--id", "x", "--limits", "5,3,4", "--terminate",
            "--stats",
        ])
        .unwrap();

        assert!(cli.stats);
        match cli.command {
            Command::Panic { target, terminate } => {
                assert_eq!(target.limits, Some(vec![5, 3, 4]));
                assert!(terminate);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(Level::from(LevelArg::Recovered), Level::Recovered);
    }
}
