//! CLI command implementations
//!
//! Each invocation starts a service, declares the target log, submits
//! one entry, waits for it to be written and stops the worker. A
//! terminating panic is acted on only after the worker has stopped.

use std::path::Path;

use crate::config::LoggerConfig;
use crate::engine::LogEntry;
use crate::registry::LogHandle;
use crate::service::LogService;

use super::args::{Cli, Command, Target};
use super::errors::{CliError, CliResult};

/// Runs a parsed command line.
pub fn run_command(cli: Cli) -> CliResult<()> {
    let config = load_config(cli.config.as_deref())?;
    let service = LogService::start(config)?;

    let fatal = match cli.command {
        Command::Write {
            target,
            level,
            aggregate,
        } => {
            let handle = prepare(&service, &target)?;
            let mut entry = entry_for(&target);
            entry.aggregate = aggregate;
            service.submit(handle, level.into(), entry);
            None
        }
        Command::Panic { target, terminate } => {
            let handle = prepare(&service, &target)?;
            service.panic(handle, entry_for(&target), terminate)
        }
    };

    service.flush();
    if cli.stats {
        println!("{}", service.metrics().to_json());
    }
    service.shutdown();

    if let Some(fatal) = fatal {
        fatal.terminate();
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> CliResult<LoggerConfig> {
    match path {
        Some(path) => LoggerConfig::load(path).map_err(CliError::config_error),
        None => Ok(LoggerConfig::default()),
    }
}

fn prepare(service: &LogService, target: &Target) -> CliResult<LogHandle> {
    let handle = service.declare(&target.log, target.daily)?;

    if let Some(limits) = &target.limits {
        let [message, id, level] = limits.as_slice() else {
            return Err(CliError::usage_error(
                "--limits takes exactly three values: message,id,level",
            ));
        };
        service.set_limits(handle, *message, *id, *level)?;
    }

    Ok(handle)
}

fn entry_for(target: &Target) -> LogEntry {
    LogEntry::new(target.id.clone(), target.message.clone()).with_data(target.data.clone())
}
