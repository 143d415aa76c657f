//! Fatal condition raised by a terminating panic

use crate::registry::LogHandle;

/// Exit code used when acting on a fatal condition
pub const FATAL_EXIT_CODE: i32 = 0;

/// Signals that the embedding application should terminate.
///
/// Returned by [`LogService::panic`](crate::LogService::panic) after the
/// grace period. The service never exits the process by itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fatal {
    handle: LogHandle,
    log_name: String,
}

impl Fatal {
    pub(crate) fn new(handle: LogHandle, log_name: String) -> Self {
        Self { handle, log_name }
    }

    /// Handle of the log the panic entry was written to
    pub fn handle(&self) -> LogHandle {
        self.handle
    }

    /// Base name of the log file, without directories
    pub fn log_name(&self) -> &str {
        &self.log_name
    }

    /// Console notice naming the log file
    pub fn notice(&self) -> String {
        format!("Panic error, execution terminated. See log {}", self.log_name)
    }

    /// Prints the notice and exits the process.
    pub fn terminate(&self) -> ! {
        println!("{}", self.notice());
        std::process::exit(FATAL_EXIT_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_names_base_name_only() {
        let fatal = Fatal::new(LogHandle(2), "app_2024-03-05.logfile".to_string());
        assert_eq!(
            fatal.notice(),
            "Panic error, execution terminated. See log app_2024-03-05.logfile"
        );
        assert_eq!(fatal.handle().index(), 2);
    }
}
