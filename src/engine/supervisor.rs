//! Supervisor around the consume loop
//!
//! A panic while handling one message unwinds out of the consume loop;
//! the supervisor catches it, counts the restart and enters a fresh loop
//! on the same receiver. The message that panicked has already been
//! dequeued and is not retried. There is no restart limit.
//!
//! The default panic hook would print every worker panic to stderr. A
//! hook installed once per process suppresses that output on worker
//! threads whose registry has console echo off, and defers to the
//! previous hook everywhere else.

use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Once};

use super::message::Command;
use super::writer::WriteEngine;
use crate::observability::{Event, Logger};
use crate::registry::Registry;

thread_local! {
    /// Registry of the worker running on this thread, if any
    static WORKER_REGISTRY: RefCell<Option<Arc<Registry>>> = const { RefCell::new(None) };
}

static QUIET_HOOK: Once = Once::new();

/// Owns the receiving end of the queue and the write engine.
pub struct Supervisor {
    engine: WriteEngine,
    receiver: Receiver<Command>,
}

impl Supervisor {
    pub(crate) fn new(engine: WriteEngine, receiver: Receiver<Command>) -> Self {
        Self { engine, receiver }
    }

    /// Runs until a shutdown command arrives or every sender is gone.
    pub fn run(self) {
        install_quiet_hook();
        WORKER_REGISTRY.with(|slot| *slot.borrow_mut() = Some(self.engine.shared_registry()));

        if self.engine.registry().console_echo() {
            Logger::emit(Event::WorkerStart, &[]);
        }

        while let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| self.consume())) {
            let restarts = self.engine.metrics().increment_worker_restarts();
            if self.engine.registry().console_echo() {
                Logger::emit(
                    Event::WorkerRestarted,
                    &[
                        ("reason", &panic_reason(payload.as_ref())),
                        ("restarts", &restarts.to_string()),
                    ],
                );
            }
        }

        if self.engine.registry().console_echo() {
            Logger::emit(Event::WorkerStop, &[]);
        }
    }

    fn consume(&self) {
        while let Ok(command) = self.receiver.recv() {
            match command {
                Command::Write(message) => {
                    self.engine.process(&message);
                }
                Command::Flush(ack) => {
                    let _ = ack.send(());
                }
                Command::Shutdown => return,
            }
        }
    }
}

fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let report = WORKER_REGISTRY
                .try_with(|slot| should_report(slot.borrow().as_deref()))
                .unwrap_or(true);
            if report {
                previous(info);
            }
        }));
    });
}

/// Whether a panic on the current thread reaches the previous hook.
///
/// Non-worker threads always report. A worker reports only with console
/// echo on; if the registry lock is busy the panic is reported.
fn should_report(registry: Option<&Registry>) -> bool {
    match registry {
        Some(registry) => registry.try_console_echo().unwrap_or(true),
        None => true,
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(reason) = payload.downcast_ref::<&str>() {
        reason.to_string()
    } else if let Some(reason) = payload.downcast_ref::<String>() {
        reason.clone()
    } else {
        "unknown panic".to_string()
    }
}
