//! Backpressure Tests
//!
//! Tests for the bounded submission queue:
//! - Producers block once the queue is full
//! - Blocked producers resume when the worker drains the queue
//! - No entry is lost while producers wait

use aerolog::{Clock, LogEntry, LogService, LoggerConfig};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

#[derive(Default)]
struct GateState {
    closed: bool,
    waiting: usize,
}

/// Clock that parks its caller while the gate is closed.
#[derive(Default)]
struct GateClock {
    state: Mutex<GateState>,
    changed: Condvar,
}

impl GateClock {
    fn close(&self) {
        self.state.lock().unwrap().closed = true;
    }

    fn open(&self) {
        self.state.lock().unwrap().closed = false;
        self.changed.notify_all();
    }

    /// Blocks until `count` callers are parked at the gate.
    fn wait_for_waiters(&self, count: usize) {
        let mut state = self.state.lock().unwrap();
        while state.waiting < count {
            state = self.changed.wait(state).unwrap();
        }
    }
}

impl Clock for GateClock {
    fn now(&self) -> NaiveDateTime {
        let mut state = self.state.lock().unwrap();
        state.waiting += 1;
        self.changed.notify_all();
        while state.closed {
            state = self.changed.wait(state).unwrap();
        }
        state.waiting -= 1;

        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap()
    }
}

// =============================================================================
// Tests
// =============================================================================

/// With capacity 2 and the worker stalled on a first entry, two more
/// entries fill the queue and a fourth producer blocks until the worker
/// moves again.
#[test]
fn test_full_queue_blocks_producer() {
    let tmp = TempDir::new().unwrap();
    let clock = Arc::new(GateClock::default());
    let config = LoggerConfig {
        queue_capacity: 2,
        ..LoggerConfig::rooted(tmp.path())
    };
    let service = LogService::start_with_clock(config, Arc::clone(&clock) as Arc<dyn Clock>).unwrap();
    let handle = service.declare("app", false).unwrap();

    clock.close();
    service.log(handle, LogEntry::new("m1", "stalls the worker"));
    clock.wait_for_waiters(1);

    service.log(handle, LogEntry::new("m2", "queued"));
    service.log(handle, LogEntry::new("m3", "queued"));

    let done = Arc::new(AtomicBool::new(false));
    let producer = {
        let service = service.clone();
        let done = Arc::clone(&done);
        thread::spawn(move || {
            service.log(handle, LogEntry::new("m4", "waits for room"));
            done.store(true, Ordering::SeqCst);
        })
    };

    thread::sleep(Duration::from_millis(200));
    assert!(!done.load(Ordering::SeqCst), "producer should block on a full queue");

    clock.open();
    producer.join().unwrap();
    assert!(done.load(Ordering::SeqCst));
    service.flush();

    let content = fs::read_to_string(service.path(handle).unwrap()).unwrap();
    let ids: Vec<&str> = content
        .lines()
        .map(|line| line.split("\t\t").nth(1).unwrap())
        .collect();
    assert_eq!(ids, vec!["m1", "m2", "m3", "m4"]);
}

/// Producers that never fill the queue do not wait on the worker.
#[test]
fn test_room_in_queue_does_not_block() {
    let tmp = TempDir::new().unwrap();
    let clock = Arc::new(GateClock::default());
    let config = LoggerConfig {
        queue_capacity: 8,
        ..LoggerConfig::rooted(tmp.path())
    };
    let service = LogService::start_with_clock(config, Arc::clone(&clock) as Arc<dyn Clock>).unwrap();
    let handle = service.declare("app", false).unwrap();

    clock.close();
    service.log(handle, LogEntry::new("m0", "stalls the worker"));
    clock.wait_for_waiters(1);
    for i in 1..=8 {
        service.log(handle, LogEntry::new(format!("m{}", i), "queued"));
    }

    clock.open();
    service.flush();

    let content = fs::read_to_string(service.path(handle).unwrap()).unwrap();
    assert_eq!(content.lines().count(), 9);
}
