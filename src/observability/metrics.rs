//! Write engine counters
//!
//! - Counters only, monotonic
//! - Reset only on service start
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters describing what the write engine did with each message.
///
/// Producers never see per-message outcomes, so these are the only
/// record of routing misses, degraded merges and worker restarts.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Messages dequeued by the worker
    messages_processed: AtomicU64,
    /// Log files created by a first entry
    files_created: AtomicU64,
    /// Fresh lines appended to existing files
    lines_appended: AtomicU64,
    /// Entries merged into a stored line
    lines_merged: AtomicU64,
    /// Merges replaced by a warning plus a fresh line
    merges_degraded: AtomicU64,
    /// Entries dropped for an undeclared handle
    unknown_handles: AtomicU64,
    /// Entries whose read or write failed
    io_failures: AtomicU64,
    /// Consume loop restarts after a panic
    worker_restarts: AtomicU64,
}

impl EngineMetrics {
    /// All counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_messages(&self) {
        self.messages_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_files_created(&self) {
        self.files_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_lines_appended(&self) {
        self.lines_appended.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_lines_merged(&self) {
        self.lines_merged.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_merges_degraded(&self) {
        self.merges_degraded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_unknown_handles(&self) {
        self.unknown_handles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_io_failures(&self) {
        self.io_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment worker restarts, returning the new total
    pub fn increment_worker_restarts(&self) -> u64 {
        self.worker_restarts.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Get all counters as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_processed: self.messages_processed.load(Ordering::Relaxed),
            files_created: self.files_created.load(Ordering::Relaxed),
            lines_appended: self.lines_appended.load(Ordering::Relaxed),
            lines_merged: self.lines_merged.load(Ordering::Relaxed),
            merges_degraded: self.merges_degraded.load(Ordering::Relaxed),
            unknown_handles: self.unknown_handles.load(Ordering::Relaxed),
            io_failures: self.io_failures.load(Ordering::Relaxed),
            worker_restarts: self.worker_restarts.load(Ordering::Relaxed),
        }
    }

    /// Current counters as a JSON object
    pub fn to_json(&self) -> String {
        self.snapshot().to_json()
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub messages_processed: u64,
    pub files_created: u64,
    pub lines_appended: u64,
    pub lines_merged: u64,
    pub merges_degraded: u64,
    pub unknown_handles: u64,
    pub io_failures: u64,
    pub worker_restarts: u64,
}

impl MetricsSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_start_at_zero() {
        assert_eq!(EngineMetrics::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_increment_counters() {
        let metrics = EngineMetrics::new();

        metrics.increment_messages();
        metrics.increment_messages();
        metrics.increment_files_created();
        metrics.increment_lines_merged();
        metrics.increment_unknown_handles();
        assert_eq!(metrics.increment_worker_restarts(), 1);
        assert_eq!(metrics.increment_worker_restarts(), 2);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.messages_processed, 2);
        assert_eq!(snapshot.files_created, 1);
        assert_eq!(snapshot.lines_merged, 1);
        assert_eq!(snapshot.unknown_handles, 1);
        assert_eq!(snapshot.worker_restarts, 2);
        assert_eq!(snapshot.lines_appended, 0);
    }

    #[test]
    fn test_to_json() {
        let metrics = EngineMetrics::new();
        metrics.increment_merges_degraded();

        let parsed: serde_json::Value = serde_json::from_str(&metrics.to_json()).unwrap();
        assert_eq!(parsed["merges_degraded"], 1);
        assert_eq!(parsed["worker_restarts"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let metrics = Arc::new(EngineMetrics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..100 {
                        metrics.increment_messages();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.snapshot().messages_processed, 800);
    }
}
