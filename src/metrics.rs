use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use serde::Serialize;

/// Counters for the engagement flow; cheap to clone and share.
#[derive(Clone, Default)]
pub struct Metrics {
    /// Snapshot loads that fell back to a zeroed snapshot
    pub snapshot_fallbacks: Arc<AtomicU64>,
    pub snapshot_save_failures: Arc<AtomicU64>,
    /// Learning and audit events accepted by the event store
    pub events_recorded: Arc<AtomicU64>,
    pub event_failures: Arc<AtomicU64>,
    pub interventions_logged: Arc<AtomicU64>,
    /// Re-renders that would have logged an already logged intervention
    pub duplicate_logs_suppressed: Arc<AtomicU64>,
    pub evaluations: Arc<AtomicU64>,
}

/// Point-in-time copy of `Metrics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub snapshot_fallbacks: u64,
    pub snapshot_save_failures: u64,
    pub events_recorded: u64,
    pub event_failures: u64,
    pub interventions_logged: u64,
    pub duplicate_logs_suppressed: u64,
    pub evaluations: u64,
}

impl Metrics {
    /// All counters start at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a load that returned a zeroed snapshot
    pub fn record_snapshot_fallback(&self) {
        self.snapshot_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a snapshot write the backend rejected
    pub fn record_snapshot_save_failure(&self) {
        self.snapshot_save_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Count an event accepted by the event store
    pub fn record_event(&self) {
        self.events_recorded.fetch_add(1, Ordering::Relaxed);
    }

    /// Count an event write that failed
    pub fn record_event_failure(&self) {
        self.event_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Count an intervention instance written to the event log
    pub fn record_intervention_logged(&self) {
        self.interventions_logged.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a re-render that skipped an already logged instance
    pub fn record_duplicate_suppressed(&self) {
        self.duplicate_logs_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a habit evaluation
    pub fn record_evaluation(&self) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters at once
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            snapshot_fallbacks: self.snapshot_fallbacks.load(Ordering::Relaxed),
            snapshot_save_failures: self.snapshot_save_failures.load(Ordering::Relaxed),
            events_recorded: self.events_recorded.load(Ordering::Relaxed),
            event_failures: self.event_failures.load(Ordering::Relaxed),
            interventions_logged: self.interventions_logged.load(Ordering::Relaxed),
            duplicate_logs_suppressed: self.duplicate_logs_suppressed.load(Ordering::Relaxed),
            evaluations: self.evaluations.load(Ordering::Relaxed),
        }
    }
}
