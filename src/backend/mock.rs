use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::backend::{Backend, BackendError, EventStore, SnapshotStore};
use crate::engagement::event::LearningEvent;
use crate::engagement::snapshot::EngagementSnapshot;

/// In-memory backend for offline use and tests.
///
/// Each instance owns its data; tests build one per case and may `reset()`
/// it. Failures can be switched on per operation to exercise fallbacks.
#[derive(Default)]
pub struct MockBackend {
    snapshots: RwLock<HashMap<String, EngagementSnapshot>>,
    events: RwLock<Vec<LearningEvent>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    fail_events: AtomicBool,
}

impl MockBackend {
    /// Empty store with no failures switched on
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all stored data and clear injected failures
    pub fn reset(&self) {
        self.snapshots.write().clear();
        self.events.write().clear();
        self.fail_loads.store(false, Ordering::Relaxed);
        self.fail_saves.store(false, Ordering::Relaxed);
        self.fail_events.store(false, Ordering::Relaxed);
    }

    /// Make `load_snapshot` return `Unavailable`
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::Relaxed);
    }

    /// Make `save_snapshot` return `Unavailable`
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Relaxed);
    }

    /// Make every event store call return `Unavailable`
    pub fn fail_events(&self, fail: bool) {
        self.fail_events.store(fail, Ordering::Relaxed);
    }

    /// Seed a stored snapshot without going through the coach
    pub fn insert_snapshot(&self, user_id: &str, snapshot: EngagementSnapshot) {
        self.snapshots.write().insert(user_id.to_string(), snapshot);
    }

    /// Stored snapshot for `user_id`, bypassing failure injection
    pub fn snapshot(&self, user_id: &str) -> Option<EngagementSnapshot> {
        self.snapshots.read().get(user_id).cloned()
    }

    /// Everything recorded so far, in insertion order
    pub fn recorded_events(&self) -> Vec<LearningEvent> {
        self.events.read().clone()
    }

    fn check(flag: &AtomicBool, op: &str) -> Result<(), BackendError> {
        if flag.load(Ordering::Relaxed) {
            return Err(BackendError::Unavailable(format!("mock {} failure", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for MockBackend {
    async fn load_snapshot(&self, user_id: &str) -> Result<Option<EngagementSnapshot>, BackendError> {
        Self::check(&self.fail_loads, "load")?;
        Ok(self.snapshots.read().get(user_id).cloned())
    }

    async fn save_snapshot(&self, user_id: &str, snapshot: &EngagementSnapshot) -> Result<(), BackendError> {
        Self::check(&self.fail_saves, "save")?;
        self.snapshots.write().insert(user_id.to_string(), snapshot.clone());
        Ok(())
    }
}

#[async_trait]
impl EventStore for MockBackend {
    async fn record_event(&self, event: &LearningEvent) -> Result<(), BackendError> {
        Self::check(&self.fail_events, "event")?;
        self.events.write().push(event.clone());
        Ok(())
    }

    async fn events_for(&self, user_id: &str, since: NaiveDate) -> Result<Vec<LearningEvent>, BackendError> {
        Self::check(&self.fail_events, "event")?;
        let mut found: Vec<LearningEvent> = self.events
            .read()
            .iter()
            .filter(|e| e.user_id == user_id && e.day() >= since)
            .cloned()
            .collect();
        found.sort_by_key(|e| e.occurred_at);
        Ok(found)
    }

    async fn all_events(&self, since: NaiveDate) -> Result<Vec<LearningEvent>, BackendError> {
        Self::check(&self.fail_events, "event")?;
        let mut found: Vec<LearningEvent> = self.events
            .read()
            .iter()
            .filter(|e| e.day() >= since)
            .cloned()
            .collect();
        found.sort_by_key(|e| e.occurred_at);
        Ok(found)
    }
}

impl Backend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }
}
