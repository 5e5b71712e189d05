use std::sync::Arc;
use std::num::NonZeroUsize;
use parking_lot::RwLock;
use lru::LruCache;

use crate::engagement::snapshot::EngagementSnapshot;
use crate::metrics::Metrics;

const DEFAULT_SNAPSHOT_CACHE: usize = 256;

/// Process-wide state shared by the coach and its panels.
/// Mutable state is kept here and passed explicitly.
#[derive(Clone)]
pub struct AppState {
    /// Snapshots read from or written to the backend, most recent users first
    pub snapshots: Arc<RwLock<LruCache<String, EngagementSnapshot>>>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(snapshot_cache_size: usize) -> Self {
        let capacity = NonZeroUsize::new(snapshot_cache_size)
            .or_else(|| NonZeroUsize::new(DEFAULT_SNAPSHOT_CACHE))
            .unwrap_or(NonZeroUsize::MIN);
        AppState {
            snapshots: Arc::new(RwLock::new(LruCache::new(capacity))),
            metrics: Metrics::new(),
        }
    }

    pub fn cached_snapshot(&self, user_id: &str) -> Option<EngagementSnapshot> {
        // `get` bumps recency, so it needs the write lock
        self.snapshots.write().get(user_id).cloned()
    }

    pub fn cache_snapshot(&self, user_id: &str, snapshot: EngagementSnapshot) {
        self.snapshots.write().put(user_id.to_string(), snapshot);
    }

    pub fn evict_snapshot(&self, user_id: &str) {
        self.snapshots.write().pop(user_id);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_CACHE)
    }
}
