use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use parking_lot::RwLock;

use crate::error::StudyError;

/// Wraps a fallible compute step and keeps the failure until reset.
///
/// Once a step fails (error or panic) the supervisor stays tripped and
/// further `run` calls return `None` without invoking the step, until
/// `reset` is called.
#[derive(Clone)]
pub struct Supervisor {
    name: &'static str,
    last_error: Arc<RwLock<Option<StudyError>>>,
    failures: Arc<AtomicU64>,
}

impl Supervisor {
    pub fn new(name: &'static str) -> Self {
        Supervisor {
            name,
            last_error: Arc::new(RwLock::new(None)),
            failures: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn run<T, F>(&self, step: F) -> Option<T>
    where
        F: FnOnce() -> Result<T, StudyError>,
    {
        if self.has_failed() {
            return None;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(step))
            .unwrap_or_else(|payload| Err(panic_to_error(payload)));

        match outcome {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(supervisor = self.name, error = %e, "Supervised step failed");
                self.failures.fetch_add(1, Ordering::Relaxed);
                *self.last_error.write() = Some(e);
                None
            }
        }
    }

    pub fn has_failed(&self) -> bool {
        self.last_error.read().is_some()
    }

    pub fn last_error(&self) -> Option<StudyError> {
        self.last_error.read().clone()
    }

    /// Total failures seen, including ones already reset
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        if self.last_error.write().take().is_some() {
            tracing::info!(supervisor = self.name, "Supervisor reset");
        }
    }
}

fn panic_to_error(payload: Box<dyn std::any::Any + Send>) -> StudyError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    StudyError::new(format!("panicked: {}", message), "supervisor")
}
