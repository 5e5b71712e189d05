//! Data service contracts used by the engagement logic.
//!
//! The scoring and selection code only sees these traits. Which
//! implementation backs them is decided once at startup from `AppConfig`.

pub mod mock;
pub mod remote;

use std::sync::Arc;
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::config::app::{AppConfig, BackendMode};
use crate::engagement::event::LearningEvent;
use crate::engagement::snapshot::EngagementSnapshot;

pub use mock::MockBackend;
pub use remote::RemoteBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid payload: {0}")]
    Decode(String),

    #[error("invalid request target: {0}")]
    InvalidTarget(String),
}

impl BackendError {
    pub fn kind(&self) -> &'static str {
        match self {
            BackendError::Unavailable(_) => "unavailable",
            BackendError::Status { .. } => "status",
            BackendError::Request(_) => "request",
            BackendError::Decode(_) => "decode",
            BackendError::InvalidTarget(_) => "invalid_target",
        }
    }
}

/// Per-user engagement snapshot persistence.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when the user has no snapshot yet
    async fn load_snapshot(&self, user_id: &str) -> Result<Option<EngagementSnapshot>, BackendError>;

    async fn save_snapshot(&self, user_id: &str, snapshot: &EngagementSnapshot) -> Result<(), BackendError>;
}

/// Append-only event log.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn record_event(&self, event: &LearningEvent) -> Result<(), BackendError>;

    /// Events of one user on or after `since` (UTC day), oldest first
    async fn events_for(&self, user_id: &str, since: NaiveDate) -> Result<Vec<LearningEvent>, BackendError>;

    /// Events of every user on or after `since`, oldest first
    async fn all_events(&self, since: NaiveDate) -> Result<Vec<LearningEvent>, BackendError>;
}

/// A complete data service: snapshots plus events.
pub trait Backend: SnapshotStore + EventStore {
    fn name(&self) -> &'static str;
}

/// Build the backend named by `config.backend`.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn Backend>, BackendError> {
    match config.backend {
        BackendMode::Mock => {
            tracing::info!(backend = "mock", "Using in-memory backend");
            Ok(Arc::new(MockBackend::new()))
        }
        BackendMode::Remote => {
            tracing::info!(backend = "remote", base_url = %config.remote.base_url, "Using remote backend");
            Ok(Arc::new(RemoteBackend::new(&config.remote)?))
        }
    }
}
