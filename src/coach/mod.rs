//! Engagement coach: runs the pure scoring and selection logic against the
//! configured backend.
//!
//! Writes for one user are expected to be serialized by the caller; the
//! coach does no per-user locking of its own.

use std::collections::HashSet;
use std::sync::Arc;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::analytics::{compute_analytics, AnalyticsPayload};
use crate::backend::{self, Backend};
use crate::config::app::AppConfig;
use crate::engagement::event::{EventType, LearningEvent};
use crate::engagement::habit::{count_recent_active_days, habit_score, HabitState, RECENT_WINDOW_DAYS};
use crate::engagement::snapshot::EngagementSnapshot;
use crate::engagement::streak::{streak_status, weekly_goal_status, StreakStatus, WeeklyGoalReason};
use crate::error::StudyError;
use crate::gamification::{leaderboard, LeaderboardEntry};
use crate::interventions::{build_streak_alert, select_intervention, InterventionInput, InterventionKind, InterventionPanel, StreakAlert};
use crate::lessons::lesson::LessonNode;
use crate::lessons::recommender::recommend_lessons;
use crate::metrics::Metrics;
use crate::state::app::AppState;

/// A value that may have been produced from fallback data.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub value: T,
    /// Set when the backend failed and defaults were used instead
    pub degraded: Option<StudyError>,
}

impl<T> Loaded<T> {
    fn fresh(value: T) -> Self {
        Loaded { value, degraded: None }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HabitReport {
    pub user_id: String,
    pub today: NaiveDate,
    pub score: f32,
    pub state: HabitState,
    pub streak: StreakStatus,
    pub weekly: WeeklyGoalReason,
    pub recent_active_days: u32,
    pub intervention: Option<InterventionKind>,
    pub alert: StreakAlert,
}

impl HabitReport {
    pub fn intervention_input(&self) -> InterventionInput {
        InterventionInput {
            habit_state: self.state,
            streak_reason: self.streak.reason,
            streak: self.streak.streak,
            weekly_reason: self.weekly,
            recent_active_days: self.recent_active_days,
        }
    }
}

fn history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

#[derive(Clone)]
pub struct Coach {
    backend: Arc<dyn Backend>,
    state: AppState,
    weekly_goal_target: u8,
}

impl Coach {
    pub fn new(backend: Arc<dyn Backend>, state: AppState, weekly_goal_target: u8) -> Self {
        Coach {
            backend,
            state,
            weekly_goal_target,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, StudyError> {
        let backend = backend::from_config(config)?;
        Ok(Coach::new(
            backend,
            AppState::new(config.snapshot_cache_size),
            config.weekly_goal_target,
        ))
    }

    pub fn metrics(&self) -> &Metrics {
        &self.state.metrics
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// A fresh intervention banner for one mount.
    pub fn panel(&self, user_id: &str) -> InterventionPanel<dyn Backend> {
        InterventionPanel::new(user_id, Arc::clone(&self.backend), self.state.metrics.clone())
    }

    /// Load the user's snapshot, rolled over to the week containing `today`.
    ///
    /// Unknown users get a zeroed snapshot. A backend failure also yields a
    /// zeroed snapshot, with the error kept in `degraded`.
    pub async fn load_snapshot(&self, user_id: &str, today: NaiveDate) -> Loaded<EngagementSnapshot> {
        if let Some(mut snapshot) = self.state.cached_snapshot(user_id) {
            snapshot.weekly_goal.roll_over(today);
            return Loaded::fresh(snapshot);
        }

        match self.backend.load_snapshot(user_id).await {
            Ok(found) => {
                let mut snapshot = found
                    .unwrap_or_else(|| EngagementSnapshot::new(today, self.weekly_goal_target));
                self.state.cache_snapshot(user_id, snapshot.clone());
                snapshot.weekly_goal.roll_over(today);
                Loaded::fresh(snapshot)
            }
            Err(e) => {
                self.state.metrics.record_snapshot_fallback();
                let err = StudyError::from(e)
                    .with_user(user_id)
                    .with_context("load_snapshot");
                tracing::warn!(user_id = user_id, error = %err, "Snapshot load failed, using zeroed snapshot");
                Loaded {
                    value: EngagementSnapshot::new(today, self.weekly_goal_target),
                    degraded: Some(err),
                }
            }
        }
    }

    /// Append a learning event and fold it into the user's snapshot.
    ///
    /// Audit events are only appended. When the snapshot cannot be loaded the
    /// event is still kept but the snapshot is left untouched and the load
    /// error is returned, so fallback data never overwrites stored data.
    pub async fn record_activity(
        &self,
        user_id: &str,
        event_type: EventType,
        subject_id: &str,
        now: DateTime<Utc>,
    ) -> Result<EngagementSnapshot, StudyError> {
        let event = LearningEvent::new(user_id, event_type, subject_id, now);
        if let Err(e) = self.backend.record_event(&event).await {
            self.state.metrics.record_event_failure();
            return Err(StudyError::from(e)
                .with_user(user_id)
                .with_context(format!("record_event {}", event_type.as_str())));
        }
        self.state.metrics.record_event();
        tracing::debug!(user_id = user_id, event_type = event_type.as_str(), subject_id = subject_id, "Recorded event");

        let today = now.date_naive();
        let loaded = self.load_snapshot(user_id, today).await;
        if let Some(err) = loaded.degraded {
            return Err(err.with_context("snapshot not updated"));
        }

        let mut snapshot = loaded.value;
        if !event_type.is_activity() || !snapshot.record_activity(today) {
            return Ok(snapshot);
        }

        if let Err(e) = self.backend.save_snapshot(user_id, &snapshot).await {
            self.state.metrics.record_snapshot_save_failure();
            // Cached copy may now be behind the event log; reload next time.
            self.state.evict_snapshot(user_id);
            return Err(StudyError::from(e).with_user(user_id).with_context("save_snapshot"));
        }
        self.state.cache_snapshot(user_id, snapshot.clone());

        tracing::info!(
            user_id = user_id,
            streak = snapshot.streak,
            weekly_progress = snapshot.weekly_goal.progress,
            "Snapshot updated"
        );
        Ok(snapshot)
    }

    /// Explicit user reset of streak and weekly progress.
    pub async fn reset_snapshot(&self, user_id: &str, today: NaiveDate) -> Result<EngagementSnapshot, StudyError> {
        let loaded = self.load_snapshot(user_id, today).await;
        if let Some(err) = loaded.degraded {
            return Err(err.with_context("snapshot not reset"));
        }

        let mut snapshot = loaded.value;
        snapshot.reset(today);
        self.backend
            .save_snapshot(user_id, &snapshot)
            .await
            .map_err(|e| StudyError::from(e).with_user(user_id).with_context("reset_snapshot"))?;
        self.state.cache_snapshot(user_id, snapshot.clone());
        tracing::info!(user_id = user_id, "Snapshot reset");
        Ok(snapshot)
    }

    /// Change the user's weekly target, clamped to 1..=7.
    pub async fn set_weekly_target(
        &self,
        user_id: &str,
        target: u8,
        today: NaiveDate,
    ) -> Result<EngagementSnapshot, StudyError> {
        let loaded = self.load_snapshot(user_id, today).await;
        if let Some(err) = loaded.degraded {
            return Err(err.with_context("weekly target not updated"));
        }

        let mut snapshot = loaded.value;
        snapshot.weekly_goal.set_target(target);
        self.backend
            .save_snapshot(user_id, &snapshot)
            .await
            .map_err(|e| StudyError::from(e).with_user(user_id).with_context("set_weekly_target"))?;
        self.state.cache_snapshot(user_id, snapshot.clone());
        Ok(snapshot)
    }

    /// Score the user's habit and pick today's intervention.
    pub async fn evaluate(&self, user_id: &str, today: NaiveDate) -> Loaded<HabitReport> {
        let loaded = self.load_snapshot(user_id, today).await;
        let mut degraded = loaded.degraded;
        let mut snapshot = loaded.value;

        let status = streak_status(&snapshot, today);
        let window_start = today - Duration::days(RECENT_WINDOW_DAYS as i64 - 1);

        let recent_active_days = match self.backend.events_for(user_id, window_start).await {
            Ok(events) => count_recent_active_days(
                events.iter().filter(|e| e.event_type.is_activity()).map(|e| e.day()),
                today,
            ),
            Err(e) => {
                self.state.metrics.record_event_failure();
                tracing::warn!(user_id = user_id, error = %e, "Event history unavailable, using streak as recency");
                if degraded.is_none() {
                    degraded = Some(StudyError::from(e).with_user(user_id).with_context("events_for"));
                }
                // Consecutive streak days all fall inside the window.
                status.streak.min(RECENT_WINDOW_DAYS)
            }
        };

        // Score on the streak as it stands today, not the stored one.
        snapshot.streak = status.streak;
        let score = habit_score(&snapshot, recent_active_days);
        let weekly = weekly_goal_status(&snapshot.weekly_goal, today);

        let input = InterventionInput {
            habit_state: score.state(),
            streak_reason: status.reason,
            streak: status.streak,
            weekly_reason: weekly,
            recent_active_days,
        };
        let intervention = select_intervention(&input);

        self.state.metrics.record_evaluation();
        tracing::info!(
            user_id = user_id,
            score = score.value(),
            state = ?score.state(),
            streak_reason = status.reason.as_code(),
            weekly = weekly.as_code(),
            intervention = intervention.map(|k| k.as_code()),
            "Habit evaluated"
        );

        Loaded {
            value: HabitReport {
                user_id: user_id.to_string(),
                today,
                score: score.value(),
                state: score.state(),
                streak: status,
                weekly,
                recent_active_days,
                intervention,
                alert: build_streak_alert(status.reason, status.streak),
            },
            degraded,
        }
    }

    /// Lesson ids the user has completed, from the event log.
    pub async fn completed_lessons(&self, user_id: &str) -> Result<HashSet<String>, StudyError> {
        let events = self.backend
            .events_for(user_id, history_start())
            .await
            .map_err(|e| StudyError::from(e).with_user(user_id).with_context("completed_lessons"))?;

        Ok(events
            .into_iter()
            .filter(|e| e.event_type == EventType::LessonCompleted)
            .map(|e| e.subject_id)
            .collect())
    }

    pub async fn recommend(
        &self,
        user_id: &str,
        lessons: &[LessonNode],
        limit: usize,
    ) -> Result<Vec<LessonNode>, StudyError> {
        let completed = self.completed_lessons(user_id).await?;
        Ok(recommend_lessons(lessons, &completed, limit))
    }

    pub async fn analytics(&self, since: NaiveDate) -> Result<AnalyticsPayload, StudyError> {
        let events = self.backend
            .all_events(since)
            .await
            .map_err(|e| StudyError::from(e).with_context("analytics"))?;
        Ok(compute_analytics(&events))
    }

    pub async fn leaderboard(&self, since: NaiveDate, limit: usize) -> Result<Vec<LeaderboardEntry>, StudyError> {
        let events = self.backend
            .all_events(since)
            .await
            .map_err(|e| StudyError::from(e).with_context("leaderboard"))?;
        Ok(leaderboard(&events, limit))
    }
}
