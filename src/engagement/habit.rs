use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::engagement::snapshot::EngagementSnapshot;

/// Days looked back for the recency signal, today included.
pub const RECENT_WINDOW_DAYS: u32 = 7;

/// Streak length that earns the full streak weight.
pub const STREAK_SATURATION_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HabitScoreWeights {
    pub recency: u32,
    pub streak: u32,
    pub weekly: u32,
}

impl HabitScoreWeights {
    pub const fn total(&self) -> u32 {
        self.recency + self.streak + self.weekly
    }
}

pub const HABIT_SCORE_WEIGHTS: HabitScoreWeights = HabitScoreWeights {
    recency: 40,
    streak: 40,
    weekly: 20,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HabitScoreThresholds {
    pub stable: u32,
    pub warning: u32,
}

pub const HABIT_SCORE_THRESHOLDS: HabitScoreThresholds = HabitScoreThresholds {
    stable: 80,
    warning: 50,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitState {
    Stable,
    Warning,
    Danger,
}

impl HabitState {
    pub fn from_score(score: f32) -> Self {
        if score >= HABIT_SCORE_THRESHOLDS.stable as f32 {
            HabitState::Stable
        } else if score >= HABIT_SCORE_THRESHOLDS.warning as f32 {
            HabitState::Warning
        } else {
            HabitState::Danger
        }
    }
}

/// Composite 0-100 habit score.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct HabitScore(f32);

impl HabitScore {
    pub fn value(self) -> f32 {
        self.0
    }

    pub fn state(self) -> HabitState {
        HabitState::from_score(self.0)
    }
}

/// Score a snapshot.
///
/// recency = min(days, 7) / 7 * 40, streak = min(streak, 7) / 7 * 40,
/// weekly = min(progress / target, 1) * 20; the sum is clamped to [0, 100].
/// A zero weekly target contributes nothing.
pub fn habit_score(snapshot: &EngagementSnapshot, recent_active_days: u32) -> HabitScore {
    let w = HABIT_SCORE_WEIGHTS;

    let recency = recent_active_days.min(RECENT_WINDOW_DAYS) as f32 / RECENT_WINDOW_DAYS as f32
        * w.recency as f32;
    let streak = snapshot.streak.min(STREAK_SATURATION_DAYS) as f32 / STREAK_SATURATION_DAYS as f32
        * w.streak as f32;

    let goal = &snapshot.weekly_goal;
    let weekly_ratio = if goal.target == 0 {
        0.0
    } else {
        (goal.progress as f32 / goal.target as f32).min(1.0)
    };
    let weekly = weekly_ratio * w.weekly as f32;

    HabitScore((recency + streak + weekly).clamp(0.0, w.total() as f32))
}

/// Distinct active days in the window ending on `today`.
pub fn count_recent_active_days<I>(days: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let window_start = today - Duration::days(RECENT_WINDOW_DAYS as i64 - 1);
    days.into_iter()
        .filter(|d| *d >= window_start && *d <= today)
        .collect::<HashSet<_>>()
        .len() as u32
}
