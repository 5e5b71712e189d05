//! Engagement nudges: which intervention to show, how it is labelled, and
//! which ones leave an audit trail.

pub mod alert;
pub mod panel;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use chrono::NaiveDate;

use crate::engagement::habit::HabitState;
use crate::engagement::streak::{StreakReason, WeeklyGoalReason};

pub use alert::{build_streak_alert, AlertType, StreakAlert};
pub use panel::{InterventionPanel, InterventionView};

/// Streak length at which a positive nudge becomes the long-streak variant.
pub const LONG_STREAK_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterventionKind {
    StreakRescue,
    WeeklyCatchup,
    Positive,
    PositiveLongStreak,
}

/// Highest priority first. `PositiveLongStreak` refines `Positive`.
pub const INTERVENTION_PRIORITY: [InterventionKind; 3] = [
    InterventionKind::StreakRescue,
    InterventionKind::WeeklyCatchup,
    InterventionKind::Positive,
];

/// Kinds that write an `intervention_shown` event when displayed.
pub const LOGGABLE_INTERVENTION_TYPES: [InterventionKind; 2] = [
    InterventionKind::StreakRescue,
    InterventionKind::WeeklyCatchup,
];

/// Presentation metadata for one intervention kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InterventionCta {
    pub label: &'static str,
    pub icon_name: &'static str,
    pub message: &'static str,
}

impl InterventionKind {
    pub fn as_code(self) -> &'static str {
        match self {
            InterventionKind::StreakRescue => "STREAK_RESCUE",
            InterventionKind::WeeklyCatchup => "WEEKLY_CATCHUP",
            InterventionKind::Positive => "POSITIVE",
            InterventionKind::PositiveLongStreak => "POSITIVE_LONG_STREAK",
        }
    }

    pub fn is_loggable(self) -> bool {
        LOGGABLE_INTERVENTION_TYPES.contains(&self)
    }

    pub fn cta(self) -> InterventionCta {
        match self {
            InterventionKind::StreakRescue => InterventionCta {
                label: "5分だけ学習する",
                icon_name: "flame",
                message: "streakが途切れそうです",
            },
            InterventionKind::WeeklyCatchup => InterventionCta {
                label: "今週の目標に追いつく",
                icon_name: "calendar",
                message: "今週の学習目標から遅れています",
            },
            InterventionKind::Positive => InterventionCta {
                label: "次のレッスンへ進む",
                icon_name: "sparkles",
                message: "良いペースで学習できています",
            },
            InterventionKind::PositiveLongStreak => InterventionCta {
                label: "この調子で続ける",
                icon_name: "trophy",
                message: "長期streakを継続中です",
            },
        }
    }
}

/// Everything the selector looks at for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionInput {
    pub habit_state: HabitState,
    pub streak_reason: StreakReason,
    pub streak: u32,
    pub weekly_reason: WeeklyGoalReason,
    pub recent_active_days: u32,
}

fn streak_at_risk(reason: StreakReason) -> bool {
    matches!(reason, StreakReason::ActiveYesterday | StreakReason::Broken)
}

fn applies(kind: InterventionKind, input: &InterventionInput) -> bool {
    match kind {
        InterventionKind::StreakRescue => {
            input.habit_state == HabitState::Danger && streak_at_risk(input.streak_reason)
        }
        InterventionKind::WeeklyCatchup => input.weekly_reason == WeeklyGoalReason::Behind,
        InterventionKind::Positive | InterventionKind::PositiveLongStreak => {
            input.habit_state == HabitState::Stable
        }
    }
}

/// Pick at most one intervention, walking `INTERVENTION_PRIORITY` in order.
pub fn select_intervention(input: &InterventionInput) -> Option<InterventionKind> {
    let kind = INTERVENTION_PRIORITY
        .iter()
        .copied()
        .find(|kind| applies(*kind, input))?;

    if kind == InterventionKind::Positive && input.streak >= LONG_STREAK_DAYS {
        return Some(InterventionKind::PositiveLongStreak);
    }
    Some(kind)
}

/// Stable id for "this kind, shown to this user, on this day".
pub fn intervention_instance_id(user_id: &str, kind: InterventionKind, day: NaiveDate) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(b":");
    hasher.update(kind.as_code().as_bytes());
    hasher.update(b":");
    hasher.update(day.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}
