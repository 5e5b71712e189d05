pub mod event;
pub mod habit;
pub mod snapshot;
pub mod streak;

pub use event::{EventType, LearningEvent};
pub use habit::{habit_score, HabitScore, HabitState};
pub use snapshot::{EngagementSnapshot, WeeklyGoal};
pub use streak::{streak_status, weekly_goal_status, StreakReason, StreakStatus, WeeklyGoalReason};
