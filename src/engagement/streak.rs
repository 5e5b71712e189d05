use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::engagement::snapshot::{EngagementSnapshot, WeeklyGoal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreakReason {
    ActiveToday,
    ActiveYesterday,
    Broken,
    Recovered,
    NoActivityYet,
    Unknown,
}

impl StreakReason {
    pub fn as_code(self) -> &'static str {
        match self {
            StreakReason::ActiveToday => "ACTIVE_TODAY",
            StreakReason::ActiveYesterday => "ACTIVE_YESTERDAY",
            StreakReason::Broken => "BROKEN",
            StreakReason::Recovered => "RECOVERED",
            StreakReason::NoActivityYet => "NO_ACTIVITY_YET",
            StreakReason::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStatus {
    /// Streak as it stands today; zero once broken
    pub streak: u32,
    pub reason: StreakReason,
}

/// Classify the stored streak relative to `today` (UTC days).
pub fn streak_status(snapshot: &EngagementSnapshot, today: NaiveDate) -> StreakStatus {
    let yesterday = today - Duration::days(1);

    let (streak, reason) = match snapshot.last_activity_date {
        None => (0, StreakReason::NoActivityYet),
        Some(last) if last > today => (snapshot.streak, StreakReason::Unknown),
        Some(last) if last == today => {
            let restarted = snapshot.streak == 1
                && snapshot.previous_activity_date.is_some_and(|prev| prev < yesterday);
            if restarted {
                (snapshot.streak, StreakReason::Recovered)
            } else {
                (snapshot.streak, StreakReason::ActiveToday)
            }
        }
        Some(last) if last == yesterday => (snapshot.streak, StreakReason::ActiveYesterday),
        Some(_) => (0, StreakReason::Broken),
    };

    StreakStatus { streak, reason }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeeklyGoalReason {
    Achieved,
    OnTrack,
    Behind,
}

impl WeeklyGoalReason {
    pub fn as_code(self) -> &'static str {
        match self {
            WeeklyGoalReason::Achieved => "ACHIEVED",
            WeeklyGoalReason::OnTrack => "ON_TRACK",
            WeeklyGoalReason::Behind => "BEHIND",
        }
    }
}

/// Compare weekly progress with an even pace across the week.
///
/// Behind when progress trails `floor(target * days_elapsed / 7)` or when the
/// days left (today included) cannot cover what is still missing.
pub fn weekly_goal_status(goal: &WeeklyGoal, today: NaiveDate) -> WeeklyGoalReason {
    let progress = goal.progress_for(today) as u32;
    let target = goal.target as u32;

    if progress >= target {
        return WeeklyGoalReason::Achieved;
    }

    let days_elapsed = today.weekday().num_days_from_monday();
    let days_left = 7 - days_elapsed;
    let expected = target * days_elapsed / 7;

    if progress < expected || target - progress > days_left {
        WeeklyGoalReason::Behind
    } else {
        WeeklyGoalReason::OnTrack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn snapshot_with(streak: u32, last: Option<NaiveDate>, prev: Option<NaiveDate>) -> EngagementSnapshot {
        let mut snap = EngagementSnapshot::new(day(2024, 5, 13), 3);
        snap.streak = streak;
        snap.last_activity_date = last;
        snap.previous_activity_date = prev;
        snap
    }

    #[test]
    fn test_reasons_by_last_activity() {
        let today = day(2024, 5, 16);

        let none = snapshot_with(0, None, None);
        assert_eq!(streak_status(&none, today).reason, StreakReason::NoActivityYet);

        let active = snapshot_with(4, Some(today), Some(day(2024, 5, 15)));
        assert_eq!(streak_status(&active, today), StreakStatus { streak: 4, reason: StreakReason::ActiveToday });

        let yesterday = snapshot_with(3, Some(day(2024, 5, 15)), None);
        assert_eq!(streak_status(&yesterday, today).reason, StreakReason::ActiveYesterday);

        let broken = snapshot_with(9, Some(day(2024, 5, 10)), None);
        assert_eq!(streak_status(&broken, today), StreakStatus { streak: 0, reason: StreakReason::Broken });

        let future = snapshot_with(2, Some(day(2024, 5, 20)), None);
        assert_eq!(streak_status(&future, today).reason, StreakReason::Unknown);
    }

    #[test]
    fn test_restart_after_gap_is_recovered() {
        let today = day(2024, 5, 16);
        let snap = snapshot_with(1, Some(today), Some(day(2024, 5, 11)));
        assert_eq!(streak_status(&snap, today).reason, StreakReason::Recovered);

        let first_ever = snapshot_with(1, Some(today), None);
        assert_eq!(streak_status(&first_ever, today).reason, StreakReason::ActiveToday);
    }

    #[test]
    fn test_weekly_pace() {
        let monday = day(2024, 5, 13);
        let mut goal = WeeklyGoal::new(3, monday);
        assert_eq!(weekly_goal_status(&goal, monday), WeeklyGoalReason::OnTrack);

        // Thursday with nothing done: expected 3 * 3 / 7 = 1
        assert_eq!(weekly_goal_status(&goal, day(2024, 5, 16)), WeeklyGoalReason::Behind);

        goal.progress = 1;
        assert_eq!(weekly_goal_status(&goal, day(2024, 5, 16)), WeeklyGoalReason::OnTrack);

        goal.progress = 3;
        assert_eq!(weekly_goal_status(&goal, day(2024, 5, 16)), WeeklyGoalReason::Achieved);
    }

    #[test]
    fn test_full_week_target_midweek() {
        let mut goal = WeeklyGoal::new(7, day(2024, 5, 13));
        let wednesday = day(2024, 5, 15);

        // Monday and Tuesday done; Wednesday through Sunday still fit five more
        goal.progress = 2;
        assert_eq!(weekly_goal_status(&goal, wednesday), WeeklyGoalReason::OnTrack);

        goal.progress = 1;
        assert_eq!(weekly_goal_status(&goal, wednesday), WeeklyGoalReason::Behind);
    }

    #[test]
    fn test_unreachable_target_is_behind() {
        for target in 1..=7u8 {
            for offset in 0..7u32 {
                let today = day(2024, 5, 13 + offset);
                let days_left = 7 - offset as u8;
                for progress in 0..target {
                    let mut goal = WeeklyGoal::new(target, day(2024, 5, 13));
                    goal.progress = progress;
                    if target - progress > days_left {
                        assert_eq!(
                            weekly_goal_status(&goal, today),
                            WeeklyGoalReason::Behind,
                            "target {} progress {} on day {}",
                            target,
                            progress,
                            offset
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_stale_week_counts_as_zero() {
        let mut goal = WeeklyGoal::new(2, day(2024, 5, 13));
        goal.progress = 2;
        // Saturday of the following week
        assert_eq!(weekly_goal_status(&goal, day(2024, 5, 25)), WeeklyGoalReason::Behind);
    }
}
