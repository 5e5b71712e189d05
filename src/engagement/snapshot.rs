use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const MAX_WEEKLY_TARGET: u8 = 7;

/// Monday of the week containing `date`
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyGoal {
    /// Active days wanted this week, 1..=7
    pub target: u8,
    /// Active days so far, never above target
    pub progress: u8,
    pub week_start: NaiveDate,
}

impl WeeklyGoal {
    pub fn new(target: u8, today: NaiveDate) -> Self {
        WeeklyGoal {
            target: target.clamp(1, MAX_WEEKLY_TARGET),
            progress: 0,
            week_start: week_start_of(today),
        }
    }

    /// Start a fresh week if `today` is past the tracked one.
    /// Returns true when progress was reset.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        let current = week_start_of(today);
        if current > self.week_start {
            self.week_start = current;
            self.progress = 0;
            return true;
        }
        false
    }

    /// Progress as it stands for the week containing `today`
    pub fn progress_for(&self, today: NaiveDate) -> u8 {
        if week_start_of(today) == self.week_start {
            self.progress
        } else {
            0
        }
    }

    pub fn set_target(&mut self, target: u8) {
        self.target = target.clamp(1, MAX_WEEKLY_TARGET);
        self.progress = self.progress.min(self.target);
    }

    fn record_day(&mut self, today: NaiveDate) {
        self.roll_over(today);
        self.progress = self.progress.saturating_add(1).min(self.target.min(MAX_WEEKLY_TARGET));
    }
}

/// Per-user engagement state, updated once per qualifying learning event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementSnapshot {
    pub streak: u32,
    pub last_activity_date: Option<NaiveDate>,
    /// Active day before `last_activity_date`, used to spot a restarted streak
    #[serde(default)]
    pub previous_activity_date: Option<NaiveDate>,
    pub weekly_goal: WeeklyGoal,
}

impl EngagementSnapshot {
    /// Zeroed snapshot for a user with no history
    pub fn new(today: NaiveDate, weekly_target: u8) -> Self {
        EngagementSnapshot {
            streak: 0,
            last_activity_date: None,
            previous_activity_date: None,
            weekly_goal: WeeklyGoal::new(weekly_target, today),
        }
    }

    /// Apply a learning activity that happened on `today`.
    ///
    /// Only the first activity of a day moves the streak and weekly progress.
    /// Activity dated before the last recorded day is ignored. Returns true
    /// when the snapshot changed.
    pub fn record_activity(&mut self, today: NaiveDate) -> bool {
        match self.last_activity_date {
            Some(last) if last == today => return false,
            Some(last) if last > today => {
                tracing::warn!(last = %last, today = %today, "Ignoring activity older than the last active day");
                return false;
            }
            Some(last) if last == today - Duration::days(1) => {
                self.streak = self.streak.saturating_add(1);
            }
            _ => {
                self.streak = 1;
            }
        }

        self.previous_activity_date = self.last_activity_date;
        self.last_activity_date = Some(today);
        self.weekly_goal.record_day(today);
        true
    }

    /// Explicit user reset; keeps the weekly target.
    pub fn reset(&mut self, today: NaiveDate) {
        let target = self.weekly_goal.target;
        *self = EngagementSnapshot::new(today, target);
    }
}
