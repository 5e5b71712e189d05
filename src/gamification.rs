use std::collections::{HashMap, HashSet};
use chrono::NaiveDate;
use serde::Serialize;

use crate::engagement::event::{EventType, LearningEvent};

/// XP awarded for a single event; audit events earn nothing
pub fn xp_for(event_type: EventType) -> u32 {
    match event_type {
        EventType::LessonCompleted => 10,
        EventType::QuizCompleted => 20,
        EventType::NoteCreated => 5,
        EventType::InterventionShown => 0,
    }
}

/// Sum of XP over `events`
pub fn total_xp<'a, I>(events: I) -> u32
where
    I: IntoIterator<Item = &'a LearningEvent>,
{
    events.into_iter().map(|e| xp_for(e.event_type)).sum()
}

/// One leaderboard row; `rank` starts at 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub xp: u32,
    pub active_days: usize,
}

/// Rank users by XP earned in `events`, highest first.
/// Ties go to the user id in ascending order; users with no XP are left out.
pub fn leaderboard(events: &[LearningEvent], limit: usize) -> Vec<LeaderboardEntry> {
    let mut by_user: HashMap<&str, Vec<&LearningEvent>> = HashMap::new();
    let mut days: HashMap<&str, HashSet<NaiveDate>> = HashMap::new();

    for event in events {
        by_user.entry(event.user_id.as_str()).or_default().push(event);
        if event.event_type.is_activity() {
            days.entry(event.user_id.as_str()).or_default().insert(event.day());
        }
    }

    let mut ranked: Vec<(&str, u32)> = by_user
        .into_iter()
        .map(|(user_id, events)| (user_id, total_xp(events.iter().copied())))
        .filter(|(_, xp)| *xp > 0)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (user_id, xp))| LeaderboardEntry {
            rank: i + 1,
            user_id: user_id.to_string(),
            xp,
            active_days: days.get(user_id).map(|d| d.len()).unwrap_or(0),
        })
        .collect()
}
