use std::collections::{BTreeMap, HashMap, HashSet};
use chrono::NaiveDate;
use serde::{Serialize, Deserialize};

use crate::engagement::event::{EventType, LearningEvent};

/// Admin dashboard figures over a slice of the event log.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AnalyticsPayload {
    pub event_counts: HashMap<String, usize>,
    pub daily_active_users: BTreeMap<NaiveDate, usize>,
    /// intervention code → times shown (logged kinds only)
    pub intervention_counts: HashMap<String, usize>,
    /// lesson id → completions
    pub lesson_completions: HashMap<String, usize>,
    pub total_users: usize,
}

pub fn compute_analytics(events: &[LearningEvent]) -> AnalyticsPayload {
    let mut event_counts: HashMap<String, usize> = HashMap::new();
    let mut daily_users: BTreeMap<NaiveDate, HashSet<&str>> = BTreeMap::new();
    let mut intervention_counts: HashMap<String, usize> = HashMap::new();
    let mut lesson_completions: HashMap<String, usize> = HashMap::new();
    let mut users: HashSet<&str> = HashSet::new();

    for event in events {
        *event_counts.entry(event.event_type.as_str().to_string()).or_insert(0) += 1;
        users.insert(event.user_id.as_str());

        if event.event_type.is_activity() {
            daily_users
                .entry(event.day())
                .or_default()
                .insert(event.user_id.as_str());
        }

        match event.event_type {
            EventType::InterventionShown => {
                *intervention_counts.entry(event.subject_id.clone()).or_insert(0) += 1;
            }
            EventType::LessonCompleted => {
                *lesson_completions.entry(event.subject_id.clone()).or_insert(0) += 1;
            }
            EventType::QuizCompleted | EventType::NoteCreated => {}
        }
    }

    let daily_active_users = daily_users
        .into_iter()
        .map(|(day, users)| (day, users.len()))
        .collect();

    AnalyticsPayload {
        event_counts,
        daily_active_users,
        intervention_counts,
        lesson_completions,
        total_users: users.len(),
    }
}
