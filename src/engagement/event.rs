use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    LessonCompleted,
    QuizCompleted,
    NoteCreated,
    /// Audit record for a displayed intervention; not a learning activity
    InterventionShown,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::LessonCompleted => "lesson_completed",
            EventType::QuizCompleted => "quiz_completed",
            EventType::NoteCreated => "note_created",
            EventType::InterventionShown => "intervention_shown",
        }
    }

    /// Whether the event counts toward streaks and weekly goals
    pub fn is_activity(self) -> bool {
        !matches!(self, EventType::InterventionShown)
    }
}

/// Append-only record of something a learner did (or was shown).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningEvent {
    pub user_id: String,
    pub event_type: EventType,
    pub subject_id: String,
    pub occurred_at: DateTime<Utc>,
}

impl LearningEvent {
    pub fn new<U: Into<String>, S: Into<String>>(
        user_id: U,
        event_type: EventType,
        subject_id: S,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        LearningEvent {
            user_id: user_id.into(),
            event_type,
            subject_id: subject_id.into(),
            occurred_at,
        }
    }

    /// UTC calendar day of the event
    pub fn day(&self) -> NaiveDate {
        self.occurred_at.date_naive()
    }
}
