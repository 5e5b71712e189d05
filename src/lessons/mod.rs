pub mod backlog;
pub mod lesson;
pub mod recommender;
pub mod sequencer;

pub use lesson::{Difficulty, LessonNode};
