use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::StudyError;

/// Difficulty tier; the derived ordering is beginner < intermediate < advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub difficulty: Difficulty,
    /// May reference lessons that are not in the catalogue
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl LessonNode {
    pub fn new<S: Into<String>>(id: S, difficulty: Difficulty, prerequisites: &[&str]) -> Self {
        LessonNode {
            id: id.into(),
            title: String::new(),
            difficulty,
            prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
            tags: Vec::new(),
        }
    }
}

/// Load the lesson catalogue from a JSON array file.
///
/// Duplicate ids keep the first occurrence; the catalogue is static for the
/// lifetime of the process.
pub fn load_lessons(path: &Path) -> Result<Vec<LessonNode>, StudyError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| StudyError::new(
            format!("Failed to read lesson catalogue: {}", e),
            "lessons"
        ).with_context(format!("path: {:?}", path)))?;

    let parsed: Vec<LessonNode> = serde_json::from_str(&content)
        .map_err(|e| StudyError::new(
            format!("Failed to parse lesson catalogue: {}", e),
            "json_parse"
        ).with_context(format!("path: {:?}", path)))?;

    let mut seen = HashSet::new();
    let mut lessons = Vec::with_capacity(parsed.len());
    for lesson in parsed {
        if seen.insert(lesson.id.clone()) {
            lessons.push(lesson);
        } else {
            tracing::warn!(lesson_id = %lesson.id, "Duplicate lesson id in catalogue, keeping first");
        }
    }

    tracing::info!(path = ?path, count = lessons.len(), "Loaded lesson catalogue");
    Ok(lessons)
}
