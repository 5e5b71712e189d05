use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::lessons::lesson::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BacklogStatus {
    Pending,
    Published,
}

/// A lesson that is planned but may not have content yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklogEntry {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub difficulty: Difficulty,
    pub status: BacklogStatus,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl BacklogEntry {
    pub fn pending<S: Into<String>>(id: S, difficulty: Difficulty, prerequisites: &[&str]) -> Self {
        BacklogEntry {
            id: id.into(),
            title: String::new(),
            difficulty,
            status: BacklogStatus::Pending,
            prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn published<S: Into<String>>(id: S, difficulty: Difficulty) -> Self {
        BacklogEntry {
            id: id.into(),
            title: String::new(),
            difficulty,
            status: BacklogStatus::Published,
            prerequisites: Vec::new(),
        }
    }
}

/// Choose which pending lessons to write next.
///
/// A pending entry is skipped while any of its prerequisites is itself still
/// pending. The rest are returned beginner first, keeping backlog order within
/// a tier, and at most `count` of them.
pub fn top_generation_candidates(entries: &[BacklogEntry], count: usize) -> Vec<BacklogEntry> {
    let pending: HashSet<&str> = entries
        .iter()
        .filter(|e| e.status == BacklogStatus::Pending)
        .map(|e| e.id.as_str())
        .collect();

    let mut candidates: Vec<&BacklogEntry> = entries
        .iter()
        .filter(|e| e.status == BacklogStatus::Pending)
        .filter(|e| !e.prerequisites.iter().any(|p| pending.contains(p.as_str())))
        .collect();

    candidates.sort_by_key(|e| e.difficulty);

    candidates.into_iter().take(count).cloned().collect()
}
