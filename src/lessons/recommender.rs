use std::collections::HashSet;

use crate::lessons::lesson::LessonNode;

/// Pick up to `limit` lessons the learner has not completed yet.
///
/// Lessons whose known prerequisites are all completed rank ahead of lessons
/// still waiting on something, then easier tiers rank first. Equal keys keep
/// catalogue order.
pub fn recommend_lessons(
    lessons: &[LessonNode],
    completed: &HashSet<String>,
    limit: usize,
) -> Vec<LessonNode> {
    if limit == 0 {
        return Vec::new();
    }

    let known: HashSet<&str> = lessons.iter().map(|l| l.id.as_str()).collect();

    let mut candidates: Vec<(bool, &LessonNode)> = lessons
        .iter()
        .filter(|l| !completed.contains(&l.id))
        .map(|l| {
            let blocked = l.prerequisites.iter().any(|p| {
                known.contains(p.as_str()) && !completed.contains(p)
            });
            (blocked, l)
        })
        .collect();

    // sort_by_key is stable, which keeps catalogue order for ties
    candidates.sort_by_key(|(blocked, l)| (*blocked, l.difficulty));

    let picked: Vec<LessonNode> = candidates
        .into_iter()
        .take(limit)
        .map(|(_, l)| l.clone())
        .collect();

    tracing::debug!(
        total = lessons.len(),
        completed = completed.len(),
        picked = picked.len(),
        "Ranked lesson recommendations"
    );

    picked
}
