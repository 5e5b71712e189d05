use std::collections::HashSet;

use crate::lessons::lesson::LessonNode;

/// Order lessons so that prerequisites come before the lessons that need them.
///
/// At each step the earliest lesson (in input order) whose known prerequisites
/// are already placed is emitted, so ready lessons keep their relative input
/// order. Prerequisites that are not in `lessons` count as satisfied. When no
/// lesson is ready the remaining ones sit on a cycle; the earliest of them is
/// emitted anyway and ordering resumes. The output is always a permutation of
/// the input.
pub fn topological_sort(lessons: &[LessonNode]) -> Vec<LessonNode> {
    let known: HashSet<&str> = lessons.iter().map(|l| l.id.as_str()).collect();
    let mut placed: HashSet<&str> = HashSet::with_capacity(lessons.len());
    let mut emitted = vec![false; lessons.len()];
    let mut ordered = Vec::with_capacity(lessons.len());

    while ordered.len() < lessons.len() {
        let next_ready = lessons.iter().enumerate().position(|(idx, lesson)| {
            !emitted[idx]
                && lesson.prerequisites.iter().all(|p| {
                    !known.contains(p.as_str()) || placed.contains(p.as_str())
                })
        });

        let idx = match next_ready {
            Some(idx) => idx,
            None => {
                let Some(idx) = emitted.iter().position(|done| !done) else {
                    break;
                };
                tracing::warn!(
                    lesson_id = %lessons[idx].id,
                    remaining = lessons.len() - ordered.len(),
                    "Prerequisite cycle detected, force-emitting lesson"
                );
                idx
            }
        };

        emitted[idx] = true;
        placed.insert(lessons[idx].id.as_str());
        ordered.push(lessons[idx].clone());
    }

    ordered
}

/// True when every known prerequisite of each lesson appears earlier in `order`.
pub fn is_linear_extension(order: &[LessonNode]) -> bool {
    let known: HashSet<&str> = order.iter().map(|l| l.id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(order.len());
    for lesson in order {
        let satisfied = lesson.prerequisites.iter().all(|p| {
            !known.contains(p.as_str()) || seen.contains(p.as_str())
        });
        if !satisfied {
            return false;
        }
        seen.insert(lesson.id.as_str());
    }
    true
}
