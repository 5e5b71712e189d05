use std::collections::HashSet;
use proptest::prelude::*;
use studyloop_lib::lessons::lesson::{Difficulty, LessonNode};
use studyloop_lib::lessons::sequencer::{is_linear_extension, topological_sort};

fn lesson(id: &str, prereqs: &[&str]) -> LessonNode {
    LessonNode::new(id, Difficulty::Beginner, prereqs)
}

fn ids(order: &[LessonNode]) -> Vec<&str> {
    order.iter().map(|l| l.id.as_str()).collect()
}

fn assert_permutation(input: &[LessonNode], output: &[LessonNode]) {
    assert_eq!(input.len(), output.len());
    let a: HashSet<&str> = input.iter().map(|l| l.id.as_str()).collect();
    let b: HashSet<&str> = output.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(a, b);
    assert_eq!(b.len(), output.len(), "no duplicates");
}

#[test]
fn test_prerequisites_come_first() {
    let input = vec![
        lesson("functions", &["variables"]),
        lesson("loops", &["variables"]),
        lesson("variables", &[]),
        lesson("recursion", &["functions", "loops"]),
    ];
    let out = topological_sort(&input);
    assert_permutation(&input, &out);
    assert!(is_linear_extension(&out));
    assert_eq!(ids(&out), vec!["variables", "functions", "loops", "recursion"]);
}

#[test]
fn test_ready_lessons_keep_input_order() {
    let input = vec![lesson("c", &[]), lesson("a", &[]), lesson("b", &[])];
    assert_eq!(ids(&topological_sort(&input)), vec!["c", "a", "b"]);
}

#[test]
fn test_unknown_prerequisite_does_not_block() {
    let input = vec![lesson("advanced", &["removed-lesson"]), lesson("intro", &[])];
    let out = topological_sort(&input);
    assert_eq!(ids(&out), vec!["advanced", "intro"]);
}

#[test]
fn test_cycle_emits_every_lesson_once() {
    let input = vec![
        lesson("a", &["c"]),
        lesson("b", &["a"]),
        lesson("c", &["b"]),
        lesson("free", &[]),
    ];
    let out = topological_sort(&input);
    assert_permutation(&input, &out);
    // "free" is ready first; the cycle is broken at its earliest member
    assert_eq!(ids(&out), vec!["free", "a", "b", "c"]);
}

#[test]
fn test_self_reference_terminates() {
    let input = vec![lesson("loop", &["loop"]), lesson("next", &["loop"])];
    let out = topological_sort(&input);
    assert_eq!(ids(&out), vec!["loop", "next"]);
}

#[test]
fn test_empty_input() {
    assert!(topological_sort(&[]).is_empty());
}

#[test]
fn test_larger_acyclic_graph_is_linear_extension() {
    // Each lesson depends on the two before it, listed in reverse order
    let mut input = Vec::new();
    for i in (0..30).rev() {
        let p1 = if i >= 1 { format!("l{}", i - 1) } else { String::new() };
        let p2 = if i >= 2 { format!("l{}", i - 2) } else { String::new() };
        let prereqs: Vec<&str> = [p1.as_str(), p2.as_str()]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        input.push(lesson(&format!("l{}", i), &prereqs));
    }
    let out = topological_sort(&input);
    assert_permutation(&input, &out);
    assert!(is_linear_extension(&out));
    assert_eq!(out[0].id, "l0");
    assert_eq!(out[29].id, "l29");
}

/// Lesson `l{i}` requires `l{j}` for each `j` in `edges[i]`; indices past the
/// end become prerequisites that are not in the catalogue.
fn build_graph(edges: &[Vec<usize>]) -> Vec<LessonNode> {
    let n = edges.len();
    edges
        .iter()
        .enumerate()
        .map(|(i, prereqs)| {
            let names: Vec<String> = prereqs
                .iter()
                .map(|&j| if j < n { format!("l{}", j) } else { format!("missing-{}", j) })
                .collect();
            let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
            lesson(&format!("l{}", i), &refs)
        })
        .collect()
}

fn is_acyclic(edges: &[Vec<usize>]) -> bool {
    let n = edges.len();
    let mut placed = vec![false; n];
    while let Some(i) = (0..n).find(|&i| !placed[i] && edges[i].iter().all(|&j| j >= n || placed[j])) {
        placed[i] = true;
    }
    placed.iter().all(|p| *p)
}

proptest! {
    #[test]
    fn arbitrary_graphs_are_permuted(
        edges in proptest::collection::vec(proptest::collection::vec(0usize..24, 0..4), 0..16)
    ) {
        let input = build_graph(&edges);
        let out = topological_sort(&input);
        assert_permutation(&input, &out);
        if is_acyclic(&edges) {
            prop_assert!(is_linear_extension(&out));
        }
    }

    #[test]
    fn acyclic_graphs_are_linear_extensions(
        picks in proptest::collection::vec(proptest::collection::vec(0usize..64, 0..4), 1..20)
    ) {
        // Every edge points at a later index, so listing order works against
        // the dependencies and the graph can never close a loop.
        let n = picks.len();
        let edges: Vec<Vec<usize>> = picks
            .iter()
            .enumerate()
            .map(|(i, ps)| {
                ps.iter()
                    .map(|&p| if i + 1 < n { i + 1 + p % (n - i - 1) } else { n + p })
                    .collect()
            })
            .collect();
        prop_assert!(is_acyclic(&edges));

        let input = build_graph(&edges);
        let out = topological_sort(&input);
        assert_permutation(&input, &out);
        prop_assert!(is_linear_extension(&out));
    }
}
