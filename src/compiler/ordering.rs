use crate::spec::{COMPLETED_STATE, CompiledTransition};
use ahash::AHashMap;
use std::collections::VecDeque;

/// Orders compiled state names topologically along the compiled transitions.
///
/// Kahn's algorithm seeded with indegree-zero states in their original order.
/// States the traversal never reaches keep their original relative order at
/// the end, and `completed` is always moved last. Transitions whose endpoints
/// are not in `states` are ignored.
pub(super) fn order_states(states: &[String], transitions: &[CompiledTransition]) -> Vec<String> {
    let index: AHashMap<&str, usize> = states
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); states.len()];
    let mut indegree = vec![0usize; states.len()];
    for transition in transitions {
        if let (Some(&from), Some(&to)) = (
            index.get(transition.source.as_str()),
            index.get(transition.destination.as_str()),
        ) {
            successors[from].push(to);
            indegree[to] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..states.len()).filter(|&n| indegree[n] == 0).collect();
    let mut placed = vec![false; states.len()];
    let mut ordered = Vec::with_capacity(states.len());
    while let Some(node) = queue.pop_front() {
        placed[node] = true;
        ordered.push(states[node].clone());
        for &next in &successors[node] {
            indegree[next] -= 1;
            if indegree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    ordered.extend(
        states
            .iter()
            .zip(&placed)
            .filter(|(_, done)| !**done)
            .map(|(name, _)| name.clone()),
    );

    if let Some(position) = ordered.iter().position(|s| s == COMPLETED_STATE) {
        let completed = ordered.remove(position);
        ordered.push(completed);
    }
    ordered
}
