use crate::model::Automaton;
use ahash::AHashMap;

/// Index-based adjacency view over one automaton's states and transitions.
///
/// Node indices follow the order of `automaton.states`; successor lists follow
/// the order of `automaton.transitions`. Transitions naming unknown states are
/// left out.
pub struct StateGraph<'a> {
    automaton: &'a Automaton,
    successors: Vec<Vec<usize>>,
    indegree: Vec<usize>,
}

impl<'a> StateGraph<'a> {
    pub fn new(automaton: &'a Automaton) -> Self {
        let index: AHashMap<&str, usize> = automaton
            .states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.as_str(), i))
            .collect();

        let mut successors = vec![Vec::new(); automaton.states.len()];
        let mut indegree = vec![0; automaton.states.len()];
        for transition in &automaton.transitions {
            if let (Some(&from), Some(&to)) = (
                index.get(transition.source.as_str()),
                index.get(transition.target.as_str()),
            ) {
                successors[from].push(to);
                indegree[to] += 1;
            }
        }

        Self {
            automaton,
            successors,
            indegree,
        }
    }

    pub fn len(&self) -> usize {
        self.successors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    pub fn successors(&self, node: usize) -> &[usize] {
        &self.successors[node]
    }

    pub fn indegree(&self, node: usize) -> usize {
        self.indegree[node]
    }

    pub fn outdegree(&self, node: usize) -> usize {
        self.successors[node].len()
    }

    pub fn label(&self, node: usize) -> &'a str {
        &self.automaton.states[node].label
    }

    /// Nodes without incoming transitions.
    pub fn sources(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(|&n| self.indegree(n) == 0)
    }

    /// Nodes without outgoing transitions.
    pub fn sinks(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(|&n| self.outdegree(n) == 0)
    }

    pub fn isolated(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(|&n| self.indegree(n) == 0 && self.outdegree(n) == 0)
    }

    /// Depth-first search from every node. Returns the first cycle found as a
    /// node sequence that starts and ends on the repeated node.
    pub fn find_cycle(&self) -> Option<Vec<usize>> {
        find_cycle(self.len(), |n| self.successors(n))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// White/gray/black DFS over `0..node_count`. Iterative, so deep chains cannot
/// overflow the stack.
pub(crate) fn find_cycle<'g, F>(node_count: usize, successors: F) -> Option<Vec<usize>>
where
    F: Fn(usize) -> &'g [usize],
{
    let mut marks = vec![Mark::White; node_count];
    for root in 0..node_count {
        if marks[root] != Mark::White {
            continue;
        }
        // Each frame holds a node and the position of the next successor to visit.
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        marks[root] = Mark::Gray;
        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            match successors(node).get(cursor) {
                Some(&next) => {
                    frame.1 += 1;
                    match marks[next] {
                        Mark::White => {
                            marks[next] = Mark::Gray;
                            stack.push((next, 0));
                        }
                        Mark::Gray => {
                            let start = stack.iter().position(|&(n, _)| n == next).unwrap_or(0);
                            let mut cycle: Vec<usize> =
                                stack[start..].iter().map(|&(n, _)| n).collect();
                            cycle.push(next);
                            return Some(cycle);
                        }
                        Mark::Black => {}
                    }
                }
                None => {
                    marks[node] = Mark::Black;
                    stack.pop();
                }
            }
        }
    }
    None
}
