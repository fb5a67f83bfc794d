//! Cross-automaton dependency analysis.
//!
//! The dependency graph has an edge `A -> B` whenever some transition of `B`
//! lists `A` in its `automata_dependencies`: `A` must complete before `B` can
//! move past that transition, so `A` is deployed first.

use crate::graph::{StateGraph, find_cycle};
use crate::model::{Automaton, Contract};
use ahash::AHashMap;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Result of a full scan for dependency cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyCycle {
    pub cyclic: bool,
    /// Automaton names along the cycle, closing on the first name.
    pub path: Vec<String>,
}

/// Read-only view of the dependency graph of one contract.
pub struct DependencyAnalyzer<'a> {
    nodes: Vec<&'a Automaton>,
    index: AHashMap<&'a str, usize>,
    /// `dependents[a]` lists the automata that depend on `a`, in discovery order.
    dependents: Vec<Vec<usize>>,
}

impl<'a> DependencyAnalyzer<'a> {
    pub fn new(contract: &'a Contract) -> Self {
        let nodes: Vec<&Automaton> = contract.clauses().collect();
        // A repeated id resolves to its first automaton.
        let mut index: AHashMap<&str, usize> = AHashMap::with_capacity(nodes.len());
        for (i, automaton) in nodes.iter().enumerate() {
            index.entry(automaton.id.as_str()).or_insert(i);
        }

        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        for (dependent, automaton) in nodes.iter().enumerate() {
            let dependencies = automaton
                .transitions
                .iter()
                .flat_map(|t| t.automata_dependencies.iter());
            for dependency_id in dependencies {
                match index.get(dependency_id.as_str()) {
                    Some(&dependency) => {
                        if !dependents[dependency].contains(&dependent) {
                            dependents[dependency].push(dependent);
                        }
                    }
                    None => warn!(
                        automaton = %automaton.id,
                        dependency = %dependency_id,
                        "ignoring dependency on unknown automaton"
                    ),
                }
            }
        }

        Self {
            nodes,
            index,
            dependents,
        }
    }

    /// Whether making `source_automaton_id` depend on `proposed_dependency_id`
    /// would leave the dependency graph with a cycle.
    ///
    /// Meant to be called before the edit is applied. Unknown ids never form a
    /// cycle; an automaton depending on itself always does.
    pub fn would_create_cycle(
        &self,
        source_automaton_id: &str,
        proposed_dependency_id: &str,
    ) -> bool {
        if source_automaton_id == proposed_dependency_id {
            return true;
        }
        let (Some(&dependent), Some(&dependency)) = (
            self.index.get(source_automaton_id),
            self.index.get(proposed_dependency_id),
        ) else {
            return false;
        };

        let mut simulated = self.dependents.clone();
        if !simulated[dependency].contains(&dependent) {
            simulated[dependency].push(dependent);
        }
        find_cycle(simulated.len(), |n| simulated[n].as_slice()).is_some()
    }

    /// Scans the committed dependencies for a cycle.
    pub fn has_cyclic_dependencies(&self) -> DependencyCycle {
        match find_cycle(self.nodes.len(), |n| self.dependents[n].as_slice()) {
            Some(cycle) => DependencyCycle {
                cyclic: true,
                path: cycle
                    .into_iter()
                    .map(|n| self.nodes[n].name.clone())
                    .collect(),
            },
            None => DependencyCycle::default(),
        }
    }

    /// Kahn's algorithm over the dependency graph. Every dependency precedes its
    /// dependents; ties keep contract order. Automata caught in a cycle are left
    /// out.
    pub fn deployment_order(&self) -> Vec<String> {
        let mut indegree = vec![0usize; self.nodes.len()];
        for targets in &self.dependents {
            for &target in targets {
                indegree[target] += 1;
            }
        }

        let mut queue: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&n| indegree[n] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(node) = queue.pop_front() {
            order.push(self.nodes[node].id.clone());
            for &next in &self.dependents[node] {
                indegree[next] -= 1;
                if indegree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if order.len() != self.nodes.len() {
            warn!(
                ordered = order.len(),
                total = self.nodes.len(),
                "dependency cycle left automata out of the deployment order"
            );
        }
        debug!(order = ?order, "computed deployment order");
        order
    }

    /// Every real automaton has at least one state without outgoing transitions.
    pub fn all_automata_have_final_state(&self) -> bool {
        self.nodes
            .iter()
            .all(|a| StateGraph::new(a).sinks().next().is_some())
    }
}
