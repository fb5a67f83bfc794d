use crate::graph::StateGraph;
use crate::model::Automaton;

/// Summary counts shown next to the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutomatonStats {
    pub states: usize,
    pub transitions: usize,
    /// States with no incoming transition.
    pub initial_states: usize,
    /// States with no outgoing transition.
    pub final_states: usize,
    pub isolated_states: usize,
}

impl AutomatonStats {
    pub(crate) fn collect(automaton: &Automaton) -> Self {
        let graph = StateGraph::new(automaton);
        Self {
            states: automaton.states.len(),
            transitions: automaton.transitions.len(),
            initial_states: graph.sources().count(),
            final_states: graph.sinks().count(),
            isolated_states: graph.isolated().count(),
        }
    }
}
