use super::definition::{Automaton, Contract, State, Transition};
use crate::dependency::DependencyAnalyzer;
use crate::error::ModelError;

impl Automaton {
    pub fn add_state(&mut self, state: State) -> Result<(), ModelError> {
        if self.find_state(&state.id).is_some() {
            return Err(ModelError::DuplicateState {
                automaton_id: self.id.clone(),
                state_id: state.id,
            });
        }
        self.states.push(state);
        Ok(())
    }

    /// Removes a state together with every transition touching it.
    pub fn remove_state(&mut self, state_id: &str) -> Result<State, ModelError> {
        let position = self
            .states
            .iter()
            .position(|s| s.id == state_id)
            .ok_or_else(|| ModelError::UnknownState {
                automaton_id: self.id.clone(),
                state_id: state_id.to_string(),
            })?;
        self.transitions
            .retain(|t| t.source != state_id && t.target != state_id);
        Ok(self.states.remove(position))
    }

    /// Adds a transition between two existing, distinct states that are not
    /// already connected in that direction.
    pub fn add_transition(&mut self, transition: Transition) -> Result<(), ModelError> {
        for endpoint in [&transition.source, &transition.target] {
            if self.find_state(endpoint).is_none() {
                return Err(ModelError::UnknownState {
                    automaton_id: self.id.clone(),
                    state_id: endpoint.clone(),
                });
            }
        }
        if transition.source == transition.target {
            return Err(ModelError::SelfLoop(transition.id));
        }
        if self
            .transitions
            .iter()
            .any(|t| t.source == transition.source && t.target == transition.target)
        {
            return Err(ModelError::DuplicateTransition {
                source_id: transition.source,
                target_id: transition.target,
            });
        }
        self.transitions.push(transition);
        Ok(())
    }

    pub fn remove_transition(&mut self, transition_id: &str) -> Result<Transition, ModelError> {
        let position = self
            .transitions
            .iter()
            .position(|t| t.id == transition_id)
            .ok_or_else(|| ModelError::UnknownTransition {
                automaton_id: self.id.clone(),
                transition_id: transition_id.to_string(),
            })?;
        Ok(self.transitions.remove(position))
    }
}

impl Contract {
    fn name_taken(&self, name: &str, except_id: Option<&str>) -> bool {
        let wanted = name.to_lowercase();
        self.automata
            .iter()
            .filter(|a| Some(a.id.as_str()) != except_id)
            .any(|a| a.name.to_lowercase() == wanted)
    }

    fn automaton_mut(&mut self, id: &str) -> Result<&mut Automaton, ModelError> {
        self.automata
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ModelError::AutomatonNotFound(id.to_string()))
    }

    /// Adds an automaton. Names are unique within a contract, ignoring case.
    pub fn add_automaton(&mut self, automaton: Automaton) -> Result<(), ModelError> {
        if self.find_automaton(&automaton.id).is_some() {
            return Err(ModelError::DuplicateAutomatonId(automaton.id));
        }
        if self.name_taken(&automaton.name, None) {
            return Err(ModelError::DuplicateAutomatonName(automaton.name));
        }
        self.automata.push(automaton);
        Ok(())
    }

    pub fn rename_automaton(
        &mut self,
        id: &str,
        name: impl Into<String>,
    ) -> Result<(), ModelError> {
        let name = name.into();
        if self.find_automaton(id).is_none() {
            return Err(ModelError::AutomatonNotFound(id.to_string()));
        }
        if self.name_taken(&name, Some(id)) {
            return Err(ModelError::DuplicateAutomatonName(name));
        }
        self.automaton_mut(id)?.name = name;
        Ok(())
    }

    /// Removes an automaton and every dependency other automata had on it.
    pub fn remove_automaton(&mut self, id: &str) -> Result<Automaton, ModelError> {
        let position = self
            .automata
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| ModelError::AutomatonNotFound(id.to_string()))?;
        let removed = self.automata.remove(position);
        for transition in self.automata.iter_mut().flat_map(|a| a.transitions.iter_mut()) {
            transition.automata_dependencies.retain(|d| d != id);
        }
        Ok(removed)
    }

    /// Makes `transition_id` of `automaton_id` wait for `dependency_id` to complete.
    ///
    /// The contract is left untouched when the edit would create a dependency
    /// cycle.
    pub fn add_dependency(
        &mut self,
        automaton_id: &str,
        transition_id: &str,
        dependency_id: &str,
    ) -> Result<(), ModelError> {
        let dependency = self
            .find_automaton(dependency_id)
            .ok_or_else(|| ModelError::AutomatonNotFound(dependency_id.to_string()))?;
        if dependency.is_synthetic() {
            return Err(ModelError::SyntheticDependency(dependency_id.to_string()));
        }
        let automaton = self
            .find_automaton(automaton_id)
            .ok_or_else(|| ModelError::AutomatonNotFound(automaton_id.to_string()))?;
        if automaton.is_synthetic() {
            return Err(ModelError::SyntheticDependency(automaton_id.to_string()));
        }
        if automaton.find_transition(transition_id).is_none() {
            return Err(ModelError::UnknownTransition {
                automaton_id: automaton_id.to_string(),
                transition_id: transition_id.to_string(),
            });
        }

        if DependencyAnalyzer::new(self).would_create_cycle(automaton_id, dependency_id) {
            return Err(ModelError::DependencyCycle {
                dependent: automaton_id.to_string(),
                dependency: dependency_id.to_string(),
            });
        }

        let transition = self
            .automaton_mut(automaton_id)?
            .transitions
            .iter_mut()
            .find(|t| t.id == transition_id)
            .ok_or_else(|| ModelError::UnknownTransition {
                automaton_id: automaton_id.to_string(),
                transition_id: transition_id.to_string(),
            })?;
        if !transition.automata_dependencies.iter().any(|d| d == dependency_id) {
            transition.automata_dependencies.push(dependency_id.to_string());
        }
        Ok(())
    }
}
