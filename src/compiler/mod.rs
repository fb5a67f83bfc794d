use crate::error::CompileError;
use crate::model::{Automaton, Contract, State, Transition};
use crate::report::ReportFormatter;
use crate::spec::{COMPLETED_STATE, CompiledAutomaton, CompiledTransition, Specification};
use crate::validator::Validator;
use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;
use itertools::Itertools;
use tracing::{debug, warn};

mod normalize;
mod ordering;
mod packages;

pub use normalize::{EMPTY_NAME_FALLBACK, normalize_state_name};
pub use packages::DEFAULT_PACKAGES;

use ordering::order_states;
use packages::PackageCollector;

/// Placeholder used when a transition's source state cannot be resolved.
pub const UNRESOLVED_SOURCE: &str = "q0";
/// Placeholder used when a transition's target state cannot be resolved.
pub const UNRESOLVED_DESTINATION: &str = "q1";

/// Generated wire key of the `index`-th real automaton.
pub fn automaton_key(index: usize) -> String {
    format!("Automata{}", index)
}

/// Synthetic condition that holds once the automaton under `key` has completed.
pub fn completion_condition(key: &str) -> String {
    format!("automata__{}__is_completed", key)
}

/// Compiles a contract into the backend [`Specification`].
///
/// The compiler owns a snapshot of the contract and never changes it.
pub struct Compiler {
    contract: Contract,
    default_packages: Vec<String>,
    strict: bool,
    preflight: bool,
}

pub struct CompilerBuilder {
    contract: Contract,
    default_packages: Vec<String>,
    strict: bool,
    preflight: bool,
}

impl CompilerBuilder {
    pub fn new(contract: Contract) -> Self {
        Self {
            contract,
            default_packages: DEFAULT_PACKAGES.iter().map(|p| p.to_string()).collect(),
            strict: false,
            preflight: false,
        }
    }

    /// Packages emitted when no condition references one.
    pub fn with_default_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_packages = packages.into_iter().map(Into::into).collect();
        self
    }

    /// Fail on unresolved states and dependencies instead of substituting placeholders.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Refuse to compile a contract that does not pass [`Validator::validate_contract`].
    pub fn with_preflight(mut self, preflight: bool) -> Self {
        self.preflight = preflight;
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            contract: self.contract,
            default_packages: self.default_packages,
            strict: self.strict,
            preflight: self.preflight,
        }
    }
}

impl Compiler {
    pub fn builder(contract: Contract) -> CompilerBuilder {
        CompilerBuilder::new(contract)
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn compile(&self) -> Result<Specification, CompileError> {
        if self.preflight {
            let report = Validator::validate_contract(&self.contract);
            if !report.is_deployable() {
                return Err(CompileError::Preflight(ReportFormatter::format_contract(
                    &report,
                )));
            }
        }

        // Keys are assigned up front so dependencies on later automata resolve.
        // A repeated id resolves to its first automaton.
        let mut keys: AHashMap<&str, String> = AHashMap::new();
        for (index, automaton) in self.contract.clauses().enumerate() {
            keys.entry(automaton.id.as_str()).or_insert_with(|| automaton_key(index));
        }

        let mut packages = PackageCollector::default();
        let mut automatons = IndexMap::new();
        for (index, automaton) in self.contract.clauses().enumerate() {
            let key = automaton_key(index);
            let compiled = self.compile_automaton(automaton, &keys, &mut packages)?;
            debug!(
                automaton = %automaton.id,
                key = %key,
                states = compiled.states.len(),
                transitions = compiled.transitions.len(),
                "compiled automaton"
            );
            automatons.insert(key, compiled);
        }

        Ok(Specification {
            name: self.contract.name.clone(),
            automatons,
            required_packages: packages.finish(&self.default_packages),
        })
    }

    fn compile_automaton(
        &self,
        automaton: &Automaton,
        keys: &AHashMap<&str, String>,
        packages: &mut PackageCollector,
    ) -> Result<CompiledAutomaton, CompileError> {
        let (states, names) = assign_state_names(automaton);

        let transitions = automaton
            .transitions
            .iter()
            .map(|transition| {
                self.compile_transition(automaton, transition, &names, keys, packages)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledAutomaton {
            states: order_states(&states, &transitions),
            transitions,
        })
    }

    fn compile_transition(
        &self,
        automaton: &Automaton,
        transition: &Transition,
        names: &AHashMap<&str, String>,
        keys: &AHashMap<&str, String>,
        packages: &mut PackageCollector,
    ) -> Result<CompiledTransition, CompileError> {
        let source = self.resolve_state(
            automaton,
            transition,
            &transition.source,
            names,
            UNRESOLVED_SOURCE,
        )?;
        let destination = match automaton.find_state(&transition.target) {
            Some(target) if target.is_declared_final() => COMPLETED_STATE.to_string(),
            _ => self.resolve_state(
                automaton,
                transition,
                &transition.target,
                names,
                UNRESOLVED_DESTINATION,
            )?,
        };

        let mut conditions = Vec::with_capacity(
            transition.conditions.len() + transition.automata_dependencies.len(),
        );
        for condition in &transition.conditions {
            packages.record(condition);
            conditions.push(condition.to_wire());
        }
        for dependency_id in transition.automata_dependencies.iter().unique() {
            match keys.get(dependency_id.as_str()) {
                Some(key) => conditions.push(serde_json::Value::String(completion_condition(key))),
                None if self.strict => {
                    return Err(CompileError::UnresolvedDependency {
                        automaton_id: automaton.id.clone(),
                        transition_id: transition.id.clone(),
                        dependency_id: dependency_id.clone(),
                    });
                }
                None => warn!(
                    automaton = %automaton.id,
                    transition = %transition.id,
                    dependency = %dependency_id,
                    "dropping dependency on unknown automaton"
                ),
            }
        }

        Ok(CompiledTransition {
            source,
            destination,
            trigger: normalize_state_name(&transition.label),
            conditions,
        })
    }

    fn resolve_state(
        &self,
        automaton: &Automaton,
        transition: &Transition,
        state_id: &str,
        names: &AHashMap<&str, String>,
        fallback: &str,
    ) -> Result<String, CompileError> {
        if let Some(name) = names.get(state_id) {
            return Ok(name.clone());
        }
        if self.strict {
            return Err(CompileError::UnresolvedState {
                automaton_id: automaton.id.clone(),
                transition_id: transition.id.clone(),
                state_id: state_id.to_string(),
            });
        }
        warn!(
            automaton = %automaton.id,
            transition = %transition.id,
            state = %state_id,
            fallback,
            "unknown state, using placeholder"
        );
        Ok(fallback.to_string())
    }
}

/// Names every state of the automaton.
///
/// Returns the distinct names in declaration order (always containing
/// `completed` exactly once) and the mapping from state id to name.
fn assign_state_names(automaton: &Automaton) -> (Vec<String>, AHashMap<&str, String>) {
    let has_declared_final = automaton.states.iter().any(State::is_declared_final);
    let mut taken: AHashSet<String> = AHashSet::new();
    let mut states = Vec::with_capacity(automaton.states.len() + 1);
    let mut names = AHashMap::with_capacity(automaton.states.len());

    for state in &automaton.states {
        let name = if state.is_declared_final() {
            COMPLETED_STATE.to_string()
        } else {
            disambiguate(normalize_state_name(&state.label), &taken, has_declared_final)
        };
        if taken.insert(name.clone()) {
            states.push(name.clone());
        }
        names.insert(state.id.as_str(), name);
    }

    if !taken.contains(COMPLETED_STATE) {
        states.push(COMPLETED_STATE.to_string());
    }
    (states, names)
}

/// Suffixes `_2`, `_3`, ... onto names already in use. `completed` counts as
/// in use when a declared final state will claim it.
fn disambiguate(base: String, taken: &AHashSet<String>, reserve_completed: bool) -> String {
    let in_use =
        |name: &str| taken.contains(name) || (reserve_completed && name == COMPLETED_STATE);
    if !in_use(&base) {
        return base;
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{}_{}", base, suffix);
        if !in_use(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
