//! Structural validation of automaton graphs.
//!
//! [`Validator::validate`] runs on every edit and reports every problem of a
//! single automaton at once. [`Validator::validate_contract`] is the gate run
//! before deployment: it adds the contract-wide checks on top.

use crate::dependency::{DependencyAnalyzer, DependencyCycle};
use crate::graph::StateGraph;
use crate::model::{Automaton, Contract};
use itertools::Itertools;
use std::fmt;
use tracing::debug;

mod stats;

pub use stats::AutomatonStats;

/// A single structural problem found in an automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Labels along the cycle, starting and ending on the repeated state.
    Cycle { path: Vec<String> },
    IsolatedStates { names: Vec<String> },
    NoFinalState,
    NoInitialState,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Cycle { path } => {
                write!(f, "Cycle detected: {}", path.iter().join(" -> "))
            }
            ValidationIssue::IsolatedStates { names } => {
                write!(f, "Isolated states: {}", names.iter().join(", "))
            }
            ValidationIssue::NoFinalState => {
                write!(f, "No final state: every state has an outgoing transition")
            }
            ValidationIssue::NoInitialState => {
                write!(f, "No initial state: every state has an incoming transition")
            }
        }
    }
}

/// Outcome of validating one automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn from_issues(errors: Vec<ValidationIssue>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// The diagnostics as display strings, in check order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Per-automaton entry of a [`ContractReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatonReport {
    pub automaton_id: String,
    pub automaton_name: String,
    pub report: ValidationReport,
}

/// Outcome of the pre-deployment checks over a whole contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractReport {
    pub automata: Vec<AutomatonReport>,
    /// Ids shared by more than one automaton.
    pub duplicate_ids: Vec<String>,
    /// Names that appear more than once, compared case-insensitively.
    pub duplicate_names: Vec<String>,
    pub dependency_cycle: DependencyCycle,
    pub all_have_final_state: bool,
}

impl ContractReport {
    pub fn is_deployable(&self) -> bool {
        self.automata.iter().all(|a| a.report.valid)
            && self.duplicate_ids.is_empty()
            && self.duplicate_names.is_empty()
            && !self.dependency_cycle.cyclic
            && self.all_have_final_state
    }
}

/// Stateless entry point for structural checks.
pub struct Validator;

impl Validator {
    /// Validates one automaton. All checks always run so that every problem
    /// can be shown at once. The deployment view is always valid.
    pub fn validate(automaton: &Automaton) -> ValidationReport {
        if automaton.is_synthetic() {
            return ValidationReport::from_issues(Vec::new());
        }

        let graph = StateGraph::new(automaton);
        let mut issues = Vec::new();

        if let Some(cycle) = graph.find_cycle() {
            issues.push(ValidationIssue::Cycle {
                path: cycle.into_iter().map(|n| graph.label(n).to_string()).collect(),
            });
        }

        let isolated: Vec<String> = graph.isolated().map(|n| graph.label(n).to_string()).collect();
        if !isolated.is_empty() {
            issues.push(ValidationIssue::IsolatedStates { names: isolated });
        }

        if !graph.is_empty() {
            if graph.sinks().next().is_none() {
                issues.push(ValidationIssue::NoFinalState);
            }
            if graph.sources().next().is_none() {
                issues.push(ValidationIssue::NoInitialState);
            }
        }

        debug!(
            automaton = %automaton.id,
            issues = issues.len(),
            "validated automaton"
        );
        ValidationReport::from_issues(issues)
    }

    pub fn stats(automaton: &Automaton) -> AutomatonStats {
        AutomatonStats::collect(automaton)
    }

    /// Runs every check required before a contract may be deployed.
    pub fn validate_contract(contract: &Contract) -> ContractReport {
        let automata = contract
            .clauses()
            .map(|a| AutomatonReport {
                automaton_id: a.id.clone(),
                automaton_name: a.name.clone(),
                report: Self::validate(a),
            })
            .collect();

        let duplicate_ids = contract
            .clauses()
            .map(|a| a.id.clone())
            .duplicates()
            .collect();
        let duplicate_names = contract
            .clauses()
            .map(|a| a.name.to_lowercase())
            .duplicates()
            .collect();

        let analyzer = DependencyAnalyzer::new(contract);
        ContractReport {
            automata,
            duplicate_ids,
            duplicate_names,
            dependency_cycle: analyzer.has_cyclic_dependencies(),
            all_have_final_state: analyzer.all_automata_have_final_state(),
        }
    }
}
