use thiserror::Error;

/// Errors raised by edit operations that would break a model invariant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("An automaton named '{0}' already exists in this contract")]
    DuplicateAutomatonName(String),

    #[error("An automaton with id '{0}' already exists in this contract")]
    DuplicateAutomatonId(String),

    #[error("Automaton '{0}' not found")]
    AutomatonNotFound(String),

    #[error("State '{state_id}' already exists in automaton '{automaton_id}'")]
    DuplicateState {
        automaton_id: String,
        state_id: String,
    },

    #[error("State '{state_id}' not found in automaton '{automaton_id}'")]
    UnknownState {
        automaton_id: String,
        state_id: String,
    },

    #[error("Transition '{transition_id}' not found in automaton '{automaton_id}'")]
    UnknownTransition {
        automaton_id: String,
        transition_id: String,
    },

    #[error("Transition '{0}' would connect a state to itself")]
    SelfLoop(String),

    #[error("A transition from '{source_id}' to '{target_id}' already exists")]
    DuplicateTransition { source_id: String, target_id: String },

    #[error("Automaton '{0}' is the deployment view and cannot take part in dependencies")]
    SyntheticDependency(String),

    #[error("Making '{dependent}' depend on '{dependency}' would create a dependency cycle")]
    DependencyCycle {
        dependent: String,
        dependency: String,
    },
}

/// Errors that can occur when converting an editor document into a [`crate::model::Contract`].
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Failed to parse contract JSON: {0}")]
    JsonParseError(String),

    #[error("Invalid editor data: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors that can occur during specification compilation.
///
/// The default compiler is lenient and only produces these in strict or preflight mode.
#[derive(Error, Debug, Clone)]
pub enum CompileError {
    #[error(
        "Transition '{transition_id}' in automaton '{automaton_id}' references unknown state '{state_id}'"
    )]
    UnresolvedState {
        automaton_id: String,
        transition_id: String,
        state_id: String,
    },

    #[error(
        "Transition '{transition_id}' in automaton '{automaton_id}' depends on unknown automaton '{dependency_id}'"
    )]
    UnresolvedDependency {
        automaton_id: String,
        transition_id: String,
        dependency_id: String,
    },

    #[error("Contract is not deployable:\n{0}")]
    Preflight(String),
}

/// Errors raised while saving or loading a compiled specification.
#[derive(Error, Debug)]
pub enum SpecIoError {
    #[error("Could not access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid specification JSON: {0}")]
    Json(#[from] serde_json::Error),
}
