use crate::error::{ConversionError, ModelError};
use crate::model::{
    Automaton, AutomatonKind, Condition, Contract, ContractStatus, DEPLOYMENT_FLOW_ID,
    IntoContract, Position, State, StateType, Transition,
};
use serde::{Deserialize, Serialize};
use std::fs;

/// Extra node data attached by the graph editor.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UiStateData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub state_type: Option<String>,
}

/// Editor state (graph node)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiState {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub state_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<UiStateData>,
}

/// Editor transition (graph edge)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiTransition {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub conditions: Vec<serde_json::Value>,
    #[serde(default, rename = "automataDependencies", alias = "automata_dependencies")]
    pub automata_dependencies: Vec<String>,
}

/// Editor automaton ("clause")
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiAutomaton {
    pub id: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    pub states: Vec<UiState>,
    pub transitions: Vec<UiTransition>,
}

fn default_active() -> bool {
    true
}

/// Complete editor contract document
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiContract {
    pub name: String,
    #[serde(default)]
    pub status: ContractStatus,
    #[serde(alias = "automata")]
    pub automates: Vec<UiAutomaton>,
}

impl UiContract {
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        serde_json::from_str(json).map_err(|e| ConversionError::JsonParseError(e.to_string()))
    }

    pub fn from_file(path: &str) -> Result<Self, ConversionError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConversionError::ValidationError(format!("Could not read '{}': {}", path, e))
        })?;
        Self::from_json(&content)
    }
}

fn parse_state_type(raw: &str) -> Option<StateType> {
    match raw.to_ascii_lowercase().as_str() {
        "initial" | "input" | "start" => Some(StateType::Initial),
        "final" | "output" | "end" => Some(StateType::Final),
        "standard" | "default" => Some(StateType::Standard),
        _ => None,
    }
}

fn state_type_name(state_type: StateType) -> &'static str {
    match state_type {
        StateType::Initial => "initial",
        StateType::Standard => "standard",
        StateType::Final => "final",
    }
}

fn convert_condition(
    transition_id: &str,
    raw: serde_json::Value,
) -> Result<Condition, ConversionError> {
    match raw {
        serde_json::Value::String(token) => Ok(Condition::Token(token)),
        serde_json::Value::Object(fields) => Ok(Condition::Structured(fields)),
        other => Err(ConversionError::ValidationError(format!(
            "Transition '{}' has a condition that is neither a token nor an object: {}",
            transition_id, other
        ))),
    }
}

impl From<UiState> for State {
    fn from(raw: UiState) -> Self {
        let data = raw.data.unwrap_or_default();
        let label = raw.label.or(data.label).unwrap_or_else(|| raw.id.clone());
        let state_type = raw
            .state_type
            .or(data.state_type)
            .as_deref()
            .and_then(parse_state_type);
        State {
            id: raw.id,
            label,
            state_type,
            position: raw.position.unwrap_or_default(),
        }
    }
}

impl TryFrom<UiTransition> for Transition {
    type Error = ConversionError;

    fn try_from(raw: UiTransition) -> Result<Self, Self::Error> {
        let conditions = raw
            .conditions
            .into_iter()
            .map(|c| convert_condition(&raw.id, c))
            .collect::<Result<Vec<_>, _>>()?;
        let mut automata_dependencies: Vec<String> = Vec::new();
        for dependency in raw.automata_dependencies {
            if !automata_dependencies.contains(&dependency) {
                automata_dependencies.push(dependency);
            }
        }
        Ok(Transition {
            id: raw.id,
            source: raw.source,
            target: raw.target,
            label: raw.label,
            conditions,
            automata_dependencies,
        })
    }
}

// Dangling endpoints, cycles and duplicate names are not conversion errors:
// they are reported by the validator and tolerated by the compiler. Repeated
// ids are rejected since both keys and graph lookups rely on them.
impl IntoContract for UiContract {
    fn into_contract(self) -> Result<Contract, ConversionError> {
        let mut automata: Vec<Automaton> = Vec::with_capacity(self.automates.len());
        for raw in self.automates {
            if automata.iter().any(|a| a.id == raw.id) {
                return Err(ModelError::DuplicateAutomatonId(raw.id).into());
            }
            let kind = if raw.id == DEPLOYMENT_FLOW_ID {
                AutomatonKind::DeploymentFlow
            } else {
                AutomatonKind::Clause
            };
            let mut automaton = Automaton {
                kind,
                active: raw.active,
                ..Automaton::new(raw.id, raw.name)
            };
            for state in raw.states {
                automaton.add_state(State::from(state))?;
            }
            automaton.transitions = raw
                .transitions
                .into_iter()
                .map(Transition::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            automata.push(automaton);
        }

        Ok(Contract {
            name: self.name,
            status: self.status,
            automata,
        })
    }
}

impl From<&Contract> for UiContract {
    fn from(contract: &Contract) -> Self {
        let automates = contract
            .automata
            .iter()
            .map(|a| UiAutomaton {
                id: a.id.clone(),
                name: a.name.clone(),
                active: a.active,
                states: a
                    .states
                    .iter()
                    .map(|s| UiState {
                        id: s.id.clone(),
                        label: Some(s.label.clone()),
                        state_type: s.state_type.map(|t| state_type_name(t).to_string()),
                        position: Some(s.position),
                        data: None,
                    })
                    .collect(),
                transitions: a
                    .transitions
                    .iter()
                    .map(|t| UiTransition {
                        id: t.id.clone(),
                        source: t.source.clone(),
                        target: t.target.clone(),
                        label: t.label.clone(),
                        conditions: t.conditions.iter().map(Condition::to_wire).collect(),
                        automata_dependencies: t.automata_dependencies.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            name: contract.name.clone(),
            status: contract.status,
            automates,
        }
    }
}
