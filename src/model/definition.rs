use serde::{Deserialize, Serialize};

/// Editor id of the synthetic deployment-visualization automaton.
pub const DEPLOYMENT_FLOW_ID: &str = "flow-deploiement";

/// The declared role of a state inside its automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateType {
    Initial,
    Standard,
    Final,
}

/// Layout coordinates, carried through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A node of an automaton graph.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub id: String,
    pub label: String,
    /// `None` means the type is inferred from connectivity, see [`Automaton::resolved_type`].
    pub state_type: Option<StateType>,
    pub position: Position,
}

impl State {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            state_type: None,
            position: Position::default(),
        }
    }

    pub fn with_type(mut self, state_type: StateType) -> Self {
        self.state_type = Some(state_type);
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    pub fn is_declared_final(&self) -> bool {
        self.state_type == Some(StateType::Final)
    }
}

/// A condition guarding a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A bare token such as `package__payment__process_payment`.
    Token(String),
    /// An editor object carrying a `package` field. Passed through verbatim.
    Structured(serde_json::Map<String, serde_json::Value>),
}

impl Condition {
    /// Returns the package this condition draws from, if any.
    ///
    /// Tokens must look like `package__<name>__<function>`. Structured
    /// conditions read `package` as a string, or as an object exposing
    /// `name`, `label` or `id` (in that order of preference).
    pub fn package_name(&self) -> Option<String> {
        match self {
            Condition::Token(token) => {
                let mut segments = token.split("__");
                if segments.next() != Some("package") {
                    return None;
                }
                segments
                    .next()
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
            }
            Condition::Structured(fields) => match fields.get("package")? {
                serde_json::Value::String(name) if !name.is_empty() => Some(name.clone()),
                serde_json::Value::Object(package) => ["name", "label", "id"]
                    .iter()
                    .filter_map(|key| package.get(*key))
                    .find_map(scalar_to_string),
                _ => None,
            },
        }
    }

    /// The wire representation used in the compiled specification.
    pub fn to_wire(&self) -> serde_json::Value {
        match self {
            Condition::Token(token) => serde_json::Value::String(token.clone()),
            Condition::Structured(fields) => serde_json::Value::Object(fields.clone()),
        }
    }
}

fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A directed edge between two states of the same automaton.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub conditions: Vec<Condition>,
    /// Ids of automata that must complete before this transition may fire.
    pub automata_dependencies: Vec<String>,
}

impl Transition {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: label.into(),
            conditions: Vec::new(),
            automata_dependencies: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_dependency(mut self, automaton_id: impl Into<String>) -> Self {
        let automaton_id = automaton_id.into();
        if !self.automata_dependencies.contains(&automaton_id) {
            self.automata_dependencies.push(automaton_id);
        }
        self
    }
}

/// Distinguishes real clauses from the synthetic deployment view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutomatonKind {
    #[default]
    Clause,
    /// Visualization of the deployment flow. Never validated or compiled.
    DeploymentFlow,
}

/// A named finite-state graph ("clause").
#[derive(Debug, Clone, PartialEq)]
pub struct Automaton {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub kind: AutomatonKind,
    pub states: Vec<State>,
    pub transitions: Vec<Transition>,
}

impl Automaton {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
            kind: AutomatonKind::Clause,
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// The synthetic deployment-visualization automaton.
    pub fn deployment_flow() -> Self {
        Self {
            kind: AutomatonKind::DeploymentFlow,
            ..Self::new(DEPLOYMENT_FLOW_ID, "Deployment flow")
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.kind == AutomatonKind::DeploymentFlow
    }

    pub fn find_state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    pub fn find_transition(&self, id: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.id == id)
    }

    /// The declared type of a state, or the type implied by its connectivity.
    ///
    /// Inference: no incoming but some outgoing edges is `Initial`, no outgoing
    /// but some incoming edges is `Final`, anything else is `Standard`.
    pub fn resolved_type(&self, state: &State) -> StateType {
        if let Some(declared) = state.state_type {
            return declared;
        }
        let incoming = self.transitions.iter().any(|t| t.target == state.id);
        let outgoing = self.transitions.iter().any(|t| t.source == state.id);
        match (incoming, outgoing) {
            (false, true) => StateType::Initial,
            (true, false) => StateType::Final,
            _ => StateType::Standard,
        }
    }
}

/// Lifecycle status of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    #[default]
    Draft,
    Deployed,
}

/// A named collection of automata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contract {
    pub name: String,
    pub status: ContractStatus,
    pub automata: Vec<Automaton>,
}

impl Contract {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn find_automaton(&self, id: &str) -> Option<&Automaton> {
        self.automata.iter().find(|a| a.id == id)
    }

    /// Every automaton except the synthetic deployment view, in contract order.
    pub fn clauses(&self) -> impl Iterator<Item = &Automaton> {
        self.automata.iter().filter(|a| !a.is_synthetic())
    }
}
