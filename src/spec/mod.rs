//! The backend deployment document.
//!
//! Field names are fixed by the deployment API and must not change.

use crate::error::SpecIoError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;

/// Name every compiled automaton uses for its terminal state.
pub const COMPLETED_STATE: &str = "completed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledTransition {
    pub source: String,
    pub destination: String,
    pub trigger: String,
    pub conditions: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompiledAutomaton {
    /// Topologically ordered; always ends with [`COMPLETED_STATE`].
    pub states: Vec<String>,
    pub transitions: Vec<CompiledTransition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    pub name: String,
    /// Keyed by `Automata<i>`, kept in compilation order so the emitted JSON is stable.
    pub automatons: IndexMap<String, CompiledAutomaton>,
    pub required_packages: Vec<String>,
}

impl Specification {
    pub fn to_json_pretty(&self) -> Result<String, SpecIoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the specification as pretty-printed JSON.
    pub fn save(&self, path: &str) -> Result<(), SpecIoError> {
        let json = self.to_json_pretty()?;
        fs::write(path, json).map_err(|source| SpecIoError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// Loads a previously saved specification.
    pub fn from_file(path: &str) -> Result<Self, SpecIoError> {
        let content = fs::read_to_string(path).map_err(|source| SpecIoError::Io {
            path: path.to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Specification {
        let mut automatons = IndexMap::new();
        for i in [0, 1, 2, 10] {
            automatons.insert(
                format!("Automata{i}"),
                CompiledAutomaton {
                    states: vec!["start".into(), COMPLETED_STATE.into()],
                    transitions: vec![CompiledTransition {
                        source: "start".into(),
                        destination: COMPLETED_STATE.into(),
                        trigger: "finish".into(),
                        conditions: vec![],
                    }],
                },
            );
        }
        Specification {
            name: "Lease".into(),
            automatons,
            required_packages: vec!["payment".into()],
        }
    }

    #[test]
    fn automatons_serialize_in_insertion_order() {
        let json = serde_json::to_string(&sample()).expect("serializes");
        let first = json.find("Automata2").expect("Automata2 present");
        let second = json.find("Automata10").expect("Automata10 present");
        assert!(first < second);
        assert!(json.contains("\"required_packages\":[\"payment\"]"));
        assert!(json.contains("\"destination\":\"completed\""));
    }

    #[test]
    fn json_reads_back_with_same_order() {
        let spec = sample();
        let json = spec.to_json_pretty().expect("serializes");
        let parsed: Specification = serde_json::from_str(&json).expect("parses");
        assert_eq!(parsed, spec);
        assert_eq!(
            parsed.automatons.keys().collect::<Vec<_>>(),
            vec!["Automata0", "Automata1", "Automata2", "Automata10"]
        );
    }
}
