//! Common test utilities for building contracts.
use clauseflow::prelude::*;

/// Builds an automaton from `(id, label, type)` states and `(source, target, label)` edges.
#[allow(dead_code)]
pub fn automaton(
    id: &str,
    name: &str,
    states: &[(&str, &str, Option<StateType>)],
    edges: &[(&str, &str, &str)],
) -> Automaton {
    let mut automaton = Automaton::new(id, name);
    automaton.states = states
        .iter()
        .map(|(id, label, state_type)| State {
            state_type: *state_type,
            ..State::new(*id, *label)
        })
        .collect();
    automaton.transitions = edges
        .iter()
        .enumerate()
        .map(|(i, (source, target, label))| {
            Transition::new(format!("{}-t{}", id, i), *source, *target, *label)
        })
        .collect();
    automaton
}

/// `A (initial) -> B -> C (final)`
#[allow(dead_code)]
pub fn create_linear_automaton(id: &str, name: &str) -> Automaton {
    automaton(
        id,
        name,
        &[
            ("a", "A", Some(StateType::Initial)),
            ("b", "B", None),
            ("c", "C", Some(StateType::Final)),
        ],
        &[("a", "b", "start"), ("b", "c", "finish")],
    )
}

/// Three clauses X, Y, Z where Y depends on X and Z depends on Y.
///
/// The automata are declared in reverse order so that any correct ordering
/// has to follow the dependencies rather than the declaration order.
#[allow(dead_code)]
pub fn create_chained_contract() -> Contract {
    let x = create_linear_automaton("x", "X");
    let mut y = create_linear_automaton("y", "Y");
    let mut z = create_linear_automaton("z", "Z");
    y.transitions[0].automata_dependencies.push("x".to_string());
    z.transitions[0].automata_dependencies.push("y".to_string());
    Contract {
        automata: vec![z, y, x],
        ..Contract::new("Chained")
    }
}

/// A lease contract in the editor's JSON format, including the deployment view.
#[allow(dead_code)]
pub const LEASE_CONTRACT_JSON: &str = r#"{
    "name": "Bail commercial",
    "status": "draft",
    "automates": [
        {
            "id": "flow-deploiement",
            "name": "Déploiement",
            "states": [{ "id": "d1", "label": "Deploy" }],
            "transitions": []
        },
        {
            "id": "01",
            "name": "Loyer",
            "active": true,
            "states": [
                { "id": "s1", "label": "En attente", "type": "initial", "position": { "x": 0, "y": 0 } },
                { "id": "s2", "label": "Paiement reçu", "position": { "x": 200, "y": 0 } },
                { "id": "s3", "label": "Clôturé", "type": "final", "position": { "x": 400, "y": 0 } }
            ],
            "transitions": [
                {
                    "id": "t1", "source": "s1", "target": "s2", "label": "Payer",
                    "conditions": ["package__payment__process_payment"],
                    "automataDependencies": ["02"]
                },
                {
                    "id": "t2", "source": "s2", "target": "s3", "label": "Clôturer",
                    "conditions": [{ "package": { "name": "notification" }, "function": "send" }]
                }
            ]
        },
        {
            "id": "02",
            "name": "État des lieux",
            "states": [
                { "id": "e1", "label": "Visite" },
                { "id": "e2", "label": "Signé" }
            ],
            "transitions": [
                { "id": "u1", "source": "e1", "target": "e2", "label": "Signer",
                  "conditions": ["package__identity__verify_signature"] }
            ]
        }
    ]
}"#;
