//! Tests for specification compilation.
mod common;
use clauseflow::compiler::{DEFAULT_PACKAGES, normalize_state_name};
use clauseflow::prelude::*;
use common::*;
use proptest::prelude::*;
use serde_json::json;

fn compile(contract: Contract) -> Specification {
    Compiler::builder(contract)
        .build()
        .compile()
        .expect("lenient compilation never fails")
}

fn single(automaton: Automaton) -> Contract {
    Contract {
        automata: vec![automaton],
        ..Contract::new("Test")
    }
}

#[test]
fn test_linear_automaton_compiles() {
    let spec = compile(single(create_linear_automaton("01", "Linear")));

    assert_eq!(spec.name, "Test");
    assert_eq!(spec.automatons.len(), 1);
    let compiled = spec.automatons.get("Automata0").expect("first key");
    assert_eq!(compiled.states, vec!["a", "b", "completed"]);
    assert_eq!(
        compiled.transitions,
        vec![
            CompiledTransition {
                source: "a".into(),
                destination: "b".into(),
                trigger: "start".into(),
                conditions: vec![],
            },
            CompiledTransition {
                source: "b".into(),
                destination: "completed".into(),
                trigger: "finish".into(),
                conditions: vec![],
            },
        ]
    );
    let defaults: Vec<String> = DEFAULT_PACKAGES.iter().map(|p| p.to_string()).collect();
    assert_eq!(spec.required_packages, defaults);
}

#[test]
fn test_completed_is_appended_without_declared_final() {
    let automaton = automaton(
        "01",
        "Open",
        &[("a", "Début", None), ("b", "Fin", None)],
        &[("a", "b", "Aller")],
    );
    let spec = compile(single(automaton));
    let compiled = spec.automatons.get("Automata0").unwrap();
    assert_eq!(compiled.states, vec!["debut", "fin", "completed"]);
    assert_eq!(compiled.transitions[0].destination, "fin");
    assert_eq!(compiled.transitions[0].trigger, "aller");
}

#[test]
fn test_states_follow_topological_order() {
    let automaton = automaton(
        "01",
        "Shuffled",
        &[
            ("c", "Third", None),
            ("done", "Done", Some(StateType::Final)),
            ("a", "First", Some(StateType::Initial)),
            ("b", "Second", None),
        ],
        &[("a", "b", "one"), ("b", "c", "two"), ("c", "done", "three")],
    );
    let spec = compile(single(automaton));
    assert_eq!(
        spec.automatons.get("Automata0").unwrap().states,
        vec!["first", "second", "third", "completed"]
    );
}

#[test]
fn test_packages_are_collected_in_first_seen_order() {
    let mut automaton = create_linear_automaton("01", "Pay");
    automaton.transitions[0].conditions = vec![
        Condition::Token("package__payment__process_payment".into()),
        Condition::Token("package__oracle__check".into()),
    ];
    let structured = json!({ "package": { "label": "notification" }, "function": "send" });
    automaton.transitions[1].conditions = vec![
        Condition::Token("package__payment__refund".into()),
        Condition::Structured(structured.as_object().unwrap().clone()),
    ];

    let spec = compile(single(automaton));
    assert_eq!(spec.required_packages, vec!["payment", "oracle", "notification"]);
    let transitions = &spec.automatons.get("Automata0").unwrap().transitions;
    assert_eq!(transitions[0].conditions[0], json!("package__payment__process_payment"));
    assert_eq!(transitions[1].conditions[1], structured);
}

#[test]
fn test_custom_default_packages() {
    let spec = Compiler::builder(single(create_linear_automaton("01", "Plain")))
        .with_default_packages(["core", "time"])
        .build()
        .compile()
        .unwrap();
    assert_eq!(spec.required_packages, vec!["core", "time"]);
}

#[test]
fn test_empty_default_packages_keep_builtin() {
    let spec = Compiler::builder(single(create_linear_automaton("01", "Plain")))
        .with_default_packages(Vec::<String>::new())
        .build()
        .compile()
        .unwrap();
    assert!(!spec.required_packages.is_empty());
    assert_eq!(spec.required_packages, DEFAULT_PACKAGES);
}

#[test]
fn test_keys_are_positional_even_with_repeated_ids() {
    let mut inventory = create_linear_automaton("02", "Inventory");
    inventory.transitions[0].automata_dependencies.push("01".into());
    let contract = Contract {
        automata: vec![
            create_linear_automaton("01", "Rent"),
            create_linear_automaton("01", "Deposit"),
            inventory,
        ],
        ..Contract::new("Shared ids")
    };
    let contract_copy = contract.clone();
    let spec = compile(contract);

    let keys: Vec<&str> = spec.automatons.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Automata0", "Automata1", "Automata2"]);
    // A repeated id resolves to the first automaton declaring it.
    assert_eq!(
        spec.automatons.get("Automata2").unwrap().transitions[0].conditions,
        vec![json!("automata__Automata0__is_completed")]
    );

    let preflight = Compiler::builder(contract_copy)
        .with_preflight(true)
        .build()
        .compile();
    assert!(matches!(preflight, Err(CompileError::Preflight(msg)) if msg.contains("id: 01")));
}

#[test]
fn test_dependencies_become_completion_conditions() {
    let spec = compile(create_chained_contract());

    // Declared order is z, y, x so keys follow it; z's dependency on y is a
    // forward reference to a later automaton.
    let keys: Vec<&str> = spec.automatons.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Automata0", "Automata1", "Automata2"]);
    let z = spec.automatons.get("Automata0").unwrap();
    let y = spec.automatons.get("Automata1").unwrap();
    assert_eq!(
        z.transitions[0].conditions,
        vec![json!("automata__Automata1__is_completed")]
    );
    assert_eq!(
        y.transitions[0].conditions,
        vec![json!("automata__Automata2__is_completed")]
    );
    // Dependency conditions do not count as packages.
    assert_eq!(spec.required_packages.len(), DEFAULT_PACKAGES.len());
}

#[test]
fn test_deployment_view_is_excluded_from_keys() {
    let mut contract = create_chained_contract();
    contract.automata.insert(0, Automaton::deployment_flow());
    let spec = compile(contract);
    assert_eq!(spec.automatons.len(), 3);
    assert_eq!(
        spec.automatons.get("Automata0").unwrap().transitions[0].conditions,
        vec![json!("automata__Automata1__is_completed")]
    );
}

#[test]
fn test_unresolved_references_fall_back() {
    let mut automaton = create_linear_automaton("01", "Broken");
    automaton
        .transitions
        .push(Transition::new("ghost", "nowhere", "elsewhere", "Lost").with_dependency("missing"));
    let spec = compile(single(automaton));
    let compiled = spec.automatons.get("Automata0").unwrap();
    let ghost = &compiled.transitions[2];
    assert_eq!(ghost.source, "q0");
    assert_eq!(ghost.destination, "q1");
    assert!(ghost.conditions.is_empty());
    assert_eq!(compiled.states.last().map(String::as_str), Some("completed"));
}

#[test]
fn test_strict_mode_rejects_unresolved_references() {
    let mut automaton = create_linear_automaton("01", "Broken");
    automaton
        .transitions
        .push(Transition::new("ghost", "a", "elsewhere", "Lost"));
    let result = Compiler::builder(single(automaton.clone()))
        .strict(true)
        .build()
        .compile();
    match result {
        Err(CompileError::UnresolvedState { state_id, transition_id, .. }) => {
            assert_eq!(state_id, "elsewhere");
            assert_eq!(transition_id, "ghost");
        }
        other => panic!("Expected UnresolvedState, got {:?}", other),
    }

    automaton.transitions[2].target = "c".into();
    automaton.transitions[2] = automaton.transitions[2].clone().with_dependency("missing");
    let result = Compiler::builder(single(automaton)).strict(true).build().compile();
    assert!(matches!(result, Err(CompileError::UnresolvedDependency { .. })));
}

#[test]
fn test_preflight_refuses_cyclic_contract() {
    let cyclic = automaton(
        "01",
        "Loop",
        &[("a", "A", None), ("b", "B", None)],
        &[("a", "b", "go"), ("b", "a", "back")],
    );
    let result = Compiler::builder(single(cyclic.clone()))
        .with_preflight(true)
        .build()
        .compile();
    match result {
        Err(CompileError::Preflight(message)) => assert!(message.contains("Cycle detected")),
        other => panic!("Expected Preflight, got {:?}", other),
    }

    // Without preflight the same graph still compiles.
    let spec = compile(single(cyclic));
    assert_eq!(spec.automatons.get("Automata0").unwrap().states, vec!["a", "b", "completed"]);
}

#[test]
fn test_compiler_does_not_touch_its_input() {
    let contract = create_chained_contract();
    let compiler = Compiler::builder(contract.clone()).build();
    compiler.compile().unwrap();
    assert_eq!(compiler.contract(), &contract);
}

fn arb_contract() -> impl Strategy<Value = Contract> {
    let labels = prop::collection::vec("[A-Za-zÀ-ÿ0-9 !°-]{0,10}", 1..6);
    let edges = prop::collection::vec((0usize..6, 0usize..6), 0..8);
    prop::collection::vec((labels, edges), 1..4).prop_map(|automata| {
        let mut contract = Contract::new("Generated");
        for (index, (labels, edges)) in automata.into_iter().enumerate() {
            let mut automaton =
                Automaton::new(format!("{:02}", index), format!("Clause {}", index));
            let count = labels.len();
            for (i, label) in labels.into_iter().enumerate() {
                let mut state = State::new(format!("s{}", i), label);
                if i == count - 1 {
                    state = state.with_type(StateType::Final);
                }
                automaton.states.push(state);
            }
            for (i, (from, to)) in edges.into_iter().enumerate() {
                let mut transition = Transition::new(
                    format!("t{}", i),
                    format!("s{}", from % count),
                    format!("s{}", to % count),
                    "go",
                );
                if index > 0 && i == 0 {
                    transition = transition.with_dependency(format!("{:02}", index - 1));
                }
                automaton.transitions.push(transition);
            }
            contract.automata.push(automaton);
        }
        contract
    })
}

proptest! {
    #[test]
    fn compiling_twice_is_byte_identical(contract in arb_contract()) {
        let compiler = Compiler::builder(contract).build();
        let first = serde_json::to_string(&compiler.compile().unwrap()).unwrap();
        let second = serde_json::to_string(&compiler.compile().unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn completed_is_last_and_unique(contract in arb_contract()) {
        let spec = Compiler::builder(contract).build().compile().unwrap();
        for (_, automaton) in spec.automatons.iter() {
            prop_assert_eq!(automaton.states.last().map(String::as_str), Some("completed"));
            prop_assert_eq!(automaton.states.iter().filter(|s| *s == "completed").count(), 1);
            for state in &automaton.states {
                prop_assert_eq!(&normalize_state_name(state), state);
            }
        }
    }
}
