use clap::Parser;
use clauseflow::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::result::Result;
use tracing_subscriber::EnvFilter;

const LABELS: &[&str] = &[
    "Brouillon",
    "Signé",
    "Paiement reçu",
    "Livraison",
    "Vérification",
    "Litige",
    "Échéance",
    "Résilié",
    "Validé",
    "Archivé",
];

const PACKAGES: &[(&str, &str)] = &[
    ("payment", "process_payment"),
    ("payment", "refund"),
    ("oracle", "check_delivery"),
    ("identity", "verify_signature"),
    ("notification", "send_notice"),
];

/// A CLI tool to generate random, deployable contracts for the clauseflow engine
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_contract.json")]
    output: String,

    /// Number of automata in the contract
    #[arg(long, default_value_t = 5)]
    automata: usize,

    /// Minimum number of states per automaton
    #[arg(long, default_value_t = 2)]
    min_states: usize,

    /// Maximum number of states per automaton
    #[arg(long, default_value_t = 8)]
    max_states: usize,

    /// Probability that an automaton depends on each earlier one
    #[arg(long, default_value_t = 0.3)]
    dependency_density: f64,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if cli.min_states < 2 || cli.min_states > cli.max_states {
        eprintln!(
            "Error: need 2 <= --min-states ({}) <= --max-states ({})",
            cli.min_states, cli.max_states
        );
        std::process::exit(1);
    }
    if !(0.0..=1.0).contains(&cli.dependency_density) {
        eprintln!("Error: --dependency-density must be between 0 and 1");
        std::process::exit(1);
    }

    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);
    println!("Generating contract with {} automata (seed {})...", cli.automata, seed);

    let mut contract = Contract::new(format!("Generated contract {}", seed));
    for index in 0..cli.automata {
        let state_count = rng.random_range(cli.min_states..=cli.max_states);
        contract.add_automaton(generate_automaton(&mut rng, index, state_count)?)?;
    }
    add_dependencies(&mut rng, &mut contract, cli.dependency_density)?;

    let report = Validator::validate_contract(&contract);
    println!("-> {}", ReportFormatter::format_contract(&report));

    let json_output = serde_json::to_string_pretty(&UiContract::from(&contract))?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved contract to '{}'",
        cli.output
    );
    Ok(())
}

/// Builds an acyclic automaton: every state links forward to a later one.
fn generate_automaton(
    rng: &mut StdRng,
    index: usize,
    state_count: usize,
) -> Result<Automaton, ModelError> {
    let mut automaton =
        Automaton::new(format!("{:02}", index + 1), format!("Clause {}", index + 1));

    for i in 0..state_count {
        let label = LABELS[rng.random_range(0..LABELS.len())];
        let mut state = State::new(format!("s{}", i), format!("{} {}", label, i))
            .at(i as f64 * 180.0, rng.random_range(0.0..300.0));
        if i == 0 {
            state = state.with_type(StateType::Initial);
        } else if i == state_count - 1 {
            state = state.with_type(StateType::Final);
        }
        automaton.add_state(state)?;
    }

    let mut next_id = 0;
    for from in 0..state_count - 1 {
        let mut targets = vec![from + 1];
        if from + 2 < state_count && rng.random_bool(0.3) {
            targets.push(rng.random_range(from + 2..state_count));
        }
        for to in targets {
            let mut transition = Transition::new(
                format!("t{}", next_id),
                format!("s{}", from),
                format!("s{}", to),
                format!("step {}", next_id),
            );
            if rng.random_bool(0.5) {
                let (package, function) = PACKAGES[rng.random_range(0..PACKAGES.len())];
                transition = transition.with_condition(Condition::Token(format!(
                    "package__{}__{}",
                    package, function
                )));
            }
            automaton.add_transition(transition)?;
            next_id += 1;
        }
    }
    Ok(automaton)
}

/// Adds dependencies only on earlier automata, going through the same cycle
/// check the editor uses.
fn add_dependencies(
    rng: &mut StdRng,
    contract: &mut Contract,
    density: f64,
) -> Result<(), ModelError> {
    let ids: Vec<String> = contract.automata.iter().map(|a| a.id.clone()).collect();
    for (position, dependent) in ids.iter().enumerate() {
        for dependency in &ids[..position] {
            if !rng.random_bool(density) {
                continue;
            }
            let transition_id = contract
                .find_automaton(dependent)
                .and_then(|a| a.transitions.first())
                .map(|t| t.id.clone());
            if let Some(transition_id) = transition_id {
                contract.add_dependency(dependent, &transition_id, dependency)?;
            }
        }
    }
    Ok(())
}
