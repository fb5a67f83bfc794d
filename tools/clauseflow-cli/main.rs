use clap::{Parser, Subcommand};
use clauseflow::prelude::*;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Validate, order and compile smart contract automata
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate every automaton and run the pre-deployment checks
    Validate {
        /// Path to the contract JSON exported by the editor
        contract_path: String,
        /// Also print per-automaton statistics
        #[arg(short, long)]
        stats: bool,
    },
    /// Print the order in which automata can be deployed
    Order {
        /// Path to the contract JSON exported by the editor
        contract_path: String,
    },
    /// Compile the contract into the deployment specification
    Compile {
        /// Path to the contract JSON exported by the editor
        contract_path: String,
        /// Write the specification here instead of stdout
        #[arg(short, long)]
        out: Option<String>,
        /// Fail on unresolved states and dependencies
        #[arg(long)]
        strict: bool,
        /// Refuse to compile a contract that is not deployable
        #[arg(long)]
        preflight: bool,
        /// Packages to require when no condition references one
        #[arg(long = "default-package", value_name = "PACKAGE")]
        default_packages: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Validate {
            contract_path,
            stats,
        } => run_validate(&contract_path, stats),
        Command::Order { contract_path } => run_order(&contract_path),
        Command::Compile {
            contract_path,
            out,
            strict,
            preflight,
            default_packages,
        } => run_compile(&contract_path, out, strict, preflight, default_packages),
    }
}

fn load_contract(path: &str) -> Contract {
    UiContract::from_file(path)
        .and_then(IntoContract::into_contract)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load contract '{}': {}", path, e)))
}

fn run_validate(contract_path: &str, stats: bool) {
    let contract = load_contract(contract_path);

    for automaton in contract.clauses() {
        let report = Validator::validate(automaton);
        println!("{}", ReportFormatter::format_validation(&automaton.name, &report));
        if stats {
            println!(
                "  {}",
                ReportFormatter::format_stats(&Validator::stats(automaton))
            );
        }
    }

    let report = Validator::validate_contract(&contract);
    println!("\n{}", ReportFormatter::format_contract(&report));
    if !report.is_deployable() {
        std::process::exit(2);
    }
}

fn run_order(contract_path: &str) {
    let contract = load_contract(contract_path);
    let analyzer = DependencyAnalyzer::new(&contract);

    let cycle = analyzer.has_cyclic_dependencies();
    if cycle.cyclic {
        exit_with_error(&format!(
            "Dependency cycle: {}",
            cycle.path.join(" -> ")
        ));
    }

    for (position, id) in analyzer.deployment_order().iter().enumerate() {
        let name = contract
            .find_automaton(id)
            .map(|a| a.name.as_str())
            .unwrap_or("?");
        println!("{:>3}. {} ({})", position + 1, name, id);
    }
}

fn run_compile(
    contract_path: &str,
    out: Option<String>,
    strict: bool,
    preflight: bool,
    default_packages: Vec<String>,
) {
    let contract = load_contract(contract_path);

    let start = Instant::now();
    let mut builder = Compiler::builder(contract)
        .strict(strict)
        .with_preflight(preflight);
    if !default_packages.is_empty() {
        builder = builder.with_default_packages(default_packages);
    }
    let spec = builder
        .build()
        .compile()
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));
    let duration = start.elapsed();

    match out {
        Some(path) => {
            spec.save(&path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write specification: {}", e))
            });
            eprintln!(
                "Compiled {} automata in {:?} -> {}",
                spec.automatons.len(),
                duration,
                path
            );
        }
        None => {
            let json = spec.to_json_pretty().unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to render specification: {}", e))
            });
            println!("{}", json);
        }
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
