//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the clauseflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use clauseflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let contract = UiContract::from_file("path/to/contract.json")?.into_contract()?;
//!
//! for automaton in contract.clauses() {
//!     let report = Validator::validate(automaton);
//!     println!("{}", ReportFormatter::format_validation(&automaton.name, &report));
//! }
//!
//! let spec = Compiler::builder(contract).with_preflight(true).build().compile()?;
//! spec.save("path/to/specification.json")?;
//! # Ok(())
//! # }
//! ```

// Core components
pub use crate::compiler::{Compiler, CompilerBuilder, normalize_state_name};
pub use crate::dependency::{DependencyAnalyzer, DependencyCycle};
pub use crate::validator::{
    AutomatonStats, ContractReport, ValidationIssue, ValidationReport, Validator,
};

// Model
pub use crate::model::{
    Automaton, AutomatonKind, Condition, Contract, ContractStatus, IntoContract, Position, State,
    StateType, Transition,
};
pub use crate::ui::UiContract;

// Output
pub use crate::spec::{CompiledAutomaton, CompiledTransition, Specification};

// Error types
pub use crate::error::{CompileError, ConversionError, ModelError, SpecIoError};

// Report formatting
pub use crate::report::ReportFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
