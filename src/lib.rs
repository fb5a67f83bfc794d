//! # clauseflow - Contract Automaton Validation and Compilation
//!
//! **clauseflow** checks and compiles smart legal contracts modeled as a set of
//! finite-state automata ("clauses"). Each automaton is a graph of states and
//! transitions drawn in a visual editor; transitions can be guarded by package
//! conditions and by the completion of other automata.
//!
//! ## Core Workflow
//!
//! 1.  **Load the editor document**: Parse the editor's JSON into [`ui::UiContract`], or
//!     implement [`model::IntoContract`] for your own stored format.
//! 2.  **Validate**: Run [`validator::Validator::validate`] on every edit for live
//!     feedback, and [`validator::Validator::validate_contract`] before deploying.
//! 3.  **Order**: Use [`dependency::DependencyAnalyzer`] to reject edits that would
//!     create dependency cycles and to compute the deployment order.
//! 4.  **Compile**: Build a [`compiler::Compiler`] and produce the backend
//!     [`spec::Specification`].
//!
//! ## Quick Start
//!
//! ```rust
//! use clauseflow::prelude::*;
//!
//! let mut clause = Automaton::new("01", "Payment");
//! clause.add_state(State::new("a", "Awaiting payment").with_type(StateType::Initial))?;
//! clause.add_state(State::new("b", "Paid").with_type(StateType::Final))?;
//! clause.add_transition(
//!     Transition::new("t1", "a", "b", "Pay")
//!         .with_condition(Condition::Token("package__payment__process_payment".into())),
//! )?;
//!
//! let mut contract = Contract::new("Lease");
//! contract.add_automaton(clause)?;
//!
//! assert!(Validator::validate(&contract.automata[0]).valid);
//! assert_eq!(DependencyAnalyzer::new(&contract).deployment_order(), vec!["01"]);
//!
//! let spec = Compiler::builder(contract).build().compile()?;
//! let payment = spec.automatons.get("Automata0").unwrap();
//! assert_eq!(payment.states, vec!["awaiting_payment", "completed"]);
//! assert_eq!(spec.required_packages, vec!["payment"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compiler;
pub mod dependency;
pub mod error;
pub mod graph;
pub mod model;
pub mod prelude;
pub mod report;
pub mod spec;
pub mod ui;
pub mod validator;
