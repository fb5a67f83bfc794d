use super::definition::Contract;
use crate::error::ConversionError;

/// A trait for editor or storage formats that can be turned into a [`Contract`].
///
/// This is the seam between whatever shape the caller persists and the
/// canonical model the validator, analyzer and compiler work on. The
/// [`crate::ui::UiContract`] document produced by the graph editor implements it.
///
/// # Example
///
/// ```rust,no_run
/// use clauseflow::error::ConversionError;
/// use clauseflow::model::{Automaton, Contract, IntoContract};
///
/// struct StoredClause { id: String, title: String }
/// struct StoredContract { title: String, clauses: Vec<StoredClause> }
///
/// impl IntoContract for StoredContract {
///     fn into_contract(self) -> Result<Contract, ConversionError> {
///         let mut contract = Contract::new(self.title);
///         for clause in self.clauses {
///             contract.add_automaton(Automaton::new(clause.id, clause.title))?;
///         }
///         Ok(contract)
///     }
/// }
/// ```
pub trait IntoContract {
    /// Consumes the object and converts it into the canonical contract model.
    fn into_contract(self) -> Result<Contract, ConversionError>;
}

impl IntoContract for Contract {
    fn into_contract(self) -> Result<Contract, ConversionError> {
        Ok(self)
    }
}
