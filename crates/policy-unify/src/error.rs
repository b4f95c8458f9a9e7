//! Error types for unification

use crate::logic::core::{Term, Variable};
use crate::logic::unification::ContextId;
use thiserror::Error;

/// Reasons a unification, renaming or instance check does not go through.
///
/// Most variants are ordinary search outcomes. `AlreadyBound` and
/// `StaleContext` indicate a caller broke the binding contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnificationError {
    #[error("table mismatch: {0} vs {1}")]
    TableMismatch(String, String),

    #[error("arity mismatch: {0} vs {1}")]
    ArityMismatch(usize, usize),

    #[error("constant clash: {0} vs {1}")]
    ConstantClash(Term, Term),

    #[error("variable {0} cannot match constant {1}")]
    VariableConstantMismatch(Variable, Term),

    #[error("variable {0} is already renamed within this check")]
    AlreadyRenamed(Variable),

    #[error("renaming target {0} is already used")]
    NotInjective(Variable),

    #[error("variable {0} of the specific formula cannot be instantiated")]
    FixedVariable(Variable),

    #[error("variable {variable} is already bound in context {context}")]
    AlreadyBound { variable: Variable, context: ContextId },

    #[error("context arena is exhausted")]
    ArenaExhausted,

    #[error("context {0} has been released")]
    StaleContext(ContextId),
}
