//! Policy logic representation and unification
//!
//! This module provides the term model (terms, atoms, rules) and the
//! unification machinery a backward-chaining evaluator drives.

pub mod core;
pub mod unification;

// Re-export commonly used types
pub use self::core::{Atom, Formula, Rule, Term, Value, Variable};
pub use unification::{
    bi_unify_atoms, instance, instance_atoms, match_tuple_atom, same, same_atoms, skolemize,
    skolemize_with, undo_all, unify, Bindings, BoundValue, Context, ContextId, Instance,
    Renaming, RenamingTargets, Scope, Substitution, UnificationResult, Undo,
};
