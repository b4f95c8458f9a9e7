//! policy-unify: unification engine for a backward-chaining policy evaluator
//!
//! Atoms are unified under scoped binding contexts so that two atoms can use
//! the same variable names without clashing, and every binding made during
//! unification is returned as an undo record so a search can backtrack
//! without copying state. The crate also decides whether two formulas are
//! variants of each other (`same`), whether one is an instance of another
//! (`instance`), and grounds formulas with fresh constants (`skolemize`).

pub mod config;
pub mod error;
pub mod logic;

pub use config::UnifyConfig;
pub use error::UnificationError;

pub use logic::{Atom, Formula, Rule, Term, Value, Variable};
pub use logic::{
    bi_unify_atoms, instance, instance_atoms, match_tuple_atom, same, same_atoms, skolemize,
    skolemize_with, undo_all, unify, Bindings, BoundValue, Context, ContextId, Instance,
    Renaming, RenamingTargets, Scope, Substitution, UnificationResult, Undo,
};
