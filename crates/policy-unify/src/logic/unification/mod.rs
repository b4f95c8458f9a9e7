//! Scoped unification, renaming equivalence, subsumption and skolemization

pub mod bi_unify;
mod context;
pub mod equivalence;
mod matching;
pub mod skolem;
pub mod subsumption;
pub mod substitution;


pub use bi_unify::{bi_unify_atoms, undo_all, unify, UnificationResult};
pub use context::{BoundValue, Bindings, Context, ContextId, Scope, Undo};
pub use equivalence::{same, same_atoms, Renaming, RenamingTargets};
pub use matching::match_tuple_atom;
pub use skolem::{skolemize, skolemize_with};
pub use subsumption::{instance, instance_atoms, Instance};
pub use substitution::Substitution;
