//! Core term model: terms, atoms, rules and formulas

pub mod atom;
pub mod rule;
pub mod term;

pub use atom::Atom;
pub use rule::{Formula, Rule};
pub use term::{Term, Value, Variable};
