//! Atoms: a table name applied to argument terms

use super::term::{Term, Variable};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An atomic formula such as `p(X, 1)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    pub table: String,
    pub arguments: Vec<Term>,
}

impl Atom {
    /// Create a new atom
    pub fn new(table: impl Into<String>, arguments: Vec<Term>) -> Self {
        Atom {
            table: table.into(),
            arguments,
        }
    }

    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// Check if this atom contains no variables
    pub fn is_ground(&self) -> bool {
        !self.arguments.iter().any(Term::is_variable)
    }

    /// Distinct variables in argument order
    pub fn variables(&self) -> IndexSet<Variable> {
        let mut vars = IndexSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    pub fn collect_variables(&self, vars: &mut IndexSet<Variable>) {
        for arg in &self.arguments {
            arg.collect_variables(vars);
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.table)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}
