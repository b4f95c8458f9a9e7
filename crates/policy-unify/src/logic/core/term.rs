//! Terms of the policy language

use serde::{Deserialize, Serialize};
use std::fmt;

/// A logical variable, identified by name.
///
/// Two variables with the same name are the same *symbol*; whether they are
/// the same logical variable depends on the binding context they are read in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable { name: name.into() }
    }
}

/// An object constant
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    String(String),
}

/// A term: either a variable or a constant
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Variable(Variable),
    Constant(Value),
}

impl Term {
    /// Build a variable term
    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable(Variable::new(name))
    }

    /// Build an integer constant
    pub fn int(value: i64) -> Self {
        Term::Constant(Value::Integer(value))
    }

    /// Build a string constant
    pub fn string(value: impl Into<String>) -> Self {
        Term::Constant(Value::String(value.into()))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(v) => Some(v),
            Term::Constant(_) => None,
        }
    }

    /// Collect the variable of this term, if any
    pub fn collect_variables(&self, vars: &mut indexmap::IndexSet<Variable>) {
        if let Term::Variable(v) = self {
            vars.insert(v.clone());
        }
    }
}

impl From<Variable> for Term {
    fn from(v: Variable) -> Self {
        Term::Variable(v)
    }
}

impl From<Value> for Term {
    fn from(v: Value) -> Self {
        Term::Constant(v)
    }
}

// Display implementations for pretty printing

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "{}", v),
            Term::Constant(c) => write!(f, "{}", c),
        }
    }
}
