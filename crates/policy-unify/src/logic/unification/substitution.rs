//! Variable substitutions

use crate::logic::core::{Atom, Formula, Rule, Term, Variable};
use std::collections::HashMap;

/// A plain substitution mapping variables to terms, with no context scoping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    pub map: HashMap<Variable, Term>,
}

impl Substitution {
    /// Create a new empty substitution
    pub fn new() -> Self {
        Substitution {
            map: HashMap::new(),
        }
    }

    /// Add a variable -> term mapping
    pub fn insert(&mut self, var: Variable, term: Term) {
        self.map.insert(var, term);
    }

    /// Get the term for a variable, if bound
    pub fn get(&self, var: &Variable) -> Option<&Term> {
        self.map.get(var)
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.map.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<(Variable, Term)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (Variable, Term)>>(iter: I) -> Self {
        Substitution {
            map: iter.into_iter().collect(),
        }
    }
}

impl Term {
    /// Apply a substitution to this term
    pub fn apply_substitution(&self, subst: &Substitution) -> Term {
        match self {
            Term::Variable(v) => subst.get(v).cloned().unwrap_or_else(|| self.clone()),
            Term::Constant(_) => self.clone(),
        }
    }
}

impl Atom {
    /// Apply a substitution to this atom
    pub fn apply_substitution(&self, subst: &Substitution) -> Atom {
        Atom {
            table: self.table.clone(),
            arguments: self
                .arguments
                .iter()
                .map(|arg| arg.apply_substitution(subst))
                .collect(),
        }
    }
}

impl Rule {
    /// Apply a substitution to head and body
    pub fn apply_substitution(&self, subst: &Substitution) -> Rule {
        Rule {
            head: self.head.apply_substitution(subst),
            body: self
                .body
                .iter()
                .map(|atom| atom.apply_substitution(subst))
                .collect(),
        }
    }
}

impl Formula {
    pub fn apply_substitution(&self, subst: &Substitution) -> Formula {
        match self {
            Formula::Atom(a) => Formula::Atom(a.apply_substitution(subst)),
            Formula::Rule(r) => Formula::Rule(r.apply_substitution(subst)),
        }
    }
}
