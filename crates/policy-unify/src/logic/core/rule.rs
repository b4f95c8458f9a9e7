//! Rules and the closed formula type

use super::atom::Atom;
use super::term::Variable;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rule `head :- body[0], body[1], ...`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub head: Atom,
    pub body: Vec<Atom>,
}

impl Rule {
    pub fn new(head: Atom, body: Vec<Atom>) -> Self {
        Rule { head, body }
    }

    /// Head followed by body atoms
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        std::iter::once(&self.head).chain(self.body.iter())
    }

    pub fn variables(&self) -> IndexSet<Variable> {
        let mut vars = IndexSet::new();
        for atom in self.atoms() {
            atom.collect_variables(&mut vars);
        }
        vars
    }
}

/// Either an atom or a rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formula {
    Atom(Atom),
    Rule(Rule),
}

impl Formula {
    /// Distinct variables of the formula, in order of first occurrence
    pub fn variables(&self) -> IndexSet<Variable> {
        match self {
            Formula::Atom(a) => a.variables(),
            Formula::Rule(r) => r.variables(),
        }
    }

    pub fn collect_variables(&self, vars: &mut IndexSet<Variable>) {
        match self {
            Formula::Atom(a) => a.collect_variables(vars),
            Formula::Rule(r) => {
                for atom in r.atoms() {
                    atom.collect_variables(vars);
                }
            }
        }
    }
}

impl From<Atom> for Formula {
    fn from(atom: Atom) -> Self {
        Formula::Atom(atom)
    }
}

impl From<Rule> for Formula {
    fn from(rule: Rule) -> Self {
        Formula::Rule(rule)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if self.body.is_empty() {
            return Ok(());
        }
        write!(f, " :- ")?;
        for (i, atom) in self.body.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", atom)?;
        }
        Ok(())
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Atom(a) => write!(f, "{}", a),
            Formula::Rule(r) => write!(f, "{}", r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::core::term::Term;

    #[test]
    fn test_rule_display_and_variables() {
        let rule = Rule::new(
            Atom::new("h", vec![Term::var("X")]),
            vec![
                Atom::new("b", vec![Term::var("X"), Term::var("Y")]),
                Atom::new("c", vec![Term::var("Z"), Term::int(3)]),
            ],
        );
        assert_eq!(rule.to_string(), "h(X) :- b(X, Y), c(Z, 3)");
        let vars: Vec<_> = Formula::from(rule).variables().into_iter().map(|v| v.name).collect();
        assert_eq!(vars, vec!["X", "Y", "Z"]);
    }
}
