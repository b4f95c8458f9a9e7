//! Matching ground tuples against atom patterns

use super::substitution::Substitution;
use crate::logic::core::{Atom, Term, Value};

/// One-way match of a stored fact against an atom.
///
/// Returns the substitution that turns the arguments of `atom` into exactly
/// `tuple`, or `None` when the arity differs, a variable would need two
/// different values, or a constant argument disagrees with the tuple.
pub fn match_tuple_atom(tuple: &[Value], atom: &Atom) -> Option<Substitution> {
    if tuple.len() != atom.arity() {
        return None;
    }
    let mut subst = Substitution::new();
    for (value, arg) in tuple.iter().zip(&atom.arguments) {
        match arg {
            Term::Variable(v) => match subst.get(v) {
                Some(Term::Constant(bound)) if bound != value => return None,
                Some(_) => {}
                None => subst.insert(v.clone(), Term::Constant(value.clone())),
            },
            Term::Constant(c) => {
                if c != value {
                    return None;
                }
            }
        }
    }
    Some(subst)
}
