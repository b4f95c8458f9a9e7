//! Equivalence of formulas up to variable renaming

use super::bi_unify::{check_shape, same_variable, UnificationResult};
use super::context::{Bindings, ContextId, Undo};
use crate::error::UnificationError;
use crate::logic::core::{Atom, Formula, Term, Variable};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Renaming targets already used on the right-hand side of a check
pub type RenamingTargets = HashSet<(Variable, ContextId)>;

/// Witness that two formulas are variants of each other.
///
/// `left` maps each variable of the first formula to its partner variable in
/// `right`, the (unbound) namespace of the second formula.
#[derive(Debug, Clone)]
pub struct Renaming {
    pub bindings: Bindings,
    pub left: ContextId,
    pub right: ContextId,
}

/// Decide whether `formula1` and `formula2` are identical up to a bijective
/// renaming of variables.
///
/// The two formulas are read in disjoint namespaces. Body atoms of rules are
/// compared position by position; no reordering is attempted.
pub fn same(formula1: &Formula, formula2: &Formula) -> Option<Renaming> {
    debug!(%formula1, %formula2, "same");
    let mut bindings = Bindings::new();
    let left = bindings.fresh();
    let right = bindings.fresh();
    let mut bound2 = RenamingTargets::new();

    match (formula1, formula2) {
        (Formula::Atom(a1), Formula::Atom(a2)) => {
            same_atoms(&mut bindings, a1, left, a2, right, &mut bound2).ok()?;
        }
        (Formula::Rule(r1), Formula::Rule(r2)) => {
            if r1.body.len() != r2.body.len() {
                return None;
            }
            for (a1, a2) in r1.atoms().zip(r2.atoms()) {
                same_atoms(&mut bindings, a1, left, a2, right, &mut bound2).ok()?;
            }
        }
        _ => return None,
    }
    Some(Renaming {
        bindings,
        left,
        right,
    })
}

/// Extend `ctx1`/`ctx2` to show `atom1` and `atom2` are the same up to renaming.
///
/// `bound2` collects every right-hand variable already used as a renaming
/// target and must be shared across all atoms of one formula. On failure
/// all bindings made by this call are undone.
pub fn same_atoms(
    bindings: &mut Bindings,
    atom1: &Atom,
    ctx1: ContextId,
    atom2: &Atom,
    ctx2: ContextId,
    bound2: &mut RenamingTargets,
) -> UnificationResult {
    check_shape(atom1, atom2)?;
    let mut changes = Vec::new();
    let mut added = Vec::new();
    for (arg1, arg2) in atom1.arguments.iter().zip(&atom2.arguments) {
        let step = rename_arguments(bindings, arg1, ctx1, arg2, ctx2, bound2, &mut changes);
        match step {
            Ok(Some(target)) => added.push(target),
            Ok(None) => {}
            Err(e) => {
                trace!(%atom1, %atom2, undone = changes.len(), "not the same: {}", e);
                bindings.undo_all(&changes);
                for target in &added {
                    bound2.remove(target);
                }
                return Err(e);
            }
        }
    }
    Ok(changes)
}

/// Returns the renaming target newly recorded in `bound2`, if any
fn rename_arguments(
    bindings: &mut Bindings,
    arg1: &Term,
    ctx1: ContextId,
    arg2: &Term,
    ctx2: ContextId,
    bound2: &mut RenamingTargets,
    changes: &mut Vec<Undo>,
) -> Result<Option<(Variable, ContextId)>, UnificationError> {
    let (val1, bind1) = bindings.resolve(ctx1, arg1);
    let (val2, bind2) = bindings.resolve(ctx2, arg2);

    match (&val1, &val2) {
        (Term::Variable(v1), Term::Variable(v2)) => {
            if same_variable(&val1, bind1, &val2, bind2) {
                return Ok(None);
            }
            // Either side already renamed earlier in this check
            if !same_variable(&val1, bind1, arg1, ctx1) {
                return Err(UnificationError::AlreadyRenamed(v1.clone()));
            }
            if !same_variable(&val2, bind2, arg2, ctx2) {
                return Err(UnificationError::AlreadyRenamed(v2.clone()));
            }
            let target = (v2.clone(), bind2);
            if bound2.contains(&target) {
                return Err(UnificationError::NotInjective(v2.clone()));
            }
            changes.push(bindings.add(bind1, v1, val2.clone(), Some(bind2))?);
            bound2.insert(target.clone());
            Ok(Some(target))
        }
        (Term::Variable(v), c) | (c, Term::Variable(v)) => Err(
            UnificationError::VariableConstantMismatch(v.clone(), c.clone()),
        ),
        (Term::Constant(c1), Term::Constant(c2)) => {
            if c1 == c2 {
                Ok(None)
            } else {
                Err(UnificationError::ConstantClash(val1.clone(), val2.clone()))
            }
        }
    }
}
