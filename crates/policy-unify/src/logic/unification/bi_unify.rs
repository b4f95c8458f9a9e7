//! Two-sided unification of atoms under separate binding contexts

use super::context::{Bindings, ContextId, Undo};
use crate::error::UnificationError;
use crate::logic::core::{Atom, Term};
use tracing::trace;

/// Result of a unification attempt: the bindings made, ready to be undone
pub type UnificationResult = Result<Vec<Undo>, UnificationError>;

/// Check that two atoms agree on table name and arity
pub(crate) fn check_shape(atom1: &Atom, atom2: &Atom) -> Result<(), UnificationError> {
    if atom1.table != atom2.table {
        return Err(UnificationError::TableMismatch(
            atom1.table.clone(),
            atom2.table.clone(),
        ));
    }
    if atom1.arity() != atom2.arity() {
        return Err(UnificationError::ArityMismatch(atom1.arity(), atom2.arity()));
    }
    Ok(())
}

/// Is `var1` read in `ctx1` the same logical variable as `var2` in `ctx2`?
pub(crate) fn same_variable(var1: &Term, ctx1: ContextId, var2: &Term, ctx2: ContextId) -> bool {
    ctx1 == ctx2 && var1 == var2
}

/// Unify `atom1` read in `ctx1` with `atom2` read in `ctx2`.
///
/// On success the contexts (and any context reached through existing
/// bindings) are extended so that both atoms resolve to the same arguments,
/// and the returned undo list removes exactly those bindings. On failure no
/// binding is left behind.
pub fn bi_unify_atoms(
    bindings: &mut Bindings,
    atom1: &Atom,
    ctx1: ContextId,
    atom2: &Atom,
    ctx2: ContextId,
) -> UnificationResult {
    check_shape(atom1, atom2)?;
    let mut changes = Vec::new();
    for (arg1, arg2) in atom1.arguments.iter().zip(&atom2.arguments) {
        if let Err(e) = unify_arguments(bindings, arg1, ctx1, arg2, ctx2, &mut changes) {
            trace!(%atom1, %atom2, undone = changes.len(), "unify failed: {}", e);
            bindings.undo_all(&changes);
            return Err(e);
        }
    }
    Ok(changes)
}

/// Alias of `bi_unify_atoms` for the search loop
pub fn unify(
    bindings: &mut Bindings,
    atom1: &Atom,
    ctx1: ContextId,
    atom2: &Atom,
    ctx2: ContextId,
) -> UnificationResult {
    bi_unify_atoms(bindings, atom1, ctx1, atom2, ctx2)
}

/// Roll back every binding in `changes`
pub fn undo_all(bindings: &mut Bindings, changes: &[Undo]) {
    bindings.undo_all(changes);
}

fn unify_arguments(
    bindings: &mut Bindings,
    arg1: &Term,
    ctx1: ContextId,
    arg2: &Term,
    ctx2: ContextId,
    changes: &mut Vec<Undo>,
) -> Result<(), UnificationError> {
    let (val1, bind1) = bindings.resolve(ctx1, arg1);
    let (val2, bind2) = bindings.resolve(ctx2, arg2);

    match (&val1, &val2) {
        (Term::Variable(_), Term::Variable(_)) if same_variable(&val1, bind1, &val2, bind2) => {}
        (Term::Variable(v), _) => {
            changes.push(bindings.add(bind1, v, val2.clone(), Some(bind2))?);
        }
        (_, Term::Variable(v)) => {
            changes.push(bindings.add(bind2, v, val1.clone(), Some(bind1))?);
        }
        (Term::Constant(c1), Term::Constant(c2)) => {
            if c1 != c2 {
                return Err(UnificationError::ConstantClash(val1.clone(), val2.clone()));
            }
        }
    }
    Ok(())
}
