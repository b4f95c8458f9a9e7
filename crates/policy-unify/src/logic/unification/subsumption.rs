//! One-sided unification: is one formula an instance of another?

use super::bi_unify::{check_shape, same_variable, UnificationResult};
use super::context::{Bindings, ContextId, Undo};
use crate::error::UnificationError;
use crate::logic::core::{Atom, Formula, Term};
use tracing::{debug, trace};

/// Witness that `specific` is an instance of `general`.
///
/// Only the `general` context ever receives bindings; `specific` is the
/// namespace of the more specific formula, whose variables stay fixed.
#[derive(Debug, Clone)]
pub struct Instance {
    pub bindings: Bindings,
    pub specific: ContextId,
    pub general: ContextId,
}

/// Decide whether `formula1` is an instance of `formula2`, i.e. whether
/// binding only the variables of `formula2` makes it equal to `formula1`.
pub fn instance(formula1: &Formula, formula2: &Formula) -> Option<Instance> {
    debug!(%formula1, %formula2, "instance");
    let mut bindings = Bindings::new();
    let specific = bindings.fresh();
    let general = bindings.fresh();

    match (formula1, formula2) {
        (Formula::Atom(a1), Formula::Atom(a2)) => {
            instance_atoms(&mut bindings, a1, specific, a2, general).ok()?;
        }
        (Formula::Rule(r1), Formula::Rule(r2)) => {
            if r1.body.len() != r2.body.len() {
                return None;
            }
            for (a1, a2) in r1.atoms().zip(r2.atoms()) {
                instance_atoms(&mut bindings, a1, specific, a2, general).ok()?;
            }
        }
        _ => return None,
    }
    Some(Instance {
        bindings,
        specific,
        general,
    })
}

/// Bind variables of `atom2` (read in `ctx2`) so that it resolves to `atom1`
/// (read in `ctx1`). Variables of `atom1` are never bound.
pub fn instance_atoms(
    bindings: &mut Bindings,
    atom1: &Atom,
    ctx1: ContextId,
    atom2: &Atom,
    ctx2: ContextId,
) -> UnificationResult {
    check_shape(atom1, atom2)?;
    let mut changes = Vec::new();
    for (arg1, arg2) in atom1.arguments.iter().zip(&atom2.arguments) {
        if let Err(e) = match_arguments(bindings, arg1, ctx1, arg2, ctx2, &mut changes) {
            trace!(%atom1, %atom2, undone = changes.len(), "not an instance: {}", e);
            bindings.undo_all(&changes);
            return Err(e);
        }
    }
    Ok(changes)
}

fn match_arguments(
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
        (Term::Variable(v1), Term::Variable(v2)) => {
            if same_variable(&val1, bind1, &val2, bind2) {
                return Ok(());
            }
            if !same_variable(&val1, bind1, arg1, ctx1) {
                return Err(UnificationError::AlreadyRenamed(v1.clone()));
            }
            if !same_variable(&val2, bind2, arg2, ctx2) {
                return Err(UnificationError::AlreadyRenamed(v2.clone()));
            }
            changes.push(bindings.add(bind2, v2, val1.clone(), Some(bind1))?);
        }
        (Term::Variable(v1), _) => return Err(UnificationError::FixedVariable(v1.clone())),
        (_, Term::Variable(v2)) => {
            // Redirected to a variable of the specific side, which stays fixed
            if !same_variable(&val2, bind2, arg2, ctx2) {
                return Err(UnificationError::FixedVariable(v2.clone()));
            }
            changes.push(bindings.add(bind2, v2, val1.clone(), Some(bind1))?);
        }
        (Term::Constant(c1), Term::Constant(c2)) => {
            if c1 != c2 {
                return Err(UnificationError::ConstantClash(val1.clone(), val2.clone()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::core::{Rule, Variable};

    fn p(args: Vec<Term>) -> Formula {
        Formula::Atom(Atom::new("p", args))
    }

    #[test]
    fn test_instance_conflicting_constants() {
        let x = Term::var("X");
        assert!(instance(&p(vec![Term::int(5), Term::int(6)]), &p(vec![x.clone(), x])).is_none());
    }

    #[test]
    fn test_instance_binds_general_side() {
        let x = Term::var("X");
        let general = p(vec![x.clone(), x.clone()]);
        let found = instance(&p(vec![Term::int(5), Term::int(5)]), &general).unwrap();
        assert_eq!(found.bindings.resolve(found.general, &x).0, Term::int(5));
        assert!(found.bindings.context(found.specific).unwrap().is_empty());
    }

    #[test]
    fn test_instance_is_one_directional() {
        // p(5) is an instance of p(X) but not the other way round
        let specific = p(vec![Term::int(5)]);
        let general = p(vec![Term::var("X")]);
        assert!(instance(&specific, &general).is_some());
        assert!(instance(&general, &specific).is_none());
    }

    #[test]
    fn test_instance_of_itself() {
        let f = p(vec![Term::var("X"), Term::var("X"), Term::int(1)]);
        let found = instance(&f, &f).unwrap();
        let Formula::Atom(a) = &f else { unreachable!() };
        assert_eq!(found.bindings.apply_atom(a, found.general), *a);
    }

    #[test]
    fn test_instance_merging_variables() {
        // p(Y, Y) is more specific than p(X, Z); the converse fails
        let merged = p(vec![Term::var("Y"), Term::var("Y")]);
        let open = p(vec![Term::var("X"), Term::var("Z")]);
        assert!(instance(&merged, &open).is_some());
        assert!(instance(&open, &merged).is_none());
    }

    #[test]
    fn test_instance_rules_share_specific_namespace() {
        // h(a) :- b(a, W)  is an instance of  h(X) :- b(X, Y)
        let specific = Rule::new(
            Atom::new("h", vec![Term::string("a")]),
            vec![Atom::new("b", vec![Term::string("a"), Term::var("W")])],
        );
        let general = Rule::new(
            Atom::new("h", vec![Term::var("X")]),
            vec![Atom::new("b", vec![Term::var("X"), Term::var("Y")])],
        );
        let found = instance(&specific.clone().into(), &general.clone().into()).unwrap();
        assert_eq!(
            found.bindings.resolve(found.general, &Term::var("X")).0,
            Term::string("a")
        );

        // h(W) :- b(V, W) is not: X would need to be both W and V
        let crossed = Rule::new(
            Atom::new("h", vec![Term::var("W")]),
            vec![Atom::new("b", vec![Term::var("V"), Term::var("W")])],
        );
        assert!(instance(&crossed.into(), &general.into()).is_none());
    }

    #[test]
    fn test_instance_never_binds_specific_variables() {
        // X is first bound to Y, so it cannot also become 5
        let general = p(vec![Term::var("X"), Term::var("X")]);
        let specific = p(vec![Term::var("Y"), Term::int(5)]);
        assert!(instance(&specific, &general).is_none());
        let swapped = p(vec![Term::int(5), Term::var("Y")]);
        assert!(instance(&swapped, &general).is_none());

        let distinct = p(vec![Term::var("Y"), Term::var("Z")]);
        assert!(instance(&distinct, &general).is_none());
    }

    #[test]
    fn test_instance_atoms_reports_fixed_variable() {
        let mut b = Bindings::new();
        let specific = b.fresh();
        let general = b.fresh();
        let a1 = Atom::new("p", vec![Term::var("Y"), Term::int(5)]);
        let a2 = Atom::new("p", vec![Term::var("X"), Term::var("X")]);

        let err = instance_atoms(&mut b, &a1, specific, &a2, general).unwrap_err();
        assert_eq!(err, UnificationError::FixedVariable(Variable::new("Y")));
        assert!(b.context(specific).unwrap().is_empty());
        assert!(b.context(general).unwrap().is_empty());
    }

    #[test]
    fn test_instance_rule_body_cannot_fix_specific_variable() {
        // h(Y) :- b(5)  is not an instance of  h(X) :- b(X)
        let specific = Rule::new(
            Atom::new("h", vec![Term::var("Y")]),
            vec![Atom::new("b", vec![Term::int(5)])],
        );
        let general = Rule::new(
            Atom::new("h", vec![Term::var("X")]),
            vec![Atom::new("b", vec![Term::var("X")])],
        );
        assert!(instance(&specific.into(), &general.into()).is_none());
    }

    #[test]
    fn test_instance_atom_vs_rule() {
        let a = p(vec![Term::var("X")]);
        let r = Formula::Rule(Rule::new(Atom::new("p", vec![Term::var("X")]), vec![]));
        assert!(instance(&a, &r).is_none());
    }
}
