//! Scoped binding contexts
//!
//! Instead of renaming the variables of each atom before unification, a
//! variable is interpreted relative to the binding context it is read in: the
//! pair `(name, ContextId)` is its identity. Two atoms that both mention `X`
//! therefore talk about unrelated variables as long as they are unified under
//! different contexts, and neither atom is ever rewritten.
//!
//! All contexts live in one arena (`Bindings`) and refer to each other through
//! `ContextId` handles. A handle never keeps its context alive: once released,
//! chains that pass through it stop there, and handles are never reused.
//!
//! Bindings are only ever *added* for unbound variables, and every addition
//! hands back an `Undo` record, so a search can roll back to any earlier state
//! by deleting exactly the bindings it made.

use crate::config::UnifyConfig;
use crate::error::UnificationError;
use crate::logic::core::{Atom, Formula, Rule, Term, Variable};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use std::fmt;
use tracing::trace;

/// Stable handle to a context inside a `Bindings` arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u32);

impl ContextId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The value a variable is bound to, together with the context that value
/// must be read in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundValue {
    pub value: Term,
    pub origin: Option<ContextId>,
}

/// Capability to remove exactly one binding from exactly one context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Undo {
    pub variable: Variable,
    pub context: ContextId,
}

/// One variable namespace: variable -> bound value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    contents: IndexMap<Variable, BoundValue>,
}

impl Context {
    pub fn get(&self, var: &Variable) -> Option<&BoundValue> {
        self.contents.get(var)
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.contents.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &BoundValue)> {
        self.contents.iter()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, bound)) in self.contents.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match bound.origin {
                Some(origin) => write!(f, "{}: <{}, {}>", var, bound.value, origin)?,
                None => write!(f, "{}: <{}, ->", var, bound.value)?,
            }
        }
        write!(f, "}}")
    }
}

/// The variables that belong to the formula being produced, and the context
/// they are read in.
///
/// Resolving under a scope renames every other variable that survives
/// resolution, so variables from deeper contexts cannot be captured by the
/// formula's own variables.
#[derive(Debug, Clone)]
pub struct Scope {
    pub variables: IndexSet<Variable>,
    pub context: ContextId,
}

impl Scope {
    pub fn new(variables: IndexSet<Variable>, context: ContextId) -> Self {
        Scope { variables, context }
    }

    pub fn of_atom(atom: &Atom, context: ContextId) -> Self {
        Scope::new(atom.variables(), context)
    }

    pub fn of_formula(formula: &Formula, context: ContextId) -> Self {
        Scope::new(formula.variables(), context)
    }

    fn owns(&self, var: &Variable, context: ContextId) -> bool {
        self.context == context && self.variables.contains(var)
    }
}

/// Arena of binding contexts
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    contexts: Vec<Option<Context>>,
    config: UnifyConfig,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: UnifyConfig) -> Self {
        Bindings {
            contexts: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &UnifyConfig {
        &self.config
    }

    /// Allocate a new, empty context.
    ///
    /// Released slots are never reclaimed, so an arena grows with every
    /// allocation. Long-running searches should drop the arena between
    /// queries.
    ///
    /// # Panics
    ///
    /// Panics once `u32::MAX` contexts have been allocated; see `try_fresh`.
    pub fn fresh(&mut self) -> ContextId {
        match self.try_fresh() {
            Ok(id) => id,
            Err(e) => panic!("{}", e),
        }
    }

    /// Allocate a new, empty context, failing instead of reusing a handle
    /// when the arena is exhausted
    pub fn try_fresh(&mut self) -> Result<ContextId, UnificationError> {
        let index = u32::try_from(self.contexts.len())
            .map_err(|_| UnificationError::ArenaExhausted)?;
        self.contexts.push(Some(Context::default()));
        Ok(ContextId(index))
    }

    /// Number of slots ever allocated, released ones included
    pub fn allocated(&self) -> usize {
        self.contexts.len()
    }

    /// Allocate a context seeded with bindings that carry no origin context
    pub fn with_values<I>(&mut self, values: I) -> ContextId
    where
        I: IntoIterator<Item = (Variable, Term)>,
    {
        let id = self.fresh();
        if let Some(context) = self.context_mut(id) {
            for (var, value) in values {
                context.contents.insert(var, BoundValue { value, origin: None });
            }
        }
        id
    }

    /// Drop a context. Its handle stays invalid for the life of the arena.
    pub fn release(&mut self, id: ContextId) {
        if let Some(slot) = self.contexts.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    pub fn is_live(&self, id: ContextId) -> bool {
        self.context(id).is_some()
    }

    pub fn context(&self, id: ContextId) -> Option<&Context> {
        self.contexts.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn context_mut(&mut self, id: ContextId) -> Option<&mut Context> {
        self.contexts.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Bind an unbound `var` in context `id` to `value` read in `origin`.
    ///
    /// Never overwrites: binding a variable twice is rejected, since the undo
    /// record of the first binding would otherwise delete the second.
    pub fn add(
        &mut self,
        id: ContextId,
        var: &Variable,
        value: Term,
        origin: Option<ContextId>,
    ) -> Result<Undo, UnificationError> {
        let context = self
            .context_mut(id)
            .ok_or(UnificationError::StaleContext(id))?;
        if context.contains(var) {
            return Err(UnificationError::AlreadyBound {
                variable: var.clone(),
                context: id,
            });
        }
        trace!(context = %id, variable = %var, value = %value, "bind");
        context.contents.insert(var.clone(), BoundValue { value, origin });
        Ok(Undo {
            variable: var.clone(),
            context: id,
        })
    }

    /// Remove the binding for `var` in `id`, if any
    pub fn delete(&mut self, id: ContextId, var: &Variable) {
        if let Some(context) = self.context_mut(id) {
            context.contents.shift_remove(var);
        }
    }

    /// Apply every undo record. Records already applied are no-ops.
    pub fn undo_all(&mut self, changes: &[Undo]) {
        for change in changes {
            self.delete(change.context, &change.variable);
        }
    }

    /// Direct lookup without following chains
    pub fn lookup(&self, id: ContextId, term: &Term) -> Option<&BoundValue> {
        match term {
            Term::Variable(v) => self.context(id)?.get(v),
            Term::Constant(_) => None,
        }
    }

    /// Follow the binding chain of `term` starting in `id`.
    ///
    /// Returns the final value and the context that value belongs to. An
    /// unbound variable resolves to itself in the context where the chain
    /// stopped.
    pub fn resolve(&self, id: ContextId, term: &Term) -> (Term, ContextId) {
        self.resolve_in(id, term, None)
    }

    /// Like `resolve`, but an unbound variable that is not one of the
    /// scope's own variables comes back renamed after its context.
    pub fn resolve_scoped(&self, id: ContextId, term: &Term, scope: &Scope) -> (Term, ContextId) {
        self.resolve_in(id, term, Some(scope))
    }

    fn resolve_in(
        &self,
        mut id: ContextId,
        term: &Term,
        scope: Option<&Scope>,
    ) -> (Term, ContextId) {
        let mut current = term.clone();
        loop {
            let Some(bound) = self.lookup(id, &current) else {
                return (self.rename_escaped(current, id, scope), id);
            };
            // A released origin is treated as absent
            let origin = bound.origin.filter(|&o| self.is_live(o));
            match (origin, &bound.value) {
                (Some(next), Term::Variable(_)) => {
                    current = bound.value.clone();
                    id = next;
                }
                (origin, value) => return (value.clone(), origin.unwrap_or(id)),
            }
        }
    }

    fn rename_escaped(&self, term: Term, id: ContextId, scope: Option<&Scope>) -> Term {
        match (scope, term) {
            (Some(scope), Term::Variable(v)) if !scope.owns(&v, id) => {
                let mut name = self.config.fresh_name(&v.name, id.0);
                // The formula may already use that name. Primes keep the
                // result distinct from other escaped names, which end in
                // the context index.
                while scope.variables.contains(&Variable::new(name.as_str())) {
                    name.push('\'');
                }
                Term::var(name)
            }
            (_, term) => term,
        }
    }

    /// Check that no two bound variables of `id` resolve to the same value
    pub fn is_one_to_one(&self, id: ContextId) -> bool {
        let Some(context) = self.context(id) else {
            return true;
        };
        let mut image = HashSet::new();
        for var in context.contents.keys() {
            let (value, owner) = self.resolve(id, &Term::Variable(var.clone()));
            // A variable's identity includes the context owning it
            let key = match value {
                Term::Variable(_) => (value, Some(owner)),
                Term::Constant(_) => (value, None),
            };
            if !image.insert(key) {
                return false;
            }
        }
        true
    }

    /// Resolve every argument of `atom` under `id`, keeping variable names
    pub fn apply_atom(&self, atom: &Atom, id: ContextId) -> Atom {
        Atom {
            table: atom.table.clone(),
            arguments: atom
                .arguments
                .iter()
                .map(|arg| self.resolve(id, arg).0)
                .collect(),
        }
    }

    /// Resolve `atom` under `id`, renaming variables that do not belong to it
    pub fn plug_atom(&self, atom: &Atom, id: ContextId) -> Atom {
        let scope = Scope::of_atom(atom, id);
        self.plug_atom_in(atom, id, &scope)
    }

    /// Resolve a whole formula under `id` with capture avoidance
    pub fn plug(&self, formula: &Formula, id: ContextId) -> Formula {
        let scope = Scope::of_formula(formula, id);
        match formula {
            Formula::Atom(a) => Formula::Atom(self.plug_atom_in(a, id, &scope)),
            Formula::Rule(r) => Formula::Rule(Rule {
                head: self.plug_atom_in(&r.head, id, &scope),
                body: r
                    .body
                    .iter()
                    .map(|a| self.plug_atom_in(a, id, &scope))
                    .collect(),
            }),
        }
    }

    fn plug_atom_in(&self, atom: &Atom, id: ContextId, scope: &Scope) -> Atom {
        Atom {
            table: atom.table.clone(),
            arguments: atom
                .arguments
                .iter()
                .map(|arg| self.resolve_scoped(id, arg, scope).0)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Variable {
        Variable::new("X")
    }

    fn y() -> Variable {
        Variable::new("Y")
    }

    #[test]
    fn test_add_and_undo() {
        let mut b = Bindings::new();
        let c = b.fresh();
        let undo = b.add(c, &x(), Term::int(1), None).unwrap();
        assert_eq!(b.lookup(c, &Term::var("X")).map(|v| &v.value), Some(&Term::int(1)));

        b.undo_all(&[undo.clone()]);
        assert!(b.context(c).unwrap().is_empty());
        // Second application is a no-op
        b.undo_all(&[undo]);
        assert!(b.context(c).unwrap().is_empty());
    }

    #[test]
    fn test_add_rejects_rebinding() {
        let mut b = Bindings::new();
        let c = b.fresh();
        b.add(c, &x(), Term::int(1), None).unwrap();
        let err = b.add(c, &x(), Term::int(2), None).unwrap_err();
        assert!(matches!(err, UnificationError::AlreadyBound { .. }));
        assert_eq!(b.lookup(c, &Term::var("X")).unwrap().value, Term::int(1));
    }

    #[test]
    fn test_add_to_released_context() {
        let mut b = Bindings::new();
        let c = b.fresh();
        b.release(c);
        assert_eq!(
            b.add(c, &x(), Term::int(1), None),
            Err(UnificationError::StaleContext(c))
        );
    }

    #[test]
    fn test_resolve_follows_chain_across_contexts() {
        // X@c1 -> Y@c2 -> 5
        let mut b = Bindings::new();
        let c1 = b.fresh();
        let c2 = b.fresh();
        b.add(c1, &x(), Term::var("Y"), Some(c2)).unwrap();
        b.add(c2, &y(), Term::int(5), Some(c2)).unwrap();

        assert_eq!(b.resolve(c1, &Term::var("X")), (Term::int(5), c2));
        // Y is unbound in c1
        assert_eq!(b.resolve(c1, &Term::var("Y")), (Term::var("Y"), c1));
        // constants resolve to themselves
        assert_eq!(b.resolve(c1, &Term::int(9)), (Term::int(9), c1));
    }

    #[test]
    fn test_resolve_stops_at_released_origin() {
        let mut b = Bindings::new();
        let c1 = b.fresh();
        let c2 = b.fresh();
        b.add(c1, &x(), Term::var("Y"), Some(c2)).unwrap();
        b.add(c2, &y(), Term::int(5), None).unwrap();
        b.release(c2);

        assert_eq!(b.resolve(c1, &Term::var("X")), (Term::var("Y"), c1));
    }

    #[test]
    fn test_seeded_context() {
        let mut b = Bindings::new();
        let c = b.with_values([(x(), Term::string("a"))]);
        assert_eq!(b.resolve(c, &Term::var("X")), (Term::string("a"), c));
        assert_eq!(b.context(c).unwrap().to_string(), "{X: <\"a\", ->}");
    }

    #[test]
    fn test_scoped_resolution_renames_foreign_variables() {
        // p(X, Y)@c1 with Y -> X@c2: the X of c2 must not collide with X of c1
        let mut b = Bindings::new();
        let c1 = b.fresh();
        let c2 = b.fresh();
        b.add(c1, &y(), Term::var("X"), Some(c2)).unwrap();

        let atom = Atom::new("p", vec![Term::var("X"), Term::var("Y")]);
        let plugged = b.plug_atom(&atom, c1);
        let expected_name = format!("X_{}", c2.index());
        assert_eq!(plugged, Atom::new("p", vec![Term::var("X"), Term::var(expected_name)]));

        // Deterministic within a run
        assert_eq!(b.plug_atom(&atom, c1), plugged);
        // Without a scope the raw name comes back
        assert_eq!(b.apply_atom(&atom, c1), Atom::new("p", vec![Term::var("X"), Term::var("X")]));
    }

    #[test]
    fn test_escaped_name_avoids_formula_variables() {
        // p(X_1, Y)@c0 with Y -> X@c1: the escaped X must not become X_1
        let mut b = Bindings::new();
        let c0 = b.fresh();
        let c1 = b.fresh();
        b.add(c0, &y(), Term::var("X"), Some(c1)).unwrap();

        let taken = format!("X_{}", c1.index());
        let atom = Atom::new("p", vec![Term::var(taken.as_str()), Term::var("Y")]);
        let plugged = b.plug_atom(&atom, c0);
        assert_eq!(plugged.arguments[0], Term::var(taken.as_str()));
        assert_ne!(plugged.arguments[0], plugged.arguments[1]);
        assert_eq!(plugged.arguments[1], Term::var(format!("{}'", taken)));
    }

    #[test]
    fn test_fresh_handles_are_not_reused() {
        let mut b = Bindings::new();
        let c0 = b.try_fresh().unwrap();
        b.release(c0);
        let c1 = b.fresh();
        assert_ne!(c0, c1);
        assert!(!b.is_live(c0));
        assert_eq!(b.allocated(), 2);
    }

    #[test]
    fn test_rename_separator_from_config() {
        let config = UnifyConfig {
            rename_separator: "#".to_string(),
            ..UnifyConfig::default()
        };
        let mut b = Bindings::with_config(config);
        let c1 = b.fresh();
        let atom = Atom::new("p", vec![Term::var("X")]);
        let scope = Scope::new(IndexSet::new(), c1);
        let (renamed, _) = b.resolve_scoped(c1, &atom.arguments[0], &scope);
        assert_eq!(renamed, Term::var(format!("X#{}", c1.index())));
    }

    #[test]
    fn test_is_one_to_one() {
        let mut b = Bindings::new();
        let shared = b.fresh();
        b.add(shared, &x(), Term::int(1), None).unwrap();
        b.add(shared, &y(), Term::int(1), None).unwrap();
        assert!(!b.is_one_to_one(shared));

        let distinct = b.fresh();
        b.add(distinct, &x(), Term::int(1), None).unwrap();
        b.add(distinct, &y(), Term::int(2), None).unwrap();
        assert!(b.is_one_to_one(distinct));
    }

    #[test]
    fn test_one_to_one_distinguishes_variable_contexts() {
        // X -> Z@c2 and Y -> Z@c3 are different targets
        let mut b = Bindings::new();
        let c1 = b.fresh();
        let c2 = b.fresh();
        let c3 = b.fresh();
        b.add(c1, &x(), Term::var("Z"), Some(c2)).unwrap();
        b.add(c1, &y(), Term::var("Z"), Some(c3)).unwrap();
        assert!(b.is_one_to_one(c1));

        b.delete(c1, &y());
        b.add(c1, &y(), Term::var("Z"), Some(c2)).unwrap();
        assert!(!b.is_one_to_one(c1));
    }
}
