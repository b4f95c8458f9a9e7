//! Grounding formulas by replacing variables with fresh constants

use super::substitution::Substitution;
use crate::config::UnifyConfig;
use crate::logic::core::{Formula, Term, Value};
use indexmap::IndexSet;
use tracing::debug;
use uuid::Uuid;

/// Replace every variable in `formulas` with a fresh, globally unique
/// constant. A variable occurring in several formulas gets the same constant
/// in each of them.
pub fn skolemize(formulas: &[Formula]) -> Vec<Formula> {
    skolemize_with(formulas, &UnifyConfig::default())
}

/// `skolemize` with the constant prefix taken from `config`
pub fn skolemize_with(formulas: &[Formula], config: &UnifyConfig) -> Vec<Formula> {
    let mut variables = IndexSet::new();
    for formula in formulas {
        formula.collect_variables(&mut variables);
    }
    debug!(formulas = formulas.len(), variables = variables.len(), "skolemize");

    let subst: Substitution = variables
        .into_iter()
        .map(|var| {
            let name = format!("{}{}", config.skolem_prefix, Uuid::new_v4());
            (var, Term::Constant(Value::String(name)))
        })
        .collect();
    formulas.iter().map(|f| f.apply_substitution(&subst)).collect()
}
