//! Pluggable variable-selection strategies (§4.5 "Variable heuristics").
//!
//! The catalogue is a closed set named by the public `solve` configuration (§6), not an
//! open set of user-supplied strategy objects, so it is modelled the same way the constraint
//! catalogue is: one tagged enum rather than a trait hierarchy.

use crate::basic_types::HashSet;
use crate::basic_types::Random;
use crate::basic_types::UnknownVariableError;
use crate::engine::propagation::Propagator;
use crate::variables::VariableAssignment;
use crate::variables::VariableId;
use crate::variables::VariableStore;

#[derive(Debug, Clone)]
pub enum VariableStrategy {
    /// Insertion order.
    First,
    /// Minimise `|upper − lower|`.
    SmallestDomain,
    /// Maximise the number of constraints referencing the variable.
    MostConstrained,
    /// Minimise the number of constraints referencing the variable.
    LeastConstrained,
    Random,
    /// A user-supplied priority list, already resolved to ids and tail-filled by the remaining
    /// variables via [`resolve_custom_order`].
    CustomOrder(Vec<VariableId>),
}

/// Resolves a user-supplied priority list of variable names into ids, appending every
/// variable not named (in store order) so the result covers every declared variable exactly
/// once (§4.5 "CUSTOM_ORDER").
pub(crate) fn resolve_custom_order(
    priority_names: &[String],
    store: &VariableStore,
) -> Result<Vec<VariableId>, UnknownVariableError> {
    let mut order = Vec::with_capacity(store.len());
    let mut seen = HashSet::default();
    for name in priority_names {
        let id = store
            .id_of(name)
            .ok_or_else(|| UnknownVariableError(name.clone()))?;
        if seen.insert(id) {
            order.push(id);
        }
    }
    for id in store.ids() {
        if seen.insert(id) {
            order.push(id);
        }
    }
    Ok(order)
}

/// What a variable strategy hands back to the search engine: either a direct pick (`FIRST` and
/// `RANDOM` never participate in the randomised tie-break window, mirroring the original
/// solver), or a full ranked list the search engine's tie-break policy chooses from (§4.5
/// "Randomised tie-breaks with a budget").
pub(crate) enum VariableChoice {
    Fixed(VariableId),
    Ranked(Vec<VariableId>),
}

impl VariableStrategy {
    /// Ranks or picks among the undetermined variables, or returns `None` if every variable is
    /// already ground.
    pub(crate) fn candidates(
        &self,
        state: &VariableAssignment,
        propagator: &Propagator,
        random: &mut Random,
    ) -> Option<VariableChoice> {
        let undetermined: Vec<VariableId> = state
            .keys()
            .filter(|&id| !state[id].is_determined())
            .collect();
        if undetermined.is_empty() {
            return None;
        }

        match self {
            VariableStrategy::First => Some(VariableChoice::Fixed(undetermined[0])),
            VariableStrategy::Random => Some(VariableChoice::Fixed(*random.choose(&undetermined)?)),
            VariableStrategy::SmallestDomain => {
                let mut ranked = undetermined;
                ranked.sort_by_key(|&id| state[id].undetermined().count());
                Some(VariableChoice::Ranked(ranked))
            }
            VariableStrategy::MostConstrained => {
                let mut ranked = undetermined;
                ranked.sort_by_key(|&id| std::cmp::Reverse(propagator.constraint_count(id)));
                Some(VariableChoice::Ranked(ranked))
            }
            VariableStrategy::LeastConstrained => {
                let mut ranked = undetermined;
                ranked.sort_by_key(|&id| propagator.constraint_count(id));
                Some(VariableChoice::Ranked(ranked))
            }
            VariableStrategy::CustomOrder(order) => {
                let ranked: Vec<VariableId> = order
                    .iter()
                    .copied()
                    .filter(|id| undetermined.contains(id))
                    .collect();
                Some(VariableChoice::Ranked(ranked))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Constraint;
    use crate::variables::SetVariable;
    use std::collections::BTreeSet;

    fn set(values: impl IntoIterator<Item = i64>) -> BTreeSet<i64> {
        values.into_iter().collect()
    }

    #[test]
    fn smallest_domain_prefers_tightest_undetermined_variable() {
        let mut state = VariableAssignment::default();
        state.push(SetVariable::new("A", set([]), set([1, 2, 3]), 0, 3).unwrap());
        state.push(SetVariable::new("B", set([]), set([1]), 0, 1).unwrap());
        let constraints: Vec<Constraint> = vec![];
        let propagator = Propagator::new(&constraints, state.len());
        let mut random = Random::default();

        let choice = VariableStrategy::SmallestDomain
            .candidates(&state, &propagator, &mut random)
            .unwrap();
        let ranked = match choice {
            VariableChoice::Ranked(ranked) => ranked,
            VariableChoice::Fixed(_) => panic!("expected a ranked choice"),
        };
        assert_eq!(state[ranked[0]].name(), "B");
    }
}
