//! Fixpoint propagation over the constraint set (§4.3), driven by a variable-indexed work queue
//! built the way the teacher's CP watch lists map a variable to the propagators that read it.

use std::collections::VecDeque;

use crate::basic_types::KeyedVec;
use crate::constraints::Constraint;
use crate::engine::fault::InconsistencyFault;
use crate::metrics::SolverMetrics;
use crate::variables::VariableAssignment;
use crate::variables::VariableId;

/// Maps each variable to the indices, into the solver's constraint list, of the constraints that
/// read it — built once per solve and shared by every branch's propagation call.
#[derive(Debug, Clone)]
pub(crate) struct Propagator {
    watchers: KeyedVec<VariableId, Vec<usize>>,
}

impl Propagator {
    pub(crate) fn new(constraints: &[Constraint], variable_count: usize) -> Self {
        let mut watchers = KeyedVec::default();
        for _ in 0..variable_count {
            watchers.push(Vec::new());
        }
        for (index, constraint) in constraints.iter().enumerate() {
            for variable in constraint.variables_touched() {
                watchers[variable].push(index);
            }
        }
        Propagator { watchers }
    }

    /// How many constraints reference `variable` — used by the `MOST_CONSTRAINED` /
    /// `LEAST_CONSTRAINED` variable heuristics (§4.5).
    pub(crate) fn constraint_count(&self, variable: VariableId) -> usize {
        self.watchers[variable].len()
    }

    /// Runs every constraint to a joint fixpoint, starting from a queue seeded with all of them.
    pub(crate) fn propagate_all(
        &self,
        constraints: &[Constraint],
        state: &mut VariableAssignment,
        metrics: &mut SolverMetrics,
    ) -> Result<(), InconsistencyFault> {
        let seed = 0..constraints.len();
        self.propagate_from(constraints, state, seed, metrics)
    }

    /// Runs the fixpoint starting from a queue seeded with only the constraints that mention
    /// `mutated` — the incremental case used by the state computer's replay (§4.4).
    pub(crate) fn propagate_from_variable(
        &self,
        constraints: &[Constraint],
        state: &mut VariableAssignment,
        mutated: VariableId,
        metrics: &mut SolverMetrics,
    ) -> Result<(), InconsistencyFault> {
        let seed = self.watchers[mutated].iter().copied();
        self.propagate_from(constraints, state, seed, metrics)
    }

    fn propagate_from(
        &self,
        constraints: &[Constraint],
        state: &mut VariableAssignment,
        seed: impl IntoIterator<Item = usize>,
        metrics: &mut SolverMetrics,
    ) -> Result<(), InconsistencyFault> {
        let mut queued = vec![false; constraints.len()];
        let mut queue = VecDeque::new();
        for index in seed {
            if !queued[index] {
                queued[index] = true;
                queue.push_back(index);
            }
        }

        while let Some(index) = queue.pop_front() {
            queued[index] = false;
            metrics.filtering_rounds += 1;
            let touched = constraints[index].filter(state)?;
            metrics.constraint_checks += 1;

            if touched.is_empty() {
                continue;
            }
            for &variable in &touched {
                for &affected in &self.watchers[variable] {
                    if affected != index && !queued[affected] {
                        queued[affected] = true;
                        queue.push_back(affected);
                    }
                }
            }
        }

        for id in state.keys() {
            if state[id].upper().is_empty() && state[id].min_card() > 0 {
                return Err(InconsistencyFault);
            }
            if !state[id].lower().is_subset(state[id].upper()) {
                return Err(InconsistencyFault);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::SetVariable;
    use crate::variables::VariableId as Vid;
    use std::collections::BTreeSet;

    fn set(values: impl IntoIterator<Item = i64>) -> BTreeSet<i64> {
        values.into_iter().collect()
    }

    fn push(state: &mut VariableAssignment, v: SetVariable) -> Vid {
        state.push(v);
        state.keys().last().unwrap()
    }

    #[test]
    fn scenario_1_subset_propagation() {
        let mut state = VariableAssignment::default();
        let x = push(
            &mut state,
            SetVariable::new("X", set([1, 2]), set([1, 2, 3, 4]), 2, 3).unwrap(),
        );
        let y = push(
            &mut state,
            SetVariable::new("Y", set([2]), set([1, 2, 3, 4, 5]), 1, 4).unwrap(),
        );
        let constraints = vec![Constraint::Subset { f: x, g: y }];
        let propagator = Propagator::new(&constraints, state.len());
        let mut metrics = SolverMetrics::default();

        propagator
            .propagate_all(&constraints, &mut state, &mut metrics)
            .unwrap();

        assert_eq!(state[x].upper(), &set([1, 2, 3, 4]));
        assert_eq!(state[y].lower(), &set([1, 2]));
        assert_eq!(state[y].min_card(), 2);
        assert_eq!(state[x].max_card(), 3);
    }

    #[test]
    fn second_pass_is_a_fixpoint() {
        let mut state = VariableAssignment::default();
        let x = push(
            &mut state,
            SetVariable::new("X", set([1, 2]), set([1, 2, 3, 4]), 0, 4).unwrap(),
        );
        let y = push(
            &mut state,
            SetVariable::new("Y", set([2]), set([1, 2, 3, 4, 5]), 0, 5).unwrap(),
        );
        let constraints = vec![Constraint::Subset { f: x, g: y }];
        let propagator = Propagator::new(&constraints, state.len());
        let mut metrics = SolverMetrics::default();

        propagator
            .propagate_all(&constraints, &mut state, &mut metrics)
            .unwrap();
        let after_first = state.clone();
        propagator
            .propagate_all(&constraints, &mut state, &mut metrics)
            .unwrap();

        assert_eq!(state, after_first);
    }
}
