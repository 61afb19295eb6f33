//! Computes, and caches, the propagated variable state for any path of branching operations
//! (§4.4), grounded in the canonical-key caching of the original state computer this was
//! distilled from, extended here with incremental replay from a cached parent path.

use crate::basic_types::HashMap;
use crate::basic_types::Random;
use crate::constraints::Constraint;
use crate::engine::fault::InconsistencyFault;
use crate::engine::propagation::Propagator;
use crate::metrics::SolverMetrics;
use crate::variables::VariableAssignment;
use crate::variables::VariableId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum OperationType {
    Add,
    Remove,
}

/// A single branching action `(variable, ADD|REMOVE, value, depth)` (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Operation {
    pub(crate) variable: VariableId,
    pub(crate) op_type: OperationType,
    pub(crate) value: i64,
    pub(crate) depth: usize,
}

/// Ordered list of operations from the root of the search tree to the current node.
pub(crate) type Path = Vec<Operation>;

/// The multiset-of-operations cache key: sorted so that reorderings of order-independent
/// operations collapse to the same entry, while distinct branch decisions (different depths)
/// remain distinct (§4.4).
pub(crate) fn canonical_key(path: &[Operation]) -> Vec<Operation> {
    let mut key = path.to_vec();
    key.sort_unstable();
    key
}

pub(crate) struct StateComputer {
    initial: VariableAssignment,
    constraints: Vec<Constraint>,
    propagator: Propagator,
    cache: HashMap<Vec<Operation>, VariableAssignment>,
}

impl StateComputer {
    pub(crate) fn new(initial: VariableAssignment, constraints: Vec<Constraint>) -> Self {
        let propagator = Propagator::new(&constraints, initial.len());
        StateComputer {
            initial,
            constraints,
            propagator,
            cache: HashMap::default(),
        }
    }

    pub(crate) fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Materialises the propagated state at `path`. `skip_probability` bypasses the fixpoint with
    /// that probability, returning an un-propagated, uncached state (§4.4 "Configurable skip").
    pub(crate) fn compute_state(
        &mut self,
        path: &[Operation],
        metrics: &mut SolverMetrics,
        skip_probability: f64,
        random: &mut Random,
    ) -> Result<VariableAssignment, InconsistencyFault> {
        let key = canonical_key(path);
        if let Some(cached) = self.cache.get(&key) {
            metrics.cache_hits += 1;
            return Ok(cached.clone());
        }

        if skip_probability > 0.0 && random.with_probability(skip_probability) {
            metrics.skipped_propagations += 1;
            let mut state = self.initial.clone();
            for operation in path {
                apply(&mut state, *operation);
            }
            return Ok(state);
        }

        let state = if let Some((last, parent_path)) = path.split_last() {
            let parent_key = canonical_key(parent_path);
            if let Some(parent_state) = self.cache.get(&parent_key) {
                let mut state = parent_state.clone();
                apply(&mut state, *last);
                self.propagator.propagate_from_variable(
                    &self.constraints,
                    &mut state,
                    last.variable,
                    metrics,
                )?;
                state
            } else {
                self.rebuild(path, metrics)?
            }
        } else {
            self.rebuild(path, metrics)?
        };

        let _ = self.cache.insert(key, state.clone());
        Ok(state)
    }

    fn rebuild(
        &mut self,
        path: &[Operation],
        metrics: &mut SolverMetrics,
    ) -> Result<VariableAssignment, InconsistencyFault> {
        let mut state = self.initial.clone();
        for operation in path {
            apply(&mut state, *operation);
        }
        self.propagator
            .propagate_all(&self.constraints, &mut state, metrics)?;
        Ok(state)
    }
}

fn apply(state: &mut VariableAssignment, operation: Operation) {
    match operation.op_type {
        OperationType::Add => state[operation.variable].add_to_lower(operation.value),
        OperationType::Remove => state[operation.variable].remove_from_upper(operation.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::SetVariable;
    use std::collections::BTreeSet;

    fn set(values: impl IntoIterator<Item = i64>) -> BTreeSet<i64> {
        values.into_iter().collect()
    }

    #[test]
    fn incremental_replay_matches_full_rebuild() {
        let mut initial = VariableAssignment::default();
        initial.push(SetVariable::new("X", set([]), set([1, 2, 3]), 0, 3).unwrap());
        initial.push(SetVariable::new("Y", set([]), set([1, 2, 3]), 0, 3).unwrap());
        let x = initial.keys().next().unwrap();
        let y = initial.keys().nth(1).unwrap();

        let constraints = vec![Constraint::Subset { f: x, g: y }];
        let mut computer = StateComputer::new(initial, constraints);
        let mut metrics = SolverMetrics::default();
        let mut random = Random::default();

        let path = vec![Operation {
            variable: x,
            op_type: OperationType::Add,
            value: 1,
            depth: 0,
        }];
        let first = computer
            .compute_state(&path, &mut metrics, 0.0, &mut random)
            .unwrap();
        assert!(first[y].lower().contains(&1));

        let mut path_2 = path.clone();
        path_2.push(Operation {
            variable: x,
            op_type: OperationType::Add,
            value: 2,
            depth: 1,
        });
        let second = computer
            .compute_state(&path_2, &mut metrics, 0.0, &mut random)
            .unwrap();
        assert!(second[y].lower().is_superset(&set([1, 2])));
    }

    #[test]
    fn cache_hit_on_repeated_path() {
        let mut initial = VariableAssignment::default();
        initial.push(SetVariable::new("X", set([]), set([1, 2, 3]), 0, 3).unwrap());
        let x = initial.keys().next().unwrap();
        let mut computer = StateComputer::new(initial, vec![]);
        let mut metrics = SolverMetrics::default();
        let mut random = Random::default();

        let path = vec![Operation {
            variable: x,
            op_type: OperationType::Add,
            value: 1,
            depth: 0,
        }];
        let _ = computer
            .compute_state(&path, &mut metrics, 0.0, &mut random)
            .unwrap();
        let _ = computer
            .compute_state(&path, &mut metrics, 0.0, &mut random)
            .unwrap();
        assert_eq!(metrics.cache_hits, 1);
    }
}
