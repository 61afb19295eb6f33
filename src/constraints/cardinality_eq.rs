use crate::basic_types::HashSet;
use crate::constraints::ensure_consistent;
use crate::constraints::note;
use crate::engine::fault::InconsistencyFault;
use crate::variables::VariableAssignment;
use crate::variables::VariableId;

/// `|F| = n`. See §4.2.
pub(crate) fn filter(
    state: &mut VariableAssignment,
    f: VariableId,
    n: usize,
) -> Result<HashSet<VariableId>, InconsistencyFault> {
    if state[f].lower().len() > n || state[f].upper().len() < n {
        return Err(InconsistencyFault);
    }

    let mut touched = HashSet::default();

    if state[f].lower().len() == n {
        let new_upper = state[f].lower().clone();
        let changed = state[f].tighten_upper(new_upper);
        note(&mut touched, f, changed);
    } else if state[f].upper().len() == n {
        let new_lower = state[f].upper().clone();
        let changed = state[f].widen_lower(new_lower);
        note(&mut touched, f, changed);
    } else if state[f].upper().len() - state[f].lower().len() == n - state[f].lower().len() {
        // |F.upper| − |F.lower| = n − |F.lower|, i.e. every undetermined element must be
        // included to reach the target cardinality.
        let new_lower = state[f].upper().clone();
        let changed = state[f].widen_lower(new_lower);
        note(&mut touched, f, changed);
    }

    let changed = state[f].raise_min_card(n);
    note(&mut touched, f, changed);
    let changed = state[f].lower_max_card(n);
    note(&mut touched, f, changed);

    ensure_consistent(state, f)?;

    Ok(touched)
}

/// Entailed-false as soon as the target cardinality falls outside `[|lower|, |upper|]`;
/// decidable without `F` being ground.
pub(crate) fn evaluate(state: &VariableAssignment, f: VariableId, n: usize) -> bool {
    state[f].lower().len() <= n && n <= state[f].upper().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::SetVariable;

    fn assignment(vars: Vec<SetVariable>) -> VariableAssignment {
        let mut state = VariableAssignment::default();
        for v in vars {
            state.push(v);
        }
        state
    }

    fn set(values: impl IntoIterator<Item = i64>) -> std::collections::BTreeSet<i64> {
        values.into_iter().collect()
    }

    #[test]
    fn scenario_2_fixed_cardinality_collapses() {
        let a = SetVariable::new("A", set([]), set([1, 2, 3]), 0, 3).unwrap();
        let mut state = assignment(vec![a]);
        let a_id = state.keys().next().unwrap();

        let _ = filter(&mut state, a_id, 3).unwrap();

        assert!(state[a_id].is_determined());
        assert_eq!(state[a_id].lower(), &set([1, 2, 3]));
    }

    #[test]
    fn fails_when_n_out_of_range() {
        let a = SetVariable::new("A", set([1, 2]), set([1, 2, 3]), 0, 3).unwrap();
        let mut state = assignment(vec![a]);
        let a_id = state.keys().next().unwrap();

        assert!(filter(&mut state, a_id, 0).is_err());
    }
}
