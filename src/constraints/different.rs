use crate::basic_types::HashSet;
use crate::engine::fault::InconsistencyFault;
use crate::variables::VariableAssignment;
use crate::variables::VariableId;

/// `F ≠ G`. See §4.2: the filter never tightens bounds before both sides are ground — there is
/// no bound-consistent way to rule out a single value from disequality alone — it only detects
/// the unsatisfiable case once both variables are determined and equal.
pub(crate) fn filter(
    state: &mut VariableAssignment,
    f: VariableId,
    g: VariableId,
) -> Result<HashSet<VariableId>, InconsistencyFault> {
    if state[f].is_determined() && state[g].is_determined() && state[f].lower() == state[g].lower()
    {
        return Err(InconsistencyFault);
    }
    Ok(HashSet::default())
}

/// False only once both sides are determined and equal; otherwise the constraint may still be
/// satisfied by how the undetermined elements resolve, so it is optimistically `true`.
pub(crate) fn evaluate(state: &VariableAssignment, f: VariableId, g: VariableId) -> bool {
    !(state[f].is_determined() && state[g].is_determined() && state[f].lower() == state[g].lower())
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
    fn scenario_5_disequality_failure() {
        let f = SetVariable::new("F", set([1, 2]), set([1, 2]), 0, 2).unwrap();
        let g = SetVariable::new("G", set([1, 2]), set([1, 2]), 0, 2).unwrap();
        let mut state = assignment(vec![f, g]);
        let f_id = state.keys().next().unwrap();
        let g_id = state.keys().nth(1).unwrap();

        assert!(filter(&mut state, f_id, g_id).is_err());
    }

    #[test]
    fn does_not_fail_while_undetermined() {
        let f = SetVariable::new("F", set([1]), set([1, 2]), 0, 2).unwrap();
        let g = SetVariable::new("G", set([1]), set([1, 2]), 0, 2).unwrap();
        let mut state = assignment(vec![f, g]);
        let f_id = state.keys().next().unwrap();
        let g_id = state.keys().nth(1).unwrap();

        assert!(filter(&mut state, f_id, g_id).is_ok());
    }
}
