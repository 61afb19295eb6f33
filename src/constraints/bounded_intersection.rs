use crate::basic_types::HashSet;
use crate::constraints::ensure_consistent;
use crate::constraints::note;
use crate::engine::fault::InconsistencyFault;
use crate::variables::VariableAssignment;
use crate::variables::VariableId;

/// `|F ∩ G| ≤ k`. See §4.2.
pub(crate) fn filter(
    state: &mut VariableAssignment,
    f: VariableId,
    g: VariableId,
    k: usize,
) -> Result<HashSet<VariableId>, InconsistencyFault> {
    let mut touched = HashSet::default();

    let certain_intersection_len = state[f].lower().intersection(state[g].lower()).count();
    if certain_intersection_len > k {
        return Err(InconsistencyFault);
    }

    // For each x in F.upper \ F.lower: if |I| + [x in G.lower] > k, remove x from F.upper.
    let g_lower = state[g].lower().clone();
    let candidates: Vec<i64> = state[f].undetermined().collect();
    let mut new_f_upper = state[f].upper().clone();
    for x in candidates {
        let extra = usize::from(g_lower.contains(&x));
        if certain_intersection_len + extra > k {
            let _ = new_f_upper.remove(&x);
        }
    }
    let changed = state[f].tighten_upper(new_f_upper);
    note(&mut touched, f, changed);

    // Symmetrically for G.
    let f_lower = state[f].lower().clone();
    let candidates: Vec<i64> = state[g].undetermined().collect();
    let mut new_g_upper = state[g].upper().clone();
    for x in candidates {
        let extra = usize::from(f_lower.contains(&x));
        if certain_intersection_len + extra > k {
            let _ = new_g_upper.remove(&x);
        }
    }
    let changed = state[g].tighten_upper(new_g_upper);
    note(&mut touched, g, changed);

    ensure_consistent(state, f)?;
    ensure_consistent(state, g)?;

    Ok(touched)
}

/// Entailed-false as soon as the certain intersection already exceeds `k`; decidable without
/// either variable being ground.
pub(crate) fn evaluate(state: &VariableAssignment, f: VariableId, g: VariableId, k: usize) -> bool {
    state[f].lower().intersection(state[g].lower()).count() <= k
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
    fn removes_candidates_that_would_exceed_k() {
        let f = SetVariable::new("F", set([1]), set([1, 2, 3]), 0, 3).unwrap();
        let g = SetVariable::new("G", set([2]), set([1, 2, 3]), 0, 3).unwrap();
        let mut state = assignment(vec![f, g]);
        let f_id = state.keys().next().unwrap();
        let g_id = state.keys().nth(1).unwrap();

        // |{1} ∩ {2}| = 0, k = 0: adding 2 to F or 1 to G would make the intersection 1.
        let touched = filter(&mut state, f_id, g_id, 0).unwrap();
        assert!(touched.contains(&f_id));
        assert!(touched.contains(&g_id));
        assert!(!state[f_id].upper().contains(&2));
        assert!(!state[g_id].upper().contains(&1));
    }

    #[test]
    fn fails_when_certain_intersection_exceeds_k() {
        let f = SetVariable::new("F", set([1, 2]), set([1, 2, 3]), 0, 3).unwrap();
        let g = SetVariable::new("G", set([1, 2]), set([1, 2, 3]), 0, 3).unwrap();
        let mut state = assignment(vec![f, g]);
        let f_id = state.keys().next().unwrap();
        let g_id = state.keys().nth(1).unwrap();

        assert!(filter(&mut state, f_id, g_id, 1).is_err());
    }
}
