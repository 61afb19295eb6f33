use std::collections::BTreeSet;

use crate::basic_types::HashSet;
use crate::constraints::ensure_consistent;
use crate::constraints::note;
use crate::engine::fault::InconsistencyFault;
use crate::variables::VariableAssignment;
use crate::variables::VariableId;

/// `H = F ∪ G`. See §4.2.
pub(crate) fn filter(
    state: &mut VariableAssignment,
    h: VariableId,
    f: VariableId,
    g: VariableId,
) -> Result<HashSet<VariableId>, InconsistencyFault> {
    let mut touched = HashSet::default();

    // H.upper ← H.upper ∩ (F.upper ∪ G.upper)
    let f_union_g_upper: BTreeSet<i64> =
        state[f].upper().union(state[g].upper()).copied().collect();
    let new_h_upper = state[h]
        .upper()
        .intersection(&f_union_g_upper)
        .copied()
        .collect();
    let changed = state[h].tighten_upper(new_h_upper);
    note(&mut touched, h, changed);

    // H.lower ← H.lower ∪ F.lower ∪ G.lower
    let new_h_lower: BTreeSet<i64> = state[h]
        .lower()
        .union(state[f].lower())
        .copied()
        .collect::<BTreeSet<_>>()
        .union(state[g].lower())
        .copied()
        .collect();
    let changed = state[h].widen_lower(new_h_lower);
    note(&mut touched, h, changed);

    // F.upper ← F.upper ∩ H.upper, G.upper ← G.upper ∩ H.upper
    let new_f_upper = state[f]
        .upper()
        .intersection(state[h].upper())
        .copied()
        .collect();
    let changed = state[f].tighten_upper(new_f_upper);
    note(&mut touched, f, changed);

    let new_g_upper = state[g]
        .upper()
        .intersection(state[h].upper())
        .copied()
        .collect();
    let changed = state[g].tighten_upper(new_g_upper);
    note(&mut touched, g, changed);

    // H.min_card ← max(H.min_card, |F.lower ∪ G.lower|)
    let lower_union_len = state[f].lower().union(state[g].lower()).count();
    let changed = state[h].raise_min_card(lower_union_len);
    note(&mut touched, h, changed);

    // H.max_card ← min(H.max_card, |F.upper ∪ G.upper|)
    let upper_union_len = state[f].upper().union(state[g].upper()).count();
    let changed = state[h].lower_max_card(upper_union_len);
    note(&mut touched, h, changed);

    ensure_consistent(state, h)?;
    ensure_consistent(state, f)?;
    ensure_consistent(state, g)?;

    Ok(touched)
}

/// `H = F ∪ G` is entailed-false as soon as either direction of the equality is provably
/// impossible: some element certain to be in the union can never reach `H`, or some element
/// certain to be in `H` can never come from `F` or `G`. Decidable without full determinism,
/// which lets the early-failure heuristic of §4.5 fire before all three variables are ground. At
/// a ground state this reduces to the ordinary set-equality check.
pub(crate) fn evaluate(
    state: &VariableAssignment,
    h: VariableId,
    f: VariableId,
    g: VariableId,
) -> bool {
    let lower_union: BTreeSet<i64> = state[f].lower().union(state[g].lower()).copied().collect();
    let upper_union: BTreeSet<i64> = state[f].upper().union(state[g].upper()).copied().collect();
    lower_union.is_subset(state[h].upper()) && state[h].lower().is_subset(&upper_union)
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

    fn set(values: impl IntoIterator<Item = i64>) -> BTreeSet<i64> {
        values.into_iter().collect()
    }

    #[test]
    fn scenario_3_union_equality() {
        // From §8 scenario 3.
        let f = SetVariable::new("F", set([1]), set([1, 2]), 0, 2).unwrap();
        let g = SetVariable::new("G", set([3]), set([3, 4]), 0, 2).unwrap();
        let h = SetVariable::new("H", set([]), set([1, 2, 3, 4]), 0, 4).unwrap();
        let mut state = assignment(vec![h, f, g]);
        let h_id = state.keys().next().unwrap();
        let f_id = state.keys().nth(1).unwrap();
        let g_id = state.keys().nth(2).unwrap();

        let _ = filter(&mut state, h_id, f_id, g_id).unwrap();

        assert!(state[h_id].lower().is_superset(&set([1, 3])));
        assert!(state[h_id].upper().is_subset(&set([1, 2, 3, 4])));
        assert!(state[h_id].min_card() >= 2);
    }
}
