use std::collections::BTreeSet;

use crate::basic_types::HashSet;
use crate::constraints::ensure_consistent;
use crate::constraints::note;
use crate::engine::fault::InconsistencyFault;
use crate::variables::VariableAssignment;
use crate::variables::VariableId;

/// `H = F ∩ G`. See §4.2.
pub(crate) fn filter(
    state: &mut VariableAssignment,
    h: VariableId,
    f: VariableId,
    g: VariableId,
) -> Result<HashSet<VariableId>, InconsistencyFault> {
    let mut touched = HashSet::default();

    // H.upper ← H.upper ∩ F.upper ∩ G.upper
    let f_and_g_upper: BTreeSet<i64> = state[f]
        .upper()
        .intersection(state[g].upper())
        .copied()
        .collect();
    let new_h_upper = state[h]
        .upper()
        .intersection(&f_and_g_upper)
        .copied()
        .collect();
    let changed = state[h].tighten_upper(new_h_upper);
    note(&mut touched, h, changed);

    // H.lower ← H.lower ∪ (F.lower ∩ G.lower)
    let f_and_g_lower: BTreeSet<i64> = state[f]
        .lower()
        .intersection(state[g].lower())
        .copied()
        .collect();
    let new_h_lower = state[h].lower().union(&f_and_g_lower).copied().collect();
    let changed = state[h].widen_lower(new_h_lower);
    note(&mut touched, h, changed);

    // F.lower ← F.lower ∪ H.lower, G.lower ← G.lower ∪ H.lower
    let new_f_lower = state[f].lower().union(state[h].lower()).copied().collect();
    let changed = state[f].widen_lower(new_f_lower);
    note(&mut touched, f, changed);

    let new_g_lower = state[g].lower().union(state[h].lower()).copied().collect();
    let changed = state[g].widen_lower(new_g_lower);
    note(&mut touched, g, changed);

    // Cardinality tightening mirrors union.
    let lower_intersection_len = state[f].lower().intersection(state[g].lower()).count();
    let changed = state[h].raise_min_card(lower_intersection_len);
    note(&mut touched, h, changed);

    let upper_intersection_len = state[f].upper().intersection(state[g].upper()).count();
    let changed = state[h].lower_max_card(upper_intersection_len);
    note(&mut touched, h, changed);

    ensure_consistent(state, h)?;
    ensure_consistent(state, f)?;
    ensure_consistent(state, g)?;

    Ok(touched)
}

/// Entailed-false as soon as either direction of the equality is provably impossible; decidable
/// without full determinism (§4.5 early-failure heuristic), and reduces to ordinary set equality
/// at a ground state.
pub(crate) fn evaluate(
    state: &VariableAssignment,
    h: VariableId,
    f: VariableId,
    g: VariableId,
) -> bool {
    let lower_intersection: BTreeSet<i64> = state[f]
        .lower()
        .intersection(state[g].lower())
        .copied()
        .collect();
    let upper_intersection: BTreeSet<i64> = state[f]
        .upper()
        .intersection(state[g].upper())
        .copied()
        .collect();
    lower_intersection.is_subset(state[h].upper())
        && state[h].lower().is_subset(&upper_intersection)
}
