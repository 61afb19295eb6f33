use std::collections::BTreeSet;

use crate::basic_types::HashSet;
use crate::constraints::ensure_consistent;
use crate::constraints::note;
use crate::engine::fault::InconsistencyFault;
use crate::variables::VariableAssignment;
use crate::variables::VariableId;

/// `H = F \ G`. See §4.2.
pub(crate) fn filter(
    state: &mut VariableAssignment,
    h: VariableId,
    f: VariableId,
    g: VariableId,
) -> Result<HashSet<VariableId>, InconsistencyFault> {
    let mut touched = HashSet::default();

    // H.upper ← (H.upper ∩ F.upper) \ G.lower
    let h_and_f_upper: BTreeSet<i64> = state[h]
        .upper()
        .intersection(state[f].upper())
        .copied()
        .collect();
    let new_h_upper: BTreeSet<i64> = h_and_f_upper
        .difference(state[g].lower())
        .copied()
        .collect();
    let changed = state[h].tighten_upper(new_h_upper);
    note(&mut touched, h, changed);

    // F.upper ← F.upper ∩ (H.upper ∪ G.upper)
    let h_or_g_upper: BTreeSet<i64> = state[h].upper().union(state[g].upper()).copied().collect();
    let new_f_upper: BTreeSet<i64> = state[f]
        .upper()
        .intersection(&h_or_g_upper)
        .copied()
        .collect();
    let changed = state[f].tighten_upper(new_f_upper);
    note(&mut touched, f, changed);

    // G.upper ← G.upper \ H.lower
    let new_g_upper: BTreeSet<i64> = state[g]
        .upper()
        .difference(state[h].lower())
        .copied()
        .collect();
    let changed = state[g].tighten_upper(new_g_upper);
    note(&mut touched, g, changed);

    // H.lower ← H.lower ∪ (F.lower \ G.upper)
    let f_minus_g: BTreeSet<i64> = state[f]
        .lower()
        .difference(state[g].upper())
        .copied()
        .collect();
    let new_h_lower: BTreeSet<i64> = state[h].lower().union(&f_minus_g).copied().collect();
    let changed = state[h].widen_lower(new_h_lower);
    note(&mut touched, h, changed);

    // F.lower ← F.lower ∪ H.lower
    let new_f_lower: BTreeSet<i64> = state[f].lower().union(state[h].lower()).copied().collect();
    let changed = state[f].widen_lower(new_f_lower);
    note(&mut touched, f, changed);

    // Symmetric cardinality updates.
    let h_min_candidate = state[h].lower().union(&f_minus_g).count();
    let changed = state[h].raise_min_card(h_min_candidate);
    note(&mut touched, h, changed);

    let f_min_candidate = state[h].lower().union(state[f].lower()).count();
    let changed = state[f].raise_min_card(f_min_candidate);
    note(&mut touched, f, changed);

    let h_max_candidate = h_and_f_upper.difference(state[g].lower()).count();
    let changed = state[h].lower_max_card(h_max_candidate);
    note(&mut touched, h, changed);

    let f_max_candidate = state[f].upper().intersection(&h_or_g_upper).count();
    let changed = state[f].lower_max_card(f_max_candidate);
    note(&mut touched, f, changed);

    let g_max_candidate = state[g].upper().difference(state[h].lower()).count();
    let changed = state[g].lower_max_card(g_max_candidate);
    note(&mut touched, g, changed);

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
    let lower_difference: BTreeSet<i64> = state[f]
        .lower()
        .difference(state[g].upper())
        .copied()
        .collect();
    let upper_difference: BTreeSet<i64> = state[f]
        .upper()
        .difference(state[g].lower())
        .copied()
        .collect();
    lower_difference.is_subset(state[h].upper()) && state[h].lower().is_subset(&upper_difference)
}
