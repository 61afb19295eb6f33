use crate::basic_types::HashSet;
use crate::constraints::ensure_consistent;
use crate::constraints::note;
use crate::engine::fault::InconsistencyFault;
use crate::variables::VariableAssignment;
use crate::variables::VariableId;

/// `F ⊆ G`. See §4.2.
pub(crate) fn filter(
    state: &mut VariableAssignment,
    f: VariableId,
    g: VariableId,
) -> Result<HashSet<VariableId>, InconsistencyFault> {
    let mut touched = HashSet::default();

    // F.upper ← F.upper ∩ G.upper
    let new_f_upper = state[f]
        .upper()
        .intersection(state[g].upper())
        .copied()
        .collect();
    let changed = state[f].tighten_upper(new_f_upper);
    note(&mut touched, f, changed);

    // G.lower ← G.lower ∪ F.lower
    let new_g_lower = state[g].lower().union(state[f].lower()).copied().collect();
    let changed = state[g].widen_lower(new_g_lower);
    note(&mut touched, g, changed);

    // G.min_card ← max(G.min_card, |F.lower ∪ G.lower|)
    let union_lower_len = state[f].lower().union(state[g].lower()).count();
    let changed = state[g].raise_min_card(union_lower_len);
    note(&mut touched, g, changed);

    // F.max_card ← min(F.max_card, |F.upper ∩ G.upper|)
    let intersection_upper_len = state[f].upper().intersection(state[g].upper()).count();
    let changed = state[f].lower_max_card(intersection_upper_len);
    note(&mut touched, f, changed);

    ensure_consistent(state, f)?;
    ensure_consistent(state, g)?;

    Ok(touched)
}

/// `F ⊆ G` is entailed-false as soon as some element certainly in `F` can never be in `G`; this
/// is decidable without either variable being ground, which is what lets the early-failure
/// heuristic of §4.5 prune before both sides are determined. At a ground state this reduces to
/// the ordinary subset check.
pub(crate) fn evaluate(state: &VariableAssignment, f: VariableId, g: VariableId) -> bool {
    state[f].lower().is_subset(state[g].upper())
}
