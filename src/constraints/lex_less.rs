use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::basic_types::HashSet;
use crate::constraints::ensure_consistent;
use crate::constraints::note;
use crate::engine::fault::InconsistencyFault;
use crate::variables::VariableAssignment;
use crate::variables::VariableId;

/// Dictionary order on the ascending element sequence of two sets (§3 glossary): the usual
/// shorter-is-less-if-prefix rule falls out of comparing the sorted iterators directly.
fn lex_cmp(a: &BTreeSet<i64>, b: &BTreeSet<i64>) -> Ordering {
    a.iter().cmp(b.iter())
}

/// The lexicographically greatest set reachable from `required` by adding elements of
/// `allowed \ required`, subject to a final size in `[min_size, max_size]`. Filling with the
/// largest available extras (for a fixed size) always maximises the tail of the sequence without
/// disturbing its head, but the best size itself is not always the largest one, so every
/// admissible size is tried and the best result kept.
fn best_completion(
    required: &BTreeSet<i64>,
    allowed: &BTreeSet<i64>,
    min_size: usize,
    max_size: usize,
) -> BTreeSet<i64> {
    let min_size = min_size.max(required.len());
    let max_size = max_size.min(allowed.len());
    let extras: Vec<i64> = allowed.difference(required).copied().collect();

    let mut best: Option<BTreeSet<i64>> = None;
    if min_size > max_size {
        return required.clone();
    }
    for size in min_size..=max_size {
        let need = size - required.len();
        if need > extras.len() {
            continue;
        }
        let mut candidate: BTreeSet<i64> = required.clone();
        for &extra in extras.iter().rev().take(need) {
            let _ = candidate.insert(extra);
        }
        if best
            .as_ref()
            .is_none_or(|current| lex_cmp(&candidate, current) == Ordering::Greater)
        {
            best = Some(candidate);
        }
    }
    best.unwrap_or_else(|| required.clone())
}

/// `F <_lex G`. See §4.2.
pub(crate) fn filter(
    state: &mut VariableAssignment,
    f: VariableId,
    g: VariableId,
) -> Result<HashSet<VariableId>, InconsistencyFault> {
    let mut touched = HashSet::default();

    let f_lower = state[f].lower().clone();
    let g_upper = state[g].upper().clone();
    let g_lower = state[g].lower().clone();
    let min_card = state[g].min_card();
    let max_card = state[g].max_card();

    let candidates: Vec<i64> = g_upper.difference(&g_lower).copied().collect();
    let mut new_g_upper = g_upper.clone();
    for x in candidates {
        let mut required = g_lower.clone();
        let _ = required.insert(x);
        let completion = best_completion(&required, &g_upper, min_card, max_card);
        if lex_cmp(&completion, &f_lower) != Ordering::Greater {
            let _ = new_g_upper.remove(&x);
        }
    }
    let changed = state[g].tighten_upper(new_g_upper.clone());
    note(&mut touched, g, changed);

    if lex_cmp(&f_lower, &new_g_upper) != Ordering::Less {
        return Err(InconsistencyFault);
    }

    ensure_consistent(state, g)?;

    Ok(touched)
}

/// Entailed-false as soon as `F.lower` is already not lex-less than `G.upper`; reduces to the
/// ground comparison `F <_lex G` once both variables are determined.
pub(crate) fn evaluate(state: &VariableAssignment, f: VariableId, g: VariableId) -> bool {
    lex_cmp(state[f].lower(), state[g].upper()) == Ordering::Less
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
    fn scenario_6_lex_ordering() {
        let f = SetVariable::new("F", set([1, 3]), set([1, 3]), 0, 2).unwrap();
        let g = SetVariable::new("G", set([]), set([1, 2, 3]), 2, 2).unwrap();
        let mut state = assignment(vec![f, g]);
        let f_id = state.keys().next().unwrap();
        let g_id = state.keys().nth(1).unwrap();

        let _ = filter(&mut state, f_id, g_id).unwrap();

        assert_eq!(state[g_id].upper(), &set([2, 3]));
    }

    #[test]
    fn fails_when_no_completion_can_beat_f() {
        let f = SetVariable::new("F", set([2, 3]), set([2, 3]), 0, 2).unwrap();
        let g = SetVariable::new("G", set([]), set([1, 2]), 2, 2).unwrap();
        let mut state = assignment(vec![f, g]);
        let f_id = state.keys().next().unwrap();
        let g_id = state.keys().nth(1).unwrap();

        assert!(filter(&mut state, f_id, g_id).is_err());
    }
}
