//! Pluggable value-selection strategies (§4.5 "Value heuristics").

use crate::basic_types::HashMap;
use crate::basic_types::Random;
use crate::variables::VariableAssignment;
use crate::variables::VariableId;

#[derive(Debug, Clone, Copy)]
pub enum ValueStrategy {
    /// Smallest undetermined value first.
    Simple,
    Random,
    /// Prefer the value least chosen by history (§C "value-selection frequency tracking").
    LowestFrequency,
}

impl ValueStrategy {
    /// Picks one element of `variable.upper \ variable.lower`. Panics if the variable is already
    /// determined; callers only reach here for a variable just returned by a variable strategy.
    pub(crate) fn select(
        &self,
        state: &VariableAssignment,
        variable: VariableId,
        history: &HashMap<(VariableId, i64), u64>,
        random: &mut Random,
    ) -> i64 {
        let candidates: Vec<i64> = state[variable].undetermined().collect();
        debug_assert!(!candidates.is_empty());

        match self {
            ValueStrategy::Simple => candidates[0],
            ValueStrategy::Random => *random.choose(&candidates).expect("non-empty"),
            ValueStrategy::LowestFrequency => *candidates
                .iter()
                .min_by_key(|&&value| history.get(&(variable, value)).copied().unwrap_or(0))
                .expect("non-empty"),
        }
    }
}
