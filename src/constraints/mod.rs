//! The constraint catalogue and its filtering/evaluation rules (§3, §4.2).
//!
//! Constraints are modelled as one tagged enum rather than a trait-object hierarchy (§9
//! "Polymorphism"): every variant carries the [`VariableId`]s it refers to (never an owning
//! handle into the variable itself, §9 "Cyclic references"), and the bound-tightening logic for
//! each variant lives in its own module as free functions that share small helpers, not base-class
//! methods.

mod bounded_intersection;
mod cardinality_eq;
mod difference;
mod different;
mod intersection;
mod lex_less;
mod subset;
mod union;

use crate::basic_types::HashSet;
use crate::engine::fault::InconsistencyFault;
use crate::variables::VariableAssignment;
use crate::variables::VariableId;

/// One constraint from the catalogue of §3. Holds variable references by [`VariableId`], not by
/// owning the [`crate::variables::SetVariable`] itself — the variable store (or, during search,
/// the branch's [`VariableAssignment`]) is the single owner.
#[derive(Debug, Clone, Copy)]
pub enum Constraint {
    /// `F ⊆ G`.
    Subset { f: VariableId, g: VariableId },
    /// `H = F ∪ G`.
    Union {
        h: VariableId,
        f: VariableId,
        g: VariableId,
    },
    /// `H = F ∩ G`.
    Intersection {
        h: VariableId,
        f: VariableId,
        g: VariableId,
    },
    /// `H = F \ G`.
    Difference {
        h: VariableId,
        f: VariableId,
        g: VariableId,
    },
    /// `F ≠ G`.
    Different { f: VariableId, g: VariableId },
    /// `|F| = n`.
    CardinalityEq { f: VariableId, n: usize },
    /// `|F ∩ G| ≤ k`.
    BoundedIntersection {
        f: VariableId,
        g: VariableId,
        k: usize,
    },
    /// `F <_lex G`: the ascending-sorted sequence of `F` is lexicographically less than that of
    /// `G`.
    LexLess { f: VariableId, g: VariableId },
}

impl Constraint {
    /// Run this constraint's filtering rule against `state`, tightening bounds in place.
    ///
    /// Returns the set of variable names (here, ids) whose bounds were *strictly* tightened,
    /// which is what drives the variable-indexed propagation queue (§4.3, and the "Open
    /// question" of §9, resolved in favour of this contract). Returns
    /// [`InconsistencyFault`] if the rule's post-condition cannot be met without breaking one of
    /// the §3 invariants.
    pub(crate) fn filter(
        &self,
        state: &mut VariableAssignment,
    ) -> Result<HashSet<VariableId>, InconsistencyFault> {
        match *self {
            Constraint::Subset { f, g } => subset::filter(state, f, g),
            Constraint::Union { h, f, g } => union::filter(state, h, f, g),
            Constraint::Intersection { h, f, g } => intersection::filter(state, h, f, g),
            Constraint::Difference { h, f, g } => difference::filter(state, h, f, g),
            Constraint::Different { f, g } => different::filter(state, f, g),
            Constraint::CardinalityEq { f, n } => cardinality_eq::filter(state, f, n),
            Constraint::BoundedIntersection { f, g, k } => {
                bounded_intersection::filter(state, f, g, k)
            }
            Constraint::LexLess { f, g } => lex_less::filter(state, f, g),
        }
    }

    /// Evaluate this constraint's truth value against ground (or partially ground) bounds. Used
    /// both to check a candidate solution (§4.5 step 3) and for the early-failure heuristic
    /// (§4.5 step 2), which only trusts the result when every referenced variable is still
    /// undetermined or fully ground in a way that makes the rule decidable (see the `evaluate`
    /// implementations for the exact per-rule decidability condition).
    pub(crate) fn evaluate(&self, state: &VariableAssignment) -> bool {
        match *self {
            Constraint::Subset { f, g } => subset::evaluate(state, f, g),
            Constraint::Union { h, f, g } => union::evaluate(state, h, f, g),
            Constraint::Intersection { h, f, g } => intersection::evaluate(state, h, f, g),
            Constraint::Difference { h, f, g } => difference::evaluate(state, h, f, g),
            Constraint::Different { f, g } => different::evaluate(state, f, g),
            Constraint::CardinalityEq { f, n } => cardinality_eq::evaluate(state, f, n),
            Constraint::BoundedIntersection { f, g, k } => {
                bounded_intersection::evaluate(state, f, g, k)
            }
            Constraint::LexLess { f, g } => lex_less::evaluate(state, f, g),
        }
    }

    /// Every variable this constraint reads or writes, for the propagation queue's
    /// variable-to-constraints adjacency (§4.3).
    pub(crate) fn variables_touched(&self) -> Vec<VariableId> {
        match *self {
            Constraint::Subset { f, g } => vec![f, g],
            Constraint::Union { h, f, g }
            | Constraint::Intersection { h, f, g }
            | Constraint::Difference { h, f, g } => vec![h, f, g],
            Constraint::Different { f, g } => vec![f, g],
            Constraint::CardinalityEq { f, .. } => vec![f],
            Constraint::BoundedIntersection { f, g, .. } => vec![f, g],
            Constraint::LexLess { f, g } => vec![f, g],
        }
    }

    /// A short, human-readable rendering used in logs and the operation-history surface.
    pub(crate) fn describe(&self, state: &VariableAssignment) -> String {
        let name = |id: VariableId| state[id].name().to_owned();
        match *self {
            Constraint::Subset { f, g } => format!("{} ⊆ {}", name(f), name(g)),
            Constraint::Union { h, f, g } => format!("{} = {} ∪ {}", name(h), name(f), name(g)),
            Constraint::Intersection { h, f, g } => {
                format!("{} = {} ∩ {}", name(h), name(f), name(g))
            }
            Constraint::Difference { h, f, g } => {
                format!("{} = {} \\ {}", name(h), name(f), name(g))
            }
            Constraint::Different { f, g } => format!("{} ≠ {}", name(f), name(g)),
            Constraint::CardinalityEq { f, n } => format!("|{}| = {}", name(f), n),
            Constraint::BoundedIntersection { f, g, k } => {
                format!("|{} ∩ {}| ≤ {}", name(f), name(g), k)
            }
            Constraint::LexLess { f, g } => format!("{} <_lex {}", name(f), name(g)),
        }
    }
}

/// Re-checks the §3 invariants for `id` after a filter tightened its bounds, turning a broken
/// invariant into the control-flow [`InconsistencyFault`] every filter propagates with `?`.
pub(crate) fn ensure_consistent(
    state: &VariableAssignment,
    id: VariableId,
) -> Result<(), InconsistencyFault> {
    if state[id].is_consistent_public() {
        Ok(())
    } else {
        Err(InconsistencyFault)
    }
}

/// Records `id` as touched in `touched` if `changed` is true. Shared by every filter
/// implementation instead of duplicating the `if changed { ... }` dance at each call site.
pub(crate) fn note(touched: &mut HashSet<VariableId>, id: VariableId, changed: bool) {
    if changed {
        let _ = touched.insert(id);
    }
}
