use std::collections::BTreeSet;
use std::fmt;

use crate::basic_types::InvariantViolation;

/// A set-valued decision variable: the set of elements it may contain is unknown, but bracketed
/// between a lower bound `F↓` (known members) and an upper bound `F↑` (possible members), with
/// optional cardinality bounds (§3).
///
/// Elements are kept in [`BTreeSet`]s rather than hash sets so that iteration is in ascending
/// order; several filtering rules (lexicographic ordering, the canonical path key of the state
/// computer) depend on a deterministic, sorted element order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetVariable {
    name: String,
    lower: BTreeSet<i64>,
    upper: BTreeSet<i64>,
    min_card: usize,
    max_card: usize,
}

impl fmt::Display for SetVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: must contain {:?}, can contain {:?}, card [{}, {}]",
            self.name,
            self.lower,
            self.undetermined().collect::<Vec<_>>(),
            self.min_card,
            self.max_card
        )
    }
}

impl SetVariable {
    /// Construct a new set variable, checking the consistency invariants of §3.
    ///
    /// `min_card` defaults to `0` and `max_card` to `|upper|` at the call site
    /// ([`crate::api::Solver::make_variable`]); this constructor takes the bounds explicitly so
    /// it can also be used by the state computer to clone root variables into a branch.
    pub(crate) fn new(
        name: impl Into<String>,
        lower: BTreeSet<i64>,
        upper: BTreeSet<i64>,
        min_card: usize,
        max_card: usize,
    ) -> Result<Self, InvariantViolation> {
        let name = name.into();
        let variable = SetVariable {
            name,
            lower,
            upper,
            min_card,
            max_card,
        };

        variable.check_consistent()?;
        Ok(variable)
    }

    fn check_consistent(&self) -> Result<(), InvariantViolation> {
        if !self.lower.is_subset(&self.upper) {
            return Err(InvariantViolation::new(
                &self.name,
                "lower bound is not a subset of the upper bound",
            ));
        }
        if self.lower.len() > self.max_card {
            return Err(InvariantViolation::new(
                &self.name,
                format!(
                    "|lower| = {} exceeds max_card = {}",
                    self.lower.len(),
                    self.max_card
                ),
            ));
        }
        if self.upper.len() < self.min_card {
            return Err(InvariantViolation::new(
                &self.name,
                format!(
                    "|upper| = {} is below min_card = {}",
                    self.upper.len(),
                    self.min_card
                ),
            ));
        }
        if self.min_card > self.max_card {
            return Err(InvariantViolation::new(
                &self.name,
                format!(
                    "min_card = {} exceeds max_card = {}",
                    self.min_card, self.max_card
                ),
            ));
        }
        Ok(())
    }

    /// Whether the variable is consistent (invariants 1–4 of §3) *and* its lower bound already
    /// satisfies `min_card` — the condition under which it is admissible in a solution.
    pub fn is_valid(&self) -> bool {
        self.check_consistent().is_ok() && self.lower.len() >= self.min_card
    }

    /// `lower == upper`: the variable's content is no longer ambiguous.
    pub fn is_determined(&self) -> bool {
        self.lower == self.upper
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lower(&self) -> &BTreeSet<i64> {
        &self.lower
    }

    pub fn upper(&self) -> &BTreeSet<i64> {
        &self.upper
    }

    pub fn min_card(&self) -> usize {
        self.min_card
    }

    pub fn max_card(&self) -> usize {
        self.max_card
    }

    /// `upper \ lower`: the elements still undecided, in ascending order.
    pub fn undetermined(&self) -> impl Iterator<Item = i64> + '_ {
        self.upper.difference(&self.lower).copied()
    }

    /// Replace the upper bound with a strictly tighter one. Returns whether anything changed.
    pub(crate) fn tighten_upper(&mut self, new_upper: BTreeSet<i64>) -> bool {
        debug_assert!(
            new_upper.is_subset(&self.upper),
            "upper bound can only shrink"
        );
        if new_upper != self.upper {
            self.upper = new_upper;
            true
        } else {
            false
        }
    }

    /// Extend the lower bound to a strictly larger one. Returns whether anything changed.
    pub(crate) fn widen_lower(&mut self, new_lower: BTreeSet<i64>) -> bool {
        debug_assert!(
            self.lower.is_subset(&new_lower),
            "lower bound can only grow"
        );
        if new_lower != self.lower {
            self.lower = new_lower;
            true
        } else {
            false
        }
    }

    /// Raise `min_card`, if the new value is larger. Returns whether anything changed.
    pub(crate) fn raise_min_card(&mut self, candidate: usize) -> bool {
        if candidate > self.min_card {
            self.min_card = candidate;
            true
        } else {
            false
        }
    }

    /// Lower `max_card`, if the new value is smaller. Returns whether anything changed.
    pub(crate) fn lower_max_card(&mut self, candidate: usize) -> bool {
        if candidate < self.max_card {
            self.max_card = candidate;
            true
        } else {
            false
        }
    }

    /// Directly fix both bounds to an exact, ground set (used by `ADD`/`REMOVE` operation replay
    /// and by filters that collapse a variable entirely, e.g. `CardinalityEq`).
    pub(crate) fn add_to_lower(&mut self, value: i64) {
        let _ = self.lower.insert(value);
    }

    pub(crate) fn remove_from_upper(&mut self, value: i64) {
        let _ = self.upper.remove(&value);
    }
}
