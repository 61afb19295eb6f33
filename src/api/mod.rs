//! The public surface: building variables, adding constraints, and invoking `solve` (§6).
//!
//! ```rust
//! use setcsp::Solver;
//! use setcsp::ConstraintKind;
//! use setcsp::SolveConfig;
//! use setcsp::SatisfactionResult;
//! use std::collections::BTreeSet;
//!
//! let mut solver = Solver::default();
//! let x = solver
//!     .make_variable("X", BTreeSet::from([1, 2]), BTreeSet::from([1, 2, 3, 4]), None, None)
//!     .unwrap();
//! let y = solver
//!     .make_variable("Y", BTreeSet::from([2]), BTreeSet::from([1, 2, 3, 4, 5]), None, None)
//!     .unwrap();
//! solver
//!     .add_constraint(ConstraintKind::Subset { f: x, g: y })
//!     .unwrap();
//!
//! match solver.solve(SolveConfig::default()).unwrap() {
//!     SatisfactionResult::Satisfiable(solutions) => assert!(!solutions.is_empty()),
//!     other => panic!("expected a solution, got {other:?}"),
//! }
//! ```

use std::collections::BTreeSet;
use std::time::Duration;

use log::info;

use crate::basic_types::ConstraintOperationError;
use crate::basic_types::HashMap;
use crate::basic_types::Random;
use crate::basic_types::UnknownVariableError;
use crate::branching::variable_selection::resolve_custom_order;
use crate::branching::RestartStrategy;
use crate::branching::ValueStrategy;
use crate::branching::VariableStrategy;
use crate::constraints::Constraint;
use crate::engine::search::SearchEngine;
use crate::engine::search::SearchOutcome;
use crate::engine::state::StateComputer;
use crate::engine::termination::Termination;
use crate::metrics::SolverMetrics;
use crate::variables::SetVariable;
use crate::variables::VariableAssignment;
use crate::variables::VariableId;
use crate::variables::VariableStore;

pub use crate::engine::search::NumSolutions;

/// One constraint from the catalogue of §3, addressed by the variable names used at
/// [`Solver::make_variable`] time rather than the internal [`VariableId`] handles.
#[derive(Debug, Clone, Copy)]
pub enum ConstraintKind {
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
    /// `F <_lex G`.
    LexLess { f: VariableId, g: VariableId },
}

impl From<ConstraintKind> for Constraint {
    fn from(kind: ConstraintKind) -> Self {
        match kind {
            ConstraintKind::Subset { f, g } => Constraint::Subset { f, g },
            ConstraintKind::Union { h, f, g } => Constraint::Union { h, f, g },
            ConstraintKind::Intersection { h, f, g } => Constraint::Intersection { h, f, g },
            ConstraintKind::Difference { h, f, g } => Constraint::Difference { h, f, g },
            ConstraintKind::Different { f, g } => Constraint::Different { f, g },
            ConstraintKind::CardinalityEq { f, n } => Constraint::CardinalityEq { f, n },
            ConstraintKind::BoundedIntersection { f, g, k } => {
                Constraint::BoundedIntersection { f, g, k }
            }
            ConstraintKind::LexLess { f, g } => Constraint::LexLess { f, g },
        }
    }
}

/// The options recognised by [`Solver::solve`] (§6); unknown options have no representation here
/// since they are rejected at construction time by Rust's type system rather than at runtime
/// (§9 "Configuration").
#[derive(Debug, Clone)]
pub struct SolveConfig {
    pub variable_strategy: VariableStrategy,
    pub value_strategy: ValueStrategy,
    pub restart_strategy: RestartStrategy,
    /// User-supplied priority list for `CUSTOM_ORDER`; ignored by every other
    /// [`VariableStrategy`].
    pub custom_order: Vec<String>,
    pub num_solutions: NumSolutions,
    /// Hands the operation history to a visualiser collaborator (out of scope for the core;
    /// §1 "Out of scope"). When set, the history remains available via
    /// [`Solver::operation_history`] after `solve` returns.
    pub visualize: bool,
    /// An optional wall-clock budget; `None` means search stops only on interrupt or exhaustion.
    pub time_budget: Option<Duration>,
    /// Seeds the random streams used by `RANDOM` heuristics, restart tie-breaks, and the
    /// "skip propagation" predicate (§9 "Randomness").
    pub seed: u64,
    /// Probability that the state computer bypasses the fixpoint on an individual call (§4.4
    /// "Configurable skip"); `0.0` disables diving entirely.
    pub skip_propagation_probability: f64,
}

impl Default for SolveConfig {
    fn default() -> Self {
        SolveConfig {
            variable_strategy: VariableStrategy::SmallestDomain,
            value_strategy: ValueStrategy::Random,
            restart_strategy: RestartStrategy::ConstrainedRandom,
            custom_order: Vec::new(),
            num_solutions: NumSolutions::One,
            visualize: false,
            time_budget: None,
            seed: 0,
            skip_propagation_probability: 0.0,
        }
    }
}

/// A solution maps every declared variable's name to its final, determined set.
pub type NamedSolution = HashMap<String, BTreeSet<i64>>;

#[derive(Debug)]
pub enum SatisfactionResult {
    Satisfiable(Vec<NamedSolution>),
    Unsatisfiable,
    /// Search was cancelled before exhausting the tree; carries whatever solutions were found
    /// before the interrupt (§7 `Interrupted`).
    Interrupted(Vec<NamedSolution>),
}

/// The main interaction point: declare set variables, register constraints over them, and
/// invoke `solve` (§6).
#[derive(Debug, Default)]
pub struct Solver {
    variables: VariableStore,
    constraints: Vec<Constraint>,
    metrics: Option<SolverMetrics>,
    operation_history: Vec<String>,
    solution_path: Vec<String>,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a new set variable (§4.1). `max_card` defaults to `|upper|`.
    pub fn make_variable(
        &mut self,
        name: impl Into<String>,
        lower: BTreeSet<i64>,
        upper: BTreeSet<i64>,
        min_card: Option<usize>,
        max_card: Option<usize>,
    ) -> Result<VariableId, ConstraintOperationError> {
        let max_card = max_card.unwrap_or(upper.len());
        let min_card = min_card.unwrap_or(0);
        let variable = SetVariable::new(name, lower, upper, min_card, max_card)?;
        self.variables.add(variable)
    }

    /// Registers a constraint over already-declared variables.
    pub fn add_constraint(&mut self, kind: ConstraintKind) -> Result<(), ConstraintOperationError> {
        self.constraints.push(kind.into());
        Ok(())
    }

    /// The union of every declared variable's upper bound (§4.1, §GLOSSARY "Universe").
    pub fn universe(&self) -> BTreeSet<i64> {
        self.variables.universe()
    }

    /// A short, human-readable rendering of every registered constraint, in declaration order.
    pub fn describe_constraints(&self) -> Vec<String> {
        let mut initial = VariableAssignment::default();
        for id in self.variables.ids() {
            initial.push(self.variables.get(id).clone());
        }
        self.constraints
            .iter()
            .map(|constraint| constraint.describe(&initial))
            .collect()
    }

    pub fn variable_id(&self, name: &str) -> Result<VariableId, UnknownVariableError> {
        self.variables
            .id_of(name)
            .ok_or_else(|| UnknownVariableError(name.to_owned()))
    }

    /// Counters accumulated by the most recent `solve` call (§6 "Metrics surface").
    pub fn metrics(&self) -> Option<&SolverMetrics> {
        self.metrics.as_ref()
    }

    /// Every branching decision made during the most recent `solve` call, oldest first (§6
    /// "operation-history surface"). Handed to visualiser collaborators when `visualize` is set;
    /// otherwise ignored.
    pub fn operation_history(&self) -> &[String] {
        &self.operation_history
    }

    /// The branching decisions that led to the most recently found solution, if any.
    pub fn solution_path(&self) -> &[String] {
        &self.solution_path
    }

    fn describe_operation(&self, operation: &crate::engine::state::Operation) -> String {
        format!(
            "{:?} {} {} @ depth {}",
            operation.op_type,
            self.variables.get(operation.variable).name(),
            operation.value,
            operation.depth
        )
    }

    pub fn solve(
        &mut self,
        config: SolveConfig,
    ) -> Result<SatisfactionResult, ConstraintOperationError> {
        let variable_strategy = match &config.variable_strategy {
            VariableStrategy::CustomOrder(_) => VariableStrategy::CustomOrder(
                resolve_custom_order(&config.custom_order, &self.variables)?,
            ),
            _ => config.variable_strategy.clone(),
        };

        let mut initial = VariableAssignment::default();
        for id in self.variables.ids() {
            initial.push(self.variables.get(id).clone());
        }

        let state_computer = StateComputer::new(initial, self.constraints.clone());
        let termination = match config.time_budget {
            Some(budget) => Termination::starting_now(budget),
            None => Termination::unbounded(),
        };
        if termination.install_signal_handler().is_err() {
            info!("could not install a cooperative signal handler; interrupt via time budget only");
        }

        let mut engine = SearchEngine::new(
            state_computer,
            self.constraints.clone(),
            self.variables.len(),
            variable_strategy,
            config.value_strategy,
            config.restart_strategy,
            Random::with_seed(config.seed),
            config.skip_propagation_probability,
        );

        if config.visualize {
            info!("visualize=true: operation history will remain available via the solver's accessors");
        }

        let outcome = engine.solve(config.num_solutions, &termination);
        engine.metrics().log_statistics();
        self.metrics = Some(engine.metrics().clone());
        self.operation_history = engine
            .operation_history()
            .iter()
            .map(|operation| self.describe_operation(operation))
            .collect();
        self.solution_path = engine
            .solution_path()
            .iter()
            .map(|operation| self.describe_operation(operation))
            .collect();

        let name_solutions = |solutions: Vec<crate::engine::search::Solution>| {
            solutions
                .into_iter()
                .map(|solution| {
                    solution
                        .into_iter()
                        .map(|(id, values)| (self.variables.get(id).name().to_owned(), values))
                        .collect()
                })
                .collect()
        };

        Ok(match outcome {
            SearchOutcome::Solved(solutions) => {
                SatisfactionResult::Satisfiable(name_solutions(solutions))
            }
            SearchOutcome::Unsatisfiable => SatisfactionResult::Unsatisfiable,
            SearchOutcome::Interrupted(solutions) => {
                SatisfactionResult::Interrupted(name_solutions(solutions))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_1_subset_propagation_through_the_public_api() {
        let mut solver = Solver::default();
        let x = solver
            .make_variable(
                "X",
                BTreeSet::from([1, 2]),
                BTreeSet::from([1, 2, 3, 4]),
                Some(2),
                Some(3),
            )
            .unwrap();
        let y = solver
            .make_variable(
                "Y",
                BTreeSet::from([2]),
                BTreeSet::from([1, 2, 3, 4, 5]),
                Some(1),
                Some(4),
            )
            .unwrap();
        solver
            .add_constraint(ConstraintKind::Subset { f: x, g: y })
            .unwrap();

        match solver.solve(SolveConfig::default()).unwrap() {
            SatisfactionResult::Satisfiable(solutions) => assert!(!solutions.is_empty()),
            other => panic!("expected satisfiable, got {other:?}"),
        }
    }

    #[test]
    fn scenario_5_disequality_is_unsatisfiable() {
        let mut solver = Solver::default();
        let f = solver
            .make_variable(
                "F",
                BTreeSet::from([1, 2]),
                BTreeSet::from([1, 2]),
                None,
                None,
            )
            .unwrap();
        let g = solver
            .make_variable(
                "G",
                BTreeSet::from([1, 2]),
                BTreeSet::from([1, 2]),
                None,
                None,
            )
            .unwrap();
        solver
            .add_constraint(ConstraintKind::Different { f, g })
            .unwrap();

        match solver.solve(SolveConfig::default()).unwrap() {
            SatisfactionResult::Unsatisfiable => {}
            other => panic!("expected unsatisfiable, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_variable_names() {
        let mut solver = Solver::default();
        solver
            .make_variable("X", BTreeSet::new(), BTreeSet::from([1]), None, None)
            .unwrap();
        let result = solver.make_variable("X", BTreeSet::new(), BTreeSet::from([1]), None, None);
        assert!(result.is_err());
    }
}
