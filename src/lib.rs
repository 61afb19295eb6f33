//! # setcsp
//!
//! A constraint solver over finite **set-valued** variables. Each variable is bracketed between
//! a lower bound (elements it must contain) and an upper bound (elements it may contain), along
//! with optional cardinality bounds. A fixpoint propagator tightens these bounds against a small
//! catalogue of set constraints, and a chronological-backtracking search branches on individual
//! elements whenever propagation alone cannot determine a variable.
//!
//! ```rust
//! use setcsp::ConstraintKind;
//! use setcsp::SatisfactionResult;
//! use setcsp::SolveConfig;
//! use setcsp::Solver;
//! use std::collections::BTreeSet;
//!
//! let mut solver = Solver::default();
//! let x = solver
//!     .make_variable("X", BTreeSet::from([1]), BTreeSet::from([1, 2, 3]), None, None)
//!     .unwrap();
//! let y = solver
//!     .make_variable("Y", BTreeSet::new(), BTreeSet::from([1, 2, 3, 4]), None, None)
//!     .unwrap();
//! solver.add_constraint(ConstraintKind::Subset { f: x, g: y }).unwrap();
//!
//! match solver.solve(SolveConfig::default()).unwrap() {
//!     SatisfactionResult::Satisfiable(solutions) => {
//!         let first = &solutions[0];
//!         assert!(first["X"].is_subset(&first["Y"]));
//!     }
//!     other => panic!("expected satisfiable, got {other:?}"),
//! }
//! ```

pub(crate) mod basic_types;
pub(crate) mod engine;
pub(crate) mod metrics;

pub mod branching;
pub mod constraints;
pub mod variables;

mod api;

#[cfg(test)]
mod tests;

pub use api::ConstraintKind;
pub use api::NamedSolution;
pub use api::NumSolutions;
pub use api::SatisfactionResult;
pub use api::SolveConfig;
pub use api::Solver;
pub use basic_types::ConstraintOperationError;
pub use basic_types::InvariantViolation;
pub use basic_types::UnknownVariableError;
pub use metrics::SolverMetrics;
