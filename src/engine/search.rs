//! Depth-first, binary-branching search (§4.5), grounded in the recursive `_solve` of the
//! original solver this was distilled from but restructured around an explicit control-flow
//! signal instead of exceptions, and around single-element binary branching exactly as specified
//! rather than the original's per-level loop over every candidate value.

use std::collections::BTreeSet;

use log::debug;

use crate::basic_types::HashMap;
use crate::basic_types::HashSet;
use crate::basic_types::Random;
use crate::branching::variable_selection::VariableChoice;
use crate::branching::RestartStrategy;
use crate::branching::ValueStrategy;
use crate::branching::VariableStrategy;
use crate::constraints::Constraint;
use crate::engine::propagation::Propagator;
use crate::engine::state::canonical_key;
use crate::engine::state::Operation;
use crate::engine::state::OperationType;
use crate::engine::state::Path;
use crate::engine::state::StateComputer;
use crate::engine::termination::Termination;
use crate::metrics::SolverMetrics;
use crate::variables::VariableId;

/// A ground solution: each variable's determined content.
pub(crate) type Solution = HashMap<VariableId, BTreeSet<i64>>;

/// How many solutions a call to [`SearchEngine::solve`] should collect before stopping.
#[derive(Debug, Clone, Copy)]
pub enum NumSolutions {
    One,
    Count(usize),
    All,
}

impl NumSolutions {
    fn target(self) -> usize {
        match self {
            NumSolutions::One => 1,
            NumSolutions::Count(n) => n.max(1),
            NumSolutions::All => usize::MAX,
        }
    }
}

/// What the search found once it stopped.
#[derive(Debug)]
pub(crate) enum SearchOutcome {
    Solved(Vec<Solution>),
    Unsatisfiable,
    Interrupted(Vec<Solution>),
}

/// What a recursive frame reports up to its caller (§5 "explicit cancellation checks").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// This branch is exhausted; the caller should try its next alternative.
    Continue,
    /// A restart was triggered; unwind all the way back to [`SearchEngine::solve`].
    Restart,
    /// The termination condition fired; unwind immediately.
    Interrupted,
    /// Enough solutions have been collected; unwind immediately.
    Done,
}

pub(crate) struct SearchEngine {
    variable_strategy: VariableStrategy,
    value_strategy: ValueStrategy,
    restart_strategy: RestartStrategy,
    random: Random,
    propagator: Propagator,
    state_computer: StateComputer,
    metrics: SolverMetrics,
    operation_history: Vec<Operation>,
    solution_path: Path,
    visited: HashSet<Vec<Operation>>,
    random_choices_this_restart: u64,
    max_depth: usize,
    max_depth_hits: usize,
    skip_propagation_probability: f64,
}

impl SearchEngine {
    #[allow(clippy::too_many_arguments, reason = "-")]
    pub(crate) fn new(
        state_computer: StateComputer,
        constraints: Vec<Constraint>,
        variable_count: usize,
        variable_strategy: VariableStrategy,
        value_strategy: ValueStrategy,
        restart_strategy: RestartStrategy,
        random: Random,
        skip_propagation_probability: f64,
    ) -> Self {
        SearchEngine {
            variable_strategy,
            value_strategy,
            restart_strategy,
            random,
            propagator: Propagator::new(&constraints, variable_count),
            state_computer,
            metrics: SolverMetrics::default(),
            operation_history: Vec::new(),
            solution_path: Vec::new(),
            visited: HashSet::default(),
            random_choices_this_restart: 0,
            max_depth: 0,
            max_depth_hits: 0,
            skip_propagation_probability,
        }
    }

    pub(crate) fn metrics(&self) -> &SolverMetrics {
        &self.metrics
    }

    pub(crate) fn operation_history(&self) -> &[Operation] {
        &self.operation_history
    }

    pub(crate) fn solution_path(&self) -> &[Operation] {
        &self.solution_path
    }

    pub(crate) fn solve(
        &mut self,
        num_solutions: NumSolutions,
        termination: &Termination,
    ) -> SearchOutcome {
        self.metrics.start_clock();
        let target = num_solutions.target();
        let mut solutions = Vec::new();

        loop {
            let mut path = Vec::new();
            let flow = self.recurse(&mut path, &mut solutions, target, termination);
            if flow == Flow::Restart {
                continue;
            }
            break;
        }

        self.metrics.stop_clock();
        self.metrics.sample_memory();

        if termination.should_stop() {
            SearchOutcome::Interrupted(solutions)
        } else if solutions.is_empty() {
            SearchOutcome::Unsatisfiable
        } else {
            SearchOutcome::Solved(solutions)
        }
    }

    fn restart(&mut self) {
        self.visited.clear();
        self.operation_history.clear();
        self.solution_path.clear();
        self.random_choices_this_restart = 0;
        self.max_depth = 0;
        self.max_depth_hits = 0;
        self.metrics.restart_count += 1;
        debug!(
            "restarting search, restart_count={}",
            self.metrics.restart_count
        );
    }

    /// Marks the current depth as exhausted for the `max_depth_hits` restart counter (§4.5
    /// "Restart policy"), then hands back `Flow::Continue` so the caller keeps backtracking.
    fn backtrack(&mut self, depth: usize) -> Flow {
        if depth == self.max_depth {
            self.max_depth_hits += 1;
        }
        Flow::Continue
    }

    fn recurse(
        &mut self,
        path: &mut Path,
        solutions: &mut Vec<Solution>,
        target: usize,
        termination: &Termination,
    ) -> Flow {
        if termination.should_stop() {
            return Flow::Interrupted;
        }

        self.metrics.branches_explored += 1;

        if self.max_depth_hits >= 10 + self.max_depth {
            self.restart();
            return Flow::Restart;
        }

        let depth = path.len();
        if !self.visited.insert(canonical_key(path)) {
            return Flow::Continue;
        }

        let state = match self.state_computer.compute_state(
            path,
            &mut self.metrics,
            self.skip_propagation_probability,
            &mut self.random,
        ) {
            Ok(state) => state,
            Err(_) => return Flow::Continue,
        };

        if depth > self.max_depth {
            self.max_depth_hits = 0;
            self.max_depth = depth;
            self.metrics.max_depth = self.max_depth;
            if self.metrics.global_max_depth < self.max_depth {
                self.metrics.global_max_depth = self.max_depth;
            }
        }

        let constraints = self.state_computer.constraints();

        // Early-failure heuristic (§4.5 step 2): a constraint already entailed false, all of
        // whose variables are still undetermined, can never be rescued by further branching.
        let early_failure = constraints.iter().any(|constraint| {
            !constraint.evaluate(&state)
                && constraint
                    .variables_touched()
                    .iter()
                    .all(|&v| !state[v].is_determined())
        });
        if early_failure {
            self.metrics.early_failure_count += 1;
            return self.backtrack(depth);
        }

        let is_solution = constraints
            .iter()
            .all(|constraint| constraint.evaluate(&state))
            && state
                .iter()
                .all(|variable| variable.is_valid() && variable.is_determined());
        if is_solution {
            let solution: Solution = state
                .keys()
                .map(|id| (id, state[id].lower().clone()))
                .collect();
            self.metrics.solutions_found += 1;
            self.solution_path = path.clone();
            solutions.push(solution);
            return if solutions.len() >= target {
                Flow::Done
            } else {
                self.backtrack(depth)
            };
        }

        let choice =
            match self
                .variable_strategy
                .candidates(&state, &self.propagator, &mut self.random)
            {
                Some(choice) => choice,
                None => return self.backtrack(depth),
            };
        let variable = match choice {
            VariableChoice::Fixed(id) => id,
            VariableChoice::Ranked(ranked) => match self.pick_with_tiebreak(ranked) {
                Some(id) => id,
                None => return self.backtrack(depth),
            },
        };

        let value = self.value_strategy.select(
            &state,
            variable,
            &self.metrics.value_selection_count,
            &mut self.random,
        );
        self.metrics.record_value_choice(variable, value);

        for op_type in [OperationType::Add, OperationType::Remove] {
            let operation = Operation {
                variable,
                op_type,
                value,
                depth,
            };
            self.operation_history.push(operation);
            path.push(operation);
            let flow = self.recurse(path, solutions, target, termination);
            path.pop();

            match flow {
                Flow::Continue => {}
                other => return other,
            }
        }

        self.backtrack(depth)
    }

    /// Applies the restart-scaled randomised tie-break window to a ranked candidate list (§4.5).
    fn pick_with_tiebreak(&mut self, ranked: Vec<VariableId>) -> Option<VariableId> {
        if ranked.is_empty() {
            return None;
        }
        if ranked.len() <= 1 || self.random_choices_this_restart >= 10 * self.metrics.restart_count
        {
            return Some(ranked[0]);
        }

        self.random_choices_this_restart += 1;
        self.metrics.random_choice_count += 1;

        let len = ranked.len();
        let restart_count = self.metrics.restart_count as usize;
        match self.restart_strategy {
            RestartStrategy::Next => ranked.get(restart_count % (len - 1)).copied(),
            RestartStrategy::Random => self.random.choose(&ranked).copied(),
            RestartStrategy::ConstrainedRandom => {
                let lo = restart_count.min(len - 1);
                let hi = (restart_count * 2).min(len).max(lo + 1);
                self.random.choose(&ranked[lo..hi]).copied()
            }
        }
    }
}
