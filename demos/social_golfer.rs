//! The social golfer problem: schedule groups of golfers over several weeks so that no two
//! golfers play together more than once. Here: 3 groups of 2 players over 2 weeks.
//!
//! Run with `cargo run --example social_golfer`.

use std::collections::BTreeSet;

use setcsp::ConstraintKind;
use setcsp::SatisfactionResult;
use setcsp::SolveConfig;
use setcsp::Solver;

const WEEKS: usize = 2;
const GROUPS_PER_WEEK: usize = 3;
const PLAYERS_PER_GROUP: usize = 2;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let num_players = GROUPS_PER_WEEK * PLAYERS_PER_GROUP;
    let players: BTreeSet<i64> = (0..num_players as i64).collect();

    let mut solver = Solver::default();
    let mut groups = Vec::with_capacity(WEEKS);
    for week in 0..WEEKS {
        let mut week_groups = Vec::with_capacity(GROUPS_PER_WEEK);
        for group in 0..GROUPS_PER_WEEK {
            let id = solver.make_variable(
                format!("W{week}G{group}"),
                BTreeSet::new(),
                players.clone(),
                Some(PLAYERS_PER_GROUP),
                Some(PLAYERS_PER_GROUP),
            )?;
            week_groups.push(id);
        }
        groups.push(week_groups);
    }

    // Within a week, the groups partition the players: no overlap.
    for week_groups in &groups {
        for i in 0..week_groups.len() {
            for j in (i + 1)..week_groups.len() {
                solver.add_constraint(ConstraintKind::BoundedIntersection {
                    f: week_groups[i],
                    g: week_groups[j],
                    k: 0,
                })?;
            }
        }
    }
    // Across weeks, no pair of players shares a group more than once.
    for w1 in 0..groups.len() {
        for w2 in (w1 + 1)..groups.len() {
            for &gi in &groups[w1] {
                for &gj in &groups[w2] {
                    solver.add_constraint(ConstraintKind::BoundedIntersection {
                        f: gi,
                        g: gj,
                        k: 1,
                    })?;
                }
            }
        }
    }

    match solver.solve(SolveConfig::default())? {
        SatisfactionResult::Satisfiable(solutions) => {
            let schedule = &solutions[0];
            for week in 0..WEEKS {
                println!("week {week}:");
                for group in 0..GROUPS_PER_WEEK {
                    let name = format!("W{week}G{group}");
                    let players: Vec<String> = schedule[&name].iter().map(i64::to_string).collect();
                    println!("  group {group}: {{{}}}", players.join(", "));
                }
            }
        }
        SatisfactionResult::Unsatisfiable => println!("no valid schedule exists"),
        SatisfactionResult::Interrupted(_) => {
            println!("search was interrupted before finding a schedule")
        }
    }

    if let Some(metrics) = solver.metrics() {
        metrics.log_statistics();
    }

    Ok(())
}
