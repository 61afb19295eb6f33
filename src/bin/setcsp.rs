//! A thin CLI wrapper: build one of a small set of demo problems, solve it with the options
//! given on the command line, and print the result. Contains no propagation or search logic of
//! its own (§1 "Out of scope").

use std::collections::BTreeSet;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use clap::ValueEnum;

use setcsp::branching::RestartStrategy;
use setcsp::branching::ValueStrategy;
use setcsp::branching::VariableStrategy;
use setcsp::ConstraintKind;
use setcsp::NumSolutions;
use setcsp::SatisfactionResult;
use setcsp::SolveConfig;
use setcsp::Solver;

#[derive(Debug, Parser)]
#[command(about = "A finite set constraint satisfaction solver")]
struct Cli {
    /// Which built-in demo problem to solve.
    #[arg(value_enum)]
    problem: Problem,

    #[arg(long, value_enum, default_value_t = VariableStrategyArg::SmallestDomain)]
    variable_strategy: VariableStrategyArg,

    #[arg(long, value_enum, default_value_t = ValueStrategyArg::Random)]
    value_strategy: ValueStrategyArg,

    #[arg(long, value_enum, default_value_t = RestartStrategyArg::ConstrainedRandom)]
    restart_strategy: RestartStrategyArg,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// How many solutions to look for; 0 means "all".
    #[arg(long, default_value_t = 1)]
    num_solutions: usize,

    /// Number of seconds the solver is allowed to run before it is interrupted.
    #[arg(long)]
    time_out: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Problem {
    /// Scenario 4: 3 groups of 2 players over 2 weeks, no repeated pairings.
    SocialGolfer,
    /// Scenario 1: a minimal `X ⊆ Y` instance, useful for smoke-testing the CLI itself.
    Subset,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariableStrategyArg {
    First,
    SmallestDomain,
    MostConstrained,
    LeastConstrained,
    Random,
}

impl From<VariableStrategyArg> for VariableStrategy {
    fn from(arg: VariableStrategyArg) -> Self {
        match arg {
            VariableStrategyArg::First => VariableStrategy::First,
            VariableStrategyArg::SmallestDomain => VariableStrategy::SmallestDomain,
            VariableStrategyArg::MostConstrained => VariableStrategy::MostConstrained,
            VariableStrategyArg::LeastConstrained => VariableStrategy::LeastConstrained,
            VariableStrategyArg::Random => VariableStrategy::Random,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ValueStrategyArg {
    Simple,
    Random,
    LowestFrequency,
}

impl From<ValueStrategyArg> for ValueStrategy {
    fn from(arg: ValueStrategyArg) -> Self {
        match arg {
            ValueStrategyArg::Simple => ValueStrategy::Simple,
            ValueStrategyArg::Random => ValueStrategy::Random,
            ValueStrategyArg::LowestFrequency => ValueStrategy::LowestFrequency,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RestartStrategyArg {
    Random,
    Next,
    ConstrainedRandom,
}

impl From<RestartStrategyArg> for RestartStrategy {
    fn from(arg: RestartStrategyArg) -> Self {
        match arg {
            RestartStrategyArg::Random => RestartStrategy::Random,
            RestartStrategyArg::Next => RestartStrategy::Next,
            RestartStrategyArg::ConstrainedRandom => RestartStrategy::ConstrainedRandom,
        }
    }
}

fn build_subset() -> anyhow::Result<Solver> {
    let mut solver = Solver::default();
    let x = solver.make_variable(
        "X",
        BTreeSet::from([1, 2]),
        BTreeSet::from([1, 2, 3, 4]),
        Some(2),
        Some(3),
    )?;
    let y = solver.make_variable(
        "Y",
        BTreeSet::from([2]),
        BTreeSet::from([1, 2, 3, 4, 5]),
        Some(1),
        Some(4),
    )?;
    solver.add_constraint(ConstraintKind::Subset { f: x, g: y })?;
    Ok(solver)
}

/// 3 groups of 2 players over 2 weeks: no pair of players shares a group twice (§8 scenario 4).
fn build_social_golfer() -> anyhow::Result<Solver> {
    let mut solver = Solver::default();
    let players: BTreeSet<i64> = (0..6).collect();
    let mut groups = Vec::new();
    for week in 0..2 {
        let mut week_groups = Vec::new();
        for group in 0..3 {
            let id = solver.make_variable(
                format!("W{week}G{group}"),
                BTreeSet::new(),
                players.clone(),
                Some(2),
                Some(2),
            )?;
            week_groups.push(id);
        }
        groups.push(week_groups);
    }

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

    Ok(solver)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let solver = match cli.problem {
        Problem::Subset => build_subset(),
        Problem::SocialGolfer => build_social_golfer(),
    };
    let mut solver = match solver {
        Ok(solver) => solver,
        Err(error) => {
            eprintln!("invalid problem: {error}");
            return ExitCode::from(3);
        }
    };

    let config = SolveConfig {
        variable_strategy: cli.variable_strategy.into(),
        value_strategy: cli.value_strategy.into(),
        restart_strategy: cli.restart_strategy.into(),
        num_solutions: if cli.num_solutions == 0 {
            NumSolutions::All
        } else {
            NumSolutions::Count(cli.num_solutions)
        },
        seed: cli.seed,
        time_budget: cli.time_out.map(Duration::from_secs),
        ..SolveConfig::default()
    };

    log::debug!("constraints: {:?}", solver.describe_constraints());

    match solver.solve(config) {
        Ok(SatisfactionResult::Satisfiable(solutions)) => {
            for (index, solution) in solutions.iter().enumerate() {
                println!("solution {index}:");
                for (name, values) in solution {
                    let values: Vec<String> = values.iter().map(i64::to_string).collect();
                    println!("  {name} = {{{}}}", values.join(", "));
                }
            }
            if let Some(metrics) = solver.metrics() {
                metrics.log_statistics();
            }
            ExitCode::from(0)
        }
        Ok(SatisfactionResult::Unsatisfiable) => {
            println!("UNSATISFIABLE");
            ExitCode::from(1)
        }
        Ok(SatisfactionResult::Interrupted(solutions)) => {
            println!("INTERRUPTED after finding {} solution(s)", solutions.len());
            ExitCode::from(2)
        }
        Err(error) => {
            eprintln!("invalid problem: {error}");
            ExitCode::from(3)
        }
    }
}
