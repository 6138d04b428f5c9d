//! Solves the constrained Rosenbrock problem from random starts and plots
//! every search path over the objective's contours.
//!
//! ```text
//! cargo run -p waypoint-experiment --example rosenbrock --features plot -- [trials] [seed] [--summary]
//! ```
//!
//! With `--summary` the per-trial results are printed instead of opening a
//! window.

use std::env;

use waypoint_core::{Comm, NlpProblem};
use waypoint_experiment::{Config, Experiment, TrialEvent, TrialOutcome};
use waypoint_plot::ShowConfig;
use waypoint_problems::Rosenbrock;
use waypoint_solvers::{HessianUpdate, InteriorPoint, interior_point::Event};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut trials = 10;
    let mut seed = None;
    let mut summary = false;

    let mut positional = 0;
    for arg in env::args().skip(1) {
        if arg == "--summary" {
            summary = true;
            continue;
        }
        match positional {
            0 => trials = arg.parse()?,
            1 => seed = Some(arg.parse()?),
            _ => return Err(format!("unexpected argument {arg:?}").into()),
        }
        positional += 1;
    }

    let comm = Comm::solo();
    let problem = match seed {
        Some(seed) => Rosenbrock::with_seed(comm, seed),
        None => Rosenbrock::new(comm),
    };
    let verbose = problem.comm().is_root();

    let solver = InteriorPoint::new(problem, 20, HessianUpdate::LimitedBfgs);
    let mut experiment = Experiment::new(solver, Config::default().with_trials(trials));

    let report = experiment.run_observed(|event: &TrialEvent<'_>| {
        if !verbose {
            return None;
        }
        if let Event::SubproblemSolved {
            barrier,
            objective,
            iters,
            ..
        } = event.event
        {
            println!(
                "trial {:>2}  mu = {barrier:9.3e}  f = {objective:12.5e}  iters = {iters}",
                event.trial
            );
        }
        None
    })?;

    if summary {
        for trial in report.trials() {
            match &trial.outcome {
                TrialOutcome::Solved(solution) => println!(
                    "{}: {:?} at ({:.6}, {:.6}), f = {:.3e}",
                    trial.label(),
                    solution.status,
                    solution.x[0],
                    solution.x[1],
                    solution.objective,
                ),
                TrialOutcome::Failed(reason) => println!("{}: failed: {reason}", trial.label()),
            }
        }
        return Ok(());
    }

    report
        .figure()
        .show(ShowConfig::new().title("Constrained Rosenbrock trials").legend())?;

    Ok(())
}
