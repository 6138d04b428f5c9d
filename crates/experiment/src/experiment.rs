use waypoint_core::{NlpProblem, Observer};
use waypoint_plot::ObjectiveGrid;
use waypoint_solvers::interior_point::{Action, Event, InteriorPoint};

use crate::{Config, ExperimentError, Report, TrialOutcome, TrialRecord};

/// A solver event tagged with the trial it belongs to.
#[derive(Debug)]
pub struct TrialEvent<'a> {
    /// Zero-based trial index.
    pub trial: usize,
    pub event: &'a Event<'a>,
}

/// Runs repeated trials of one solver on one two-variable problem.
#[derive(Debug)]
pub struct Experiment<P> {
    solver: InteriorPoint<P>,
    config: Config,
}

impl<P: NlpProblem> Experiment<P> {
    #[must_use]
    pub fn new(solver: InteriorPoint<P>, config: Config) -> Self {
        Self { solver, config }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn solver(&self) -> &InteriorPoint<P> {
        &self.solver
    }

    pub fn solver_mut(&mut self) -> &mut InteriorPoint<P> {
        &mut self.solver
    }

    #[must_use]
    pub fn into_solver(self) -> InteriorPoint<P> {
        self.solver
    }

    /// Samples the objective over the configured domain.
    ///
    /// Points that fail to evaluate become `NaN` cells. The samples go through
    /// [`NlpProblem::eval_obj_con`], so the trajectory is cleared afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the problem does not have exactly two variables.
    pub fn sample_grid(&mut self) -> Result<ObjectiveGrid, ExperimentError> {
        let problem = self.solver.problem_mut();
        let n = problem.num_vars();
        if n != 2 {
            return Err(ExperimentError::NotPlanar(n));
        }

        let grid = ObjectiveGrid::sample(*self.config.domain(), self.config.resolution(), |xy| {
            problem.eval_obj_con(&xy).ok().map(|values| values.objective)
        });
        problem.reset_trajectory();

        Ok(grid?)
    }

    /// Runs the experiment without observer support.
    ///
    /// # Errors
    ///
    /// See [`run_observed`](Self::run_observed).
    pub fn run(&mut self) -> Result<Report, ExperimentError> {
        self.run_observed(())
    }

    /// Runs the experiment, forwarding every solver event to `observer`.
    ///
    /// Returning [`Action::StopEarly`] stops the current trial only; the
    /// remaining trials still run.
    ///
    /// # Errors
    ///
    /// Returns an error if the problem is not two-dimensional, or if a trial
    /// fails and failures are not isolated.
    pub fn run_observed<Obs>(&mut self, mut observer: Obs) -> Result<Report, ExperimentError>
    where
        Obs: for<'a> Observer<TrialEvent<'a>, Action>,
    {
        let grid = self.sample_grid()?;
        let mut trials = Vec::with_capacity(self.config.trials());

        for index in 0..self.config.trials() {
            self.solver.problem_mut().reset_trajectory();
            self.solver.reset_quasi_newton_hessian();
            self.solver.set_init_barrier_parameter(self.config.init_barrier())?;
            self.solver.set_use_line_search(self.config.use_line_search());

            let result = self.solver.optimize_observed(|event: &Event<'_>| {
                observer.observe(&TrialEvent {
                    trial: index,
                    event,
                })
            });

            let outcome = match result {
                Ok(solution) => TrialOutcome::Solved(solution),
                Err(error) if self.config.isolate_failures() => {
                    TrialOutcome::Failed(error.to_string())
                }
                Err(source) => return Err(ExperimentError::Trial { index, source }),
            };

            trials.push(TrialRecord {
                index,
                points: self.solver.problem().trajectory().points().to_vec(),
                outcome,
            });
        }

        Ok(Report {
            grid,
            levels: self.config.levels(),
            trials,
        })
    }
}
