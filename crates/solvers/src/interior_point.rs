//! Log-barrier interior-point method for bound- and inequality-constrained
//! nonlinear programs.
//!
//! # Algorithm
//!
//! The solver replaces
//!
//! ```text
//! min f(x)  s.t.  c(x) >= 0,  l <= x <= u
//! ```
//!
//! with a sequence of unconstrained barrier subproblems
//!
//! ```text
//! φ_μ(x) = f(x) - μ Σ ln(x_i - l_i) - μ Σ ln(u_i - x_i) - μ Σ ln c_j(x)
//! ```
//!
//! and drives `μ` toward zero with `μ ← min(fraction·μ, μ^power)`. Each
//! subproblem is minimized with argmin's quasi-Newton solvers ([`LBFGS`] or
//! dense [`BFGS`]) behind a backtracking Armijo line search, warm-started from
//! the previous subproblem's best point. Infinite bounds contribute no barrier
//! term.
//!
//! Points outside the barrier domain, and points where the problem raises its
//! fail flag ([`EvalError::Failed`]), cost `+∞`; the line search backtracks
//! away from them. If the line search stalls or argmin gives up before the
//! barrier gradient is small, the subproblem is restarted at the same `μ` with fresh curvature,
//! up to [`Config::max_restarts`] times.
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] per subproblem:
//!
//! - [`Event::SubproblemSolved`] — with the subproblem's best point
//! - [`Event::SubproblemFailed`] — the solve is about to return an error
//!
//! Observers can return [`Action::StopEarly`] after a solved subproblem to
//! return its point with [`Status::StoppedByObserver`].
//!
//! [`LBFGS`]: argmin::solver::quasinewton::LBFGS
//! [`BFGS`]: argmin::solver::quasinewton::BFGS
//! [`EvalError::Failed`]: waypoint_core::EvalError::Failed

mod action;
mod barrier;
mod config;
mod error;
mod event;
mod solution;
mod subproblem;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use std::cell::RefCell;

use waypoint_core::{Bounds, EvalError, NlpProblem, Observer, ShapeError, VarsAndBounds};

use barrier::{Abort, Barrier, Evaluated, Tracker, is_fixed};
use subproblem::Strategy;

/// How curvature is approximated within each subproblem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HessianUpdate {
    /// Limited-memory BFGS keeping the last `max_history` update pairs.
    ///
    /// The memory is rebuilt for every subproblem.
    LimitedBfgs,

    /// Dense BFGS on the inverse Hessian, carried between subproblems until
    /// [`InteriorPoint::reset_quasi_newton_hessian`] is called.
    Bfgs,
}

/// An interior-point solver bound to one problem.
///
/// The solver owns its problem; pass `&mut problem` to keep ownership with the
/// caller (any `&mut P` is itself an [`NlpProblem`]).
#[derive(Debug)]
pub struct InteriorPoint<P> {
    problem: P,
    config: Config,
    strategy: Strategy,
    inv_hessian: Option<Vec<Vec<f64>>>,
}

impl<P: NlpProblem> InteriorPoint<P> {
    /// Creates a solver with the default [`Config`].
    ///
    /// A `max_history` of zero is treated as one.
    #[must_use]
    pub fn new(problem: P, max_history: usize, update: HessianUpdate) -> Self {
        Self {
            problem,
            config: Config::default(),
            strategy: Strategy {
                update,
                max_history: max_history.max(1),
            },
            inv_hessian: None,
        }
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn problem_mut(&mut self) -> &mut P {
        &mut self.problem
    }

    #[must_use]
    pub fn into_problem(self) -> P {
        self.problem
    }

    /// Discards the carried inverse Hessian estimate.
    ///
    /// The next subproblem starts from the identity. With
    /// [`HessianUpdate::LimitedBfgs`] there is nothing carried and this only
    /// matters after switching strategies.
    pub fn reset_quasi_newton_hessian(&mut self) {
        self.inv_hessian = None;
    }

    /// Returns `true` if a curvature estimate will seed the next subproblem.
    #[must_use]
    pub fn has_quasi_newton_hessian(&self) -> bool {
        self.inv_hessian.is_some()
    }

    /// Sets the barrier parameter of the first subproblem.
    ///
    /// # Errors
    ///
    /// Returns an error if `mu` is not finite and positive.
    pub fn set_init_barrier_parameter(&mut self, mu: f64) -> Result<(), ConfigError> {
        self.config = self.config.with_init_barrier(mu)?;
        Ok(())
    }

    /// Enables or disables the sufficient-decrease line search.
    pub fn set_use_line_search(&mut self, enabled: bool) {
        self.config = self.config.with_line_search(enabled);
    }

    /// Sets the total quasi-Newton iteration budget.
    pub fn set_max_major_iters(&mut self, iters: usize) {
        self.config = self.config.with_max_major_iters(iters);
    }

    /// Sets the absolute optimality tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error if `tol` is not finite and positive.
    pub fn set_abs_optimality_tol(&mut self, tol: f64) -> Result<(), ConfigError> {
        self.config = self.config.with_abs_opt_tol(tol)?;
        Ok(())
    }

    /// Sets the linear barrier reduction factor.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < fraction < 1`.
    pub fn set_barrier_fraction(&mut self, fraction: f64) -> Result<(), ConfigError> {
        self.config = self.config.with_barrier_fraction(fraction)?;
        Ok(())
    }

    /// Sets the superlinear barrier reduction exponent.
    ///
    /// # Errors
    ///
    /// Returns an error if `power` is not finite or is less than one.
    pub fn set_barrier_power(&mut self, power: f64) -> Result<(), ConfigError> {
        self.config = self.config.with_barrier_power(power)?;
        Ok(())
    }

    /// Sets the Armijo sufficient-decrease constant.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < c < 1`.
    pub fn set_armijo_param(&mut self, c: f64) -> Result<(), ConfigError> {
        self.config = self.config.with_armijo(c)?;
        Ok(())
    }

    /// Solves the problem without observer support.
    ///
    /// This is a convenience wrapper around [`optimize_observed`](Self::optimize_observed)
    /// that uses a no-op observer.
    ///
    /// # Errors
    ///
    /// See [`optimize_observed`](Self::optimize_observed).
    pub fn optimize(&mut self) -> Result<Solution, Error> {
        self.optimize_observed(())
    }

    /// Solves the problem, reporting each barrier subproblem to `observer`.
    ///
    /// Calls [`NlpProblem::vars_and_bounds`] once for the starting point.
    /// Every value evaluation lands in the problem's trajectory, starting with
    /// the pushed-in start.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the problem returns a wrong-sized vector or a derivative evaluation fails
    /// - the starting point is outside the barrier domain
    /// - argmin fails before a subproblem evaluates any point
    pub fn optimize_observed<Obs>(&mut self, mut observer: Obs) -> Result<Solution, Error>
    where
        Obs: for<'a> Observer<Event<'a>, Action>,
    {
        let VarsAndBounds { x0, bounds } = self.problem.vars_and_bounds();
        check_start(self.problem.num_vars(), &x0, &bounds)?;

        let config = self.config;
        let strategy = self.strategy;
        let inv_hessian = &mut self.inv_hessian;
        let problem = RefCell::new(&mut self.problem);
        let tracker = RefCell::new(Tracker::default());

        let mut mu = config.init_barrier();
        let start = push_inside(&x0, &bounds, config.interior_push());

        let start_value = match Barrier::new(&problem, &bounds, &tracker, mu).value(&start) {
            Ok(value) => value,
            Err(Abort::Fault(error)) => return Err(Error::Problem(error)),
            Err(Abort::Collapsed) => return Err(Error::InfeasibleStart { x: start }),
        };
        let mut current = match tracker.borrow_mut().finish().best {
            Some(point) if start_value.is_finite() => point,
            _ => return Err(Error::InfeasibleStart { x: start }),
        };

        let mut iters = 0;
        let mut subproblems = 0;
        let mut restarts = 0;
        let mut solved_at = mu;

        let status = loop {
            let remaining = config.max_major_iters().saturating_sub(iters);
            if remaining == 0 {
                break Status::MaxIters;
            }

            let outcome = subproblem::solve(
                Barrier::new(&problem, &bounds, &tracker, mu),
                current.x.clone(),
                remaining.min(config.max_subproblem_iters()),
                &config,
                strategy,
                inv_hessian,
            );
            let record = tracker.borrow_mut().finish();
            iters += record.iters.max(1);
            subproblems += 1;

            let failure = match (record.fault, outcome) {
                (Some(fault), _) => Some(Error::Problem(fault)),
                (None, Err(error)) if record.best.is_none() => Some(Error::Solver {
                    barrier: mu,
                    message: error.to_string(),
                }),
                _ => None,
            };
            if let Some(error) = failure {
                observer.observe(&Event::SubproblemFailed { barrier: mu, error: &error });
                return Err(error);
            }

            if let Some(best) = record.best {
                current = best;
            }
            solved_at = mu;
            tracker.borrow_mut().remember(current.clone());

            let barrier = Barrier::new(&problem, &bounds, &tracker, mu);
            let stationary = match barrier.gradient_at(&current.x) {
                Ok(gradient) => norm(&gradient) <= 10.0 * config.abs_opt_tol(),
                Err(error) => {
                    let error = Error::Problem(error);
                    observer.observe(&Event::SubproblemFailed { barrier: mu, error: &error });
                    return Err(error);
                }
            };
            tracker.borrow_mut().finish();

            let event = Event::SubproblemSolved {
                barrier: mu,
                x: &current.x,
                objective: current.values.objective,
                constraints: &current.values.constraints,
                iters: record.iters,
                stationary,
            };
            if let Some(Action::StopEarly) = observer.observe(&event) {
                break Status::StoppedByObserver;
            }

            if !stationary && restarts < config.max_restarts() {
                restarts += 1;
                *inv_hessian = None;
                continue;
            }
            restarts = 0;

            if mu <= config.abs_opt_tol() {
                break if stationary {
                    Status::Converged
                } else {
                    Status::Stalled
                };
            }
            mu = config.next_barrier(mu);
        };

        let Evaluated { x, values } = current;
        Ok(Solution {
            status,
            x,
            objective: values.objective,
            constraints: values.constraints,
            barrier: solved_at,
            iters,
            subproblems,
        })
    }
}

fn check_start(n: usize, x0: &[f64], bounds: &Bounds) -> Result<(), EvalError> {
    ShapeError::check("x0", n, x0)?;
    if bounds.len() != n {
        return Err(ShapeError {
            what: "bounds",
            expected: n,
            actual: bounds.len(),
        }
        .into());
    }
    Ok(())
}

/// Moves `x0` at least `push` of each finite bound width inside the bounds.
///
/// Variables with one infinite bound are kept `push·max(1, |bound|)` away from
/// the finite one. Fixed variables are set to their value.
fn push_inside(x0: &[f64], bounds: &Bounds, push: f64) -> Vec<f64> {
    bounds
        .pairs()
        .zip(x0)
        .map(|((lo, hi), &xi)| {
            if is_fixed(lo, hi) {
                return lo;
            }
            let width = hi - lo;
            let (lo_margin, hi_margin) = if width.is_finite() {
                (push * width, push * width)
            } else {
                (push * lo.abs().max(1.0), push * hi.abs().max(1.0))
            };

            let mut xi = xi;
            if lo.is_finite() {
                xi = xi.max(lo + lo_margin);
            }
            if hi.is_finite() {
                xi = xi.min(hi - hi_margin);
            }
            xi
        })
        .collect()
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|vi| vi * vi).sum::<f64>().sqrt()
}
