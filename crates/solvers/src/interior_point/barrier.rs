//! The log-barrier reformulation handed to argmin.

use std::cell::RefCell;

use argmin::core::{CostFunction, Error as ArgminError, Gradient};
use waypoint_core::{Bounds, EvalError, NlpProblem, ObjCon, ObjConGradient, ShapeError};

/// Trial points closer than this, relative to the previous query, end the
/// subproblem.
const COLLAPSE_TOL: f64 = 1e-13;

/// A point the problem evaluated successfully.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Evaluated {
    pub(super) x: Vec<f64>,
    pub(super) values: ObjCon,
}

/// Bookkeeping shared between the outer loop and the argmin problem.
#[derive(Debug, Default)]
pub(super) struct Tracker {
    /// Most recent successful evaluation, reused when argmin asks again.
    known: Option<Evaluated>,

    /// Lowest finite barrier value of the current subproblem.
    best: Option<(Evaluated, f64)>,

    /// Previous cost query of the current subproblem.
    previous: Option<Vec<f64>>,

    fault: Option<EvalError>,
    gradients: usize,
}

/// What a subproblem left behind in the [`Tracker`].
#[derive(Debug)]
pub(super) struct Record {
    pub(super) best: Option<Evaluated>,
    pub(super) fault: Option<EvalError>,
    pub(super) iters: usize,
}

impl Tracker {
    /// Seeds the evaluation cache with a point evaluated earlier.
    pub(super) fn remember(&mut self, point: Evaluated) {
        self.known = Some(point);
    }

    /// Takes the subproblem results and resets for the next subproblem.
    ///
    /// The evaluation cache survives, so the next subproblem's first query at
    /// the same point is not evaluated or recorded twice.
    pub(super) fn finish(&mut self) -> Record {
        self.previous = None;
        Record {
            best: self.best.take().map(|(point, _)| point),
            fault: self.fault.take(),
            iters: std::mem::take(&mut self.gradients),
        }
    }
}

/// Why a barrier query stopped the subproblem.
#[derive(Debug)]
pub(super) enum Abort {
    /// Successive trial points stopped moving.
    Collapsed,

    /// The problem returned an unrecoverable error.
    Fault(EvalError),
}

/// The barrier function `φ_μ` of a problem at a fixed `μ`.
pub(super) struct Barrier<'a, P> {
    problem: &'a RefCell<P>,
    bounds: &'a Bounds,
    tracker: &'a RefCell<Tracker>,
    mu: f64,
}

impl<'a, P: NlpProblem> Barrier<'a, P> {
    pub(super) fn new(
        problem: &'a RefCell<P>,
        bounds: &'a Bounds,
        tracker: &'a RefCell<Tracker>,
        mu: f64,
    ) -> Self {
        Self {
            problem,
            bounds,
            tracker,
            mu,
        }
    }

    /// Returns `φ_μ(x)`, or `+∞` outside the barrier domain or where the
    /// problem raises its fail flag.
    ///
    /// Points outside the strict bounds are rejected without evaluation.
    pub(super) fn value(&self, x: &[f64]) -> Result<f64, Abort> {
        self.guard_step(x)?;

        if !strictly_inside(x, self.bounds) {
            return Ok(f64::INFINITY);
        }

        let values = match self.values_at(x) {
            Ok(values) => values,
            Err(error) if error.is_recoverable() => return Ok(f64::INFINITY),
            Err(error) => return Err(Abort::Fault(error)),
        };

        let phi = barrier_value(&values, x, self.bounds, self.mu);
        if phi.is_finite() {
            let mut tracker = self.tracker.borrow_mut();
            if tracker.best.as_ref().is_none_or(|(_, best)| phi < *best) {
                tracker.best = Some((
                    Evaluated {
                        x: x.to_vec(),
                        values,
                    },
                    phi,
                ));
            }
        }

        Ok(phi)
    }

    /// Returns `∇φ_μ(x)`.
    ///
    /// # Errors
    ///
    /// Fails if `x` is outside the barrier domain or the problem fails.
    pub(super) fn gradient_at(&self, x: &[f64]) -> Result<Vec<f64>, EvalError> {
        if !strictly_inside(x, self.bounds) {
            return Err(EvalError::failed("barrier gradient outside the bounds"));
        }

        let values = self.values_at(x)?;
        if values.constraints.iter().any(|&c| c <= 0.0) {
            return Err(EvalError::failed("barrier gradient at an infeasible point"));
        }

        let derivs = self.problem.borrow().eval_obj_con_gradient(x)?;
        check_derivs(&derivs, x.len(), values.constraints.len())?;
        self.tracker.borrow_mut().gradients += 1;

        Ok(barrier_gradient(
            &derivs,
            &values.constraints,
            x,
            self.bounds,
            self.mu,
        ))
    }

    fn values_at(&self, x: &[f64]) -> Result<ObjCon, EvalError> {
        let cached = self
            .tracker
            .borrow()
            .known
            .as_ref()
            .filter(|known| known.x.as_slice() == x)
            .map(|known| known.values.clone());
        if let Some(values) = cached {
            return Ok(values);
        }

        let values = self.problem.borrow_mut().eval_obj_con(x)?;
        let m = self.problem.borrow().num_constraints();
        ShapeError::check("constraints", m, &values.constraints)?;

        self.tracker.borrow_mut().known = Some(Evaluated {
            x: x.to_vec(),
            values: values.clone(),
        });
        Ok(values)
    }

    fn guard_step(&self, x: &[f64]) -> Result<(), Abort> {
        if x.iter().any(|xi| !xi.is_finite()) {
            return Err(Abort::Collapsed);
        }

        let mut tracker = self.tracker.borrow_mut();
        if let Some(previous) = &tracker.previous {
            let gap = previous
                .iter()
                .zip(x)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);
            let scale = 1.0 + previous.iter().map(|v| v.abs()).fold(0.0, f64::max);
            if gap > 0.0 && gap <= COLLAPSE_TOL * scale {
                return Err(Abort::Collapsed);
            }
        }
        tracker.previous = Some(x.to_vec());
        Ok(())
    }

    fn stash(&self, abort: Abort) -> ArgminError {
        match abort {
            Abort::Collapsed => ArgminError::msg("line search step collapsed"),
            Abort::Fault(error) => {
                let message = error.to_string();
                self.tracker.borrow_mut().fault = Some(error);
                ArgminError::msg(message)
            }
        }
    }
}

impl<P: NlpProblem> CostFunction for Barrier<'_, P> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, ArgminError> {
        self.value(x).map_err(|abort| self.stash(abort))
    }
}

impl<P: NlpProblem> Gradient for Barrier<'_, P> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, x: &Self::Param) -> Result<Self::Gradient, ArgminError> {
        self.gradient_at(x).map_err(|error| self.stash(Abort::Fault(error)))
    }
}

/// Returns `true` if every variable lies strictly between its bounds.
///
/// A fixed variable (`lower == upper`) must sit exactly on its value.
fn strictly_inside(x: &[f64], bounds: &Bounds) -> bool {
    bounds.pairs().zip(x).all(|((lo, hi), &xi)| {
        if is_fixed(lo, hi) {
            xi == lo
        } else {
            xi > lo && xi < hi
        }
    })
}

pub(super) fn is_fixed(lo: f64, hi: f64) -> bool {
    lo == hi
}

/// Computes `φ_μ = f - μ Σ ln(x - l) - μ Σ ln(u - x) - μ Σ ln c`.
///
/// Infinite bounds and fixed variables contribute no term. Any non-positive
/// slack gives `+∞`.
fn barrier_value(values: &ObjCon, x: &[f64], bounds: &Bounds, mu: f64) -> f64 {
    let bound_logs: f64 = bounds
        .pairs()
        .zip(x)
        .filter(|&((lo, hi), _)| !is_fixed(lo, hi))
        .map(|((lo, hi), &xi)| log_slack(xi - lo) + log_slack(hi - xi))
        .sum();
    let constraint_logs: f64 = values.constraints.iter().map(|&c| log_slack(c)).sum();

    let phi = values.objective - mu * (bound_logs + constraint_logs);
    if phi.is_nan() {
        f64::INFINITY
    } else {
        phi
    }
}

/// Computes `∇φ_μ` from the problem derivatives at a strictly interior point.
///
/// Components of fixed variables are zero, so quasi-Newton steps never move
/// them.
fn barrier_gradient(
    derivs: &ObjConGradient,
    constraints: &[f64],
    x: &[f64],
    bounds: &Bounds,
    mu: f64,
) -> Vec<f64> {
    let mut grad = derivs.gradient.clone();

    for ((g, (lo, hi)), &xi) in grad.iter_mut().zip(bounds.pairs()).zip(x) {
        if lo.is_finite() {
            *g -= mu / (xi - lo);
        }
        if hi.is_finite() {
            *g += mu / (hi - xi);
        }
    }

    for (row, &c) in derivs.jacobian.iter().zip(constraints) {
        for (g, &a) in grad.iter_mut().zip(row) {
            *g -= mu * a / c;
        }
    }

    for (g, (lo, hi)) in grad.iter_mut().zip(bounds.pairs()) {
        if is_fixed(lo, hi) {
            *g = 0.0;
        }
    }

    grad
}

fn log_slack(slack: f64) -> f64 {
    if slack == f64::INFINITY {
        0.0
    } else if slack > 0.0 {
        slack.ln()
    } else {
        f64::NEG_INFINITY
    }
}

fn check_derivs(derivs: &ObjConGradient, n: usize, m: usize) -> Result<(), ShapeError> {
    ShapeError::check("gradient", n, &derivs.gradient)?;
    if derivs.jacobian.len() != m {
        return Err(ShapeError {
            what: "jacobian",
            expected: m,
            actual: derivs.jacobian.len(),
        });
    }
    derivs
        .jacobian
        .iter()
        .try_for_each(|row| ShapeError::check("jacobian row", n, row))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use waypoint_core::{Comm, NlpProblem};
    use waypoint_problems::Rosenbrock;

    use super::*;

    fn square() -> Bounds {
        Bounds::uniform(2, -2.0, 2.0).unwrap()
    }

    #[test]
    fn value_adds_log_terms() {
        let values = ObjCon {
            objective: 3.0,
            constraints: vec![std::f64::consts::E],
        };
        let bounds = Bounds::new(vec![-1.0, f64::NEG_INFINITY], vec![1.0, f64::INFINITY]).unwrap();

        // ln(1) + ln(1) for x0 = 0, nothing for the free x1, ln(e) = 1.
        let phi = barrier_value(&values, &[0.0, 42.0], &bounds, 0.5);
        assert_relative_eq!(phi, 3.0 - 0.5);
    }

    #[test]
    fn value_is_infinite_without_slack() {
        let values = ObjCon {
            objective: 0.0,
            constraints: vec![0.0],
        };
        assert_eq!(barrier_value(&values, &[0.0, 0.0], &square(), 0.1), f64::INFINITY);

        let values = ObjCon {
            objective: 0.0,
            constraints: vec![1.0],
        };
        assert_eq!(barrier_value(&values, &[2.0, 0.0], &square(), 0.1), f64::INFINITY);
    }

    #[test]
    fn gradient_matches_central_differences() {
        let bounds = square();
        let mu = 0.3;
        let x = [-1.2, 0.7];

        let phi = |x: &[f64]| {
            let values = ObjCon {
                objective: x[0].powi(2) * x[1],
                constraints: vec![x[0] + x[1] + 5.0],
            };
            barrier_value(&values, x, &bounds, mu)
        };
        let derivs = ObjConGradient {
            gradient: vec![2.0 * x[0] * x[1], x[0].powi(2)],
            jacobian: vec![vec![1.0, 1.0]],
        };
        let analytic = barrier_gradient(&derivs, &[x[0] + x[1] + 5.0], &x, &bounds, mu);

        let h = 1e-6;
        for i in 0..2 {
            let mut plus = x;
            let mut minus = x;
            plus[i] += h;
            minus[i] -= h;
            let numeric = (phi(&plus) - phi(&minus)) / (2.0 * h);
            assert_relative_eq!(analytic[i], numeric, epsilon = 1e-6);
        }
    }

    #[test]
    fn fixed_variables_drop_out_of_the_barrier() {
        let bounds = Bounds::new(vec![-1.0, 0.0], vec![1.0, 0.0]).unwrap();
        let values = ObjCon {
            objective: 2.0,
            constraints: vec![],
        };

        assert!(strictly_inside(&[0.5, 0.0], &bounds));
        assert!(!strictly_inside(&[0.5, 1e-12], &bounds));

        // Only x0 contributes: ln(1.5) + ln(0.5).
        let phi = barrier_value(&values, &[0.5, 0.0], &bounds, 0.1);
        assert_relative_eq!(phi, 2.0 - 0.1 * (1.5_f64.ln() + 0.5_f64.ln()), epsilon = 1e-12);

        let derivs = ObjConGradient {
            gradient: vec![1.0, 3.0],
            jacobian: vec![],
        };
        let grad = barrier_gradient(&derivs, &[], &[0.5, 0.0], &bounds, 0.1);
        assert_relative_eq!(grad[0], 1.0 - 0.1 / 1.5 + 0.1 / 0.5, epsilon = 1e-12);
        assert_eq!(grad[1], 0.0);
    }

    #[test]
    fn points_outside_bounds_are_not_evaluated() {
        let problem = RefCell::new(Rosenbrock::with_seed(Comm::solo(), 1));
        let tracker = RefCell::default();
        let bounds = square();
        let barrier = Barrier::new(&problem, &bounds, &tracker, 0.1);

        assert_eq!(barrier.value(&[2.5, 0.0]).unwrap(), f64::INFINITY);
        assert!(problem.borrow().trajectory().is_empty());
    }

    #[test]
    fn repeated_queries_reuse_the_evaluation() {
        let problem = RefCell::new(Rosenbrock::with_seed(Comm::solo(), 1));
        let tracker = RefCell::default();
        let bounds = square();
        let barrier = Barrier::new(&problem, &bounds, &tracker, 0.1);

        let first = barrier.value(&[0.5, 0.5]).unwrap();
        let second = barrier.value(&[0.5, 0.5]).unwrap();
        barrier.gradient_at(&[0.5, 0.5]).unwrap();

        assert_relative_eq!(first, second);
        assert_eq!(problem.borrow().trajectory().len(), 1);

        let record = tracker.borrow_mut().finish();
        assert_eq!(record.iters, 1);
        assert_eq!(record.best.unwrap().x, [0.5, 0.5]);
    }

    #[test]
    fn best_tracks_the_lowest_value() {
        let problem = RefCell::new(Rosenbrock::with_seed(Comm::solo(), 1));
        let tracker = RefCell::default();
        let bounds = square();
        let barrier = Barrier::new(&problem, &bounds, &tracker, 0.01);

        for x in [[-1.5, -1.5], [0.9, 0.8], [0.0, 1.0]] {
            barrier.value(&x).unwrap();
        }

        let best = tracker.borrow_mut().finish().best.unwrap();
        assert_eq!(best.x, [0.9, 0.8]);
    }

    #[test]
    fn vanishing_steps_collapse() {
        let problem = RefCell::new(Rosenbrock::with_seed(Comm::solo(), 1));
        let tracker = RefCell::default();
        let bounds = square();
        let barrier = Barrier::new(&problem, &bounds, &tracker, 0.1);

        barrier.value(&[0.5, 0.5]).unwrap();
        let result = barrier.value(&[0.5 + 1e-15, 0.5]);
        assert!(matches!(result, Err(Abort::Collapsed)));
        assert!(matches!(barrier.value(&[f64::NAN, 0.5]), Err(Abort::Collapsed)));
    }
}
