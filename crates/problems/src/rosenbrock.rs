//! The constrained two-variable Rosenbrock problem.
//!
//! ```text
//! min  f(x) = 100·(x1 − x0²)² + (1 − x0)²
//! s.t. c(x) = x0 + x1 + 5 >= 0
//!      −2 <= x0, x1 <= 2
//! ```
//!
//! The unconstrained minimum `f(1, 1) = 0` is feasible, so the constraint
//! only shapes the early part of a search that starts in the lower-left corner
//! of the box. Each call to [`NlpProblem::vars_and_bounds`] draws a fresh
//! starting point from the start region, `[−2, −1]²` by default.

use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;

use waypoint_core::{
    Bounds, Comm, EvalError, NlpProblem, ObjCon, ObjConGradient, ShapeError, Trajectory,
    VarsAndBounds,
};

/// Lower bound on both variables.
pub const LOWER: f64 = -2.0;

/// Upper bound on both variables.
pub const UPPER: f64 = 2.0;

/// The constraint offset: `c(x) = x0 + x1 + OFFSET`.
pub const OFFSET: f64 = 5.0;

/// The Rosenbrock objective.
#[must_use]
pub fn objective([x0, x1]: [f64; 2]) -> f64 {
    100.0 * (x1 - x0 * x0).powi(2) + (1.0 - x0).powi(2)
}

/// The analytic gradient of [`objective`].
#[must_use]
pub fn gradient([x0, x1]: [f64; 2]) -> [f64; 2] {
    let valley = x1 - x0 * x0;
    [-400.0 * x0 * valley - 2.0 * (1.0 - x0), 200.0 * valley]
}

/// The inequality constraint, feasible when non-negative.
#[must_use]
pub fn constraint([x0, x1]: [f64; 2]) -> f64 {
    x0 + x1 + OFFSET
}

/// The start region does not fit inside the variable bounds.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("start region {region:?} is not inside the bounds {bounds:?}")]
pub struct StartRegionError {
    pub region: Bounds,
    pub bounds: Bounds,
}

/// The constrained Rosenbrock problem with a randomized start.
///
/// Every value evaluation is recorded in the problem's [`Trajectory`]; the
/// driver clears it between runs with [`NlpProblem::reset_trajectory`].
#[derive(Debug, Clone)]
pub struct Rosenbrock {
    comm: Comm,
    bounds: Bounds,
    start: Bounds,
    rng: StdRng,
    history: Trajectory,
}

impl Rosenbrock {
    /// Creates the problem with a start generator seeded from system entropy.
    #[must_use]
    pub fn new(comm: Comm) -> Self {
        Self::from_rng(comm, StdRng::from_entropy())
    }

    /// Creates the problem with a deterministic start generator.
    #[must_use]
    pub fn with_seed(comm: Comm, seed: u64) -> Self {
        Self::from_rng(comm, StdRng::seed_from_u64(seed))
    }

    fn from_rng(comm: Comm, rng: StdRng) -> Self {
        Self {
            comm,
            bounds: square(LOWER, UPPER),
            start: square(LOWER, LOWER + 1.0),
            rng,
            history: Trajectory::new(),
        }
    }

    /// Replaces the region starting points are drawn from.
    ///
    /// # Errors
    ///
    /// Returns an error if `region` is not a two-variable box inside the
    /// problem bounds.
    pub fn with_start_region(mut self, region: Bounds) -> Result<Self, StartRegionError> {
        if !region.is_within(&self.bounds) {
            return Err(StartRegionError {
                region,
                bounds: self.bounds,
            });
        }
        self.start = region;
        Ok(self)
    }

    #[must_use]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    #[must_use]
    pub fn start_region(&self) -> &Bounds {
        &self.start
    }
}

impl NlpProblem for Rosenbrock {
    fn num_vars(&self) -> usize {
        2
    }

    fn num_constraints(&self) -> usize {
        1
    }

    fn comm(&self) -> Comm {
        self.comm
    }

    fn vars_and_bounds(&mut self) -> VarsAndBounds {
        let x0 = self
            .start
            .pairs()
            .map(|(lo, hi)| lo + self.rng.r#gen::<f64>() * (hi - lo))
            .collect();

        VarsAndBounds {
            x0,
            bounds: self.bounds.clone(),
        }
    }

    fn eval_obj_con(&mut self, x: &[f64]) -> Result<ObjCon, EvalError> {
        let x = point(x)?;
        self.history.record(&x);

        if !x.iter().all(|xi| xi.is_finite()) {
            return Err(EvalError::failed(format!("non-finite point {x:?}")));
        }

        Ok(ObjCon {
            objective: objective(x),
            constraints: vec![constraint(x)],
        })
    }

    fn eval_obj_con_gradient(&self, x: &[f64]) -> Result<ObjConGradient, EvalError> {
        let x = point(x)?;

        if !x.iter().all(|xi| xi.is_finite()) {
            return Err(EvalError::failed(format!("non-finite point {x:?}")));
        }

        Ok(ObjConGradient {
            gradient: gradient(x).to_vec(),
            jacobian: vec![vec![1.0, 1.0]],
        })
    }

    fn trajectory(&self) -> &Trajectory {
        &self.history
    }

    fn reset_trajectory(&mut self) {
        self.history.clear();
    }
}

fn point(x: &[f64]) -> Result<[f64; 2], ShapeError> {
    ShapeError::check("x", 2, x)?;
    Ok([x[0], x[1]])
}

fn square(lower: f64, upper: f64) -> Bounds {
    // Only called with ordered constants, unwrap is safe
    Bounds::uniform(2, lower, upper).unwrap()
}
