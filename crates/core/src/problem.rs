use thiserror::Error;

use crate::{Bounds, Comm, Trajectory};

/// Defines a nonlinear program for a gradient-based solver.
///
/// The problem is
///
/// ```text
/// min  f(x)
/// s.t. c(x) >= 0
///      lower <= x <= upper
/// ```
///
/// with `num_vars` design variables and `num_constraints` inequality
/// constraints, both fixed for the lifetime of the problem.
///
/// Every value evaluation ([`eval_obj_con`](NlpProblem::eval_obj_con)) appends
/// a copy of the evaluated point to the problem's [`Trajectory`]. Gradient
/// evaluations are not recorded.
///
/// # Failures
///
/// Implementations report two kinds of failure through [`EvalError`]:
///
/// - [`EvalError::Failed`] is the recoverable fail flag. The point could not be
///   evaluated (a domain error, say) and the solver decides how to react.
/// - [`EvalError::Shape`] is a contract violation: a vector had the wrong
///   length. Nothing is evaluated or recorded.
pub trait NlpProblem {
    /// Returns the number of design variables.
    fn num_vars(&self) -> usize;

    /// Returns the number of inequality constraints.
    fn num_constraints(&self) -> usize;

    /// Returns the process identity the problem was constructed with.
    fn comm(&self) -> Comm;

    /// Produces a starting point and the variable bounds.
    ///
    /// The bounds are identical on every call. The starting point may differ
    /// between calls but always satisfies `lower[i] <= x0[i] <= upper[i]`.
    /// The trajectory is not touched.
    fn vars_and_bounds(&mut self) -> VarsAndBounds;

    /// Evaluates the objective and constraints at `x` and records `x`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Shape`] if `x` does not have `num_vars` entries,
    /// or [`EvalError::Failed`] if the point cannot be evaluated.
    fn eval_obj_con(&mut self, x: &[f64]) -> Result<ObjCon, EvalError>;

    /// Evaluates the objective gradient and constraint Jacobian at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Shape`] if `x` does not have `num_vars` entries,
    /// or [`EvalError::Failed`] if the derivatives cannot be evaluated.
    fn eval_obj_con_gradient(&self, x: &[f64]) -> Result<ObjConGradient, EvalError>;

    /// Returns the points recorded since the last reset.
    fn trajectory(&self) -> &Trajectory;

    /// Clears the recorded points.
    fn reset_trajectory(&mut self);
}

/// Lets a solver drive a problem it only borrows.
impl<P: NlpProblem + ?Sized> NlpProblem for &mut P {
    fn num_vars(&self) -> usize {
        (**self).num_vars()
    }

    fn num_constraints(&self) -> usize {
        (**self).num_constraints()
    }

    fn comm(&self) -> Comm {
        (**self).comm()
    }

    fn vars_and_bounds(&mut self) -> VarsAndBounds {
        (**self).vars_and_bounds()
    }

    fn eval_obj_con(&mut self, x: &[f64]) -> Result<ObjCon, EvalError> {
        (**self).eval_obj_con(x)
    }

    fn eval_obj_con_gradient(&self, x: &[f64]) -> Result<ObjConGradient, EvalError> {
        (**self).eval_obj_con_gradient(x)
    }

    fn trajectory(&self) -> &Trajectory {
        (**self).trajectory()
    }

    fn reset_trajectory(&mut self) {
        (**self).reset_trajectory();
    }
}

/// A starting point together with the variable bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct VarsAndBounds {
    pub x0: Vec<f64>,
    pub bounds: Bounds,
}

/// Objective and constraint values at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjCon {
    pub objective: f64,

    /// One value per constraint, feasible when `>= 0`.
    pub constraints: Vec<f64>,
}

/// Objective gradient and constraint Jacobian at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjConGradient {
    /// `∂f/∂x_i`, one entry per variable.
    pub gradient: Vec<f64>,

    /// One row per constraint; row `j` holds `∂c_j/∂x_i`.
    pub jacobian: Vec<Vec<f64>>,
}

/// Errors reported by [`NlpProblem`] evaluations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    /// The fail flag: the point cannot be evaluated.
    #[error("evaluation failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl EvalError {
    /// Creates a recoverable evaluation failure.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    /// Returns `true` for the recoverable fail flag.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// A vector passed to or returned from a problem has the wrong length.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{what} has {actual} entries, expected {expected}")]
pub struct ShapeError {
    pub what: &'static str,
    pub expected: usize,
    pub actual: usize,
}

impl ShapeError {
    /// Checks that `values` has exactly `expected` entries.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] naming `what` if the length differs.
    pub fn check(what: &'static str, expected: usize, values: &[f64]) -> Result<(), Self> {
        if values.len() == expected {
            Ok(())
        } else {
            Err(Self {
                what,
                expected,
                actual: values.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_check_passes_exact_length() {
        assert!(ShapeError::check("x", 2, &[1.0, 2.0]).is_ok());
    }

    #[test]
    fn shape_check_reports_lengths() {
        let err = ShapeError::check("x", 2, &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err.expected, 2);
        assert_eq!(err.actual, 3);
        assert_eq!(err.to_string(), "x has 3 entries, expected 2");
    }

    #[test]
    fn only_the_fail_flag_is_recoverable() {
        assert!(EvalError::failed("log of negative").is_recoverable());

        let shape: EvalError = ShapeError {
            what: "x",
            expected: 2,
            actual: 1,
        }
        .into();
        assert!(!shape.is_recoverable());
    }
}
