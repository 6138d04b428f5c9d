use crate::{EvalError, NlpProblem, ObjCon, ShapeError};

/// The outcome of comparing analytic derivatives with central differences.
///
/// Errors are relative with a unit floor, `|analytic - numeric| / max(1, |numeric|)`,
/// so entries near zero are compared absolutely. A non-finite error counts as
/// `+∞`, so a `NaN` derivative never passes.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientCheck {
    /// Analytic objective gradient.
    pub analytic: Vec<f64>,

    /// Central-difference objective gradient.
    pub numeric: Vec<f64>,

    /// Largest error over the objective gradient.
    pub objective_error: f64,

    /// Largest error over each constraint's gradient row.
    pub constraint_errors: Vec<f64>,
}

impl GradientCheck {
    /// Returns the largest error over the objective and all constraints.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.constraint_errors
            .iter()
            .copied()
            .fold(self.objective_error, f64::max)
    }
}

/// Checks the analytic gradient and Jacobian of `problem` at `x`.
///
/// Each variable is perturbed by `±step` and the objective and constraints are
/// differenced. The `2 * num_vars` probe evaluations go through
/// [`NlpProblem::eval_obj_con`], so they are recorded in the trajectory like
/// any other value evaluation.
///
/// # Errors
///
/// Returns [`EvalError::Failed`] if `step` is not finite and positive, the
/// first evaluation error, or a [`ShapeError`] if `x` or any returned vector
/// has the wrong length.
pub fn check_gradients<P>(problem: &mut P, x: &[f64], step: f64) -> Result<GradientCheck, EvalError>
where
    P: NlpProblem + ?Sized,
{
    if !(step.is_finite() && step > 0.0) {
        return Err(EvalError::failed(format!(
            "difference step must be finite and positive, got {step}"
        )));
    }

    let n = problem.num_vars();
    let m = problem.num_constraints();
    ShapeError::check("x", n, x)?;

    let derivs = problem.eval_obj_con_gradient(x)?;
    ShapeError::check("gradient", n, &derivs.gradient)?;
    if derivs.jacobian.len() != m {
        return Err(ShapeError {
            what: "jacobian",
            expected: m,
            actual: derivs.jacobian.len(),
        }
        .into());
    }
    for row in &derivs.jacobian {
        ShapeError::check("jacobian row", n, row)?;
    }

    let mut numeric = vec![0.0; n];
    let mut numeric_jac = vec![vec![0.0; n]; m];
    let mut probe = x.to_vec();

    for i in 0..n {
        probe[i] = x[i] + step;
        let plus = eval_checked(problem, &probe, m)?;
        probe[i] = x[i] - step;
        let minus = eval_checked(problem, &probe, m)?;
        probe[i] = x[i];

        numeric[i] = (plus.objective - minus.objective) / (2.0 * step);
        for (j, row) in numeric_jac.iter_mut().enumerate() {
            row[i] = (plus.constraints[j] - minus.constraints[j]) / (2.0 * step);
        }
    }

    let objective_error = max_error(&derivs.gradient, &numeric);
    let constraint_errors = derivs
        .jacobian
        .iter()
        .zip(&numeric_jac)
        .map(|(analytic, numeric)| max_error(analytic, numeric))
        .collect();

    Ok(GradientCheck {
        analytic: derivs.gradient,
        numeric,
        objective_error,
        constraint_errors,
    })
}

fn eval_checked<P>(problem: &mut P, x: &[f64], m: usize) -> Result<ObjCon, EvalError>
where
    P: NlpProblem + ?Sized,
{
    let values = problem.eval_obj_con(x)?;
    ShapeError::check("constraints", m, &values.constraints)?;
    Ok(values)
}

fn max_error(analytic: &[f64], numeric: &[f64]) -> f64 {
    analytic
        .iter()
        .zip(numeric)
        .map(|(a, n)| {
            let error = (a - n).abs() / n.abs().max(1.0);
            if error.is_finite() { error } else { f64::INFINITY }
        })
        .fold(0.0, f64::max)
}
