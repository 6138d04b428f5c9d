//! One barrier subproblem, solved with argmin's quasi-Newton methods.

use argmin::core::{Error as ArgminError, Executor};
use argmin::solver::linesearch::{BacktrackingLineSearch, condition::ArmijoCondition};
use argmin::solver::quasinewton::{BFGS, LBFGS};
use waypoint_core::NlpProblem;

use super::{Config, HessianUpdate, barrier::Barrier};

type Backtracking = BacktrackingLineSearch<Vec<f64>, Vec<f64>, ArmijoCondition<f64>, f64>;

/// Stop a subproblem once the barrier value changes by less than this.
const COST_TOL: f64 = 1e-15;

/// The quasi-Newton method used for every subproblem.
#[derive(Debug, Clone, Copy)]
pub(super) struct Strategy {
    pub(super) update: HessianUpdate,
    pub(super) max_history: usize,
}

/// Minimizes `barrier` from `x0` for at most `max_iters` iterations.
///
/// The results are read from the barrier's tracker, not from argmin. With
/// [`HessianUpdate::Bfgs`] the dense inverse Hessian is taken from
/// `inv_hessian` (identity when `None`) and the final estimate stored back.
/// A run that ends in an error leaves the starting estimate in place.
pub(super) fn solve<P: NlpProblem>(
    barrier: Barrier<'_, P>,
    x0: Vec<f64>,
    max_iters: usize,
    config: &Config,
    strategy: Strategy,
    inv_hessian: &mut Option<Vec<Vec<f64>>>,
) -> Result<(), ArgminError> {
    let linesearch: Backtracking =
        BacktrackingLineSearch::new(ArmijoCondition::new(config.armijo_constant())?)
            .rho(config.backtrack())?;
    let max_iters = u64::try_from(max_iters).unwrap_or(u64::MAX);

    match strategy.update {
        HessianUpdate::LimitedBfgs => {
            let solver: LBFGS<_, Vec<f64>, Vec<f64>, f64> =
                LBFGS::new(linesearch, strategy.max_history)
                    .with_tolerance_grad(config.abs_opt_tol())?
                    .with_tolerance_cost(COST_TOL)?;

            Executor::new(barrier, solver)
                .configure(|state| state.param(x0).max_iters(max_iters))
                .run()?;
        }
        HessianUpdate::Bfgs => {
            let h0 = inv_hessian
                .take()
                .filter(|h| h.len() == x0.len())
                .unwrap_or_else(|| identity(x0.len()));
            let solver = BFGS::new(linesearch)
                .with_tolerance_grad(config.abs_opt_tol())?
                .with_tolerance_cost(COST_TOL)?;

            // An aborted run keeps the estimate it started from.
            *inv_hessian = Some(h0.clone());
            let result = Executor::new(barrier, solver)
                .configure(|state| state.param(x0).inv_hessian(h0).max_iters(max_iters))
                .run()?;
            if let Some(h) = result.state().get_inv_hessian() {
                *inv_hessian = Some(h.clone());
            }
        }
    }

    Ok(())
}

fn identity(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_has_unit_diagonal() {
        assert_eq!(identity(2), [[1.0, 0.0], [0.0, 1.0]]);
        assert!(identity(0).is_empty());
    }
}
