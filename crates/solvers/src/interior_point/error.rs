use waypoint_core::EvalError;

/// Errors that can occur during an interior-point solve.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The problem broke its contract, or a derivative evaluation failed.
    #[error("problem error: {0}")]
    Problem(#[from] EvalError),

    /// The pushed-in starting point is outside the barrier domain.
    #[error("starting point {x:?} is infeasible")]
    InfeasibleStart { x: Vec<f64> },

    /// The quasi-Newton subproblem solver reported an error.
    #[error("subproblem at barrier {barrier:e} failed: {message}")]
    Solver { barrier: f64, message: String },
}
