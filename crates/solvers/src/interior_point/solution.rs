/// Indicates why the interior-point solver finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The barrier parameter reached the tolerance at a stationary point.
    Converged,

    /// The barrier parameter reached the tolerance, but the last subproblem
    /// could not reduce the barrier gradient below the tolerance.
    Stalled,

    /// Reached the iteration limit without converging.
    MaxIters,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of an interior-point solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// Best point of the last subproblem.
    pub x: Vec<f64>,

    /// Objective value at `x`.
    pub objective: f64,

    /// Constraint values at `x`.
    pub constraints: Vec<f64>,

    /// Barrier parameter of the last subproblem.
    pub barrier: f64,

    /// Total quasi-Newton iterations.
    pub iters: usize,

    /// Number of barrier subproblems solved, restarts included.
    pub subproblems: usize,
}
