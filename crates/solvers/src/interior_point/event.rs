use super::Error;

/// Events emitted by the interior-point solver, one per barrier subproblem.
#[derive(Debug)]
pub enum Event<'a> {
    /// A barrier subproblem finished.
    SubproblemSolved {
        /// The barrier parameter `μ` of the subproblem.
        barrier: f64,

        /// The best point of the subproblem.
        x: &'a [f64],

        /// Objective value at `x`.
        objective: f64,

        /// Constraint values at `x`.
        constraints: &'a [f64],

        /// Quasi-Newton iterations spent on the subproblem.
        iters: usize,

        /// Whether the barrier gradient at `x` is within tolerance.
        ///
        /// A subproblem that is not stationary is restarted at the same `μ`
        /// with fresh curvature, up to the configured restart limit.
        stationary: bool,
    },

    /// A barrier subproblem ended with an error; the solve stops.
    SubproblemFailed {
        /// The barrier parameter `μ` of the subproblem.
        barrier: f64,

        /// The error returned from the solve.
        error: &'a Error,
    },
}

impl Event<'_> {
    /// Returns the barrier parameter of the subproblem.
    #[must_use]
    pub fn barrier(&self) -> f64 {
        match self {
            Self::SubproblemSolved { barrier, .. } | Self::SubproblemFailed { barrier, .. } => {
                *barrier
            }
        }
    }
}
