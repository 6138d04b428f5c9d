use thiserror::Error;

/// Configuration for the interior-point solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    init_barrier: f64,
    barrier_fraction: f64,
    barrier_power: f64,
    abs_opt_tol: f64,
    armijo: f64,
    backtrack: f64,
    max_major_iters: usize,
    max_subproblem_iters: usize,
    max_restarts: usize,
    interior_push: f64,
    use_line_search: bool,
}

/// Errors that can occur when validating an interior-point config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("init_barrier must be finite and positive")]
    InitBarrier,

    #[error("barrier_fraction must be in (0, 1)")]
    BarrierFraction,

    #[error("barrier_power must be finite and at least 1")]
    BarrierPower,

    #[error("abs_opt_tol must be finite and positive")]
    AbsOptTol,

    #[error("armijo must be in (0, 1)")]
    Armijo,

    #[error("backtrack must be in (0, 1)")]
    Backtrack,

    #[error("interior_push must be in (0, 0.5)")]
    InteriorPush,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            init_barrier: 0.1,
            barrier_fraction: 0.25,
            barrier_power: 1.1,
            abs_opt_tol: 1e-5,
            armijo: 1e-3,
            backtrack: 0.5,
            max_major_iters: 500,
            max_subproblem_iters: 200,
            max_restarts: 3,
            interior_push: 1e-3,
            use_line_search: true,
        }
    }
}

impl Config {
    /// Sets the initial barrier parameter `μ0`.
    ///
    /// # Errors
    ///
    /// Returns an error if `mu` is not finite and positive.
    pub fn with_init_barrier(mut self, mu: f64) -> Result<Self, ConfigError> {
        if !mu.is_finite() || mu <= 0.0 {
            return Err(ConfigError::InitBarrier);
        }
        self.init_barrier = mu;
        Ok(self)
    }

    /// Sets the linear reduction factor applied to `μ` between subproblems.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < fraction < 1`.
    pub fn with_barrier_fraction(mut self, fraction: f64) -> Result<Self, ConfigError> {
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(ConfigError::BarrierFraction);
        }
        self.barrier_fraction = fraction;
        Ok(self)
    }

    /// Sets the superlinear exponent applied to `μ` between subproblems.
    ///
    /// # Errors
    ///
    /// Returns an error if `power` is not finite or is less than one.
    pub fn with_barrier_power(mut self, power: f64) -> Result<Self, ConfigError> {
        if !power.is_finite() || power < 1.0 {
            return Err(ConfigError::BarrierPower);
        }
        self.barrier_power = power;
        Ok(self)
    }

    /// Sets the absolute optimality tolerance.
    ///
    /// The tolerance bounds both the final barrier parameter and the barrier
    /// gradient norm at which a subproblem counts as solved.
    ///
    /// # Errors
    ///
    /// Returns an error if `tol` is not finite and positive.
    pub fn with_abs_opt_tol(mut self, tol: f64) -> Result<Self, ConfigError> {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(ConfigError::AbsOptTol);
        }
        self.abs_opt_tol = tol;
        Ok(self)
    }

    /// Sets the Armijo sufficient-decrease constant.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < c < 1`.
    pub fn with_armijo(mut self, c: f64) -> Result<Self, ConfigError> {
        if !(c > 0.0 && c < 1.0) {
            return Err(ConfigError::Armijo);
        }
        self.armijo = c;
        Ok(self)
    }

    /// Sets the step contraction used by the backtracking line search.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < rho < 1`.
    pub fn with_backtrack(mut self, rho: f64) -> Result<Self, ConfigError> {
        if !(rho > 0.0 && rho < 1.0) {
            return Err(ConfigError::Backtrack);
        }
        self.backtrack = rho;
        Ok(self)
    }

    /// Sets the fraction of each bound width the start is pushed inward by.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < push < 0.5`.
    pub fn with_interior_push(mut self, push: f64) -> Result<Self, ConfigError> {
        if !(push > 0.0 && push < 0.5) {
            return Err(ConfigError::InteriorPush);
        }
        self.interior_push = push;
        Ok(self)
    }

    /// Sets the total quasi-Newton iteration budget across all subproblems.
    #[must_use]
    pub fn with_max_major_iters(mut self, iters: usize) -> Self {
        self.max_major_iters = iters;
        self
    }

    /// Sets the iteration cap for a single barrier subproblem.
    #[must_use]
    pub fn with_max_subproblem_iters(mut self, iters: usize) -> Self {
        self.max_subproblem_iters = iters;
        self
    }

    /// Sets how many times a stalled subproblem is restarted at the same `μ`.
    #[must_use]
    pub fn with_max_restarts(mut self, restarts: usize) -> Self {
        self.max_restarts = restarts;
        self
    }

    /// Enables or disables the sufficient-decrease line search.
    ///
    /// When disabled, steps are still shortened until they stay inside the
    /// barrier domain and do not increase the barrier function.
    #[must_use]
    pub fn with_line_search(mut self, enabled: bool) -> Self {
        self.use_line_search = enabled;
        self
    }

    #[must_use]
    pub fn init_barrier(&self) -> f64 {
        self.init_barrier
    }

    #[must_use]
    pub fn barrier_fraction(&self) -> f64 {
        self.barrier_fraction
    }

    #[must_use]
    pub fn barrier_power(&self) -> f64 {
        self.barrier_power
    }

    #[must_use]
    pub fn abs_opt_tol(&self) -> f64 {
        self.abs_opt_tol
    }

    #[must_use]
    pub fn armijo(&self) -> f64 {
        self.armijo
    }

    #[must_use]
    pub fn backtrack(&self) -> f64 {
        self.backtrack
    }

    #[must_use]
    pub fn max_major_iters(&self) -> usize {
        self.max_major_iters
    }

    #[must_use]
    pub fn max_subproblem_iters(&self) -> usize {
        self.max_subproblem_iters
    }

    #[must_use]
    pub fn max_restarts(&self) -> usize {
        self.max_restarts
    }

    #[must_use]
    pub fn interior_push(&self) -> f64 {
        self.interior_push
    }

    #[must_use]
    pub fn use_line_search(&self) -> bool {
        self.use_line_search
    }

    /// Returns the barrier parameter for the next subproblem.
    #[must_use]
    pub fn next_barrier(&self, mu: f64) -> f64 {
        (self.barrier_fraction * mu).min(mu.powf(self.barrier_power))
    }

    /// Returns the sufficient-decrease constant handed to the line search.
    pub(super) fn armijo_constant(&self) -> f64 {
        if self.use_line_search {
            self.armijo
        } else {
            f64::EPSILON
        }
    }
}
