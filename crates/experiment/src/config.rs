use thiserror::Error;
use waypoint_plot::Domain;

/// Configuration for an [`Experiment`](crate::Experiment).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    trials: usize,
    domain: Domain,
    resolution: usize,
    levels: usize,
    init_barrier: f64,
    use_line_search: bool,
    isolate_failures: bool,
}

/// Errors that can occur when validating an experiment config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("resolution must be at least 2")]
    Resolution,

    #[error("init_barrier must be finite and positive")]
    InitBarrier,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trials: 10,
            domain: Domain::default(),
            resolution: 150,
            levels: 75,
            init_barrier: 0.1,
            use_line_search: true,
            isolate_failures: false,
        }
    }
}

impl Config {
    /// Sets the number of trials.
    #[must_use]
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Sets the region sampled for contours and used as the axis limits.
    #[must_use]
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// Sets the number of grid nodes along each axis.
    ///
    /// # Errors
    ///
    /// Returns an error if `resolution < 2`.
    pub fn with_resolution(mut self, resolution: usize) -> Result<Self, ConfigError> {
        if resolution < 2 {
            return Err(ConfigError::Resolution);
        }
        self.resolution = resolution;
        Ok(self)
    }

    /// Sets the number of contour levels.
    #[must_use]
    pub fn with_levels(mut self, levels: usize) -> Self {
        self.levels = levels;
        self
    }

    /// Sets the barrier parameter restored before every trial.
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

    /// Sets the line search flag restored before every trial.
    #[must_use]
    pub fn with_line_search(mut self, enabled: bool) -> Self {
        self.use_line_search = enabled;
        self
    }

    /// Records failed trials and keeps going instead of aborting.
    #[must_use]
    pub fn with_isolate_failures(mut self, isolate: bool) -> Self {
        self.isolate_failures = isolate;
        self
    }

    #[must_use]
    pub fn trials(&self) -> usize {
        self.trials
    }

    #[must_use]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    #[must_use]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    #[must_use]
    pub fn levels(&self) -> usize {
        self.levels
    }

    #[must_use]
    pub fn init_barrier(&self) -> f64 {
        self.init_barrier
    }

    #[must_use]
    pub fn use_line_search(&self) -> bool {
        self.use_line_search
    }

    #[must_use]
    pub fn isolate_failures(&self) -> bool {
        self.isolate_failures
    }
}
