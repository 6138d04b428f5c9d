use thiserror::Error;
use waypoint_plot::GridError;
use waypoint_solvers::interior_point;

/// Errors that can occur while running an experiment.
#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("contour plots need a two-variable problem, got {0} variables")]
    NotPlanar(usize),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    SolverConfig(#[from] interior_point::ConfigError),

    #[error("trial {index} failed: {source}")]
    Trial {
        index: usize,
        source: interior_point::Error,
    },
}
