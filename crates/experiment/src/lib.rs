//! Repeated optimization trials from randomized starts.
//!
//! An [`Experiment`] owns an interior-point solver and its problem. It samples
//! the objective on a grid for the contour background, then runs a fixed
//! number of trials. Before each trial it clears the problem's trajectory,
//! resets the solver's curvature estimate, and restores the barrier and line
//! search settings. The resulting [`Report`] keeps every trial's search path
//! and turns into a [`Figure`](waypoint_plot::Figure).

mod config;
mod error;
mod experiment;
mod report;

pub use config::{Config, ConfigError};
pub use error::ExperimentError;
pub use experiment::{Experiment, TrialEvent};
pub use report::{Report, TrialOutcome, TrialRecord};
