//! Contour and trajectory figures for waypoint experiments.
//!
//! - [`ObjectiveGrid`] — objective values sampled on a regular grid over a [`Domain`]
//! - [`levels`] — contour levels concentrated near the minimum
//! - [`contour`] — marching-squares contour polylines
//! - [`Figure`] — contours plus styled trajectory series, ready to render
//!
//! With the `show` feature, [`Figure::show`] opens a blocking egui window.

pub mod contour;
mod figure;
mod grid;
pub mod levels;
mod style;

#[cfg(feature = "show")]
mod show;

pub use contour::{Contour, contour};
pub use figure::{Figure, Series};
pub use grid::{Domain, GridError, ObjectiveGrid};
pub use style::{Marker, Rgb, TrialStyle};

#[cfg(feature = "show")]
pub use show::ShowConfig;
