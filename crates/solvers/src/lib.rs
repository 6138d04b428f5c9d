//! Solvers for waypoint nonlinear programs.
//!
//! # Solvers
//!
//! - [`interior_point`] — log-barrier interior-point method that solves each
//!   barrier subproblem with argmin's quasi-Newton solvers

pub mod interior_point;

pub use interior_point::{HessianUpdate, InteriorPoint};
