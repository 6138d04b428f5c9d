//! Test problems for waypoint nonlinear solvers.
//!
//! # Problems
//!
//! - [`rosenbrock`] — the two-variable Rosenbrock function with one linear
//!   inequality constraint and a randomized start

pub mod rosenbrock;

pub use rosenbrock::Rosenbrock;
