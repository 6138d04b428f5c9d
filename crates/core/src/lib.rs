//! Core traits and types for waypoint nonlinear programs.
//!
//! This crate defines the contract between a user-defined optimization problem
//! and the solvers and drivers that consume it:
//!
//! - [`NlpProblem`] — sizes, bounds, objective, constraints, and gradients of a
//!   nonlinear program, plus the log of evaluated design points
//! - [`Bounds`] — validated lower/upper variable bounds
//! - [`Point`] and [`Trajectory`] — recorded design points of one run
//! - [`Comm`] — the immutable process identity a problem is built with
//! - [`Observer`] — receives solver events and optionally returns control actions
//! - [`check_gradients`] — compares analytic gradients against central differences

mod bounds;
mod comm;
mod gradient_check;
mod observer;
mod problem;
mod trajectory;

pub use bounds::{Bounds, BoundsError};
pub use comm::Comm;
pub use gradient_check::{GradientCheck, check_gradients};
pub use observer::Observer;
pub use problem::{EvalError, NlpProblem, ObjCon, ObjConGradient, ShapeError, VarsAndBounds};
pub use trajectory::{Point, Trajectory};
