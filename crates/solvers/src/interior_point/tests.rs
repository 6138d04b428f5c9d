use approx::assert_relative_eq;
use waypoint_core::{
    Bounds, Comm, EvalError, NlpProblem, ObjCon, ObjConGradient, ShapeError, Trajectory,
    VarsAndBounds,
};
use waypoint_problems::Rosenbrock;

use super::{Action, Error, Event, HessianUpdate, InteriorPoint, Status};

/// f(x) = (x - 1)² on [-1, 2] with c(x) = x - floor.
///
/// Evaluations at `x >= fail_from` raise the fail flag.
struct Parabola {
    start: Vec<f64>,
    floor: f64,
    fail_from: f64,
    log: Trajectory,
}

impl Parabola {
    fn new(start: f64) -> Self {
        Self {
            start: vec![start],
            floor: -10.0,
            fail_from: f64::INFINITY,
            log: Trajectory::new(),
        }
    }
}

impl NlpProblem for Parabola {
    fn num_vars(&self) -> usize {
        1
    }

    fn num_constraints(&self) -> usize {
        1
    }

    fn comm(&self) -> Comm {
        Comm::solo()
    }

    fn vars_and_bounds(&mut self) -> VarsAndBounds {
        VarsAndBounds {
            x0: self.start.clone(),
            bounds: Bounds::uniform(1, -1.0, 2.0).unwrap(),
        }
    }

    fn eval_obj_con(&mut self, x: &[f64]) -> Result<ObjCon, EvalError> {
        ShapeError::check("x", 1, x)?;
        self.log.record(x);
        if x[0] >= self.fail_from {
            return Err(EvalError::failed("inside the failure region"));
        }
        Ok(ObjCon {
            objective: (x[0] - 1.0).powi(2),
            constraints: vec![x[0] - self.floor],
        })
    }

    fn eval_obj_con_gradient(&self, x: &[f64]) -> Result<ObjConGradient, EvalError> {
        ShapeError::check("x", 1, x)?;
        Ok(ObjConGradient {
            gradient: vec![2.0 * (x[0] - 1.0)],
            jacobian: vec![vec![1.0]],
        })
    }

    fn trajectory(&self) -> &Trajectory {
        &self.log
    }

    fn reset_trajectory(&mut self) {
        self.log.clear();
    }
}

/// f(x) = (x0 - 0.3)² + x1² with x1 pinned to zero and no constraints.
struct Pinned {
    log: Trajectory,
}

impl NlpProblem for Pinned {
    fn num_vars(&self) -> usize {
        2
    }

    fn num_constraints(&self) -> usize {
        0
    }

    fn comm(&self) -> Comm {
        Comm::solo()
    }

    fn vars_and_bounds(&mut self) -> VarsAndBounds {
        VarsAndBounds {
            x0: vec![0.5, 0.0],
            bounds: Bounds::new(vec![-1.0, 0.0], vec![1.0, 0.0]).unwrap(),
        }
    }

    fn eval_obj_con(&mut self, x: &[f64]) -> Result<ObjCon, EvalError> {
        ShapeError::check("x", 2, x)?;
        self.log.record(x);
        Ok(ObjCon {
            objective: (x[0] - 0.3).powi(2) + x[1].powi(2),
            constraints: vec![],
        })
    }

    fn eval_obj_con_gradient(&self, x: &[f64]) -> Result<ObjConGradient, EvalError> {
        ShapeError::check("x", 2, x)?;
        Ok(ObjConGradient {
            gradient: vec![2.0 * (x[0] - 0.3), 2.0 * x[1]],
            jacobian: vec![],
        })
    }

    fn trajectory(&self) -> &Trajectory {
        &self.log
    }

    fn reset_trajectory(&mut self) {
        self.log.clear();
    }
}

fn rosenbrock() -> Rosenbrock {
    Rosenbrock::with_seed(Comm::solo(), 11)
}

fn assert_near_minimum(x: &[f64]) {
    assert_relative_eq!(x[0], 1.0, epsilon = 1e-3);
    assert_relative_eq!(x[1], 1.0, epsilon = 1e-3);
}

#[test]
fn solves_constrained_rosenbrock() {
    let mut solver = InteriorPoint::new(rosenbrock(), 10, HessianUpdate::LimitedBfgs);
    let solution = solver.optimize().expect("should converge");

    assert_eq!(solution.status, Status::Converged);
    assert_near_minimum(&solution.x);
    assert!(solution.objective < 1e-6);
    assert!(solution.constraints[0] > 0.0);
    assert!(solution.barrier <= solver.config().abs_opt_tol());
}

#[test]
fn dense_bfgs_solves_and_carries_curvature() {
    let mut solver = InteriorPoint::new(rosenbrock(), 0, HessianUpdate::Bfgs);
    let solution = solver.optimize().expect("should converge");

    assert_near_minimum(&solution.x);
    assert!(solver.has_quasi_newton_hessian());

    solver.reset_quasi_newton_hessian();
    assert!(!solver.has_quasi_newton_hessian());
}

#[test]
fn trajectory_starts_in_the_start_region_and_stays_in_bounds() {
    let mut solver = InteriorPoint::new(rosenbrock(), 10, HessianUpdate::LimitedBfgs);
    solver.optimize().unwrap();

    let trajectory = solver.problem().trajectory();
    let first = trajectory.first().expect("start is evaluated");
    assert!(first.iter().all(|&xi| (-2.0..=-1.0).contains(&xi)));

    let bounds = solver.problem().bounds().clone();
    for point in trajectory {
        assert!(bounds.contains(point), "{point:?} escaped the bounds");
    }
}

#[test]
fn barrier_never_increases_between_events() {
    let mut barriers = Vec::new();
    let mut solver = InteriorPoint::new(rosenbrock(), 10, HessianUpdate::LimitedBfgs);

    let solution = solver
        .optimize_observed(|event: &Event<'_>| {
            if let Event::SubproblemSolved { barrier, .. } = event {
                barriers.push(*barrier);
            }
            None
        })
        .unwrap();

    assert_relative_eq!(barriers[0], 0.1);
    assert!(barriers.windows(2).all(|pair| pair[1] <= pair[0]));
    assert_eq!(barriers.len(), solution.subproblems);
    assert_relative_eq!(*barriers.last().unwrap(), solution.barrier);
}

#[test]
fn observer_can_stop_after_first_subproblem() {
    let mut solver = InteriorPoint::new(rosenbrock(), 10, HessianUpdate::LimitedBfgs);
    let solution = solver
        .optimize_observed(|event: &Event<'_>| match event {
            Event::SubproblemSolved { .. } => Some(Action::StopEarly),
            Event::SubproblemFailed { .. } => None,
        })
        .unwrap();

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.subproblems, 1);
    assert_relative_eq!(solution.barrier, 0.1);
}

#[test]
fn init_barrier_parameter_is_used() {
    let mut solver = InteriorPoint::new(rosenbrock(), 10, HessianUpdate::LimitedBfgs);
    solver.set_init_barrier_parameter(1.0).unwrap();
    assert!(solver.set_init_barrier_parameter(-1.0).is_err());

    let mut first = None;
    solver
        .optimize_observed(|event: &Event<'_>| {
            if first.is_none() {
                first = Some(event.barrier());
            }
            Some(Action::StopEarly)
        })
        .unwrap();

    assert_eq!(first, Some(1.0));
}

#[test]
fn without_line_search_the_search_still_improves() {
    let mut solver = InteriorPoint::new(rosenbrock(), 10, HessianUpdate::LimitedBfgs);
    solver.set_use_line_search(false);
    assert!(!solver.config().use_line_search());

    let solution = solver.optimize().expect("should finish");
    let start = solver.problem().trajectory().first().unwrap().xy().unwrap();

    assert!(solution.objective < waypoint_problems::rosenbrock::objective(start));
}

#[test]
fn zero_budget_returns_the_pushed_start() {
    let mut solver = InteriorPoint::new(Parabola::new(-1.0), 5, HessianUpdate::LimitedBfgs);
    solver.set_max_major_iters(0);

    let solution = solver.optimize().unwrap();

    assert_eq!(solution.status, Status::MaxIters);
    assert_eq!(solution.subproblems, 0);
    // Pushed in by 0.1% of the width 3.
    assert_relative_eq!(solution.x[0], -0.997, epsilon = 1e-12);
    assert_eq!(solver.problem().trajectory().len(), 1);
}

#[test]
fn unconstrained_interior_minimum_is_found() {
    let mut solver = InteriorPoint::new(Parabola::new(0.0), 5, HessianUpdate::LimitedBfgs);
    let solution = solver.optimize().unwrap();

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.x[0], 1.0, epsilon = 1e-4);
}

#[test]
fn infeasible_start_is_an_error() {
    let mut problem = Parabola::new(0.0);
    problem.floor = 0.5;

    let mut solver = InteriorPoint::new(problem, 5, HessianUpdate::LimitedBfgs);
    let err = solver.optimize().unwrap_err();

    assert!(matches!(err, Error::InfeasibleStart { .. }));
}

#[test]
fn fixed_variable_stays_on_its_value() {
    for update in [HessianUpdate::LimitedBfgs, HessianUpdate::Bfgs] {
        let problem = Pinned {
            log: Trajectory::new(),
        };
        let mut solver = InteriorPoint::new(problem, 5, update);
        let solution = solver.optimize().expect("a fixed variable is feasible");

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x[0], 0.3, epsilon = 1e-3);
        assert_eq!(solution.x[1], 0.0);
        assert!(solver.problem().trajectory().iter().all(|point| point[1] == 0.0));
    }
}

#[test]
fn fail_flag_acts_as_a_wall() {
    let mut problem = Parabola::new(0.0);
    problem.fail_from = 0.5;

    let mut solver = InteriorPoint::new(problem, 5, HessianUpdate::LimitedBfgs);
    let solution = solver.optimize().expect("failed points are rejected, not fatal");

    assert!(solution.x[0] < 0.5);
    assert!(solution.x[0] > 0.45);
    assert!(matches!(solution.status, Status::Stalled | Status::MaxIters));

    // Rejected evaluations are still part of the recorded path.
    let trajectory = solver.problem().trajectory();
    assert!(trajectory.iter().any(|point| point[0] >= 0.5));
}

#[test]
fn wrong_sized_start_is_rejected_before_evaluating() {
    let mut problem = Parabola::new(0.0);
    problem.start = vec![0.0, 0.0];

    let mut solver = InteriorPoint::new(problem, 5, HessianUpdate::LimitedBfgs);
    let err = solver.optimize().unwrap_err();

    assert!(matches!(err, Error::Problem(EvalError::Shape(_))));
    assert!(solver.problem().trajectory().is_empty());
}

#[test]
fn borrowed_problem_keeps_its_trajectory() {
    let mut problem = rosenbrock();
    {
        let mut solver = InteriorPoint::new(&mut problem, 10, HessianUpdate::LimitedBfgs);
        solver.optimize().unwrap();
    }
    assert!(!problem.trajectory().is_empty());

    problem.reset_trajectory();
    assert!(problem.trajectory().is_empty());
}
