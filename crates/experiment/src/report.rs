use waypoint_core::Point;
use waypoint_plot::{Figure, ObjectiveGrid, TrialStyle};
use waypoint_solvers::interior_point::Solution;

/// How a trial ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TrialOutcome {
    Solved(Solution),

    /// The solver returned an error; only kept when failures are isolated.
    Failed(String),
}

/// One trial's search path and result.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    /// Zero-based trial index.
    pub index: usize,

    /// Every point the problem evaluated during the trial, in call order.
    pub points: Vec<Point>,

    pub outcome: TrialOutcome,
}

impl TrialRecord {
    #[must_use]
    pub fn solution(&self) -> Option<&Solution> {
        match &self.outcome {
            TrialOutcome::Solved(solution) => Some(solution),
            TrialOutcome::Failed(_) => None,
        }
    }

    /// Returns the planar path, skipping points with fewer than two coordinates.
    #[must_use]
    pub fn path(&self) -> Vec<[f64; 2]> {
        self.points.iter().filter_map(Point::xy).collect()
    }

    /// Returns the legend label, `"Trial {index} ({points})"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Trial {} ({})", self.index, self.points.len())
    }
}

/// The result of an experiment run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub(crate) grid: ObjectiveGrid,
    pub(crate) levels: usize,
    pub(crate) trials: Vec<TrialRecord>,
}

impl Report {
    /// Returns the sampled contour background.
    #[must_use]
    pub fn grid(&self) -> &ObjectiveGrid {
        &self.grid
    }

    #[must_use]
    pub fn trials(&self) -> &[TrialRecord] {
        &self.trials
    }

    /// Returns the number of trials that ended with an error.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.trials
            .iter()
            .filter(|trial| trial.solution().is_none())
            .count()
    }

    /// Builds the contour figure with one styled series per trial.
    ///
    /// The final point of each non-empty trajectory is highlighted when the
    /// figure is rendered.
    #[must_use]
    pub fn figure(&self) -> Figure {
        let mut figure = Figure::from_grid(&self.grid, self.levels);
        for trial in &self.trials {
            figure.add_series(trial.label(), trial.path(), TrialStyle::for_trial(trial.index));
        }
        figure
    }
}

#[cfg(test)]
mod tests {
    use waypoint_plot::Domain;

    use super::*;

    fn report(trials: Vec<TrialRecord>) -> Report {
        let grid = ObjectiveGrid::sample(Domain::default(), 8, |[x, y]| Some(x * x + y * y)).unwrap();
        Report {
            grid,
            levels: 5,
            trials,
        }
    }

    fn failed(index: usize, points: Vec<Point>) -> TrialRecord {
        TrialRecord {
            index,
            points,
            outcome: TrialOutcome::Failed("boom".into()),
        }
    }

    #[test]
    fn figure_has_one_series_per_trial() {
        let report = report(vec![
            failed(0, vec![Point::new(&[0.0, 1.0]), Point::new(&[2.0, 3.0])]),
            failed(1, Vec::new()),
        ]);

        let figure = report.figure();

        assert_eq!(figure.series().len(), 2);
        assert_eq!(figure.series()[0].name, "Trial 0 (2)");
        assert_eq!(figure.series()[0].final_point(), Some([2.0, 3.0]));
        assert_eq!(figure.series()[1].style, TrialStyle::for_trial(1));
        assert_eq!(figure.domain(), &Domain::default());
    }

    #[test]
    fn empty_trajectory_draws_nothing() {
        let report = report(vec![failed(0, Vec::new())]);
        let figure = report.figure();

        assert!(figure.series()[0].points.is_empty());
        assert_eq!(figure.series()[0].final_point(), None);
        assert_eq!(report.failures(), 1);
    }
}
