use crate::{
    Contour, Domain, ObjectiveGrid, TrialStyle,
    contour::contour,
    levels,
};

/// One styled trajectory drawn over the contours.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend label.
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub style: TrialStyle,
}

impl Series {
    /// Returns the point highlighted as the trajectory's end, if any.
    #[must_use]
    pub fn final_point(&self) -> Option<[f64; 2]> {
        self.points.last().copied()
    }
}

/// Contour lines and trajectory series over a fixed domain.
///
/// The domain sets the axis limits when the figure is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    domain: Domain,
    contours: Vec<Contour>,
    series: Vec<Series>,
}

impl Figure {
    /// Creates an empty figure.
    #[must_use]
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            contours: Vec::new(),
            series: Vec::new(),
        }
    }

    /// Creates a figure with `count` quadratically spaced contours of `grid`.
    ///
    /// Levels that cross no cell are dropped. A grid without finite values
    /// gives a figure without contours.
    #[must_use]
    pub fn from_grid(grid: &ObjectiveGrid, count: usize) -> Self {
        let contours = grid
            .range()
            .map(|range| levels::quadratic(range, count))
            .unwrap_or_default()
            .into_iter()
            .map(|level| contour(grid, level))
            .filter(|contour| !contour.lines.is_empty())
            .collect();

        Self {
            domain: *grid.domain(),
            contours,
            series: Vec::new(),
        }
    }

    pub fn add_contour(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    /// Adds a trajectory. An empty `points` list is kept and draws nothing.
    pub fn add_series(&mut self, name: impl Into<String>, points: Vec<[f64; 2]>, style: TrialStyle) {
        self.series.push(Series {
            name: name.into(),
            points,
            style,
        });
    }

    #[must_use]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Returns the axis limits as `(min, max)` corners, equal to the domain.
    #[must_use]
    pub fn axis_limits(&self) -> ([f64; 2], [f64; 2]) {
        let [x_min, x_max] = self.domain.x_range();
        let [y_min, y_max] = self.domain.y_range();
        ([x_min, y_min], [x_max, y_max])
    }

    #[must_use]
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bowl() -> ObjectiveGrid {
        let domain = Domain::new([-1.0, 1.0], [-1.0, 1.0]).unwrap();
        ObjectiveGrid::sample(domain, 21, |[x, y]| Some(x * x + y * y)).unwrap()
    }

    #[test]
    fn contours_follow_the_levels() {
        let figure = Figure::from_grid(&bowl(), 10);

        assert!(!figure.contours().is_empty());
        assert!(figure.contours().len() <= 10);
        assert!(figure.contours().windows(2).all(|pair| pair[1].level > pair[0].level));
        assert_eq!(figure.domain().x_range(), [-1.0, 1.0]);
    }

    #[test]
    fn unevaluated_grid_has_no_contours() {
        let grid = ObjectiveGrid::sample(Domain::default(), 4, |_| None).unwrap();
        assert!(Figure::from_grid(&grid, 10).contours().is_empty());
    }

    #[test]
    fn axis_limits_are_the_domain() {
        let domain = Domain::new([-3.0, 1.0], [0.5, 2.5]).unwrap();
        let mut figure = Figure::new(domain);
        figure.add_series("Trial 0 (1)", vec![[5.0, -7.0]], TrialStyle::for_trial(0));

        assert_eq!(figure.axis_limits(), ([-3.0, 0.5], [1.0, 2.5]));
        assert_eq!(Figure::new(Domain::default()).axis_limits(), ([-4.0, -4.0], [4.0, 4.0]));
    }

    #[test]
    fn empty_series_has_no_final_point() {
        let mut figure = Figure::new(Domain::default());
        figure.add_series("Trial 0 (0)", Vec::new(), TrialStyle::for_trial(0));
        figure.add_series("Trial 1 (2)", vec![[0.0, 0.0], [1.0, 1.0]], TrialStyle::for_trial(1));

        assert_eq!(figure.series()[0].final_point(), None);
        assert_eq!(figure.series()[1].final_point(), Some([1.0, 1.0]));
    }
}
