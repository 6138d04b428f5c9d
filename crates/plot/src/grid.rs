use thiserror::Error;

/// Errors that can occur when building a sampling grid.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GridError {
    #[error("{axis} range [{lower}, {upper}] must be finite and increasing")]
    Range {
        axis: char,
        lower: f64,
        upper: f64,
    },

    #[error("resolution must be at least 2, got {0}")]
    Resolution(usize),
}

/// The rectangular region a figure covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    x: [f64; 2],
    y: [f64; 2],
}

impl Default for Domain {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new([-4.0, 4.0], [-4.0, 4.0]).unwrap()
    }
}

impl Domain {
    /// Creates a domain from `[lower, upper]` ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if either range is non-finite or empty.
    pub fn new(x: [f64; 2], y: [f64; 2]) -> Result<Self, GridError> {
        check_range('x', x)?;
        check_range('y', y)?;
        Ok(Self { x, y })
    }

    #[must_use]
    pub fn x_range(&self) -> [f64; 2] {
        self.x
    }

    #[must_use]
    pub fn y_range(&self) -> [f64; 2] {
        self.y
    }

    /// Returns `true` if `point` lies in the closed domain.
    #[must_use]
    pub fn contains(&self, [x, y]: [f64; 2]) -> bool {
        (self.x[0]..=self.x[1]).contains(&x) && (self.y[0]..=self.y[1]).contains(&y)
    }
}

fn check_range(axis: char, [lower, upper]: [f64; 2]) -> Result<(), GridError> {
    if lower.is_finite() && upper.is_finite() && lower < upper {
        Ok(())
    } else {
        Err(GridError::Range { axis, lower, upper })
    }
}

/// Objective values on a `resolution × resolution` grid.
///
/// Values are stored row by row: `value(i, j)` is the objective at
/// `(xs[i], ys[j])`. Cells where the objective could not be evaluated hold
/// `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveGrid {
    domain: Domain,
    xs: Vec<f64>,
    ys: Vec<f64>,
    values: Vec<f64>,
}

impl ObjectiveGrid {
    /// Samples `objective` at every grid node.
    ///
    /// `objective` returns `None` where it cannot be evaluated.
    ///
    /// # Errors
    ///
    /// Returns an error if `resolution < 2`.
    pub fn sample<F>(domain: Domain, resolution: usize, mut objective: F) -> Result<Self, GridError>
    where
        F: FnMut([f64; 2]) -> Option<f64>,
    {
        if resolution < 2 {
            return Err(GridError::Resolution(resolution));
        }

        let xs = linspace(domain.x, resolution);
        let ys = linspace(domain.y, resolution);
        let values = ys
            .iter()
            .flat_map(|&y| xs.iter().map(move |&x| [x, y]))
            .map(|point| objective(point).unwrap_or(f64::NAN))
            .collect();

        Ok(Self {
            domain,
            xs,
            ys,
            values,
        })
    }

    #[must_use]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    #[must_use]
    pub fn resolution(&self) -> usize {
        self.xs.len()
    }

    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Returns the value at `(xs[i], ys[j])`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    #[must_use]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.xs.len(), "column {i} out of range");
        self.values[j * self.xs.len() + i]
    }

    /// Returns the smallest and largest finite values, or `None` if no cell
    /// could be evaluated.
    #[must_use]
    pub fn range(&self) -> Option<[f64; 2]> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some([v, v]),
                Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
            })
    }
}

/// Returns `n >= 2` evenly spaced values from `lower` to `upper` inclusive.
pub(crate) fn linspace([lower, upper]: [f64; 2], n: usize) -> Vec<f64> {
    let step = (upper - lower) / (n - 1) as f64;
    (0..n)
        .map(|k| if k == n - 1 { upper } else { lower + step * k as f64 })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn domain_rejects_empty_and_non_finite_ranges() {
        assert!(Domain::new([0.0, 1.0], [0.0, 1.0]).is_ok());
        assert_eq!(
            Domain::new([1.0, 1.0], [0.0, 1.0]),
            Err(GridError::Range {
                axis: 'x',
                lower: 1.0,
                upper: 1.0
            })
        );
        assert!(Domain::new([0.0, 1.0], [0.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn default_domain_is_the_plot_box() {
        let domain = Domain::default();
        assert_eq!(domain.x_range(), [-4.0, 4.0]);
        assert!(domain.contains([4.0, -4.0]));
        assert!(!domain.contains([4.1, 0.0]));
    }

    #[test]
    fn linspace_hits_both_ends() {
        let xs = linspace([-4.0, 4.0], 5);
        assert_eq!(xs, [-4.0, -2.0, 0.0, 2.0, 4.0]);

        let xs = linspace([0.0, 0.3], 150);
        assert_eq!(xs.len(), 150);
        assert_relative_eq!(xs[149], 0.3);
    }

    #[test]
    fn samples_row_by_row() {
        let domain = Domain::new([0.0, 2.0], [0.0, 1.0]).unwrap();
        let grid = ObjectiveGrid::sample(domain, 3, |[x, y]| Some(x + 10.0 * y)).unwrap();

        assert_eq!(grid.resolution(), 3);
        assert_relative_eq!(grid.value(2, 0), 2.0);
        assert_relative_eq!(grid.value(0, 2), 10.0);
        assert_relative_eq!(grid.value(1, 1), 6.0);
        assert_eq!(grid.range(), Some([0.0, 12.0]));
    }

    #[test]
    fn failed_cells_are_nan_and_ignored_by_range() {
        let domain = Domain::new([0.0, 1.0], [0.0, 1.0]).unwrap();
        let grid = ObjectiveGrid::sample(domain, 2, |[x, y]| (x > 0.0).then_some(x + y)).unwrap();

        assert!(grid.value(0, 0).is_nan());
        assert_eq!(grid.range(), Some([1.0, 2.0]));

        let nothing = ObjectiveGrid::sample(domain, 2, |_| None).unwrap();
        assert_eq!(nothing.range(), None);
    }

    #[test]
    fn resolution_must_allow_cells() {
        let err = ObjectiveGrid::sample(Domain::default(), 1, |_| Some(0.0)).unwrap_err();
        assert_eq!(err, GridError::Resolution(1));
    }
}
