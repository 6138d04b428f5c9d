use std::ops::Deref;

/// One recorded design-variable assignment.
///
/// A `Point` owns its coordinates. Recording a point copies the caller's
/// slice, so later changes to solver storage never alter history.
#[derive(Debug, Clone, PartialEq)]
pub struct Point(Box<[f64]>);

impl Point {
    #[must_use]
    pub fn new(coords: &[f64]) -> Self {
        Self(coords.into())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns the first two coordinates, or `None` for points with fewer.
    #[must_use]
    pub fn xy(&self) -> Option<[f64; 2]> {
        match self.as_slice() {
            [x, y, ..] => Some([*x, *y]),
            _ => None,
        }
    }
}

impl Deref for Point {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for Point {
    fn from(coords: Vec<f64>) -> Self {
        Self(coords.into_boxed_slice())
    }
}

/// The chronological log of design points evaluated during one run.
///
/// A trajectory only grows by [`record`](Trajectory::record) and only shrinks
/// by [`clear`](Trajectory::clear); recorded points are never edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    points: Vec<Point>,
}

impl Trajectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a copy of `x`.
    pub fn record(&mut self, x: &[f64]) {
        self.points.push(Point::new(x));
    }

    /// Removes every recorded point.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
