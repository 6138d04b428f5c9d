use thiserror::Error;

/// Lower and upper bounds on the design variables.
///
/// Construction guarantees that both vectors have the same length, contain no
/// `NaN`, and satisfy `lower[i] <= upper[i]`. Infinite entries are allowed and
/// mean the variable is unbounded on that side.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

/// Errors that can occur when constructing [`Bounds`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BoundsError {
    #[error("lower has {lower} entries but upper has {upper}")]
    LengthMismatch { lower: usize, upper: usize },

    #[error("bound {index} is NaN")]
    Nan { index: usize },

    #[error("bound {index} is inverted: lower {lower} > upper {upper}")]
    Inverted { index: usize, lower: f64, upper: f64 },
}

impl Bounds {
    /// Creates validated bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the lengths differ, any entry is `NaN`, or any
    /// lower bound exceeds its upper bound.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, BoundsError> {
        if lower.len() != upper.len() {
            return Err(BoundsError::LengthMismatch {
                lower: lower.len(),
                upper: upper.len(),
            });
        }

        for (index, (&lo, &hi)) in lower.iter().zip(&upper).enumerate() {
            if lo.is_nan() || hi.is_nan() {
                return Err(BoundsError::Nan { index });
            }
            if lo > hi {
                return Err(BoundsError::Inverted {
                    index,
                    lower: lo,
                    upper: hi,
                });
            }
        }

        Ok(Self { lower, upper })
    }

    /// Creates bounds with the same `[lower, upper]` interval for `n` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `lower > upper` or either value is `NaN`.
    pub fn uniform(n: usize, lower: f64, upper: f64) -> Result<Self, BoundsError> {
        Self::new(vec![lower; n], vec![upper; n])
    }

    #[must_use]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    #[must_use]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Returns the number of bounded variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Returns `true` if `x` has the right length and lies inside the bounds,
    /// endpoints included.
    #[must_use]
    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.len()
            && self
                .pairs()
                .zip(x)
                .all(|((lo, hi), &xi)| lo <= xi && xi <= hi)
    }

    /// Returns `true` if every interval of `self` lies inside `other`.
    #[must_use]
    pub fn is_within(&self, other: &Bounds) -> bool {
        self.len() == other.len()
            && self
                .pairs()
                .zip(other.pairs())
                .all(|((lo, hi), (olo, ohi))| olo <= lo && hi <= ohi)
    }

    /// Iterates over `(lower, upper)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.lower.iter().copied().zip(self.upper.iter().copied())
    }
}
