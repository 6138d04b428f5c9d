//! Contour level spacing.

use crate::grid::linspace;

/// Returns `count` levels `min + t²·(max - min)` for `t` evenly spaced on `[0, 1]`.
///
/// Squaring packs levels near the minimum, where a steep valley would
/// otherwise get a single contour. Returns an empty list for `count == 0`,
/// and `[min]` for `count == 1` or a flat range.
#[must_use]
pub fn quadratic([min, max]: [f64; 2], count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ if max <= min => vec![min],
        _ => linspace([0.0, 1.0], count)
            .into_iter()
            .map(|t| min + t * t * (max - min))
            .collect(),
    }
}
