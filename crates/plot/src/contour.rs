//! Marching-squares contour extraction.
//!
//! Each grid cell is classified by which of its corners lie at or above the
//! level, giving zero, one, or (for saddles) two segments between cell edges.
//! Segments that share an edge are then stitched into polylines. Closed
//! contours repeat their first point at the end.
//!
//! Cells with a `NaN` corner produce no segments, so contours stop at
//! regions where the objective could not be evaluated.

use std::collections::{HashMap, VecDeque};

use crate::ObjectiveGrid;

/// The polylines of a single contour level.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub level: f64,
    pub lines: Vec<Vec<[f64; 2]>>,
}

/// A grid edge, named by its lower-left node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Edge {
    /// From `(i, j)` to `(i + 1, j)`.
    Horizontal(usize, usize),

    /// From `(i, j)` to `(i, j + 1)`.
    Vertical(usize, usize),
}

/// Traces the contour of `grid` at `level`.
#[must_use]
pub fn contour(grid: &ObjectiveGrid, level: f64) -> Contour {
    let segments = segments(grid, level);
    let lines = stitch(&segments)
        .into_iter()
        .map(|edges| edges.iter().map(|&edge| crossing(grid, edge, level)).collect())
        .collect();

    Contour { level, lines }
}

fn segments(grid: &ObjectiveGrid, level: f64) -> Vec<[Edge; 2]> {
    let n = grid.resolution();
    let mut segments = Vec::new();

    for j in 0..n - 1 {
        for i in 0..n - 1 {
            let corners = [
                grid.value(i, j),
                grid.value(i + 1, j),
                grid.value(i + 1, j + 1),
                grid.value(i, j + 1),
            ];
            if corners.iter().any(|v| v.is_nan()) {
                continue;
            }

            let case = corners
                .iter()
                .enumerate()
                .filter(|(_, v)| **v >= level)
                .fold(0, |case, (k, _)| case | (1 << k));

            let bottom = Edge::Horizontal(i, j);
            let right = Edge::Vertical(i + 1, j);
            let top = Edge::Horizontal(i, j + 1);
            let left = Edge::Vertical(i, j);
            let centre_above = corners.iter().sum::<f64>() / 4.0 >= level;

            match case {
                1 | 14 => segments.push([left, bottom]),
                2 | 13 => segments.push([bottom, right]),
                3 | 12 => segments.push([left, right]),
                4 | 11 => segments.push([right, top]),
                6 | 9 => segments.push([bottom, top]),
                7 | 8 => segments.push([top, left]),
                5 | 10 => {
                    // Saddle: the centre decides which diagonal pair is joined.
                    if (case == 5) == centre_above {
                        segments.push([bottom, right]);
                        segments.push([top, left]);
                    } else {
                        segments.push([left, bottom]);
                        segments.push([right, top]);
                    }
                }
                _ => {}
            }
        }
    }

    segments
}

/// Joins segments that share an edge into chains of edges.
fn stitch(segments: &[[Edge; 2]]) -> Vec<Vec<Edge>> {
    let mut touching: HashMap<Edge, Vec<usize>> = HashMap::new();
    for (k, segment) in segments.iter().enumerate() {
        for edge in segment {
            touching.entry(*edge).or_default().push(k);
        }
    }

    let mut used = vec![false; segments.len()];
    let mut chains = Vec::new();

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;

        let [head, tail] = segments[start];
        let mut chain = VecDeque::from([head, tail]);

        let mut end = tail;
        while let Some(edge) = follow(end, &touching, segments, &mut used) {
            chain.push_back(edge);
            end = edge;
        }

        let mut end = head;
        while let Some(edge) = follow(end, &touching, segments, &mut used) {
            chain.push_front(edge);
            end = edge;
        }

        chains.push(chain.into());
    }

    chains
}

/// Claims an unused segment touching `edge` and returns its other edge.
fn follow(
    edge: Edge,
    touching: &HashMap<Edge, Vec<usize>>,
    segments: &[[Edge; 2]],
    used: &mut [bool],
) -> Option<Edge> {
    let k = *touching.get(&edge)?.iter().find(|&&k| !used[k])?;
    used[k] = true;

    let [a, b] = segments[k];
    Some(if a == edge { b } else { a })
}

/// Linearly interpolates where `level` crosses `edge`.
fn crossing(grid: &ObjectiveGrid, edge: Edge, level: f64) -> [f64; 2] {
    let (xs, ys) = (grid.xs(), grid.ys());
    let ((i0, j0), (i1, j1)) = match edge {
        Edge::Horizontal(i, j) => ((i, j), (i + 1, j)),
        Edge::Vertical(i, j) => ((i, j), (i, j + 1)),
    };

    let (a, b) = (grid.value(i0, j0), grid.value(i1, j1));
    let t = if a == b { 0.5 } else { (level - a) / (b - a) };

    [
        xs[i0] + t * (xs[i1] - xs[i0]),
        ys[j0] + t * (ys[j1] - ys[j0]),
    ]
}
