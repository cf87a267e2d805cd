//! Nearest-neighbour search and inverse-distance weighting
//!
//! Targets outside the source triangulation are usually just the outer skin
//! of the structural mesh, where node coordinates have been rounded slightly
//! differently to the source. These fall back to a weighted average of the
//! closest source points.

// external crates
use kiddo::{ImmutableKdTree, SquaredEuclidean};

/// A source point found by a nearest-neighbour query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    /// Index into the source points
    pub index: usize,
    /// Euclidean distance from the query point
    pub distance: f64,
}

/// Build the search tree over a set of source points
///
/// The tree is static, and items are the indices of `points`. The immutable
/// tree copes with any number of points sharing a coordinate, which regular
/// source grids do along every axis.
pub fn build_tree(points: &[[f64; 3]]) -> ImmutableKdTree<f64, 3> {
    ImmutableKdTree::new_from_slice(points)
}

/// The `k` closest source points to `query`, nearest first
///
/// Asking for more points than exist returns them all.
///
/// ```rust
/// # use thermofit_fit::{build_tree, nearest};
/// let points = [
///     [0.0, 0.0, 0.0],
///     [1.0, 0.0, 0.0],
///     [0.0, 2.0, 0.0],
///     [0.0, 0.0, 3.0],
/// ];
/// let tree = build_tree(&points);
///
/// let found = nearest(&tree, &[0.9, 0.0, 0.0], 2);
/// assert_eq!(found[0].index, 1);
/// assert_eq!(found[1].index, 0);
/// assert!((found[0].distance - 0.1).abs() < 1e-12);
/// ```
pub fn nearest(tree: &ImmutableKdTree<f64, 3>, query: &[f64; 3], k: usize) -> Vec<Neighbour> {
    tree.nearest_n::<SquaredEuclidean>(query, k)
        .into_iter()
        .map(|n| Neighbour {
            index: n.item as usize,
            distance: n.distance.sqrt(),
        })
        .collect()
}

/// Inverse-distance weighted average of neighbour values
///
/// Each neighbour is weighted by `1/d`. If any neighbour is exactly
/// coincident with the query the result is the mean of the coincident values
/// only, so no division by zero ever happens. An empty set of neighbours
/// gives NAN.
///
/// ```rust
/// # use thermofit_fit::{idw, Neighbour};
/// let values = [10.0, 20.0, 40.0];
/// let neighbours = [
///     Neighbour { index: 0, distance: 1.0 },
///     Neighbour { index: 2, distance: 3.0 },
/// ];
/// // (10/1 + 40/3) / (1/1 + 1/3)
/// assert!((idw(&values, &neighbours) - 17.5).abs() < 1e-12);
///
/// let coincident = [Neighbour { index: 1, distance: 0.0 }, neighbours[0]];
/// assert_eq!(idw(&values, &coincident), 20.0);
/// ```
pub fn idw(values: &[f64], neighbours: &[Neighbour]) -> f64 {
    let coincident = neighbours
        .iter()
        .filter(|n| n.distance == 0.0)
        .map(|n| values[n.index])
        .collect::<Vec<f64>>();

    if !coincident.is_empty() {
        return coincident.iter().sum::<f64>() / coincident.len() as f64;
    }

    let (weighted, total) = neighbours
        .iter()
        .fold((0.0, 0.0), |(weighted, total), n| {
            let w = 1.0 / n.distance;
            (weighted + w * values[n.index], total + w)
        });

    weighted / total
}
