//! Point location within a finished triangulation

// thermofit modules
use thermofit_utils::Bounds;

/// Upper limit on buckets along any one axis
const MAX_BUCKETS_PER_AXIS: usize = 128;

/// Outcome of a point location query
///
/// Tetrahedron indices start at zero and every index is valid, so there is no
/// sentinel value hiding in here. Anything outside the triangulation, or
/// misclassified on the hull through rounding, is simply `NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Index of the tetrahedron containing the point
    Found(usize),
    /// Point is not inside any tetrahedron
    NotFound,
}

impl Location {
    /// Tetrahedron index, if found
    pub fn tetrahedron(&self) -> Option<usize> {
        match self {
            Location::Found(t) => Some(*t),
            Location::NotFound => None,
        }
    }

    /// True for the `Found` variant
    pub fn is_found(&self) -> bool {
        matches!(self, Location::Found(_))
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Location::Found(t) => write!(f, "tetrahedron {t}"),
            Location::NotFound => write!(f, "not found"),
        }
    }
}

/// Uniform grid of buckets over the bounds of the triangulation
///
/// Every tetrahedron is registered with each bucket its bounding box touches,
/// so a query only needs to test the few candidates in one bucket.
#[derive(Debug, Clone)]
pub(crate) struct BucketGrid {
    bounds: Bounds,
    dims: [usize; 3],
    size: [f64; 3],
    buckets: Vec<Vec<usize>>,
}

impl BucketGrid {
    pub(crate) fn new(points: &[[f64; 3]], tetrahedra: &[[usize; 4]], bounds: &Bounds) -> Self {
        let extent = bounds.extent();
        let per_axis =
            ((tetrahedra.len() as f64).cbrt().ceil() as usize).clamp(1, MAX_BUCKETS_PER_AXIS);

        let mut dims = [1; 3];
        let mut size = [1.0; 3];
        for axis in 0..3 {
            if extent[axis] > 0.0 {
                dims[axis] = per_axis;
                size[axis] = extent[axis] / per_axis as f64;
            }
        }

        let mut grid = Self {
            bounds: *bounds,
            dims,
            size,
            buckets: vec![Vec::new(); dims[0] * dims[1] * dims[2]],
        };

        for (t, tet) in tetrahedra.iter().enumerate() {
            let mut lower = [usize::MAX; 3];
            let mut upper = [0; 3];
            for v in tet {
                for axis in 0..3 {
                    let i = grid.axis_index(axis, points[*v][axis]);
                    lower[axis] = lower[axis].min(i);
                    upper[axis] = upper[axis].max(i);
                }
            }

            for i in lower[0]..=upper[0] {
                for j in lower[1]..=upper[1] {
                    for k in lower[2]..=upper[2] {
                        let b = grid.flat_index(i, j, k);
                        grid.buckets[b].push(t);
                    }
                }
            }
        }

        grid
    }

    /// Tetrahedra that may contain the point
    ///
    /// Points further than `slack` outside the bounds have no candidates.
    pub(crate) fn candidates(&self, point: &[f64; 3], slack: f64) -> &[usize] {
        let outside = (0..3).any(|axis| {
            point[axis] < self.bounds.lower[axis] - slack
                || point[axis] > self.bounds.upper[axis] + slack
        });

        if outside {
            return &[];
        }

        let b = self.flat_index(
            self.axis_index(0, point[0]),
            self.axis_index(1, point[1]),
            self.axis_index(2, point[2]),
        );
        &self.buckets[b]
    }

    /// Length scale used to turn relative tolerances into distances
    pub(crate) fn scale(&self) -> f64 {
        self.bounds.max_extent()
    }

    /// Bucket index along one axis, clamped into the grid
    fn axis_index(&self, axis: usize, value: f64) -> usize {
        let i = ((value - self.bounds.lower[axis]) / self.size[axis]).floor();
        if i <= 0.0 {
            0
        } else {
            (i as usize).min(self.dims[axis] - 1)
        }
    }

    fn flat_index(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.dims[0] * (j + self.dims[1] * k)
    }
}
