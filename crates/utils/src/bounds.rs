// crate modules
use crate::error::{Error, Result};
use crate::f;
use crate::float_ext::FloatExt;
use crate::slice_ext::SliceExt;

/// Axis-aligned bounding box of a set of 3-D points
///
/// ```rust
/// # use thermofit_utils::Bounds;
/// let points = [[0.0, 0.0, 0.0], [2.0, 1.0, 0.5], [1.0, -1.0, 0.0]];
/// let bounds = Bounds::from_points(&points).unwrap();
///
/// assert_eq!(bounds.lower, [0.0, -1.0, 0.0]);
/// assert_eq!(bounds.upper, [2.0, 1.0, 0.5]);
/// assert_eq!(bounds.centre(), [1.0, 0.0, 0.25]);
/// assert_eq!(bounds.max_extent(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum x, y, z
    pub lower: [f64; 3],
    /// Maximum x, y, z
    pub upper: [f64; 3],
}

impl Bounds {
    /// Smallest box containing every point
    ///
    /// Fails for an empty slice or any non-finite coordinate component.
    pub fn from_points(points: &[[f64; 3]]) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::NoPoints);
        }

        if let Some(index) = points.iter().position(|p| p.first_non_finite().is_some()) {
            return Err(Error::NonFiniteCoordinate { index });
        }

        let mut lower = [0.0; 3];
        let mut upper = [0.0; 3];
        for axis in 0..3 {
            let component = points.iter().map(|p| p[axis]).collect::<Vec<f64>>();
            lower[axis] = component.try_min()?;
            upper[axis] = component.try_max()?;
        }

        Ok(Self { lower, upper })
    }

    /// Side lengths in x, y, z
    pub fn extent(&self) -> [f64; 3] {
        [
            self.upper[0] - self.lower[0],
            self.upper[1] - self.lower[1],
            self.upper[2] - self.lower[2],
        ]
    }

    /// Longest side length
    pub fn max_extent(&self) -> f64 {
        let [dx, dy, dz] = self.extent();
        dx.max(dy).max(dz)
    }

    /// Length of the box diagonal
    pub fn diagonal(&self) -> f64 {
        let [dx, dy, dz] = self.extent();
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Mid-point of the box
    pub fn centre(&self) -> [f64; 3] {
        [
            0.5 * (self.lower[0] + self.upper[0]),
            0.5 * (self.lower[1] + self.upper[1]),
            0.5 * (self.lower[2] + self.upper[2]),
        ]
    }

    /// Points exactly on a face are inside
    pub fn contains(&self, point: &[f64; 3]) -> bool {
        (0..3).all(|axis| point[axis] >= self.lower[axis] && point[axis] <= self.upper[axis])
    }

    /// Grow the box to include another
    pub fn union(&self, other: &Bounds) -> Bounds {
        let mut merged = *self;
        for axis in 0..3 {
            merged.lower[axis] = merged.lower[axis].min(other.lower[axis]);
            merged.upper[axis] = merged.upper[axis].max(other.upper[axis]);
        }
        merged
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let fmt_corner = |c: &[f64; 3]| {
            f!(
                "({}, {}, {})",
                c[0].sci(4, 2),
                c[1].sci(4, 2),
                c[2].sci(4, 2)
            )
        };
        write!(
            f,
            "{} -> {}",
            fmt_corner(&self.lower),
            fmt_corner(&self.upper)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_points() {
        assert_eq!(Bounds::from_points(&[]), Err(Error::NoPoints));
    }

    #[test]
    fn non_finite_points() {
        let points = [[0.0, 0.0, 0.0], [1.0, f64::NAN, 0.0]];
        assert_eq!(
            Bounds::from_points(&points),
            Err(Error::NonFiniteCoordinate { index: 1 })
        );
    }

    #[test]
    fn union_and_contains() {
        let a = Bounds::from_points(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]).unwrap();
        let b = Bounds::from_points(&[[2.0, -1.0, 0.5]]).unwrap();
        let merged = a.union(&b);

        assert_eq!(merged.lower, [0.0, -1.0, 0.0]);
        assert_eq!(merged.upper, [2.0, 1.0, 1.0]);
        assert!(merged.contains(&[2.0, 1.0, 1.0]));
        assert!(!a.contains(&[1.0, 1.0, 1.0 + 1e-12]));
        assert_eq!(b.max_extent(), 0.0);
    }
}
