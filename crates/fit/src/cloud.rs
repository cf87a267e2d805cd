// crate modules
use crate::error::{Error, Result};

// thermofit modules
use thermofit_utils::SliceExt;

// external crates
use log::{debug, warn};

/// Scattered source data, one scalar value per point
///
/// Coordinates and values are validated on construction so that everything
/// downstream can assume equal lengths and finite numbers.
///
/// A few conditioning helpers cover the usual preparation of neutronics
/// output before fitting: unit conversion, rescaling to another material or
/// pulse frequency, and clamping of small negative tallies.
///
/// ```rust
/// # use thermofit_fit::SourceCloud;
/// let coords = vec![[0.0, 0.0, 0.0], [100.0, 0.0, 0.0]];
/// let values = vec![-1.0e-3, 2.0];
///
/// let mut cloud = SourceCloud::new(coords, values).unwrap();
/// cloud.scale_coordinates(0.01); // cm to m
/// cloud.scale_values(0.5);
/// cloud.clamp_negative();
///
/// assert_eq!(cloud.coords()[1], [1.0, 0.0, 0.0]);
/// assert_eq!(cloud.values(), &[0.0, 1.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCloud {
    coords: Vec<[f64; 3]>,
    values: Vec<f64>,
}

impl SourceCloud {
    /// Pair up coordinates and values
    ///
    /// Fails if the lengths differ or anything is NAN/infinite. The number of
    /// points is not checked here, that is left to the triangulation.
    pub fn new(coords: Vec<[f64; 3]>, values: Vec<f64>) -> Result<Self> {
        if coords.len() != values.len() {
            return Err(Error::ShapeMismatch {
                what: "source values",
                expected: coords.len(),
                found: values.len(),
            });
        }

        if let Some(index) = coords.iter().position(|p| p.first_non_finite().is_some()) {
            return Err(Error::NonFiniteCoordinate {
                what: "source",
                index,
            });
        }

        if let Some(index) = values.first_non_finite() {
            return Err(Error::NonFiniteValue { index });
        }

        Ok(Self { coords, values })
    }

    /// Sum the values of several clouds sampled at the same points
    ///
    /// Useful where a tally is split into pieces (left, centre, right, etc.)
    /// on identical coordinates. The coordinates of the first cloud are kept
    /// and every other cloud must match them exactly.
    pub fn combine(clouds: &[SourceCloud]) -> Result<Self> {
        let Some((first, rest)) = clouds.split_first() else {
            return Err(Error::ShapeMismatch {
                what: "source clouds",
                expected: 1,
                found: 0,
            });
        };

        let mut combined = first.clone();
        for cloud in rest {
            if cloud.len() != combined.len() {
                return Err(Error::ShapeMismatch {
                    what: "combined source cloud",
                    expected: combined.len(),
                    found: cloud.len(),
                });
            }

            if let Some(index) = combined
                .coords
                .iter()
                .zip(&cloud.coords)
                .position(|(a, b)| a != b)
            {
                return Err(Error::IncompatibleClouds { index });
            }

            for (total, value) in combined.values.iter_mut().zip(&cloud.values) {
                *total += value;
            }
        }

        debug!("Combined {} source clouds", clouds.len());
        Ok(combined)
    }

    /// Number of source points
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// True if there are no points at all
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Point coordinates
    pub fn coords(&self) -> &[[f64; 3]] {
        &self.coords
    }

    /// Scalar value at each point
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Multiply every coordinate component by `factor`
    pub fn scale_coordinates(&mut self, factor: f64) {
        for p in self.coords.iter_mut() {
            for x in p.iter_mut() {
                *x *= factor;
            }
        }
    }

    /// Multiply every value by `factor`
    pub fn scale_values(&mut self, factor: f64) {
        for v in self.values.iter_mut() {
            *v *= factor;
        }
    }

    /// Set negative values to zero, returning how many were changed
    pub fn clamp_negative(&mut self) -> usize {
        let mut count = 0;
        for v in self.values.iter_mut().filter(|v| **v < 0.0) {
            *v = 0.0;
            count += 1;
        }

        if count > 0 {
            warn!("Clamped {count} negative source value(s) to zero");
        }
        count
    }
}
