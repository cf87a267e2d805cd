use crate::error::{Error, Result};

/// Extends functionality for slices of `f64` values
pub trait SliceExt {
    /// Find the minimum value in a float slice
    ///
    /// Any NAN values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use thermofit_utils::{Error, SliceExt};
    /// assert_eq!([1.1, 0.5, 2.2].try_min(), Ok(0.5));
    /// assert_eq!([1.1, f64::NAN].try_min(), Err(Error::SliceContainsUndefinedValues));
    /// assert_eq!(Vec::<f64>::new().try_min(), Err(Error::SliceContainsNoValues));
    /// ```
    ///
    /// Uses `total_cmp` for the comparison, so the ordering is always defined
    /// once the non-finite values have been excluded.
    fn try_min(&self) -> Result<f64>;

    /// Find the maximum value in a float slice
    ///
    /// Any NAN values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use thermofit_utils::{Error, SliceExt};
    /// assert_eq!([1.1, 0.5, 2.2].try_max(), Ok(2.2));
    /// assert_eq!([f64::INFINITY].try_max(), Err(Error::SliceContainsUndefinedValues));
    /// ```
    fn try_max(&self) -> Result<f64>;

    /// Index of the first value that is NAN or infinite, if any
    ///
    /// ```rust
    /// # use thermofit_utils::SliceExt;
    /// assert_eq!([1.0, 2.0, f64::NAN].first_non_finite(), Some(2));
    /// assert_eq!([1.0, 2.0].first_non_finite(), None);
    /// ```
    fn first_non_finite(&self) -> Option<usize>;
}

impl SliceExt for [f64] {
    fn try_min(&self) -> Result<f64> {
        if self.first_non_finite().is_some() {
            return Err(Error::SliceContainsUndefinedValues);
        }

        self.iter()
            .copied()
            .min_by(|a, b| a.total_cmp(b))
            .ok_or(Error::SliceContainsNoValues)
    }

    fn try_max(&self) -> Result<f64> {
        if self.first_non_finite().is_some() {
            return Err(Error::SliceContainsUndefinedValues);
        }

        self.iter()
            .copied()
            .max_by(|a, b| a.total_cmp(b))
            .ok_or(Error::SliceContainsNoValues)
    }

    fn first_non_finite(&self) -> Option<usize> {
        self.iter().position(|v| !v.is_finite())
    }
}
