use crate::f;

/// Extends float primitives with formatting and comparison helpers
pub trait FloatExt {
    /// Scientific formatting with a signed, zero padded exponent
    ///
    /// The standard `{:e}` output drops the sign and padding on exponents,
    /// which makes columns of field values hard to read.
    ///
    /// ```rust
    /// # use thermofit_utils::FloatExt;
    /// assert_eq!((-1.0_f64).sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!(1.5e-7_f64.sci(3, 2), "1.500e-07".to_string());
    /// assert_eq!(450.0_f64.sci(2, 3), "4.50e+002".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// Equality within a combined absolute/relative tolerance
    ///
    /// ```rust
    /// # use thermofit_utils::FloatExt;
    /// assert!(15.0_f64.is_close(15.0 + 1e-13, 1e-12));
    /// assert!(!15.0_f64.is_close(15.1, 1e-12));
    /// ```
    fn is_close(&self, other: f64, tol: f64) -> bool;
}

impl FloatExt for f64 {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let formatted = f!("{:.precision$e}", self, precision = precision);
        match formatted.rsplit_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                f!("{mantissa}e{sign}{digits:0>exp_pad$}")
            }
            // NaN and inf have no exponent to pad
            None => formatted,
        }
    }

    fn is_close(&self, other: f64, tol: f64) -> bool {
        let scale = self.abs().max(other.abs()).max(1.0);
        (self - other).abs() <= tol * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sci_handles_non_finite() {
        assert_eq!(f64::NAN.sci(2, 2), "NaN");
        assert_eq!(f64::INFINITY.sci(2, 2), "inf");
    }

    #[test]
    fn sci_small_and_large() {
        assert_eq!(0.0_f64.sci(2, 2), "0.00e+00");
        assert_eq!(1.23456e-12_f64.sci(3, 2), "1.235e-12");
        assert_eq!(6.02e23_f64.sci(2, 2), "6.02e+23");
    }
}
