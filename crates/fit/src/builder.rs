// crate modules
use crate::fitter::Fitter;

// thermofit modules
use thermofit_delaunay::DEFAULT_TOLERANCE;

// external crates
use log::warn;

/// Builder implementation for Fitter configuration
///
/// The fields of [Fitter] are left public for direct use but the module also
/// implements a builder.
///
/// Any number of parameters can be set through chained calls (including
/// none), and [build()](FitterBuilder::build) returns the final [Fitter].
///
/// ```rust
/// # use thermofit_fit::Fitter;
/// let fitter = Fitter::builder()
///     .neighbours(5)
///     .tolerance(1e-6)
///     .disable_progress(false)
///     .build();
///
/// assert_eq!(fitter.neighbours, 5);
/// assert!(!fitter.disable_progress);
/// ```
#[derive(Debug, Clone)]
pub struct FitterBuilder {
    /// Number of nearest source points used outside the triangulation
    neighbours: usize,
    /// Barycentric slack
    tolerance: f64,
    /// Do not print the kdam progress indicators
    disable_progress: bool,
}

impl FitterBuilder {
    /// Create a new instance of the builder with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the [Fitter] type
    pub fn build(self) -> Fitter {
        Fitter {
            neighbours: self.neighbours,
            tolerance: self.tolerance,
            disable_progress: self.disable_progress,
        }
    }

    /// Number of nearest neighbours for extrapolation
    ///
    /// Defaults to 3. At least one neighbour is always used, and the number
    /// is capped at the size of the source cloud when fitting.
    pub fn neighbours(mut self, k: usize) -> Self {
        if k == 0 {
            warn!("Warning: at least one neighbour is required, using 1");
        }
        self.neighbours = k.max(1);
        self
    }

    /// Barycentric tolerance for deciding a target is inside a tetrahedron
    ///
    /// Targets sitting on the hull of the source cloud will often have tiny
    /// negative barycentric coordinates from rounding. A small tolerance keeps
    /// these interpolated rather than extrapolated.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    /// Hide the progress bar
    pub fn disable_progress(mut self, disable: bool) -> Self {
        self.disable_progress = disable;
        self
    }
}

impl Default for FitterBuilder {
    fn default() -> Self {
        Self {
            neighbours: 3,
            tolerance: DEFAULT_TOLERANCE,
            disable_progress: true,
        }
    }
}
