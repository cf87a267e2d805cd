//! Result and Error types for thermofit-delaunay

/// Type alias for `Result<T, delaunay::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `thermofit-delaunay` crate
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    /// The points can not span a volume, so no tetrahedra exist
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A coordinate component is NAN or infinite
    #[error("coordinate of point {index} is not finite")]
    NonFiniteCoordinate { index: usize },
}
