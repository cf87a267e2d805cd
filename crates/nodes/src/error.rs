//! Result and Error types for thermofit-nodes

/// Type alias for `Result<T, nodes::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `thermofit-nodes` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to build fit targets")]
    FitError(#[from] thermofit_fit::Error),

    #[error("node set \"{0}\" not found")]
    NodeSetNotFound(String),

    #[error("node index {index} out of range (expected 1 to {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("field length does not match node count (expected {expected}, found {found})")]
    FieldLength { expected: usize, found: usize },

    #[error("time {time} does not follow previous time {previous}")]
    NonMonotonicTime { previous: f64, time: f64 },

    #[error("inconsistent length of {what} (expected {expected}, found {found})")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}
