//! Result and Error types for thermofit-fit

/// Type alias for `Result<T, fit::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `thermofit-fit` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("csv error")]
    CsvError(#[from] csv::Error),

    #[error("serde_json error")]
    JSONError(#[from] serde_json::Error),

    #[error("vtkio error")]
    VtkioError(#[from] vtkio::Error),

    #[error("failed to initialise progress bar: {0}")]
    ProgressError(String),

    #[error("source cloud is degenerate: {0}")]
    DegenerateInput(String),

    #[error("inconsistent length of {what} (expected {expected}, found {found})")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{what} coordinate {index} is not finite")]
    NonFiniteCoordinate { what: &'static str, index: usize },

    #[error("source value {index} is not finite")]
    NonFiniteValue { index: usize },

    #[error("source clouds do not share coordinates (first difference at point {index})")]
    IncompatibleClouds { index: usize },
}

impl From<thermofit_delaunay::Error> for Error {
    fn from(error: thermofit_delaunay::Error) -> Self {
        match error {
            thermofit_delaunay::Error::DegenerateInput(reason) => Error::DegenerateInput(reason),
            thermofit_delaunay::Error::NonFiniteCoordinate { index } => {
                Error::NonFiniteCoordinate {
                    what: "source",
                    index,
                }
            }
        }
    }
}
