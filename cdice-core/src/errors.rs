use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum CdiceError {
    #[error("{0}")]
    Error(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Numerical domain error in {context}: {message}")]
    NumericalDomain {
        context: &'static str,
        message: String,
    },
    #[error("Cannot remap an empty input series")]
    EmptySeries,
    #[error("Time grids are incommensurate: step ratio {0} is not an integer multiple in either direction")]
    IncommensurateGrids(f64),
}

/// Convenience type for `Result<T, CdiceError>`.
pub type CdiceResult<T> = Result<T, CdiceError>;
