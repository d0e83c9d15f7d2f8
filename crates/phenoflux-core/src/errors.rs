use thiserror::Error;

use crate::FloatValue;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum PhenoError {
    #[error("{0}")]
    Error(String),
    /// A parameter value that would make the model ill-defined, e.g. a
    /// degenerate cardinal-temperature triple or a non-positive threshold.
    /// Detected once, at parameter validation; never masked at run time.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
    /// Latitude outside the range where the day-length approximation holds.
    #[error("latitude {0} outside the supported range [-65, 65]")]
    InvalidLatitude(FloatValue),
    /// A previous-day state whose flags or bookkeeping violate the phase
    /// machine guards. These are caller errors, not model states.
    #[error("invalid simulation state: {0}")]
    SequencingViolation(String),
}

/// Convenience type for `Result<T, PhenoError>`.
pub type PhenoResult<T> = Result<T, PhenoError>;
