//! Error types for the scientific workspace.

use sci_math::SolveError;
use thiserror::Error;

/// Result type alias for workspace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid solver settings: {0}")]
    InvalidSettings(String),

    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    // Evaluation errors (30-39)
    #[error("{function}: argument outside the function's domain")]
    OutOfDomain { function: String },

    #[error("{function}: no convergence after {iterations} iterations (last estimate {last})")]
    NotConverged {
        function: String,
        iterations: u32,
        last: f64,
    },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidSettings(_) => 11,
            Error::SchemaValidation(_) => 12,
            Error::OutOfDomain { .. } => 30,
            Error::NotConverged { .. } => 31,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// True for configuration-range errors.
    pub fn is_config(&self) -> bool {
        (10..20).contains(&self.code())
    }
}

impl From<SolveError> for Error {
    fn from(err: SolveError) -> Self {
        match err {
            SolveError::OutOfDomain { function } => Error::OutOfDomain {
                function: function.to_string(),
            },
            SolveError::NotConverged {
                function,
                iterations,
                last,
            } => Error::NotConverged {
                function: function.to_string(),
                iterations,
                last,
            },
        }
    }
}
