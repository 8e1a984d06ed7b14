//! Semantic validation of solver configs.

use thiserror::Error;

use sci_common::schema::is_compatible;

use crate::solver_config::SolverConfig;
use crate::CONFIG_SCHEMA_VERSION;

/// Why a config could not be used.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("schema version mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check schema compatibility and every iteration policy.
pub fn validate_config(config: &SolverConfig) -> ValidationResult<()> {
    if !is_compatible(&config.schema_version) {
        return Err(ValidationError::SchemaMismatch {
            expected: CONFIG_SCHEMA_VERSION.to_string(),
            found: config.schema_version.clone(),
        });
    }
    config.solvers.validate().map_err(ValidationError::Invalid)
}

impl From<ValidationError> for sci_common::Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::IoError(msg) => sci_common::Error::Io(std::io::Error::other(msg)),
            ValidationError::ParseError(msg) => sci_common::Error::Config(msg),
            ValidationError::SchemaMismatch { expected, found } => {
                sci_common::Error::SchemaValidation(format!("expected {expected}, found {found}"))
            }
            ValidationError::Invalid(msg) => sci_common::Error::InvalidSettings(msg),
        }
    }
}
