//! On-disk solver configuration.
//!
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "description": "tighter Lambert W",
//!   "solvers": {
//!     "lambert_w": { "max_iterations": 300, "tolerance": 1e-10 }
//!   }
//! }
//! ```
//!
//! Solvers left out of `solvers` keep their built-in budgets.

use serde::{Deserialize, Serialize};
use std::path::Path;

use sci_math::SolverSettings;

use crate::validate::{ValidationError, ValidationResult};
use crate::CONFIG_SCHEMA_VERSION;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub schema_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub solvers: SolverSettings,
}

impl SolverConfig {
    /// Load a config from a JSON file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_json(&content)
    }

    /// Parse a config from a JSON string.
    pub fn parse_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    pub fn to_json_pretty(&self) -> ValidationResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ValidationError::ParseError(format!("Serialization failed: {}", e)))
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            solvers: SolverSettings::DEFAULT,
        }
    }
}
