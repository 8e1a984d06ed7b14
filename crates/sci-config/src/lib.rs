//! Solver settings loading and validation.
//!
//! This crate provides:
//! - A typed `SolverConfig` for `solvers.json`
//! - Config resolution (CLI → env → user config dir → defaults)
//! - Schema and semantic validation

pub mod resolve;
pub mod solver_config;
pub mod validate;

pub use resolve::{resolve_config, resolve_from, ConfigPaths, ConfigSource, ResolvedConfig};
pub use solver_config::SolverConfig;
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = sci_common::SCHEMA_VERSION;
