//! Shared types for the scientific workspace.
//!
//! This crate provides the pieces every front end needs:
//! - Unified error type with stable numeric codes
//! - Output format selection
//! - Schema versioning for JSON outputs

pub mod error;
pub mod output;
pub mod schema;

pub use error::{Error, Result};
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;
