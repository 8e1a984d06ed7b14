//! Exit codes for the `sci` CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.

use sci_common::Error;
use sci_math::Status;

/// Exit codes for `sci` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Value computed (or command succeeded)
    Ok = 0,

    /// Iteration budget exhausted; last estimate reported
    NotConverged = 1,

    /// Argument outside the function's domain
    OutOfDomain = 2,

    /// Configuration error
    ConfigError = 10,

    /// I/O error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates an error requiring attention.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    pub fn from_status(status: Status) -> Self {
        match status {
            Status::Converged => ExitCode::Ok,
            Status::Exhausted => ExitCode::NotConverged,
            Status::OutOfDomain => ExitCode::OutOfDomain,
        }
    }

    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::Io(_) => ExitCode::IoError,
            Error::OutOfDomain { .. } => ExitCode::OutOfDomain,
            Error::NotConverged { .. } => ExitCode::NotConverged,
            e if e.is_config() => ExitCode::ConfigError,
            _ => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}
