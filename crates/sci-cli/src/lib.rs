//! Command-line front end for the special functions.
//!
//! The binary is a thin shell over this library so the argument model,
//! exit codes and renderers can be tested without spawning a process.

pub mod cli;
pub mod commands;
pub mod exit_codes;
pub mod logging;

pub use cli::Cli;
pub use exit_codes::ExitCode;
