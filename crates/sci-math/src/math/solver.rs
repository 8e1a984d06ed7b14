//! Iteration budgets and explicit solver outcomes.
//!
//! Every iterative routine in this crate (Lambert W, the incomplete-beta
//! continued fraction, and the two inverse solvers) reports an [`Estimate`]
//! instead of a bare `f64`, so callers can tell a converged answer from one
//! that ran out of iterations or never started because the input was outside
//! the function's domain.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Floor substituted for denominators that underflow toward zero inside
/// continued fractions (modified Lentz's method).
pub const FPMIN: f64 = 1e-30;

/// Outcome of an iterative evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Tolerance met within the iteration budget.
    Converged,
    /// Budget exhausted; the value is the last estimate.
    Exhausted,
    /// A domain precondition failed; the value is NaN.
    OutOfDomain,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Converged => write!(f, "converged"),
            Status::Exhausted => write!(f, "exhausted"),
            Status::OutOfDomain => write!(f, "out_of_domain"),
        }
    }
}

/// A value paired with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub value: f64,
    /// Refinement steps performed (0 for closed-form shortcuts).
    pub iterations: u32,
    pub status: Status,
}

impl Estimate {
    pub fn converged(value: f64, iterations: u32) -> Self {
        Self {
            value,
            iterations,
            status: Status::Converged,
        }
    }

    pub fn exhausted(value: f64, iterations: u32) -> Self {
        Self {
            value,
            iterations,
            status: Status::Exhausted,
        }
    }

    pub fn out_of_domain() -> Self {
        Self {
            value: f64::NAN,
            iterations: 0,
            status: Status::OutOfDomain,
        }
    }

    /// Exact value reached without iterating.
    pub fn exact(value: f64) -> Self {
        Self::converged(value, 0)
    }

    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }

    pub fn is_out_of_domain(&self) -> bool {
        self.status == Status::OutOfDomain
    }

    /// Transform the value while keeping the iteration count and status.
    ///
    /// Out-of-domain estimates stay NaN.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self.status {
            Status::OutOfDomain => self,
            _ => Self {
                value: f(self.value),
                ..self
            },
        }
    }

    /// Strict view: only converged values are `Ok`.
    pub fn into_result(self, function: &'static str) -> Result<f64, SolveError> {
        match self.status {
            Status::Converged => Ok(self.value),
            Status::Exhausted => Err(SolveError::NotConverged {
                function,
                iterations: self.iterations,
                last: self.value,
            }),
            Status::OutOfDomain => Err(SolveError::OutOfDomain { function }),
        }
    }
}

/// Failure view of an [`Estimate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("{function}: argument outside the function's domain")]
    OutOfDomain { function: &'static str },

    #[error("{function}: no convergence after {iterations} iterations (last estimate {last})")]
    NotConverged {
        function: &'static str,
        iterations: u32,
        last: f64,
    },
}

/// Iteration cap and stopping tolerance for one solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationPolicy {
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl IterationPolicy {
    pub const fn new(max_iterations: u32, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".to_string());
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(format!(
                "tolerance must be finite and > 0, got {}",
                self.tolerance
            ));
        }
        Ok(())
    }
}

/// Budgets for every iterative routine in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Newton refinement of `w·e^w = x`; tolerance on successive estimates.
    #[serde(default = "default_lambert_w")]
    pub lambert_w: IterationPolicy,
    /// Lentz evaluation of the incomplete-beta fraction; tolerance on `|Δ − 1|`.
    #[serde(default = "default_continued_fraction")]
    pub continued_fraction: IterationPolicy,
    /// Secant inversion of the lower incomplete gamma; tolerance on the
    /// absolute difference of successive guesses.
    #[serde(default = "default_inv_lower_gamma")]
    pub inv_lower_gamma: IterationPolicy,
    /// Newton inversion of the regularized incomplete beta; tolerance on the
    /// step relative to the iterate.
    #[serde(default = "default_inv_incomplete_beta")]
    pub inv_incomplete_beta: IterationPolicy,
}

fn default_lambert_w() -> IterationPolicy {
    SolverSettings::DEFAULT.lambert_w
}

fn default_continued_fraction() -> IterationPolicy {
    SolverSettings::DEFAULT.continued_fraction
}

fn default_inv_lower_gamma() -> IterationPolicy {
    SolverSettings::DEFAULT.inv_lower_gamma
}

fn default_inv_incomplete_beta() -> IterationPolicy {
    SolverSettings::DEFAULT.inv_incomplete_beta
}

impl SolverSettings {
    pub const DEFAULT: SolverSettings = SolverSettings {
        lambert_w: IterationPolicy::new(150, 1e-7),
        continued_fraction: IterationPolicy::new(100, 3e-7),
        inv_lower_gamma: IterationPolicy::new(1000, 1e-8),
        inv_incomplete_beta: IterationPolicy::new(10, 1e-8),
    };

    /// Check every policy, naming the first offending solver.
    pub fn validate(&self) -> Result<(), String> {
        for (name, policy) in self.policies() {
            policy.validate().map_err(|e| format!("{name}: {e}"))?;
        }
        Ok(())
    }

    /// Named view over the individual policies.
    pub fn policies(&self) -> [(&'static str, &IterationPolicy); 4] {
        [
            ("lambert_w", &self.lambert_w),
            ("continued_fraction", &self.continued_fraction),
            ("inv_lower_gamma", &self.inv_lower_gamma),
            ("inv_incomplete_beta", &self.inv_incomplete_beta),
        ]
    }
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self::DEFAULT
    }
}
