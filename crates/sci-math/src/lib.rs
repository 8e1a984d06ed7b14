//! Special functions for scientific computing.
//!
//! Pure `f64` routines: the error function, the gamma family (gamma,
//! log-gamma, digamma, incomplete gammas and inverses), the beta family
//! (beta, regularized incomplete beta and its inverse) and the Lambert W
//! function. Iterative routines return an [`Estimate`] that says whether the
//! solver converged, ran out of budget, or rejected its input.
//!
//! All functions are stateless and safe to call from any number of threads.

pub mod math;

pub use math::beta::*;
pub use math::erf::*;
pub use math::gamma::*;
pub use math::incomplete_gamma::*;
pub use math::lambert::*;
pub use math::solver::{Estimate, IterationPolicy, SolveError, SolverSettings, Status, FPMIN};
