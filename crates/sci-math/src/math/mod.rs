//! Core math modules.

pub mod beta;
pub mod erf;
pub mod gamma;
pub mod incomplete_gamma;
pub mod lambert;
pub mod solver;
